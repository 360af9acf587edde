use core::ptr::NonNull;

/// Strips any pointer metadata, leaving just the address (or null).
#[allow(unused)]
#[inline(always)]
pub(crate) fn thin<T: ?Sized>(ptr: Option<NonNull<T>>) -> *const u8 {
    match ptr {
        Some(ptr) => ptr.cast::<u8>().as_ptr(),
        None => core::ptr::null(),
    }
}

/// Implements address-based formatting, equality, ordering and hashing for an
/// owning pointer type.
///
/// Two owning pointers compare equal when they point at the same address,
/// which is what a raw pointer comparison would say. Pointer metadata (slice
/// lengths, vtables) is ignored.
#[allow(unused)]
macro_rules! address_identity {
    ($tyname:literal, impl[$($params:tt)*] $ty:ty, |$this:ident| $addr:expr) => {
        impl<$($params)*> core::fmt::Pointer for $ty {
            #[doc = concat!("Formats the address the `", $tyname, "` points at.")]
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                let $this = self;
                core::fmt::Pointer::fmt(&$addr, f)
            }
        }

        impl<$($params)*> PartialEq for $ty {
            #[inline(always)]
            fn eq(&self, other: &Self) -> bool {
                let lhs = {
                    let $this = self;
                    $addr
                };
                let rhs = {
                    let $this = other;
                    $addr
                };
                lhs == rhs
            }
        }

        impl<$($params)*> Eq for $ty {}

        impl<$($params)*> PartialOrd for $ty {
            #[inline(always)]
            fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
                Some(core::cmp::Ord::cmp(self, other))
            }
        }

        impl<$($params)*> Ord for $ty {
            fn cmp(&self, other: &Self) -> core::cmp::Ordering {
                let lhs = {
                    let $this = self;
                    $addr
                };
                let rhs = {
                    let $this = other;
                    $addr
                };
                lhs.cmp(&rhs)
            }
        }

        impl<$($params)*> core::hash::Hash for $ty {
            fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
                let $this = self;
                core::hash::Hash::hash(&$addr, state)
            }
        }
    };
}

/// Implements `Debug` for an owning pointer type by showing the pointee, or
/// `null` when there is none, followed by any extra observers.
#[allow(unused)]
macro_rules! debug_pointee {
    ($tyname:literal, impl[$($params:tt)*] $ty:ty, |$this:ident| $target:expr $(, $field:literal => $value:expr)* $(,)?) => {
        impl<$($params)*> core::fmt::Debug for $ty {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                let $this = self;
                let mut s = f.debug_struct($tyname);
                match $target {
                    Some(target) => s.field("target", &target),
                    None => s.field("target", &format_args!("null")),
                };
                $(s.field($field, &$value);)*
                s.finish()
            }
        }
    };
}
