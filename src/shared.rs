//! Single-threaded shared-ownership pointers.
//!
//! This module is only included when the "shared" feature is enabled, but that feature is enabled by default.

extern crate alloc;

use alloc::boxed::Box;
use core::mem::ManuallyDrop;
use core::ptr::NonNull;

use crate::block::{self, BlockKind, BlockPtr, EmbeddedBlock, WrappingBlock};
use crate::error::DanglingReference;
use crate::macroed::thin;
use crate::observe::ObserveSelf;
use crate::weak::WeakPtr;

/// Smart pointer sharing ownership of a heap object with its clones.
///
/// A `SharedPtr` stores two things: the control block that keeps the owning
/// allocation alive, and a pointer to what it dereferences to. These are
/// usually the same object, but the aliasing constructors ([`Self::alias`],
/// [`Self::aliasing`], [`Self::map`]) let a pointer refer to a field of the
/// owning object, or to anything else whose lifetime is tied to it, while
/// still sharing the owner's counts.
///
/// The counts are not atomic, so `SharedPtr` is neither `Send` nor `Sync`.
/// Strong reference cycles are never collected; break them with
/// [`WeakPtr`].
pub struct SharedPtr<T: ?Sized> {
    pub(crate) ptr: Option<NonNull<T>>,
    pub(crate) block: Option<BlockPtr>,
}

impl<T: 'static> SharedPtr<T> {
    /// Allocates the object and its control block together and moves
    /// `value` into it.
    ///
    /// This performs exactly one heap allocation.
    #[inline(always)]
    pub fn new(value: T) -> Self {
        let (block, object) = EmbeddedBlock::allocate(value);
        Self {
            ptr: Some(object),
            block: Some(block),
        }
    }

    /// Adopts an object allocated through [`Box`], possibly null.
    ///
    /// The control block is allocated separately. A null `ptr` still gets a
    /// control block, but one that has already expired: the result reports a
    /// [`use_count`](Self::use_count) of zero and tests as null.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or have come from [`Box::into_raw`], and nothing
    /// else may free it.
    pub unsafe fn from_raw(ptr: *mut T) -> Self {
        let ptr = NonNull::new(ptr);
        Self {
            ptr,
            block: Some(WrappingBlock::allocate(ptr)),
        }
    }

    /// Releases the current ownership and then adopts `ptr` under a new
    /// control block, as [`Self::from_raw`] does.
    ///
    /// # Safety
    ///
    /// The same as for [`Self::from_raw`].
    pub unsafe fn reset_raw(&mut self, ptr: *mut T) {
        self.reset();
        *self = unsafe { Self::from_raw(ptr) };
    }
}

impl<T: ?Sized + 'static> SharedPtr<T> {
    /// Takes ownership of a boxed object, wrapping it in a separately
    /// allocated control block.
    pub fn from_box(value: Box<T>) -> Self {
        let ptr = NonNull::from(Box::leak(value));
        Self {
            ptr: Some(ptr),
            block: Some(WrappingBlock::allocate(Some(ptr))),
        }
    }

    /// Releases the current ownership and then takes ownership of `value`.
    pub fn reset_with(&mut self, value: Box<T>) {
        self.reset();
        *self = Self::from_box(value);
    }
}

impl<T: ObserveSelf> SharedPtr<T> {
    /// Like [`Self::new`], and registers the new owner with the object so
    /// that it can later produce handles to itself.
    pub fn new_observed(value: T) -> Self {
        let this = Self::new(value);
        this.register_self();
        this
    }

    /// Like [`Self::from_box`], and registers the new owner with the object
    /// so that it can later produce handles to itself.
    pub fn from_box_observed(value: Box<T>) -> Self {
        let this = Self::from_box(value);
        this.register_self();
        this
    }

    /// Like [`Self::from_raw`], and registers the new owner with the object
    /// when `ptr` is not null.
    ///
    /// # Safety
    ///
    /// The same as for [`Self::from_raw`].
    pub unsafe fn from_raw_observed(ptr: *mut T) -> Self {
        let this = unsafe { Self::from_raw(ptr) };
        this.register_self();
        this
    }

    /// Like [`Self::reset_with`], and registers the new owner with the
    /// object.
    pub fn reset_with_observed(&mut self, value: Box<T>) {
        self.reset();
        *self = Self::from_box_observed(value);
    }

    /// Like [`Self::reset_raw`], and registers the new owner with the object
    /// when `ptr` is not null.
    ///
    /// # Safety
    ///
    /// The same as for [`Self::from_raw`].
    pub unsafe fn reset_raw_observed(&mut self, ptr: *mut T) {
        self.reset();
        *self = unsafe { Self::from_raw_observed(ptr) };
    }

    fn register_self(&self) {
        if let Some(object) = Self::get(self) {
            object.self_observer().register(Self::downgrade(self));
        }
    }
}

impl<T: ?Sized> SharedPtr<T> {
    /// Creates a pointer with no control block and no target.
    #[inline(always)]
    pub const fn empty() -> Self {
        Self {
            ptr: None,
            block: None,
        }
    }

    /// Assembles a pointer from a hold the caller has already recorded.
    #[inline(always)]
    pub(crate) fn from_parts(ptr: Option<NonNull<T>>, block: Option<BlockPtr>) -> Self {
        Self { ptr, block }
    }

    /// Creates a new pointer that shares `this`'s control block but points
    /// at `ptr`.
    ///
    /// The result keeps `this`'s owner alive and contributes to its
    /// [`use_count`](Self::use_count), even though it dereferences to
    /// something else. `ptr` may be null.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or stay valid for as long as the owner of `this`
    /// is alive, typically because it points into that owner.
    pub unsafe fn aliasing<U: ?Sized>(this: &Self, ptr: *const U) -> SharedPtr<U> {
        if let Some(block) = this.block {
            unsafe { block::acquire_shared(block) };
        }
        SharedPtr {
            ptr: NonNull::new(ptr as *mut U),
            block: this.block,
        }
    }

    /// Creates a new pointer to some part of the current pointer's target,
    /// sharing the same control block.
    ///
    /// The closure receives a reference to the pointer's target and must
    /// return a reference borrowed from it. The target of that new reference
    /// then becomes the target of the resulting pointer. An empty `this`
    /// produces an empty result without calling `f`.
    ///
    /// Since `f` has to work for a borrow of any lifetime, it cannot return
    /// something it captured, which would not live as long as the owner:
    ///
    /// ```compile_fail
    /// use ctlptr::SharedPtr;
    ///
    /// let owner = SharedPtr::new(1_u64);
    /// let local = vec![2_u64; 4];
    /// let alias = SharedPtr::alias(&owner, |_| &local[..]);
    /// drop(local);
    /// assert_eq!(alias[0], 2);
    /// ```
    pub fn alias<U: ?Sized>(this: &Self, f: impl for<'b> FnOnce(&'b T) -> &'b U) -> SharedPtr<U> {
        match Self::get(this) {
            Some(target) => unsafe { Self::aliasing(this, f(target) as *const U) },
            None => SharedPtr::empty(),
        }
    }

    /// Conditionally creates a new pointer to some part of the current
    /// pointer's target, sharing the same control block.
    ///
    /// If the closure returns `None` then no new pointer is created and so
    /// the strong count remains unchanged. As with [`Self::alias`], the
    /// closure can only return references borrowed from its argument:
    ///
    /// ```compile_fail
    /// use ctlptr::SharedPtr;
    ///
    /// let owner = SharedPtr::new(1_u64);
    /// let local = 2_u64;
    /// let alias = SharedPtr::try_alias(&owner, |_| Some(&local));
    /// ```
    pub fn try_alias<U: ?Sized>(
        this: &Self,
        f: impl for<'b> FnOnce(&'b T) -> Option<&'b U>,
    ) -> Option<SharedPtr<U>> {
        let target = f(Self::get(this)?)?;
        Some(unsafe { Self::aliasing(this, target as *const U) })
    }

    /// Converts this pointer into one that targets a part of, or another view
    /// of, the current target, without touching the counts.
    ///
    /// This is also how a pointer is converted to a trait object, by passing
    /// a function that coerces `&T` to `&dyn Trait`.
    pub fn map<U: ?Sized>(this: Self, f: impl FnOnce(&T) -> &U) -> SharedPtr<U> {
        let ptr = Self::get(&this).map(|target| NonNull::from(f(target)));
        let this = ManuallyDrop::new(this);
        SharedPtr {
            ptr,
            block: this.block,
        }
    }

    /// Creates a weak pointer observing the same control block.
    #[inline(always)]
    pub fn downgrade(this: &Self) -> WeakPtr<T> {
        WeakPtr::from(this)
    }

    /// Releases this pointer's ownership, leaving it empty.
    pub fn reset(&mut self) {
        self.ptr = None;
        if let Some(block) = self.block.take() {
            unsafe { block::release_shared(block) };
        }
    }

    /// Exchanges the contents of two pointers without touching the counts.
    #[inline(always)]
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other)
    }

    /// Returns a reference to the target, or `None` when it is null.
    #[inline(always)]
    pub fn get(this: &Self) -> Option<&T> {
        this.ptr.map(|ptr| unsafe { ptr.as_ref() })
    }

    /// Returns a mutable reference to the target if this is the only handle
    /// of any kind to its control block.
    pub fn get_mut(this: &mut Self) -> Option<&mut T> {
        let (strong, weak) = unsafe { block::counts(this.block?) };
        if strong != 1 || weak != 0 {
            return None;
        }
        this.ptr.map(|mut ptr| unsafe { ptr.as_mut() })
    }

    /// Gets a raw pointer to the target.
    ///
    /// The counts are not affected in any way and the pointer remains valid
    /// for as long as at least one strong reference remains live.
    #[inline(always)]
    pub fn as_ptr(this: &Self) -> Option<NonNull<T>> {
        this.ptr
    }

    /// Gets the number of strong pointers sharing this pointer's control
    /// block, or zero if it has none.
    #[inline(always)]
    pub fn use_count(this: &Self) -> usize {
        this.block.map_or(0, |block| unsafe { block::counts(block) }.0)
    }

    /// Gets the number of weak holds on this pointer's control block.
    ///
    /// An object registered through [`Self::new_observed`] holds one of
    /// these itself. A block adopted from a null pointer through
    /// [`Self::from_raw`] counts its shared handles here too, since it
    /// never has an owner to keep alive.
    #[inline(always)]
    pub fn weak_count(this: &Self) -> usize {
        this.block.map_or(0, |block| unsafe { block::counts(block) }.1)
    }

    /// Returns `true` if there is no target to dereference.
    ///
    /// This looks only at the target pointer: an aliasing pointer to null
    /// is null even though it keeps its owner alive.
    #[inline(always)]
    pub fn is_null(this: &Self) -> bool {
        this.ptr.is_none()
    }

    /// Reports how this pointer's control block was allocated.
    #[inline(always)]
    pub fn block_kind(this: &Self) -> Option<BlockKind> {
        this.block.map(|block| unsafe { block::kind(block) })
    }

    /// Returns `true` if the two pointers target the same address.
    #[inline(always)]
    pub fn ptr_eq(lhs: &Self, rhs: &Self) -> bool {
        thin(lhs.ptr) == thin(rhs.ptr)
    }

    /// Returns `true` if the two pointers share a control block, whatever
    /// they point at.
    #[inline(always)]
    pub fn owner_eq<U: ?Sized>(lhs: &Self, rhs: &SharedPtr<U>) -> bool {
        thin(lhs.block) == thin(rhs.block)
    }
}

impl<T: ?Sized> Clone for SharedPtr<T> {
    /// Creates a new pointer to the same object.
    ///
    /// This increments the strong count of the control block.
    #[inline(always)]
    fn clone(&self) -> Self {
        if let Some(block) = self.block {
            unsafe { block::acquire_shared(block) };
        }
        Self {
            ptr: self.ptr,
            block: self.block,
        }
    }

    /// Makes `self` share `source`'s ownership.
    ///
    /// Does nothing when both already share the same block and target.
    fn clone_from(&mut self, source: &Self) {
        if Self::owner_eq(self, source) && Self::ptr_eq(self, source) {
            return;
        }
        *self = source.clone();
    }
}

impl<T: ?Sized> Drop for SharedPtr<T> {
    fn drop(&mut self) {
        if let Some(block) = self.block.take() {
            unsafe { block::release_shared(block) };
        }
    }
}

impl<T: ?Sized> Default for SharedPtr<T> {
    #[inline(always)]
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized> core::ops::Deref for SharedPtr<T> {
    type Target = T;

    /// Returns a reference to the target.
    ///
    /// # Panics
    ///
    /// Panics if the pointer is null. Use [`SharedPtr::get`] to test first.
    fn deref(&self) -> &T {
        match Self::get(self) {
            Some(target) => target,
            None => panic!("dereferenced a null SharedPtr"),
        }
    }
}

impl<T: ?Sized> AsRef<T> for SharedPtr<T> {
    fn as_ref(&self) -> &T {
        self
    }
}

impl<T: 'static> From<T> for SharedPtr<T> {
    /// Moves the value into a heap allocation and returns the first strong reference to it.
    ///
    /// Equivalent to [`Self::new`].
    #[inline(always)]
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: ?Sized + 'static> From<Box<T>> for SharedPtr<T> {
    /// Equivalent to [`Self::from_box`].
    #[inline(always)]
    fn from(value: Box<T>) -> Self {
        Self::from_box(value)
    }
}

/// Promotion that reports an expired weak pointer as an error.
///
/// The blanket `TryFrom<U> for T where U: Into<T>` impl also applies to
/// `SharedPtr<_>`, so the target type has to be spelled out when it cannot
/// be inferred from context:
///
/// ```
/// use ctlptr::{DanglingReference, SharedPtr};
///
/// let owner = SharedPtr::new(3_u8);
/// let weak = SharedPtr::downgrade(&owner);
/// assert_eq!(*SharedPtr::<u8>::try_from(&weak).unwrap(), 3);
/// drop(owner);
/// assert_eq!(SharedPtr::<u8>::try_from(&weak).err(), Some(DanglingReference));
/// ```
impl<T: ?Sized> TryFrom<&WeakPtr<T>> for SharedPtr<T> {
    type Error = DanglingReference;

    /// Promotes a weak pointer, failing if its object has already been
    /// destroyed.
    #[inline(always)]
    fn try_from(weak: &WeakPtr<T>) -> Result<Self, Self::Error> {
        weak.try_upgrade()
    }
}

address_identity!("SharedPtr", impl[T: ?Sized] SharedPtr<T>, |this| thin(this.ptr));
debug_pointee!(
    "SharedPtr",
    impl[T: ?Sized + core::fmt::Debug] SharedPtr<T>,
    |this| SharedPtr::get(this),
    "use_count" => SharedPtr::use_count(this),
);

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use alloc::format;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::Cell;

    struct Tracked {
        drops: Rc<Cell<u32>>,
        value: u64,
    }

    impl Tracked {
        fn new(drops: &Rc<Cell<u32>>, value: u64) -> Self {
            Self {
                drops: drops.clone(),
                value,
            }
        }
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    #[test]
    pub fn new() {
        let p = SharedPtr::new(24_u64);
        assert_eq!(*p, 24);
        assert_eq!(SharedPtr::use_count(&p), 1);
        assert_eq!(SharedPtr::block_kind(&p), Some(BlockKind::Embedded));
    }

    #[test]
    pub fn naked_into() {
        let p: SharedPtr<u64> = 24.into();
        assert_eq!(*p, 24);
    }

    #[test]
    pub fn from_box() {
        let p = SharedPtr::from_box(Box::new(24_u64));
        assert_eq!(*p, 24);
        assert_eq!(SharedPtr::block_kind(&p), Some(BlockKind::Wrapping));

        let p: SharedPtr<[u8]> = Box::<[u8]>::from(&b"abc"[..]).into();
        assert_eq!(&*p, b"abc");
    }

    #[test]
    pub fn from_raw() {
        let p = unsafe { SharedPtr::from_raw(Box::into_raw(Box::new(5_i32))) };
        assert_eq!(*p, 5);
        assert_eq!(SharedPtr::use_count(&p), 1);
    }

    #[test]
    pub fn from_raw_null_is_expired() {
        let p = unsafe { SharedPtr::<u64>::from_raw(core::ptr::null_mut()) };
        assert!(SharedPtr::is_null(&p));
        assert_eq!(SharedPtr::use_count(&p), 0, "null pointer counted as an owner");
        assert_eq!(SharedPtr::block_kind(&p), Some(BlockKind::Wrapping));

        let q = p.clone();
        assert_eq!(SharedPtr::use_count(&q), 0);
        let w = SharedPtr::downgrade(&q);
        assert!(w.expired());
        assert_eq!(
            w.weak_count(),
            3,
            "shared handles to a null adoption are weak holds"
        );
        assert_eq!(SharedPtr::weak_count(&p), 3);
        drop(p);
        drop(q);
        assert!(w.lock().is_empty_handle());
    }

    #[test]
    pub fn empty() {
        let p = SharedPtr::<u64>::empty();
        assert_eq!(SharedPtr::use_count(&p), 0);
        assert!(SharedPtr::is_null(&p));
        assert_eq!(SharedPtr::get(&p), None);
        assert_eq!(SharedPtr::block_kind(&p), None);
    }

    #[test]
    #[should_panic(expected = "dereferenced a null SharedPtr")]
    pub fn deref_null_panics() {
        let p = SharedPtr::<u64>::default();
        let _value: u64 = *p;
    }

    #[test]
    pub fn copies_share_count() {
        let drops = Rc::new(Cell::new(0));
        let p = SharedPtr::new(Tracked::new(&drops, 1));
        let copies: Vec<_> = (0..4).map(|_| p.clone()).collect();
        assert_eq!(SharedPtr::use_count(&p), 5, "wrong use_count with five owners");
        drop(copies);
        assert_eq!(SharedPtr::use_count(&p), 1);
        assert_eq!(drops.get(), 0, "object destroyed while still owned");
        drop(p);
        assert_eq!(drops.get(), 1, "object not destroyed with its last owner");
    }

    #[test]
    pub fn move_keeps_count() {
        let p = SharedPtr::new(3_u8);
        let q = p.clone();
        let mut slot = Some(q);
        let moved = slot.take().unwrap();
        assert_eq!(SharedPtr::use_count(&moved), 2);

        let mut src = SharedPtr::new(9_u8);
        let dst = core::mem::take(&mut src);
        assert_eq!(SharedPtr::use_count(&dst), 1);
        assert_eq!(SharedPtr::use_count(&src), 0, "moved-from pointer still counted");
        assert!(SharedPtr::is_null(&src), "moved-from pointer tests as non-null");
    }

    #[test]
    pub fn clone_from_self_is_noop() {
        let drops = Rc::new(Cell::new(0));
        let mut p = SharedPtr::new(Tracked::new(&drops, 1));
        let q = p.clone();
        p.clone_from(&q);
        assert_eq!(SharedPtr::use_count(&p), 2);
        drop(q);
        assert_eq!(SharedPtr::use_count(&p), 1);
        assert_eq!(drops.get(), 0);
    }

    #[test]
    pub fn clone_from_releases_previous() {
        let drops = Rc::new(Cell::new(0));
        let mut p = SharedPtr::new(Tracked::new(&drops, 1));
        let q = SharedPtr::new(Tracked::new(&drops, 2));
        p.clone_from(&q);
        assert_eq!(drops.get(), 1, "previous object not released");
        assert_eq!(p.value, 2);
        assert_eq!(SharedPtr::use_count(&q), 2);
    }

    #[test]
    pub fn clone_map() {
        struct Foo {
            a: u64,
            b: u64,
        }
        let foo = SharedPtr::new(Foo { a: 3, b: 4 });
        let foo_a: SharedPtr<u64> = SharedPtr::alias(&foo, |foo| &foo.a);
        let foo_b: SharedPtr<u64> = SharedPtr::alias(&foo, |foo| &foo.b);
        drop(foo); // The two aliases can safely outlive the original
        assert_eq!(
            SharedPtr::use_count(&foo_a),
            2,
            "pointer to a has wrong use_count",
        );
        assert!(SharedPtr::owner_eq(&foo_a, &foo_b));
        assert_eq!(*foo_a, 3);
        assert_eq!(*foo_b, 4);
    }

    #[test]
    pub fn aliasing_keeps_owner_alive() {
        let drops = Rc::new(Cell::new(0));
        let owner = SharedPtr::new(Tracked::new(&drops, 17));
        let value = unsafe { SharedPtr::aliasing(&owner, &owner.value as *const u64) };
        assert_eq!(SharedPtr::use_count(&value), SharedPtr::use_count(&owner));
        assert_eq!(SharedPtr::use_count(&value), 2);
        drop(owner);
        assert_eq!(drops.get(), 0, "owner destroyed while an alias lives");
        assert_eq!(*value, 17);
        drop(value);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    pub fn aliasing_null_keeps_owner_alive() {
        let owner = SharedPtr::new(1_u8);
        let alias = unsafe { SharedPtr::aliasing(&owner, core::ptr::null::<u16>()) };
        assert!(SharedPtr::is_null(&alias));
        assert_eq!(SharedPtr::use_count(&alias), 2);
    }

    #[test]
    pub fn clone_filter_map() {
        struct Foo {
            a: Option<u64>,
            b: Option<u64>,
        }
        let foo = SharedPtr::new(Foo {
            a: Some(3),
            b: None,
        });
        let foo_a: Option<SharedPtr<u64>> = SharedPtr::try_alias(&foo, |foo| foo.a.as_ref());
        let foo_b: Option<SharedPtr<u64>> = SharedPtr::try_alias(&foo, |foo| foo.b.as_ref());
        assert_eq!(
            SharedPtr::use_count(&foo),
            2, // foo_b doesn't have a reference
            "pointer to foo has wrong use_count",
        );
        assert_eq!(foo_a.map(|r| *r), Some(3));
        assert_eq!(foo_b.map(|r| *r), None);
    }

    #[test]
    pub fn map_to_trait_object() {
        trait Speak {
            fn speak(&self) -> u64;
        }
        impl Speak for Tracked {
            fn speak(&self) -> u64 {
                self.value
            }
        }
        fn as_speak(t: &Tracked) -> &(dyn Speak + 'static) {
            t
        }
        let drops = Rc::new(Cell::new(0));
        let p = SharedPtr::new(Tracked::new(&drops, 8));
        let q = p.clone();
        let dynamic: SharedPtr<dyn Speak> = SharedPtr::map(q, as_speak);
        assert_eq!(dynamic.speak(), 8);
        assert_eq!(SharedPtr::use_count(&p), 2, "map changed the count");
        drop(p);
        drop(dynamic);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    pub fn reset_releases() {
        let drops = Rc::new(Cell::new(0));
        let mut p = SharedPtr::new(Tracked::new(&drops, 1));
        p.reset();
        assert_eq!(drops.get(), 1);
        assert_eq!(SharedPtr::use_count(&p), 0);

        p.reset_with(Box::new(Tracked::new(&drops, 2)));
        assert_eq!(p.value, 2);
        unsafe { p.reset_raw(Box::into_raw(Box::new(Tracked::new(&drops, 3)))) };
        assert_eq!(drops.get(), 2);
        assert_eq!(p.value, 3);
        assert_eq!(SharedPtr::use_count(&p), 1);
    }

    #[test]
    pub fn swap() {
        let mut a = SharedPtr::new(1_u32);
        let mut b = SharedPtr::new(2_u32);
        let a2 = a.clone();
        a.swap(&mut b);
        assert_eq!((*a, *b), (2, 1));
        assert_eq!(SharedPtr::use_count(&b), 2);
        assert!(SharedPtr::ptr_eq(&a2, &b));
    }

    #[test]
    pub fn get_mut_requires_sole_handle() {
        let mut p = SharedPtr::new(1_u32);
        *SharedPtr::get_mut(&mut p).unwrap() = 2;
        let q = p.clone();
        assert!(SharedPtr::get_mut(&mut p).is_none());
        drop(q);
        let w = SharedPtr::downgrade(&p);
        assert!(SharedPtr::get_mut(&mut p).is_none());
        drop(w);
        assert_eq!(SharedPtr::get_mut(&mut p).copied(), Some(2));
    }

    #[test]
    pub fn equality_is_by_address() {
        let p = SharedPtr::new(5_u8);
        let q = p.clone();
        let r = SharedPtr::new(5_u8);
        assert_eq!(p, q);
        assert_ne!(p, r);
        assert_eq!(format!("{:p}", p), format!("{:p}", SharedPtr::as_ptr(&q).unwrap()));
    }

    #[test]
    pub fn debug() {
        let p = SharedPtr::new(5_u8);
        assert_eq!(format!("{p:?}"), "SharedPtr { target: 5, use_count: 1 }");
        let e = SharedPtr::<u8>::empty();
        assert_eq!(format!("{e:?}"), "SharedPtr { target: null, use_count: 0 }");
    }

    impl<T: ?Sized> SharedPtr<T> {
        fn is_empty_handle(&self) -> bool {
            SharedPtr::is_null(self) && SharedPtr::use_count(self) == 0
        }
    }
}
