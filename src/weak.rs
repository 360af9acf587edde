//! Weak-reference counterpart of [`SharedPtr`].

use core::mem::ManuallyDrop;
use core::ptr::NonNull;

use crate::block::{self, BlockPtr};
use crate::error::DanglingReference;
use crate::macroed::thin;
use crate::shared::SharedPtr;

/// Non-owning observer of a [`SharedPtr`]'s control block.
///
/// A `WeakPtr` keeps the control block allocated but never keeps the object
/// alive. It cannot be dereferenced; promote it with [`Self::lock`],
/// [`Self::upgrade`] or [`Self::try_upgrade`] first.
///
/// It remembers the target of the pointer it was created from, so
/// promoting a weak pointer taken from an aliasing [`SharedPtr`] gives back
/// the same alias.
pub struct WeakPtr<T: ?Sized> {
    ptr: Option<NonNull<T>>,
    block: Option<BlockPtr>,
}

impl<T: ?Sized> WeakPtr<T> {
    /// Constructs a weak pointer with no control block.
    ///
    /// It is always expired.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            ptr: None,
            block: None,
        }
    }

    /// Gets the number of strong pointers to the observed object.
    #[inline(always)]
    pub fn use_count(&self) -> usize {
        self.block.map_or(0, |block| unsafe { block::counts(block) }.0)
    }

    /// Gets the number of weak holds on the observed control block.
    ///
    /// A block adopted from a null pointer never has strong holds, so every
    /// [`SharedPtr`] sharing it is counted here as well.
    #[inline(always)]
    pub fn weak_count(&self) -> usize {
        self.block.map_or(0, |block| unsafe { block::counts(block) }.1)
    }

    /// Returns `true` if there is no object left to promote to.
    #[inline(always)]
    pub fn expired(&self) -> bool {
        self.use_count() == 0
    }

    /// Attempts to promote the weak reference into a strong reference.
    ///
    /// Returns `None` if there are no strong references left live.
    pub fn upgrade(&self) -> Option<SharedPtr<T>> {
        let block = self.block?;
        if !unsafe { block::try_promote(block) } {
            return None;
        }
        Some(SharedPtr::from_parts(self.ptr, Some(block)))
    }

    /// Attempts to promote the weak reference, returning an empty
    /// [`SharedPtr`] if it has expired.
    ///
    /// On success the observed object's use count is one higher than
    /// before the call.
    #[inline(always)]
    pub fn lock(&self) -> SharedPtr<T> {
        self.upgrade().unwrap_or_default()
    }

    /// Attempts to promote the weak reference, failing with
    /// [`DanglingReference`] if it has expired.
    #[inline(always)]
    pub fn try_upgrade(&self) -> Result<SharedPtr<T>, DanglingReference> {
        self.upgrade().ok_or(DanglingReference)
    }

    /// Gets the address of the observed target, if it still has one.
    ///
    /// A target embedded in its control block keeps its address until the
    /// block is freed, even once the object itself has been destroyed. A
    /// target that was boxed separately has been freed once it expires, so
    /// this returns `None` for it.
    pub fn as_ptr(&self) -> Option<NonNull<T>> {
        let block = self.block?;
        if unsafe { block.as_ref() }.is_embedded() || !self.expired() {
            self.ptr
        } else {
            None
        }
    }

    /// Converts this weak pointer into one with a different target type,
    /// such as a trait object, keeping its hold on the same control block.
    ///
    /// `f` only ever sees the cached address and is not called when there is
    /// none. The object may already be gone, so `f` must not read through
    /// the pointer.
    ///
    /// # Safety
    ///
    /// The pointer `f` returns must be valid to dereference for as long as
    /// the observed owner is alive, as with [`SharedPtr::aliasing`].
    /// Unsizing coercions such as `NonNull<T>` to `NonNull<dyn Trait>`
    /// always satisfy this.
    pub unsafe fn map_ptr<U: ?Sized>(self, f: impl FnOnce(NonNull<T>) -> NonNull<U>) -> WeakPtr<U> {
        let this = ManuallyDrop::new(self);
        WeakPtr {
            ptr: this.ptr.map(f),
            block: this.block,
        }
    }

    /// Releases this pointer's hold on its control block, leaving it
    /// without one.
    pub fn reset(&mut self) {
        self.ptr = None;
        if let Some(block) = self.block.take() {
            unsafe { block::release_weak(block) };
        }
    }

    /// Exchanges the contents of two weak pointers without touching the counts.
    #[inline(always)]
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other)
    }

    /// Returns `true` if the two weak pointers observe the same block and
    /// the same target.
    #[inline(always)]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        thin(self.block) == thin(other.block) && thin(self.ptr) == thin(other.ptr)
    }
}

impl<T: ?Sized> From<&SharedPtr<T>> for WeakPtr<T> {
    /// Creates a weak pointer observing the same control block as `shared`.
    fn from(shared: &SharedPtr<T>) -> Self {
        if let Some(block) = shared.block {
            unsafe { block::acquire_weak(block) };
        }
        Self {
            ptr: shared.ptr,
            block: shared.block,
        }
    }
}

impl<T: ?Sized> Clone for WeakPtr<T> {
    #[inline(always)]
    fn clone(&self) -> Self {
        if let Some(block) = self.block {
            unsafe { block::acquire_weak(block) };
        }
        Self {
            ptr: self.ptr,
            block: self.block,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        if self.ptr_eq(source) {
            return;
        }
        *self = source.clone();
    }
}

impl<T: ?Sized> Drop for WeakPtr<T> {
    fn drop(&mut self) {
        if let Some(block) = self.block.take() {
            unsafe { block::release_weak(block) };
        }
    }
}

impl<T: ?Sized> Default for WeakPtr<T> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> core::fmt::Debug for WeakPtr<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WeakPtr")
            .field("expired", &self.expired())
            .field("use_count", &self.use_count())
            .finish()
    }
}
