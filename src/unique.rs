//! Exclusive-ownership pointers with a pluggable destruction policy.
//!
//! This module is only included when the "unique" feature is enabled, but that feature is enabled by default.

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::marker::PhantomData;
use core::mem::ManuallyDrop;
use core::ptr::NonNull;

use crate::macroed::thin;
use crate::pair::CompressedPair;

/// Destruction policy for the object owned by a [`UniquePtr`].
pub trait Deleter<T: ?Sized> {
    /// Destroys the object behind `ptr` and frees its storage.
    ///
    /// # Safety
    ///
    /// `ptr` must point to an object this policy knows how to destroy, and
    /// nothing may use it afterwards.
    unsafe fn delete(&mut self, ptr: NonNull<T>);
}

/// The default policy: the object was allocated by [`Box`] and is dropped
/// through it.
///
/// This covers single objects (`T`) and arrays (`[T]`) alike, since a boxed
/// slice knows its own length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DefaultDeleter;

impl<T: ?Sized> Deleter<T> for DefaultDeleter {
    #[inline(always)]
    unsafe fn delete(&mut self, ptr: NonNull<T>) {
        drop(unsafe { Box::from_raw(ptr.as_ptr()) });
    }
}

/// Adapts a closure into a [`Deleter`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FnDeleter<F>(pub F);

impl<T: ?Sized, F: FnMut(NonNull<T>)> Deleter<T> for FnDeleter<F> {
    #[inline(always)]
    unsafe fn delete(&mut self, ptr: NonNull<T>) {
        (self.0)(ptr)
    }
}

/// Smart pointer with sole ownership of its target.
///
/// The pointer and its [`Deleter`] are kept in a [`CompressedPair`], so with
/// a stateless policy such as [`DefaultDeleter`] a `UniquePtr` is exactly as
/// large as the (possibly fat) pointer it holds.
///
/// Dropping a `UniquePtr` runs its policy on whatever it currently holds.
/// Null is never passed to the policy.
///
/// `UniquePtr<[T]>` is the array form: it adds indexing, and its
/// `reset_raw_slice` does nothing when asked to re-adopt the array it
/// already owns.
pub struct UniquePtr<T: ?Sized, D: Deleter<T> = DefaultDeleter> {
    data: CompressedPair<Option<NonNull<T>>, D>,
    _owns: PhantomData<T>,
}

unsafe impl<T: ?Sized + Send, D: Deleter<T> + Send> Send for UniquePtr<T, D> {}
unsafe impl<T: ?Sized + Sync, D: Deleter<T> + Sync> Sync for UniquePtr<T, D> {}

impl<T> UniquePtr<T> {
    /// Moves `value` into a new heap allocation.
    #[inline(always)]
    pub fn new(value: T) -> Self {
        Self::from_box(Box::new(value))
    }
}

impl<T> UniquePtr<[T]> {
    /// Takes ownership of the vector's elements as an array.
    #[inline(always)]
    pub fn from_vec(values: Vec<T>) -> Self {
        Self::from_box(values.into_boxed_slice())
    }
}

impl<T: ?Sized> UniquePtr<T> {
    /// Takes ownership of a boxed object.
    #[inline(always)]
    pub fn from_box(value: Box<T>) -> Self {
        unsafe { Self::from_parts(Some(NonNull::from(Box::leak(value))), DefaultDeleter) }
    }

    /// Gives the target back as a [`Box`], or `None` when null.
    pub fn into_box(self) -> Option<Box<T>> {
        let (ptr, _) = self.into_parts();
        ptr.map(|ptr| unsafe { Box::from_raw(ptr.as_ptr()) })
    }

    /// Destroys the current target and takes ownership of `value` instead.
    pub fn reset(&mut self, value: Option<Box<T>>) {
        let ptr = value.map(|value| NonNull::from(Box::leak(value)));
        let old = core::mem::replace(self.data.first_mut(), ptr);
        if let Some(old) = old {
            unsafe { self.data.second_mut().delete(old) };
        }
    }
}

impl<T, D: Deleter<T>> UniquePtr<T, D> {
    /// Adopts `ptr`, which may be null, with a default-constructed policy.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or something `D` can destroy, and nothing else may
    /// destroy it.
    #[inline(always)]
    pub unsafe fn from_raw(ptr: *mut T) -> Self
    where
        D: Default,
    {
        unsafe { Self::from_raw_with_deleter(ptr, D::default()) }
    }

    /// Adopts `ptr`, which may be null, with the given policy.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or something `deleter` can destroy, and nothing
    /// else may destroy it.
    #[inline(always)]
    pub unsafe fn from_raw_with_deleter(ptr: *mut T, deleter: D) -> Self {
        unsafe { Self::from_parts(NonNull::new(ptr), deleter) }
    }

    /// Runs the policy on the current target and adopts `ptr` instead.
    ///
    /// # Safety
    ///
    /// As for [`Self::from_raw`]. `ptr` must not be the current target,
    /// since that is destroyed first.
    pub unsafe fn reset_raw(&mut self, ptr: *mut T) {
        let old = core::mem::replace(self.data.first_mut(), NonNull::new(ptr));
        if let Some(old) = old {
            unsafe { self.data.second_mut().delete(old) };
        }
    }
}

impl<T, D: Deleter<[T]>> UniquePtr<[T], D> {
    /// Adopts the array at `ptr`, which may be null, with a
    /// default-constructed policy.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or an array `D` can destroy, and nothing else may
    /// destroy it.
    #[inline(always)]
    pub unsafe fn from_raw_slice(ptr: *mut [T]) -> Self
    where
        D: Default,
    {
        unsafe { Self::from_parts(NonNull::new(ptr), D::default()) }
    }

    /// Runs the policy on the current array and adopts `ptr` instead.
    ///
    /// Re-adopting the array already owned does nothing.
    ///
    /// # Safety
    ///
    /// As for [`Self::from_raw_slice`].
    pub unsafe fn reset_raw_slice(&mut self, ptr: *mut [T]) {
        let ptr = NonNull::new(ptr);
        if thin(ptr) == thin(*self.data.first()) {
            return;
        }
        let old = core::mem::replace(self.data.first_mut(), ptr);
        if let Some(old) = old {
            unsafe { self.data.second_mut().delete(old) };
        }
    }

    /// Gets the number of elements, zero when null.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrows the elements; a null array is empty.
    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        self.get().unwrap_or(&[])
    }

    /// Borrows the elements mutably; a null array is empty.
    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.get_mut().unwrap_or(&mut [])
    }
}

impl<T: ?Sized, D: Deleter<T>> UniquePtr<T, D> {
    /// Assembles a pointer from its parts.
    ///
    /// # Safety
    ///
    /// `ptr` must be `None` or something `deleter` can destroy, and nothing
    /// else may destroy it.
    #[inline(always)]
    pub unsafe fn from_parts(ptr: Option<NonNull<T>>, deleter: D) -> Self {
        Self {
            data: CompressedPair::new(ptr, deleter),
            _owns: PhantomData,
        }
    }

    /// Creates a pointer that owns nothing.
    #[inline(always)]
    pub fn null() -> Self
    where
        D: Default,
    {
        unsafe { Self::from_parts(None, D::default()) }
    }

    /// Gives up ownership of the target without running the policy.
    ///
    /// The pointer is left null; the caller becomes responsible for the
    /// returned target.
    #[inline(always)]
    pub fn release(&mut self) -> Option<NonNull<T>> {
        self.data.first_mut().take()
    }

    /// Splits the pointer into its target and policy without running the
    /// policy.
    pub fn into_parts(self) -> (Option<NonNull<T>>, D) {
        let this = ManuallyDrop::new(self);
        unsafe { core::ptr::read(&this.data) }.into_parts()
    }

    /// Runs the policy on the current target, leaving the pointer null.
    pub fn clear(&mut self) {
        if let Some(old) = self.release() {
            unsafe { self.data.second_mut().delete(old) };
        }
    }

    /// Moves `other`'s target and policy into `self`, destroying what `self`
    /// held before.
    ///
    /// If both already hold the same target nothing changes, and `other`
    /// gives up its claim without running its policy.
    pub fn assign(&mut self, mut other: Self) {
        if thin(*self.data.first()) == thin(*other.data.first()) {
            other.release();
            return;
        }
        self.clear();
        let (ptr, deleter) = other.into_parts();
        *self.data.first_mut() = ptr;
        *self.data.second_mut() = deleter;
    }

    /// Changes the policy type, keeping the target.
    pub fn convert_deleter<E: Deleter<T> + From<D>>(self) -> UniquePtr<T, E> {
        let (ptr, deleter) = self.into_parts();
        unsafe { UniquePtr::from_parts(ptr, E::from(deleter)) }
    }

    /// Changes the target type, such as to a trait object, and the policy
    /// type together, keeping the same object.
    ///
    /// Combined with [`Self::assign`] this moves ownership between pointers
    /// of convertible target and policy types.
    ///
    /// # Safety
    ///
    /// The pointer `f` returns must refer to the same object, and the
    /// converted policy must be able to destroy it through that pointer.
    /// Unsizing coercions such as `NonNull<T>` to `NonNull<dyn Trait>`
    /// satisfy the first condition.
    pub unsafe fn map_ptr<U: ?Sized, E: Deleter<U> + From<D>>(
        self,
        f: impl FnOnce(NonNull<T>) -> NonNull<U>,
    ) -> UniquePtr<U, E> {
        let (ptr, deleter) = self.into_parts();
        unsafe { UniquePtr::from_parts(ptr.map(f), E::from(deleter)) }
    }

    /// Exchanges targets and policies with `other`.
    #[inline(always)]
    pub fn swap(&mut self, other: &mut Self) {
        self.data.swap(&mut other.data)
    }

    /// Gets a raw pointer to the target.
    #[inline(always)]
    pub fn as_ptr(&self) -> Option<NonNull<T>> {
        *self.data.first()
    }

    /// Returns a reference to the target, or `None` when null.
    #[inline(always)]
    pub fn get(&self) -> Option<&T> {
        self.data.first().map(|ptr| unsafe { ptr.as_ref() })
    }

    /// Returns a mutable reference to the target, or `None` when null.
    #[inline(always)]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.data.first().map(|mut ptr| unsafe { ptr.as_mut() })
    }

    #[inline(always)]
    pub fn deleter(&self) -> &D {
        self.data.second()
    }

    #[inline(always)]
    pub fn deleter_mut(&mut self) -> &mut D {
        self.data.second_mut()
    }

    #[inline(always)]
    pub fn is_null(&self) -> bool {
        self.data.first().is_none()
    }
}

impl<T: ?Sized, D: Deleter<T>> Drop for UniquePtr<T, D> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: ?Sized, D: Deleter<T> + Default> Default for UniquePtr<T, D> {
    #[inline(always)]
    fn default() -> Self {
        Self::null()
    }
}

impl<T: ?Sized, D: Deleter<T>> core::ops::Deref for UniquePtr<T, D> {
    type Target = T;

    /// # Panics
    ///
    /// Panics if the pointer is null.
    fn deref(&self) -> &T {
        match self.get() {
            Some(target) => target,
            None => panic!("dereferenced a null UniquePtr"),
        }
    }
}

impl<T: ?Sized, D: Deleter<T>> core::ops::DerefMut for UniquePtr<T, D> {
    /// # Panics
    ///
    /// Panics if the pointer is null.
    fn deref_mut(&mut self) -> &mut T {
        match self.get_mut() {
            Some(target) => target,
            None => panic!("dereferenced a null UniquePtr"),
        }
    }
}

impl<T, D: Deleter<[T]>> core::ops::Index<usize> for UniquePtr<[T], D> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<T, D: Deleter<[T]>> core::ops::IndexMut<usize> for UniquePtr<[T], D> {
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.as_mut_slice()[index]
    }
}

impl<T: ?Sized> From<Box<T>> for UniquePtr<T> {
    #[inline(always)]
    fn from(value: Box<T>) -> Self {
        Self::from_box(value)
    }
}

address_identity!("UniquePtr", impl[T: ?Sized, D: Deleter<T>] UniquePtr<T, D>, |this| thin(this.as_ptr()));
debug_pointee!(
    "UniquePtr",
    impl[T: ?Sized + core::fmt::Debug, D: Deleter<T>] UniquePtr<T, D>,
    |this| this.get(),
);
