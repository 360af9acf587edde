//! Control blocks: the heap-resident bookkeeping shared by every
//! [`SharedPtr`](crate::SharedPtr) and [`WeakPtr`](crate::WeakPtr) that
//! refers to the same managed object.
//!
//! A block holds the strong and weak counts and knows how to destroy its
//! object. There are exactly two strategies:
//!
//! - [`EmbeddedBlock`] stores the object inline, so the object and its
//!   bookkeeping come from a single allocation.
//! - [`WrappingBlock`] adopts an object that was boxed elsewhere.
//!
//! Blocks are type-erased behind `dyn ControlBlock` so that a handle is
//! generic only over what it points at, regardless of the type of the
//! allocation that keeps it alive. [`BlockKind`] tells the two apart without
//! any downcasting.
//!
//! The counters are plain [`Cell`]s. Blocks must never be reachable from more
//! than one thread.
//!
//! The object is alive while the strong count is non-zero. The block memory
//! is freed once both counts are zero. The free functions at the bottom of
//! this module are the only places where counts reach zero, so they are
//! also the only places that retire objects and release blocks.

extern crate alloc;

use alloc::boxed::Box;
use core::cell::{Cell, UnsafeCell};
use core::mem::MaybeUninit;
use core::ptr::NonNull;

/// Which allocation strategy a control block uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// The object was constructed inside the block's own allocation.
    Embedded,
    /// The block adopted a separately boxed object.
    Wrapping,
}

/// Type-erased pointer to a live control block.
pub(crate) type BlockPtr = NonNull<dyn ControlBlock>;

#[derive(Debug)]
pub(crate) struct Counts {
    strong: Cell<usize>,
    weak: Cell<usize>,
}

impl Counts {
    const fn new(strong: usize, weak: usize) -> Self {
        Self {
            strong: Cell::new(strong),
            weak: Cell::new(weak),
        }
    }
}

/// Behavior common to both control block strategies.
pub(crate) trait ControlBlock {
    fn counts(&self) -> &Counts;

    fn kind(&self) -> BlockKind;

    /// Destroys the managed object in place, leaving the block allocated.
    ///
    /// Only the first call has any effect.
    ///
    /// # Safety
    ///
    /// No reference to the managed object may be used after this call.
    unsafe fn retire_object(&self);

    /// Whether this block was created around a null pointer and so never
    /// had an object to keep alive.
    fn is_vacant(&self) -> bool {
        false
    }

    #[inline(always)]
    fn is_embedded(&self) -> bool {
        self.kind() == BlockKind::Embedded
    }

    #[inline(always)]
    fn strong_count(&self) -> usize {
        self.counts().strong.get()
    }

    #[inline(always)]
    fn weak_count(&self) -> usize {
        self.counts().weak.get()
    }

    /// # Panics
    ///
    /// Panics instead of wrapping when the count is already `usize::MAX`.
    #[inline(always)]
    fn add_strong(&self) {
        let strong = &self.counts().strong;
        match strong.get().checked_add(1) {
            Some(n) => strong.set(n),
            None => panic!("strong count overflow"),
        }
    }

    #[inline(always)]
    fn drop_strong(&self) {
        let strong = &self.counts().strong;
        debug_assert!(strong.get() > 0, "strong count underflow");
        strong.set(strong.get() - 1);
    }

    #[inline(always)]
    fn add_weak(&self) {
        let weak = &self.counts().weak;
        match weak.get().checked_add(1) {
            Some(n) => weak.set(n),
            None => panic!("weak count overflow"),
        }
    }

    #[inline(always)]
    fn drop_weak(&self) {
        let weak = &self.counts().weak;
        debug_assert!(weak.get() > 0, "weak count underflow");
        weak.set(weak.get() - 1);
    }
}

/// A control block with the managed object stored inline.
pub(crate) struct EmbeddedBlock<T> {
    counts: Counts,
    retired: Cell<bool>,
    value: UnsafeCell<MaybeUninit<T>>,
}

impl<T: 'static> EmbeddedBlock<T> {
    /// Moves `value` into a freshly allocated block whose strong count is
    /// already one. Returns the block and the address of the object in it.
    pub(crate) fn allocate(value: T) -> (BlockPtr, NonNull<T>) {
        let raw = Box::into_raw(Box::new(Self {
            counts: Counts::new(1, 0),
            retired: Cell::new(false),
            value: UnsafeCell::new(MaybeUninit::new(value)),
        }));
        unsafe {
            let object = UnsafeCell::raw_get(core::ptr::addr_of!((*raw).value)).cast::<T>();
            let block: BlockPtr = NonNull::new_unchecked(raw);
            (block, NonNull::new_unchecked(object))
        }
    }
}

impl<T> ControlBlock for EmbeddedBlock<T> {
    fn counts(&self) -> &Counts {
        &self.counts
    }

    fn kind(&self) -> BlockKind {
        BlockKind::Embedded
    }

    unsafe fn retire_object(&self) {
        if !self.retired.replace(true) {
            unsafe { (*self.value.get()).assume_init_drop() }
        }
    }
}

impl<T> Drop for EmbeddedBlock<T> {
    fn drop(&mut self) {
        if !*self.retired.get_mut() {
            unsafe { self.value.get_mut().assume_init_drop() }
        }
    }
}

/// A control block that owns a separately boxed object.
pub(crate) struct WrappingBlock<T: ?Sized> {
    counts: Counts,
    vacant: bool,
    object: Cell<Option<NonNull<T>>>,
}

impl<T: ?Sized + 'static> WrappingBlock<T> {
    /// Allocates a block adopting `object`, which must have come from
    /// [`Box::into_raw`].
    ///
    /// The new block accounts for exactly one shared handle. A block around
    /// `None` is vacant: its strong count starts (and stays) at zero and that
    /// first handle is recorded in the weak count instead.
    pub(crate) fn allocate(object: Option<NonNull<T>>) -> BlockPtr {
        let counts = match object {
            Some(_) => Counts::new(1, 0),
            None => Counts::new(0, 1),
        };
        let raw = Box::into_raw(Box::new(Self {
            counts,
            vacant: object.is_none(),
            object: Cell::new(object),
        }));
        unsafe { NonNull::new_unchecked(raw) }
    }
}

impl<T: ?Sized> ControlBlock for WrappingBlock<T> {
    fn counts(&self) -> &Counts {
        &self.counts
    }

    fn kind(&self) -> BlockKind {
        BlockKind::Wrapping
    }

    unsafe fn retire_object(&self) {
        if let Some(object) = self.object.take() {
            drop(unsafe { Box::from_raw(object.as_ptr()) });
        }
    }

    fn is_vacant(&self) -> bool {
        self.vacant
    }
}

impl<T: ?Sized> Drop for WrappingBlock<T> {
    fn drop(&mut self) {
        if let Some(object) = self.object.get_mut().take() {
            drop(unsafe { Box::from_raw(object.as_ptr()) });
        }
    }
}

/// Records one more shared handle on `block`.
///
/// # Safety
///
/// `block` must be live.
pub(crate) unsafe fn acquire_shared(block: BlockPtr) {
    let b = unsafe { block.as_ref() };
    if b.is_vacant() {
        b.add_weak();
    } else {
        b.add_strong();
    }
}

/// Gives up a shared handle's hold on `block`, destroying the object and
/// freeing the block as the counts require.
///
/// # Safety
///
/// `block` must be live and the caller must be giving up a hold previously
/// recorded by [`acquire_shared`], a successful [`try_promote`] or one of the
/// `allocate` constructors.
pub(crate) unsafe fn release_shared(block: BlockPtr) {
    let b = unsafe { block.as_ref() };
    if b.is_vacant() {
        return unsafe { release_weak(block) };
    }
    b.drop_strong();
    if b.strong_count() == 0 {
        // The object's destructor may drop weak handles to this same block.
        b.add_weak();
        unsafe {
            b.retire_object();
            release_weak(block);
        }
    }
}

/// Records one more weak handle on `block`.
///
/// # Safety
///
/// `block` must be live.
pub(crate) unsafe fn acquire_weak(block: BlockPtr) {
    unsafe { block.as_ref() }.add_weak();
}

/// Gives up a weak handle's hold on `block`, freeing the block if nothing
/// else refers to it.
///
/// # Safety
///
/// `block` must be live and the caller must own one weak hold on it.
pub(crate) unsafe fn release_weak(block: BlockPtr) {
    let b = unsafe { block.as_ref() };
    b.drop_weak();
    if b.strong_count() == 0 && b.weak_count() == 0 {
        drop(unsafe { Box::from_raw(block.as_ptr()) });
    }
}

/// Takes a new strong hold on `block` unless its object is already gone.
///
/// # Safety
///
/// `block` must be live.
pub(crate) unsafe fn try_promote(block: BlockPtr) -> bool {
    let b = unsafe { block.as_ref() };
    if b.strong_count() == 0 {
        return false;
    }
    b.add_strong();
    true
}

/// Returns the block's counts as `(strong, weak)`.
///
/// # Safety
///
/// `block` must be live.
#[inline(always)]
pub(crate) unsafe fn counts(block: BlockPtr) -> (usize, usize) {
    let b = unsafe { block.as_ref() };
    (b.strong_count(), b.weak_count())
}

/// # Safety
///
/// `block` must be live.
#[inline(always)]
pub(crate) unsafe fn kind(block: BlockPtr) -> BlockKind {
    unsafe { block.as_ref() }.kind()
}
