//! Opt-in support for objects that need to hand out pointers to themselves.

use core::cell::Cell;

use crate::error::DanglingReference;
use crate::shared::SharedPtr;
use crate::weak::WeakPtr;

/// Slot through which an object learns which control block owns it.
///
/// Embed one in a type and implement [`ObserveSelf`] for it. The slot is
/// filled in by [`SharedPtr::new_observed`] and
/// [`SharedPtr::from_box_observed`] and holds a weak reference, so the
/// object counts towards its own [`SharedPtr::weak_count`] but never keeps
/// itself alive.
pub struct SelfObserver<T> {
    weak: Cell<WeakPtr<T>>,
}

impl<T> SelfObserver<T> {
    /// Creates a slot that has not been registered with any owner yet.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            weak: Cell::new(WeakPtr::new()),
        }
    }

    /// Returns `true` once an owner has registered itself and is still alive.
    pub fn is_registered(&self) -> bool {
        !self.weak().expired()
    }

    pub(crate) fn register(&self, owner: WeakPtr<T>) {
        drop(self.weak.replace(owner));
    }

    fn weak(&self) -> WeakPtr<T> {
        let weak = self.weak.take();
        let copy = weak.clone();
        self.weak.set(weak);
        copy
    }
}

impl<T> Default for SelfObserver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SelfObserver<T> {
    /// A copied object is a different object, so the copy starts out
    /// unregistered.
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> core::fmt::Debug for SelfObserver<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SelfObserver")
            .field("registered", &self.is_registered())
            .finish()
    }
}

/// Capability of producing [`SharedPtr`] and [`WeakPtr`] handles to `self`
/// that share the owning pointer's counts.
///
/// The bound is checked at compile time: only the `*_observed` constructors
/// of [`SharedPtr`] register an owner, and they are only available for
/// types implementing this trait.
pub trait ObserveSelf: Sized + 'static {
    /// The slot the owning pointer registers itself in.
    fn self_observer(&self) -> &SelfObserver<Self>;

    /// Creates a new strong pointer sharing ownership of `self`.
    ///
    /// Fails if `self` was never placed under an observed [`SharedPtr`], or
    /// if it is being destroyed.
    fn shared_from_self(&self) -> Result<SharedPtr<Self>, DanglingReference> {
        self.self_observer().weak().try_upgrade()
    }

    /// Creates a new weak pointer observing `self`'s owner.
    ///
    /// The result is already expired if `self` has no registered owner.
    fn weak_from_self(&self) -> WeakPtr<Self> {
        self.self_observer().weak()
    }
}
