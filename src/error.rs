//! The error raised when promoting a reference whose object is gone.

/// A weak reference was promoted after the last strong reference died.
///
/// Returned by [`SharedPtr::try_from`](crate::SharedPtr) on a `&WeakPtr`,
/// by [`WeakPtr::try_upgrade`](crate::WeakPtr::try_upgrade) and by
/// [`ObserveSelf::shared_from_self`](crate::ObserveSelf::shared_from_self)
/// when no live owner is registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[error("dangling reference: the observed object has already been destroyed")]
pub struct DanglingReference;
