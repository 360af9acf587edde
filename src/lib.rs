//! Single-threaded owning pointers with deterministic lifetimes.
//!
//! [`SharedPtr`] and [`WeakPtr`] share ownership of a heap object through
//! an explicit control block that holds a strong and a weak count. The
//! object is destroyed as soon as the last strong pointer goes away; the
//! control block itself lives on until the last weak pointer does too.
//! A `SharedPtr` can point at just a portion of the allocation it keeps
//! alive, such as a single field of a struct, and objects that implement
//! [`ObserveSelf`] can hand out pointers to themselves.
//!
//! [`UniquePtr`] owns its target alone and destroys it through a
//! replaceable [`Deleter`] policy. It stores the pointer and the policy in a
//! [`CompressedPair`], so a stateless policy costs no space.
//!
//! The counts are plain integers. None of these types may be shared between
//! threads, and reference cycles of `SharedPtr`s are never collected: break
//! them with a `WeakPtr`.
#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

#[cfg(test)]
#[macro_use]
extern crate std;

#[macro_use]
mod macroed;

pub mod pair;

#[cfg(feature = "shared")]
mod block;
#[cfg(feature = "shared")]
pub mod error;
#[cfg(feature = "shared")]
mod observe;
#[cfg(feature = "shared")]
pub mod shared;
#[cfg(feature = "shared")]
pub mod weak;

#[cfg(feature = "unique")]
pub mod unique;

pub use pair::CompressedPair;

#[cfg(feature = "shared")]
pub use block::BlockKind;
#[cfg(feature = "shared")]
pub use error::DanglingReference;
#[cfg(feature = "shared")]
pub use observe::{ObserveSelf, SelfObserver};
#[cfg(feature = "shared")]
pub use shared::SharedPtr;
#[cfg(feature = "shared")]
pub use weak::WeakPtr;

#[cfg(feature = "unique")]
pub use unique::{DefaultDeleter, Deleter, FnDeleter, UniquePtr};
