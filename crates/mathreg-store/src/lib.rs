//! Reference-counted object storage for mathreg.
//!
//! This crate owns every math object (scalar, vector, matrix) and is the only
//! place where reference counts change and where objects are destroyed.
//! Callers hold [`ObjectHandle`]s, never the objects themselves.
//!
//! # Object Types
//!
//! - [`Scalar`] -- a single `f64`
//! - [`Vector`] -- an owned [`ElementBuffer`]
//! - [`Matrix`] -- an owned [`ElementBuffer`] with a row/column shape
//!
//! All three are variants of [`MathObject`], so the type tag can never drift
//! from the payload.
//!
//! # Design Rules
//!
//! 1. A new object starts with refcount 1 (the creator's reference) and is
//!    registered in the [`ObjectSet`] before its handle is returned.
//! 2. Refcounts change only through [`RefCounts::incref`] and
//!    [`RefCounts::decref`].
//! 3. The instant a refcount reaches zero the object is unregistered and its
//!    payload dropped. No zero-refcount object is ever observable.
//! 4. Decrementing a destroyed object is an invariant violation, never a
//!    recoverable condition.
//! 5. Rejected constructions hand the caller's buffer back untouched.
//!
//! [`ElementBuffer`]: mathreg_types::ElementBuffer
//! [`ObjectHandle`]: mathreg_types::ObjectHandle

pub mod error;
pub mod object;
pub mod set;
pub mod store;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{CreateRejected, StoreError, StoreResult};
pub use object::{MathObject, Matrix, Scalar, Vector};
pub use set::{ObjectSet, Wrapper};
pub use store::ObjectStore;
pub use traits::RefCounts;
