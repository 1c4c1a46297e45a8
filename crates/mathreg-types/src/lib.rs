//! Foundation types for mathreg.
//!
//! This crate provides the value and identity types shared by the object
//! store, the name-binding registry, and the session facade. Every other
//! mathreg crate depends on `mathreg-types`.
//!
//! # Key Types
//!
//! - [`ElementBuffer`] -- Owned numeric buffer description (bytes, count, width)
//! - [`ObjectHandle`] -- Slot + generation handle naming a live math object
//! - [`ObjectKind`] -- Type tag of a math object, with a `None` sentinel
//! - [`Status`] -- The five-symbol status taxonomy shared by store and registry

pub mod buffer;
pub mod error;
pub mod object;
pub mod status;

pub use buffer::ElementBuffer;
pub use error::TypeError;
pub use object::{ObjectHandle, ObjectKind};
pub use status::Status;
