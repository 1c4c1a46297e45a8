//! Name-binding registry for mathreg.
//!
//! This crate maps caller-chosen names onto objects held by a
//! [`mathreg_store::ObjectStore`]. Bindings are the only externally reachable
//! roots: every live binding owns exactly one reference to the object it
//! names, and every refcount change caused by binding, rebinding, or unbinding
//! goes through the [`RefCounts`](mathreg_store::RefCounts) contract.
//!
//! # Architecture
//!
//! - **Buckets** are a fixed array of chains chosen at construction. There is
//!   no rehashing and no growth.
//! - **Hashing** is the classic multiply-by-31 string hash over the name's
//!   bytes, wrapping at 32 bits, reduced modulo the capacity.
//! - **Rebinding** increments the new target before releasing the old one, so
//!   a failed increment leaves the existing binding intact.
//! - **Unbinding** unlinks the binding before releasing its reference, so a
//!   destroyed object is never reachable through the table.
//!
//! # Modules
//!
//! - [`error`] -- Error types for registry operations
//! - [`hash`] -- Name hashing and bucket selection
//! - [`names`] -- Binding name validation
//! - [`table`] -- The [`BindingTable`] itself

pub mod error;
pub mod hash;
pub mod names;
pub mod table;

pub use error::{RegistryError, RegistryResult};
pub use hash::{bucket_index, name_hash};
pub use names::validate_name;
pub use table::{destroy_table, BindOutcome, BindingInfo, BindingTable};
