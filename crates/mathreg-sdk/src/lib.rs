//! Session facade for mathreg.
//!
//! A [`Session`] owns one object store and one binding table and exposes
//! create-and-bind operations keyed by name. Callers never see object
//! handles; they address objects by the names they bound them to, and every
//! failure narrows to a [`PublicCode`].
//!
//! ```
//! use mathreg_sdk::{ObjectKind, Session};
//!
//! let mut session = Session::new();
//! session.init_table(256).unwrap();
//! session.create_bind_scalar(2.5, "x").unwrap();
//! assert_eq!(session.lookup("x"), Some(ObjectKind::Scalar));
//! session.shutdown().unwrap();
//! ```

pub mod config;
pub mod error;
pub mod session;

pub use config::SessionConfig;
pub use error::{PublicCode, Rejected, SdkError, SdkResult};
pub use session::Session;

// Re-export key types
pub use mathreg_registry::{BindOutcome, BindingInfo};
pub use mathreg_store::{MathObject, Matrix, Scalar, Vector};
pub use mathreg_types::{ElementBuffer, ObjectKind, Status};
