//! Error types for registry operations.

use mathreg_store::StoreError;
use mathreg_types::Status;
use thiserror::Error;

/// Errors that can occur during registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Malformed name, zero capacity, or a target the store rejected.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A reservation failed. The table is unchanged.
    #[error("allocation failed: {what}")]
    AllocationFailure { what: String },

    /// The name is not bound.
    #[error("name not bound: {name}")]
    NotFound { name: String },

    /// The store reported a refcount defect. Not recoverable.
    #[error("invariant violation: {reason}")]
    InvariantViolation { reason: String },
}

impl RegistryError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn allocation(what: impl Into<String>) -> Self {
        Self::AllocationFailure { what: what.into() }
    }

    /// Map onto the shared status taxonomy.
    pub fn status(&self) -> Status {
        match self {
            Self::InvalidInput { .. } => Status::InvalidInput,
            Self::AllocationFailure { .. } => Status::AllocationFailure,
            Self::NotFound { .. } => Status::NotFound,
            Self::InvariantViolation { .. } => Status::InternalInvariantViolation,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.status().is_fatal()
    }
}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        match err.status() {
            Status::AllocationFailure => Self::AllocationFailure {
                what: err.to_string(),
            },
            Status::InternalInvariantViolation => Self::InvariantViolation {
                reason: err.to_string(),
            },
            _ => Self::InvalidInput {
                reason: err.to_string(),
            },
        }
    }
}

/// Convenience type alias for registry operations.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
