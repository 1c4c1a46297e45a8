use std::fmt;

use mathreg_registry::RegistryError;
use mathreg_store::{CreateRejected, StoreError};
use mathreg_types::{ElementBuffer, Status};
use serde::Serialize;
use thiserror::Error;

/// The facade's public status codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[repr(i32)]
pub enum PublicCode {
    Success = 0,
    InvalidInput = 1,
    /// Allocation or object creation failed.
    AllocationFailure = 2,
    Internal = 3,
}

impl PublicCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

impl fmt::Display for PublicCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Success => "success",
            Self::InvalidInput => "invalid input",
            Self::AllocationFailure => "allocation failure",
            Self::Internal => "internal error",
        };
        write!(f, "{} ({label})", self.as_i32())
    }
}

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("binding table not initialized")]
    NotInitialized,

    #[error("table init failed: {0}")]
    Init(RegistryError),

    #[error("object creation failed: {0}")]
    Create(StoreError),

    #[error("bind failed: {0}")]
    Bind(RegistryError),

    #[error("remove failed: {0}")]
    Remove(RegistryError),

    #[error("teardown failed: {0}")]
    Teardown(StoreError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SdkError {
    /// Narrow to the public code space. The mapping depends on which
    /// operation failed, not only on the underlying status.
    pub fn code(&self) -> PublicCode {
        match self {
            Self::NotInitialized | Self::Config(_) | Self::Io(_) => PublicCode::InvalidInput,
            Self::Init(_) | Self::Create(_) => PublicCode::AllocationFailure,
            Self::Bind(err) | Self::Remove(err) => match err.status() {
                Status::InvalidInput | Status::NotFound => PublicCode::InvalidInput,
                Status::AllocationFailure => PublicCode::AllocationFailure,
                Status::Success | Status::InternalInvariantViolation => PublicCode::Internal,
            },
            Self::Teardown(_) => PublicCode::Internal,
        }
    }

    /// Returns `true` if the core reported a defect.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Init(err) | Self::Bind(err) | Self::Remove(err) => err.is_fatal(),
            Self::Create(err) | Self::Teardown(err) => err.is_fatal(),
            _ => false,
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;

/// A failed create-and-bind that owned a buffer.
///
/// The buffer comes back whenever the store still had it: always for
/// creation failures, and for bind failures once the new object has been
/// reclaimed.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct Rejected {
    error: SdkError,
    buffer: Option<ElementBuffer>,
}

impl Rejected {
    pub(crate) fn new(error: SdkError, buffer: Option<ElementBuffer>) -> Self {
        Self { error, buffer }
    }

    pub fn error(&self) -> &SdkError {
        &self.error
    }

    pub fn code(&self) -> PublicCode {
        self.error.code()
    }

    pub fn buffer(&self) -> Option<&ElementBuffer> {
        self.buffer.as_ref()
    }

    pub fn into_buffer(self) -> Option<ElementBuffer> {
        self.buffer
    }

    pub fn into_error(self) -> SdkError {
        self.error
    }
}

impl From<CreateRejected> for Rejected {
    fn from(rejected: CreateRejected) -> Self {
        let (error, buffer) = rejected.into_parts();
        Self::new(SdkError::Create(error), Some(buffer))
    }
}
