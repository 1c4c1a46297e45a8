use mathreg_types::{ElementBuffer, ObjectHandle, Status, TypeError};

/// Errors from object store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The construction inputs were malformed. Nothing was allocated.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] TypeError),

    /// The object still has other holders and cannot be reclaimed.
    #[error("object {handle} is still referenced (refcount {refcount})")]
    StillReferenced { handle: ObjectHandle, refcount: usize },

    /// A reservation failed. No visible state change.
    #[error("allocation failed: {what}")]
    AllocationFailure { what: String },

    /// The store's own bookkeeping is inconsistent. Not recoverable.
    #[error("invariant violation on {handle}: {reason}")]
    InvariantViolation { handle: ObjectHandle, reason: String },

    /// The audit set disagrees with itself. Not recoverable.
    #[error("object set corrupted: {reason}")]
    SetCorrupted { reason: String },
}

impl StoreError {
    pub(crate) fn invariant(handle: ObjectHandle, reason: impl Into<String>) -> Self {
        Self::InvariantViolation {
            handle,
            reason: reason.into(),
        }
    }

    /// Map onto the shared status taxonomy.
    pub fn status(&self) -> Status {
        match self {
            Self::InvalidInput(_) | Self::StillReferenced { .. } => Status::InvalidInput,
            Self::AllocationFailure { .. } => Status::AllocationFailure,
            Self::InvariantViolation { .. } | Self::SetCorrupted { .. } => {
                Status::InternalInvariantViolation
            }
        }
    }

    /// Returns `true` if this error indicates a defect inside the store.
    pub fn is_fatal(&self) -> bool {
        self.status().is_fatal()
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A rejected vector or matrix construction.
///
/// Carries the caller's buffer back out: ownership only transfers into the
/// store on success.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{error}")]
pub struct CreateRejected {
    error: StoreError,
    buffer: ElementBuffer,
}

impl CreateRejected {
    pub(crate) fn new(error: StoreError, buffer: ElementBuffer) -> Self {
        Self { error, buffer }
    }

    pub fn error(&self) -> &StoreError {
        &self.error
    }

    /// The buffer the caller passed in, unchanged.
    pub fn buffer(&self) -> &ElementBuffer {
        &self.buffer
    }

    pub fn into_buffer(self) -> ElementBuffer {
        self.buffer
    }

    pub fn into_parts(self) -> (StoreError, ElementBuffer) {
        (self.error, self.buffer)
    }

    pub fn status(&self) -> Status {
        self.error.status()
    }
}
