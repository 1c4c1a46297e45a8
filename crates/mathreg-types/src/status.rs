use std::fmt;

use serde::{Deserialize, Serialize};

/// Status taxonomy shared by the object store and the binding registry.
///
/// Every store and registry error maps onto exactly one of these symbols.
/// The session facade narrows them further into its public code space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Success,
    /// Malformed caller input; detected before any mutation.
    InvalidInput,
    /// A reservation failed; no visible state change.
    AllocationFailure,
    /// Remove or lookup of an unbound name.
    NotFound,
    /// A defect inside the core. Not recoverable.
    InternalInvariantViolation,
}

impl Status {
    /// Numeric code in taxonomy order, `Success` = 0.
    pub fn code(&self) -> i32 {
        match self {
            Self::Success => 0,
            Self::InvalidInput => 1,
            Self::AllocationFailure => 2,
            Self::NotFound => 3,
            Self::InternalInvariantViolation => 4,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns `true` if continuing after this status risks corruption.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InternalInvariantViolation)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::InvalidInput => write!(f, "invalid input"),
            Self::AllocationFailure => write!(f, "allocation failure"),
            Self::NotFound => write!(f, "not found"),
            Self::InternalInvariantViolation => write!(f, "internal invariant violation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_taxonomy_order() {
        let all = [
            Status::Success,
            Status::InvalidInput,
            Status::AllocationFailure,
            Status::NotFound,
            Status::InternalInvariantViolation,
        ];
        for (expected, status) in all.iter().enumerate() {
            assert_eq!(status.code(), expected as i32);
        }
    }

    #[test]
    fn only_invariant_violation_is_fatal() {
        assert!(Status::InternalInvariantViolation.is_fatal());
        assert!(!Status::NotFound.is_fatal());
        assert!(!Status::AllocationFailure.is_fatal());
        assert!(Status::Success.is_success());
    }
}
