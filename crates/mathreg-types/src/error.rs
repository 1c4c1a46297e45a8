use thiserror::Error;

/// Errors produced by type-level validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("element buffer holds no data")]
    EmptyBuffer,

    #[error("element buffer has zero logical length")]
    ZeroLength,

    #[error("element buffer has zero element width")]
    ZeroElementSize,

    #[error("element buffer holds {actual} bytes, expected {expected} ({len} x {elem_size})")]
    ByteLengthMismatch {
        expected: usize,
        actual: usize,
        len: usize,
        elem_size: usize,
    },

    #[error("element count {len} does not match shape {rows}x{cols}")]
    ShapeMismatch { len: usize, rows: usize, cols: usize },

    #[error("matrix dimensions must be non-zero, got {rows}x{cols}")]
    ZeroDimension { rows: usize, cols: usize },
}
