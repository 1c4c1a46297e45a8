//! Owned numeric element buffers.
//!
//! An [`ElementBuffer`] is the caller-side description of a contiguous run of
//! numeric elements: the raw bytes, the logical element count, and the byte
//! width of one element. Buffers are moved into vector and matrix objects on
//! successful construction and handed back untouched when construction is
//! rejected.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Contiguous numeric storage plus the shape information needed to read it.
///
/// The store never interprets the bytes; it only checks that the descriptor
/// is self-consistent before taking ownership.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementBuffer {
    bytes: Vec<u8>,
    len: usize,
    elem_size: usize,
}

impl ElementBuffer {
    /// Wrap raw bytes with an explicit element count and element width.
    ///
    /// No validation happens here: an inconsistent descriptor is accepted and
    /// rejected later by the object store.
    pub fn new(bytes: Vec<u8>, len: usize, elem_size: usize) -> Self {
        Self {
            bytes,
            len,
            elem_size,
        }
    }

    /// A buffer with no storage at all.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0, 0)
    }

    /// Build a buffer of native-endian `f64` elements.
    pub fn from_f64s(values: &[f64]) -> Self {
        let bytes = values.iter().flat_map(|v| v.to_ne_bytes()).collect();
        Self::new(bytes, values.len(), std::mem::size_of::<f64>())
    }

    /// Build a buffer of native-endian `f32` elements.
    pub fn from_f32s(values: &[f32]) -> Self {
        let bytes = values.iter().flat_map(|v| v.to_ne_bytes()).collect();
        Self::new(bytes, values.len(), std::mem::size_of::<f32>())
    }

    /// Build a buffer of native-endian `i64` elements.
    pub fn from_i64s(values: &[i64]) -> Self {
        let bytes = values.iter().flat_map(|v| v.to_ne_bytes()).collect();
        Self::new(bytes, values.len(), std::mem::size_of::<i64>())
    }

    /// Build a buffer of native-endian `i32` elements.
    pub fn from_i32s(values: &[i32]) -> Self {
        let bytes = values.iter().flat_map(|v| v.to_ne_bytes()).collect();
        Self::new(bytes, values.len(), std::mem::size_of::<i32>())
    }

    /// Logical number of elements.
    pub fn element_count(&self) -> usize {
        self.len
    }

    /// Width of one element in bytes.
    pub fn element_size(&self) -> usize {
        self.elem_size
    }

    /// Number of bytes actually held.
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the buffer holds any bytes.
    pub fn has_data(&self) -> bool {
        !self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Decode the elements as native-endian `f64`s.
    ///
    /// Returns `None` unless the element width is 8 and the descriptor is
    /// consistent.
    pub fn as_f64s(&self) -> Option<Vec<f64>> {
        if self.elem_size != std::mem::size_of::<f64>() || self.validate().is_err() {
            return None;
        }
        let values = self
            .bytes
            .chunks_exact(8)
            .map(|chunk| {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(chunk);
                f64::from_ne_bytes(raw)
            })
            .collect();
        Some(values)
    }

    /// Check that the buffer can back a vector.
    ///
    /// The buffer must hold data, have a non-zero element count and width,
    /// and hold exactly `count * width` bytes.
    pub fn validate(&self) -> Result<(), TypeError> {
        if !self.has_data() {
            return Err(TypeError::EmptyBuffer);
        }
        if self.len == 0 {
            return Err(TypeError::ZeroLength);
        }
        if self.elem_size == 0 {
            return Err(TypeError::ZeroElementSize);
        }
        let expected = self.len.checked_mul(self.elem_size);
        if expected != Some(self.bytes.len()) {
            return Err(TypeError::ByteLengthMismatch {
                expected: expected.unwrap_or(usize::MAX),
                actual: self.bytes.len(),
                len: self.len,
                elem_size: self.elem_size,
            });
        }
        Ok(())
    }

    /// Check that the buffer can back a `rows` x `cols` matrix.
    ///
    /// An overflowing `rows * cols` is reported as a shape mismatch.
    pub fn validate_shape(&self, rows: usize, cols: usize) -> Result<(), TypeError> {
        if !self.has_data() {
            return Err(TypeError::EmptyBuffer);
        }
        if rows == 0 || cols == 0 {
            return Err(TypeError::ZeroDimension { rows, cols });
        }
        if rows.checked_mul(cols) != Some(self.len) {
            return Err(TypeError::ShapeMismatch {
                len: self.len,
                rows,
                cols,
            });
        }
        self.validate()
    }
}

impl fmt::Debug for ElementBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementBuffer")
            .field("len", &self.len)
            .field("elem_size", &self.elem_size)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f64_buffer_describes_itself() {
        let buf = ElementBuffer::from_f64s(&[1.0, 2.0, 3.0]);
        assert_eq!(buf.element_count(), 3);
        assert_eq!(buf.element_size(), 8);
        assert_eq!(buf.byte_len(), 24);
        assert!(buf.validate().is_ok());
        assert_eq!(buf.as_f64s(), Some(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn integer_and_f32_widths() {
        assert_eq!(ElementBuffer::from_i32s(&[1, 2]).element_size(), 4);
        assert_eq!(ElementBuffer::from_f32s(&[1.0]).element_size(), 4);
        assert_eq!(ElementBuffer::from_i64s(&[7]).element_size(), 8);
        assert!(ElementBuffer::from_i32s(&[1, 2]).as_f64s().is_none());
    }

    #[test]
    fn empty_buffer_is_rejected() {
        assert_eq!(ElementBuffer::empty().validate(), Err(TypeError::EmptyBuffer));
        assert_eq!(
            ElementBuffer::empty().validate_shape(2, 2),
            Err(TypeError::EmptyBuffer)
        );
        assert_eq!(
            ElementBuffer::from_f64s(&[]).validate(),
            Err(TypeError::EmptyBuffer)
        );
    }

    #[test]
    fn zero_length_and_zero_width_are_rejected() {
        let zero_len = ElementBuffer::new(vec![0u8; 8], 0, 8);
        assert_eq!(zero_len.validate(), Err(TypeError::ZeroLength));

        let zero_width = ElementBuffer::new(vec![0u8; 8], 1, 0);
        assert_eq!(zero_width.validate(), Err(TypeError::ZeroElementSize));
    }

    #[test]
    fn byte_length_must_match_descriptor() {
        let short = ElementBuffer::new(vec![0u8; 12], 2, 8);
        assert!(matches!(
            short.validate(),
            Err(TypeError::ByteLengthMismatch {
                expected: 16,
                actual: 12,
                ..
            })
        ));
    }

    #[test]
    fn shape_checks() {
        let buf = ElementBuffer::from_f64s(&[0.0; 8]);
        assert!(buf.validate_shape(4, 2).is_ok());
        assert!(buf.validate_shape(2, 4).is_ok());
        assert_eq!(
            buf.validate_shape(3, 2),
            Err(TypeError::ShapeMismatch {
                len: 8,
                rows: 3,
                cols: 2
            })
        );
        assert_eq!(
            buf.validate_shape(0, 8),
            Err(TypeError::ZeroDimension { rows: 0, cols: 8 })
        );
        assert!(matches!(
            buf.validate_shape(usize::MAX, 2),
            Err(TypeError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn debug_omits_raw_bytes() {
        let buf = ElementBuffer::from_f64s(&[1.0]);
        let text = format!("{buf:?}");
        assert!(text.contains("len: 1"));
        assert!(text.contains("bytes: 8"));
    }
}
