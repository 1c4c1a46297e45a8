use std::fmt;

use mathreg_types::{ElementBuffer, ObjectKind};

// ---------------------------------------------------------------------------
// Scalar
// ---------------------------------------------------------------------------

/// A single floating-point value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scalar {
    value: f64,
}

impl Scalar {
    pub(crate) fn new(value: f64) -> Self {
        Self { value }
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

// ---------------------------------------------------------------------------
// Vector
// ---------------------------------------------------------------------------

/// A one-dimensional run of elements. Owns its buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vector {
    elements: ElementBuffer,
}

impl Vector {
    pub(crate) fn new(elements: ElementBuffer) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &ElementBuffer {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.element_count()
    }

    /// Always `false`: empty buffers are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Matrix
// ---------------------------------------------------------------------------

/// A row-major `rows` x `cols` grid of elements. Owns its buffer.
///
/// Invariant: `rows > 0`, `cols > 0`, `rows * cols == elements.element_count()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matrix {
    elements: ElementBuffer,
    rows: usize,
    cols: usize,
}

impl Matrix {
    pub(crate) fn new(elements: ElementBuffer, rows: usize, cols: usize) -> Self {
        Self {
            elements,
            rows,
            cols,
        }
    }

    pub fn elements(&self) -> &ElementBuffer {
        &self.elements
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }
}

// ---------------------------------------------------------------------------
// MathObject
// ---------------------------------------------------------------------------

/// The payload of a stored object.
#[derive(Clone, Debug, PartialEq)]
pub enum MathObject {
    Scalar(Scalar),
    Vector(Vector),
    Matrix(Matrix),
}

impl MathObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Scalar(_) => ObjectKind::Scalar,
            Self::Vector(_) => ObjectKind::Vector,
            Self::Matrix(_) => ObjectKind::Matrix,
        }
    }

    /// The backing buffer, if this kind has one.
    pub fn elements(&self) -> Option<&ElementBuffer> {
        match self {
            Self::Scalar(_) => None,
            Self::Vector(v) => Some(v.elements()),
            Self::Matrix(m) => Some(m.elements()),
        }
    }

    /// Give up the payload, returning the backing buffer if there is one.
    pub fn into_buffer(self) -> Option<ElementBuffer> {
        match self {
            Self::Scalar(_) => None,
            Self::Vector(v) => Some(v.elements),
            Self::Matrix(m) => Some(m.elements),
        }
    }

    /// `(rows, cols)`; scalars are `1x1` and vectors `1xN`.
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Self::Scalar(_) => (1, 1),
            Self::Vector(v) => (1, v.len()),
            Self::Matrix(m) => (m.rows(), m.cols()),
        }
    }
}

impl fmt::Display for MathObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => write!(f, "scalar {}", s.value()),
            Self::Vector(v) => write!(
                f,
                "vector[{}] ({}-byte elements)",
                v.len(),
                v.elements().element_size()
            ),
            Self::Matrix(m) => write!(
                f,
                "matrix {}x{} ({}-byte elements)",
                m.rows(),
                m.cols(),
                m.elements().element_size()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_variant() {
        let s = MathObject::Scalar(Scalar::new(1.5));
        let v = MathObject::Vector(Vector::new(ElementBuffer::from_f64s(&[1.0, 2.0])));
        let m = MathObject::Matrix(Matrix::new(ElementBuffer::from_f64s(&[0.0; 6]), 2, 3));
        assert_eq!(s.kind(), ObjectKind::Scalar);
        assert_eq!(v.kind(), ObjectKind::Vector);
        assert_eq!(m.kind(), ObjectKind::Matrix);
        assert_eq!(s.shape(), (1, 1));
        assert_eq!(v.shape(), (1, 2));
        assert_eq!(m.shape(), (2, 3));
    }

    #[test]
    fn into_buffer_returns_payload_storage() {
        let buf = ElementBuffer::from_f64s(&[4.0, 5.0]);
        let v = MathObject::Vector(Vector::new(buf.clone()));
        assert_eq!(v.into_buffer(), Some(buf));
        assert_eq!(MathObject::Scalar(Scalar::new(0.0)).into_buffer(), None);
    }

    #[test]
    fn display_summaries() {
        let m = MathObject::Matrix(Matrix::new(ElementBuffer::from_f64s(&[0.0; 4]), 2, 2));
        assert_eq!(m.to_string(), "matrix 2x2 (8-byte elements)");
        assert_eq!(MathObject::Scalar(Scalar::new(3.25)).to_string(), "scalar 3.25");
    }
}
