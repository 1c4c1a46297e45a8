use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle naming one math object inside an object store.
///
/// A handle is a slot index plus the generation the slot had when the object
/// was created. Once the object is destroyed the slot's generation moves on,
/// so an old handle never resolves to whatever object later reuses the slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectHandle {
    slot: u32,
    generation: u32,
}

impl ObjectHandle {
    /// Assemble a handle from its parts. Only object stores mint handles
    /// that resolve to anything.
    pub const fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    pub const fn slot(&self) -> u32 {
        self.slot
    }

    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// Packed form: upper 32 bits slot, lower 32 bits generation.
    pub const fn to_bits(&self) -> u64 {
        ((self.slot as u64) << 32) | (self.generation as u64)
    }

    pub const fn from_bits(bits: u64) -> Self {
        Self {
            slot: (bits >> 32) as u32,
            generation: bits as u32,
        }
    }
}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectHandle({}.{})", self.slot, self.generation)
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj#{}.{}", self.slot, self.generation)
    }
}

/// The kind of a math object.
///
/// `None` is the sentinel reported for a handle that names no live object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    None,
    Scalar,
    Vector,
    Matrix,
}

impl ObjectKind {
    /// Returns `true` for every kind except the `None` sentinel.
    pub fn is_some(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Scalar => write!(f, "scalar"),
            Self::Vector => write!(f, "vector"),
            Self::Matrix => write!(f, "matrix"),
        }
    }
}
