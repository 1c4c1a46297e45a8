use mathreg_types::{ObjectHandle, ObjectKind};

use crate::error::StoreResult;

/// The reference-counting contract the binding registry drives.
///
/// Implementations must satisfy these invariants:
/// - A live object always has refcount >= 1.
/// - `incref` on a handle that names no live object is an invariant
///   violation: that object's refcount was observed at zero.
/// - `decref` that takes the refcount to zero destroys the object before
///   returning. `decref` on a destroyed object is an invariant violation.
/// - `kind` and `refcount` never mutate anything.
pub trait RefCounts {
    /// Add one reference. Returns the new refcount.
    fn incref(&mut self, handle: ObjectHandle) -> StoreResult<usize>;

    /// Drop one reference, destroying the object at zero. Returns the
    /// remaining refcount (0 means the object is gone).
    fn decref(&mut self, handle: ObjectHandle) -> StoreResult<usize>;

    /// Kind of the object behind `handle`, or [`ObjectKind::None`].
    fn kind(&self, handle: ObjectHandle) -> ObjectKind;

    /// Current refcount, or `None` if the handle names no live object.
    fn refcount(&self, handle: ObjectHandle) -> Option<usize>;
}
