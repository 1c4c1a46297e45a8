use mathreg_types::{ElementBuffer, ObjectHandle, ObjectKind};
use tracing::{debug, error};

use crate::error::{CreateRejected, StoreError, StoreResult};
use crate::object::{MathObject, Matrix, Scalar, Vector};
use crate::set::{ObjectSet, Wrapper};
use crate::traits::RefCounts;

/// Owner of every math object and the single choke-point for refcount
/// transitions and destruction.
///
/// All mutation goes through `&mut self`, so callers are serialized by the
/// borrow checker; the store does no locking of its own.
#[derive(Debug, Default)]
pub struct ObjectStore {
    objects: ObjectSet,
}

impl ObjectStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            objects: ObjectSet::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Create a scalar object. The returned handle carries the creator's
    /// reference (refcount 1).
    pub fn create_scalar(&mut self, value: f64) -> StoreResult<ObjectHandle> {
        self.objects.reserve()?;
        Ok(self.register(MathObject::Scalar(Scalar::new(value))))
    }

    /// Create a vector object that takes ownership of `buffer`.
    ///
    /// Rejects empty buffers, zero length, zero element width, and buffers
    /// whose byte length disagrees with their descriptor. On rejection the
    /// buffer comes back inside the error.
    pub fn create_vector(&mut self, buffer: ElementBuffer) -> Result<ObjectHandle, CreateRejected> {
        if let Err(e) = buffer.validate() {
            return Err(CreateRejected::new(e.into(), buffer));
        }
        if let Err(e) = self.objects.reserve() {
            return Err(CreateRejected::new(e, buffer));
        }
        Ok(self.register(MathObject::Vector(Vector::new(buffer))))
    }

    /// Create a `rows` x `cols` matrix object that takes ownership of
    /// `buffer`.
    ///
    /// Rejects empty buffers, zero dimensions, zero element width, and
    /// `rows * cols != buffer.element_count()`. On rejection the buffer comes
    /// back inside the error.
    pub fn create_matrix(
        &mut self,
        buffer: ElementBuffer,
        rows: usize,
        cols: usize,
    ) -> Result<ObjectHandle, CreateRejected> {
        if let Err(e) = buffer.validate_shape(rows, cols) {
            return Err(CreateRejected::new(e.into(), buffer));
        }
        if let Err(e) = self.objects.reserve() {
            return Err(CreateRejected::new(e, buffer));
        }
        Ok(self.register(MathObject::Matrix(Matrix::new(buffer, rows, cols))))
    }

    fn register(&mut self, object: MathObject) -> ObjectHandle {
        let kind = object.kind();
        let handle = self.objects.insert(Wrapper::new(object));
        debug!(%handle, %kind, live = self.objects.len(), "object created");
        handle
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    /// The payload behind `handle`, if it names a live object.
    pub fn get(&self, handle: ObjectHandle) -> Option<&MathObject> {
        self.objects.get(handle).map(Wrapper::object)
    }

    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.objects.contains(handle)
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// The audit set. Read-only.
    pub fn objects(&self) -> &ObjectSet {
        &self.objects
    }

    /// Handles of every live object, in slot order.
    pub fn live_handles(&self) -> Vec<ObjectHandle> {
        self.objects.handles()
    }

    /// Current refcount, for test instrumentation and diagnostics.
    pub fn debug_refcount(&self, handle: ObjectHandle) -> Option<usize> {
        self.objects.get(handle).map(Wrapper::refcount)
    }

    // -----------------------------------------------------------------------
    // Release
    // -----------------------------------------------------------------------

    /// Drop the last reference to an object and hand its payload back
    /// instead of destroying it.
    ///
    /// Only the sole holder may reclaim: an object with refcount > 1 is left
    /// alone and reported as [`StoreError::StillReferenced`].
    pub fn reclaim(&mut self, handle: ObjectHandle) -> StoreResult<MathObject> {
        let refcount = self.live_refcount(handle, "reclaim")?;
        if refcount > 1 {
            return Err(StoreError::StillReferenced { handle, refcount });
        }
        let wrapper = self.unregister(handle)?;
        debug!(%handle, kind = %wrapper.kind(), "object reclaimed");
        Ok(wrapper.into_object())
    }

    /// Release every remaining object at session teardown.
    ///
    /// Each live object must hold exactly one reference (the creator's). The
    /// check runs over the whole set before anything is released, so a
    /// violation leaves the store untouched. Returns the number of objects
    /// destroyed.
    pub fn destroy_all(&mut self) -> StoreResult<usize> {
        if let Some((handle, wrapper)) = self.objects.iter().find(|(_, w)| w.refcount() != 1) {
            let err = StoreError::invariant(
                handle,
                format!(
                    "teardown expects refcount 1, found {}",
                    wrapper.refcount()
                ),
            );
            error!(%handle, refcount = wrapper.refcount(), "teardown refcount check failed");
            return Err(err);
        }

        let handles = self.objects.handles();
        for handle in &handles {
            self.decref(*handle)?;
        }
        if !self.objects.is_empty() {
            let err = StoreError::SetCorrupted {
                reason: format!("{} objects survived teardown", self.objects.len()),
            };
            error!(remaining = self.objects.len(), "object set not empty after teardown");
            return Err(err);
        }
        debug!(released = handles.len(), "object store torn down");
        Ok(handles.len())
    }

    /// Refcount of a live object, treating an absent or zero-count wrapper as
    /// an invariant violation.
    fn live_refcount(&self, handle: ObjectHandle, op: &str) -> StoreResult<usize> {
        match self.objects.get(handle).map(Wrapper::refcount) {
            Some(0) => Err(Self::violation(handle, format!("{op} observed refcount 0"))),
            Some(n) => Ok(n),
            None => Err(Self::violation(handle, format!("{op} on a destroyed object"))),
        }
    }

    /// Unregister first, then drop the payload: a freed wrapper is never
    /// discoverable.
    fn destroy(&mut self, handle: ObjectHandle) -> StoreResult<()> {
        let wrapper = self.unregister(handle)?;
        let kind = wrapper.kind();
        match wrapper.into_object() {
            MathObject::Matrix(matrix) => drop(matrix),
            MathObject::Vector(vector) => drop(vector),
            MathObject::Scalar(_) => {}
        }
        debug!(%handle, %kind, live = self.objects.len(), "object destroyed");
        Ok(())
    }

    fn unregister(&mut self, handle: ObjectHandle) -> StoreResult<Wrapper> {
        self.objects
            .remove(handle)
            .ok_or_else(|| Self::violation(handle, "wrapper missing from object set"))
    }

    fn violation(handle: ObjectHandle, reason: impl Into<String>) -> StoreError {
        let err = StoreError::invariant(handle, reason);
        error!(%handle, error = %err, "object store invariant violated");
        err
    }
}

impl RefCounts for ObjectStore {
    fn incref(&mut self, handle: ObjectHandle) -> StoreResult<usize> {
        self.live_refcount(handle, "incref")?;
        let Some(wrapper) = self.objects.get_mut(handle) else {
            return Err(Self::violation(handle, "incref lost the wrapper"));
        };
        let count = wrapper.refcount_mut();
        let Some(next) = count.checked_add(1) else {
            return Err(Self::violation(handle, "refcount overflow"));
        };
        *count = next;
        Ok(next)
    }

    fn decref(&mut self, handle: ObjectHandle) -> StoreResult<usize> {
        self.live_refcount(handle, "decref")?;
        let Some(wrapper) = self.objects.get_mut(handle) else {
            return Err(Self::violation(handle, "decref lost the wrapper"));
        };
        let count = wrapper.refcount_mut();
        *count -= 1;
        let remaining = *count;
        if remaining == 0 {
            self.destroy(handle)?;
        }
        Ok(remaining)
    }

    fn kind(&self, handle: ObjectHandle) -> ObjectKind {
        self.objects
            .get(handle)
            .map(Wrapper::kind)
            .unwrap_or(ObjectKind::None)
    }

    fn refcount(&self, handle: ObjectHandle) -> Option<usize> {
        self.debug_refcount(handle)
    }
}
