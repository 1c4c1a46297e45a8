//! The audit set of live wrappers.
//!
//! [`ObjectSet`] is an index-stable arena: each wrapper lives in a slot, and
//! a slot's generation counter moves on whenever its wrapper is removed. A
//! handle minted for an earlier generation therefore never resolves again,
//! even after the slot is reused through the free list.
//!
//! The set is used for audit and bulk teardown only. Callers reach objects
//! through the registry, never by walking the set.

use mathreg_types::{ObjectHandle, ObjectKind};

use crate::error::{StoreError, StoreResult};
use crate::object::MathObject;

/// The reference-counted envelope around a math object.
#[derive(Debug)]
pub struct Wrapper {
    object: MathObject,
    refcount: usize,
}

impl Wrapper {
    /// A fresh wrapper holding the creator's reference.
    pub(crate) fn new(object: MathObject) -> Self {
        Self {
            object,
            refcount: 1,
        }
    }

    pub fn object(&self) -> &MathObject {
        &self.object
    }

    pub fn kind(&self) -> ObjectKind {
        self.object.kind()
    }

    pub fn refcount(&self) -> usize {
        self.refcount
    }

    pub(crate) fn refcount_mut(&mut self) -> &mut usize {
        &mut self.refcount
    }

    pub(crate) fn into_object(self) -> MathObject {
        self.object
    }
}

struct Slot {
    generation: u32,
    wrapper: Option<Wrapper>,
}

/// Arena of live wrappers with free-list slot reuse.
#[derive(Default)]
pub struct ObjectSet {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    live: usize,
}

impl ObjectSet {
    /// Create an empty set.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Make room for one more wrapper.
    ///
    /// Every reservation the next [`insert`](Self::insert) needs happens here,
    /// so a failure leaves the set untouched and the caller still owns the
    /// payload. The free list is kept large enough to take back every slot,
    /// which keeps [`remove`](Self::remove) allocation-free.
    pub(crate) fn reserve(&mut self) -> StoreResult<()> {
        if !self.free_list.is_empty() {
            return Ok(());
        }
        if u32::try_from(self.slots.len()).is_err() {
            return Err(StoreError::AllocationFailure {
                what: "object set slot index space exhausted".into(),
            });
        }
        self.slots
            .try_reserve(1)
            .map_err(|e| StoreError::AllocationFailure {
                what: format!("object set slot: {e}"),
            })?;
        let needed = self.slots.len() + 1 - self.free_list.len();
        self.free_list
            .try_reserve(needed)
            .map_err(|e| StoreError::AllocationFailure {
                what: format!("object set free list: {e}"),
            })?;
        Ok(())
    }

    /// Register a wrapper and return its handle. Call
    /// [`reserve`](Self::reserve) first.
    pub(crate) fn insert(&mut self, wrapper: Wrapper) -> ObjectHandle {
        self.live += 1;
        if let Some(slot_idx) = self.free_list.pop() {
            let slot = &mut self.slots[slot_idx as usize];
            slot.wrapper = Some(wrapper);
            return ObjectHandle::new(slot_idx, slot.generation);
        }
        let slot_idx = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            wrapper: Some(wrapper),
        });
        ObjectHandle::new(slot_idx, 0)
    }

    /// The wrapper behind a handle, or `None` if the handle is stale or was
    /// never valid.
    pub fn get(&self, handle: ObjectHandle) -> Option<&Wrapper> {
        let slot = self.slots.get(handle.slot() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.wrapper.as_ref()
    }

    pub(crate) fn get_mut(&mut self, handle: ObjectHandle) -> Option<&mut Wrapper> {
        let slot = self.slots.get_mut(handle.slot() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.wrapper.as_mut()
    }

    /// Unregister the wrapper behind a handle and return it.
    ///
    /// Bumps the slot generation. A slot whose generation wraps back to 0 is
    /// retired instead of recycled, so no stale handle can match it again.
    pub(crate) fn remove(&mut self, handle: ObjectHandle) -> Option<Wrapper> {
        let slot = self.slots.get_mut(handle.slot() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        let wrapper = slot.wrapper.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        if slot.generation != 0 {
            self.free_list.push(handle.slot());
        }
        self.live -= 1;
        Some(wrapper)
    }

    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Number of live wrappers.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Live wrappers in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectHandle, &Wrapper)> + '_ {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            slot.wrapper
                .as_ref()
                .map(|w| (ObjectHandle::new(idx as u32, slot.generation), w))
        })
    }

    /// Handles of all live wrappers in slot order.
    pub fn handles(&self) -> Vec<ObjectHandle> {
        self.iter().map(|(handle, _)| handle).collect()
    }
}

impl std::fmt::Debug for ObjectSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectSet")
            .field("live", &self.live)
            .field("slots", &self.slots.len())
            .field("free", &self.free_list.len())
            .finish()
    }
}
