//! The fixed-capacity binding table.
//!
//! Each bucket is a chain of bindings. A chain is stored as a `Vec` with the
//! newest binding at the end, and every traversal walks it back to front, so
//! the newest binding in a bucket is always visited first.

use std::fmt;
use std::io;

use mathreg_store::{RefCounts, StoreError};
use mathreg_types::{ObjectHandle, ObjectKind};
use serde::Serialize;
use tracing::{debug, error};

use crate::error::{RegistryError, RegistryResult};
use crate::hash::bucket_index;
use crate::names::validate_name;

/// One name bound to one object. Owns its name and one reference to the
/// object.
#[derive(Debug)]
struct Binding {
    name: String,
    handle: ObjectHandle,
}

/// What [`BindingTable::add_binding`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    /// The name was unbound and now names the object.
    Bound,
    /// The name already named this object. Nothing changed.
    Unchanged,
    /// The name moved off `previous`, which lost one reference.
    Replaced { previous: ObjectHandle },
}

/// Diagnostic snapshot of a single binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingInfo {
    pub name: String,
    pub handle: ObjectHandle,
    pub kind: ObjectKind,
    /// `None` only if the store no longer knows the handle, which would be a
    /// defect.
    pub refcount: Option<usize>,
}

/// Name to object mapping with a fixed number of buckets.
///
/// The table never touches objects directly: every reference it takes or
/// gives back goes through the [`RefCounts`] implementation passed to each
/// mutating call.
pub struct BindingTable {
    buckets: Box<[Vec<Binding>]>,
    len: usize,
}

impl BindingTable {
    /// Create a table with `capacity` empty buckets.
    pub fn with_capacity(capacity: usize) -> RegistryResult<Self> {
        if capacity == 0 {
            return Err(RegistryError::invalid(
                "table capacity must be greater than zero",
            ));
        }
        let mut buckets = Vec::new();
        buckets.try_reserve_exact(capacity).map_err(|e| {
            RegistryError::allocation(format!("bucket array of {capacity}: {e}"))
        })?;
        buckets.resize_with(capacity, Vec::new);
        debug!(capacity, "binding table created");
        Ok(Self {
            buckets: buckets.into_boxed_slice(),
            len: 0,
        })
    }

    /// Number of buckets. Fixed for the table's lifetime.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Number of live bindings.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup_binding(name).is_some()
    }

    /// The bucket `name` hashes to in this table.
    pub fn bucket_of(&self, name: &str) -> usize {
        bucket_index(name, self.capacity()).unwrap_or(0)
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Bind `name` to `handle`.
    ///
    /// - An unbound name takes a new reference to `handle`.
    /// - A name already bound to `handle` is left alone.
    /// - A name bound elsewhere takes a reference to `handle` first and only
    ///   then releases its old target, which may destroy it.
    ///
    /// Any error leaves the table and every refcount as they were.
    ///
    /// # Panics
    ///
    /// Panics if the store fails to release the old target after the binding
    /// has already moved.
    pub fn add_binding<S: RefCounts + ?Sized>(
        &mut self,
        name: &str,
        handle: ObjectHandle,
        store: &mut S,
    ) -> RegistryResult<BindOutcome> {
        validate_name(name)?;
        let idx = self.bucket(name)?;

        if let Some(pos) = self.position(idx, name) {
            let previous = self.buckets[idx][pos].handle;
            if previous == handle {
                debug!(name, %handle, "rebind to the same object ignored");
                return Ok(BindOutcome::Unchanged);
            }
            store.incref(handle)?;
            self.buckets[idx][pos].handle = handle;
            match store.decref(previous) {
                Ok(remaining) => {
                    debug!(name, %previous, %handle, remaining, "binding replaced");
                }
                Err(err) => halt("rebind", name, err),
            }
            return Ok(BindOutcome::Replaced { previous });
        }

        let mut owned = String::new();
        owned
            .try_reserve_exact(name.len())
            .map_err(|e| RegistryError::allocation(format!("binding name: {e}")))?;
        owned.push_str(name);

        let chain = &mut self.buckets[idx];
        chain
            .try_reserve(1)
            .map_err(|e| RegistryError::allocation(format!("bucket chain: {e}")))?;
        let refcount = store.incref(handle)?;
        chain.push(Binding {
            name: owned,
            handle,
        });
        self.len += 1;
        debug!(name, %handle, bucket = idx, refcount, "binding added");
        Ok(BindOutcome::Bound)
    }

    /// Unbind `name` and release its reference. Returns the handle it named,
    /// which is stale if this was the last reference.
    ///
    /// # Panics
    ///
    /// Panics if the store fails to release the reference after the binding
    /// has been unlinked.
    pub fn remove_binding<S: RefCounts + ?Sized>(
        &mut self,
        name: &str,
        store: &mut S,
    ) -> RegistryResult<ObjectHandle> {
        validate_name(name)?;
        let idx = self.bucket(name)?;
        let Some(pos) = self.position(idx, name) else {
            return Err(RegistryError::NotFound {
                name: name.to_string(),
            });
        };

        let binding = self.buckets[idx].remove(pos);
        self.len -= 1;
        match store.decref(binding.handle) {
            Ok(remaining) => {
                debug!(name, handle = %binding.handle, remaining, "binding removed");
            }
            Err(err) => halt("unbind", name, err),
        }
        Ok(binding.handle)
    }

    /// Tear the table down, releasing one reference per binding. Returns the
    /// number of bindings released.
    ///
    /// # Panics
    ///
    /// Panics if the store fails to release any reference.
    pub fn destroy<S: RefCounts + ?Sized>(self, store: &mut S) -> usize {
        let mut released = 0;
        for chain in self.buckets.into_vec() {
            for binding in chain.into_iter().rev() {
                if let Err(err) = store.decref(binding.handle) {
                    halt("teardown", &binding.name, err);
                }
                released += 1;
            }
        }
        debug!(released, "binding table destroyed");
        released
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    /// The object bound to `name`. Invalid names are simply unbound.
    pub fn lookup_binding(&self, name: &str) -> Option<ObjectHandle> {
        validate_name(name).ok()?;
        let idx = bucket_index(name, self.capacity())?;
        self.position(idx, name)
            .map(|pos| self.buckets[idx][pos].handle)
    }

    /// Every binding in bucket order, newest first within a bucket.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ObjectHandle)> + '_ {
        self.buckets
            .iter()
            .flat_map(|chain| chain.iter().rev())
            .map(|b| (b.name.as_str(), b.handle))
    }

    /// Snapshot every binding with its object's kind and refcount.
    pub fn list_bindings<S: RefCounts + ?Sized>(&self, store: &S) -> Vec<BindingInfo> {
        self.iter()
            .map(|(name, handle)| BindingInfo {
                name: name.to_string(),
                handle,
                kind: store.kind(handle),
                refcount: store.refcount(handle),
            })
            .collect()
    }

    /// Write one line per binding to `sink`:
    /// `name -> handle (type=kind, refs=n)`.
    pub fn dump_bindings<S, W>(&self, store: &S, mut sink: W) -> io::Result<()>
    where
        S: RefCounts + ?Sized,
        W: io::Write,
    {
        for info in self.list_bindings(store) {
            let refs = info
                .refcount
                .map_or_else(|| "?".to_string(), |n| n.to_string());
            writeln!(
                sink,
                "{} -> {} (type={}, refs={})",
                info.name, info.handle, info.kind, refs
            )?;
        }
        Ok(())
    }

    fn bucket(&self, name: &str) -> RegistryResult<usize> {
        bucket_index(name, self.capacity())
            .ok_or_else(|| RegistryError::invalid("table has no buckets"))
    }

    fn position(&self, idx: usize, name: &str) -> Option<usize> {
        self.buckets[idx].iter().rposition(|b| b.name == name)
    }
}

impl fmt::Debug for BindingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingTable")
            .field("capacity", &self.capacity())
            .field("len", &self.len)
            .finish()
    }
}

/// Destroy a table that may never have been created. Returns the number of
/// bindings released.
pub fn destroy_table<S: RefCounts + ?Sized>(table: Option<BindingTable>, store: &mut S) -> usize {
    match table {
        Some(table) => table.destroy(store),
        None => 0,
    }
}

/// The table has already changed but the store refused the matching release.
/// The two no longer agree, so nothing after this point can be trusted.
fn halt(op: &str, name: &str, err: StoreError) -> ! {
    error!(op, name, error = %err, "binding table and object store diverged");
    panic!("binding table {op} of {name:?} failed after mutation: {err}");
}
