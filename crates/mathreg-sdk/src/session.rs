use std::io;

use mathreg_registry::{destroy_table, BindingInfo, BindingTable, RegistryError};
use mathreg_store::{MathObject, ObjectStore, RefCounts};
use mathreg_types::{ElementBuffer, ObjectHandle, ObjectKind};
use tracing::{debug, error, info};

use crate::config::SessionConfig;
use crate::error::{Rejected, SdkError, SdkResult};

/// One store and one binding table, addressed by name.
///
/// Every object created through the session keeps its creator reference
/// until [`shutdown`](Self::shutdown), so an unbound object stays alive (and
/// counted) until then. Dropping a session shuts it down.
pub struct Session {
    store: ObjectStore,
    table: Option<BindingTable>,
    config: SessionConfig,
}

impl Session {
    /// A session with an empty store and no binding table yet.
    pub fn new() -> Self {
        Self {
            store: ObjectStore::new(),
            table: None,
            config: SessionConfig::default(),
        }
    }

    /// A session whose table is created with the configured capacity.
    pub fn with_config(config: SessionConfig) -> SdkResult<Self> {
        let capacity = config.table_capacity;
        let mut session = Self {
            store: ObjectStore::new(),
            table: None,
            config,
        };
        session.init_table(capacity)?;
        Ok(session)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.table.is_some()
    }

    /// Create the binding table. A previously created table is destroyed,
    /// releasing its bindings, once the new one exists.
    pub fn init_table(&mut self, capacity: usize) -> SdkResult<()> {
        let table = BindingTable::with_capacity(capacity).map_err(SdkError::Init)?;
        if let Some(old) = self.table.replace(table) {
            let released = old.destroy(&mut self.store);
            debug!(released, "previous binding table replaced");
        }
        info!(capacity, "binding table initialized");
        Ok(())
    }

    // ---- Create and bind ----

    /// Create a scalar and bind it to `name`.
    pub fn create_bind_scalar(&mut self, value: f64, name: &str) -> SdkResult<()> {
        let Some(table) = self.table.as_mut() else {
            return Err(SdkError::NotInitialized);
        };
        let handle = self.store.create_scalar(value).map_err(SdkError::Create)?;
        bind_new(table, &mut self.store, handle, name).map_err(Rejected::into_error)
    }

    /// Create a vector over `buffer` and bind it to `name`. On failure the
    /// buffer is handed back inside the error.
    pub fn create_bind_vector(&mut self, buffer: ElementBuffer, name: &str) -> Result<(), Rejected> {
        let Some(table) = self.table.as_mut() else {
            return Err(Rejected::new(SdkError::NotInitialized, Some(buffer)));
        };
        let handle = self.store.create_vector(buffer)?;
        bind_new(table, &mut self.store, handle, name)
    }

    /// Create a `rows` x `cols` matrix over `buffer` and bind it to `name`.
    /// On failure the buffer is handed back inside the error.
    pub fn create_bind_matrix(
        &mut self,
        buffer: ElementBuffer,
        rows: usize,
        cols: usize,
        name: &str,
    ) -> Result<(), Rejected> {
        let Some(table) = self.table.as_mut() else {
            return Err(Rejected::new(SdkError::NotInitialized, Some(buffer)));
        };
        let handle = self.store.create_matrix(buffer, rows, cols)?;
        bind_new(table, &mut self.store, handle, name)
    }

    /// Bind `alias` to whatever `existing` names.
    pub fn bind_alias(&mut self, existing: &str, alias: &str) -> SdkResult<()> {
        let Some(table) = self.table.as_mut() else {
            return Err(SdkError::NotInitialized);
        };
        let handle = table.lookup_binding(existing).ok_or_else(|| {
            SdkError::Bind(RegistryError::NotFound {
                name: existing.to_string(),
            })
        })?;
        table
            .add_binding(alias, handle, &mut self.store)
            .map_err(SdkError::Bind)?;
        Ok(())
    }

    pub fn remove_binding(&mut self, name: &str) -> SdkResult<()> {
        let Some(table) = self.table.as_mut() else {
            return Err(SdkError::NotInitialized);
        };
        table
            .remove_binding(name, &mut self.store)
            .map_err(SdkError::Remove)?;
        Ok(())
    }

    // ---- Read access ----

    fn resolve(&self, name: &str) -> Option<ObjectHandle> {
        self.table.as_ref()?.lookup_binding(name)
    }

    /// Kind of the object bound to `name`.
    pub fn lookup(&self, name: &str) -> Option<ObjectKind> {
        self.resolve(name)
            .map(|h| self.store.kind(h))
            .filter(ObjectKind::is_some)
    }

    pub fn value(&self, name: &str) -> Option<&MathObject> {
        self.store.get(self.resolve(name)?)
    }

    /// Refcount of the object bound to `name`: one for the creator plus one
    /// per binding.
    pub fn refcount(&self, name: &str) -> Option<usize> {
        self.store.debug_refcount(self.resolve(name)?)
    }

    pub fn bindings(&self) -> Vec<BindingInfo> {
        self.table
            .as_ref()
            .map(|t| t.list_bindings(&self.store))
            .unwrap_or_default()
    }

    /// Number of live objects, bound or not.
    pub fn object_count(&self) -> usize {
        self.store.len()
    }

    /// Write every binding to `sink`, one per line.
    pub fn dump(&self, sink: impl io::Write) -> io::Result<()> {
        match &self.table {
            Some(table) => table.dump_bindings(&self.store, sink),
            None => Ok(()),
        }
    }

    // ---- Teardown ----

    /// Destroy the table, then every remaining object. Returns the number of
    /// objects released. Safe to call more than once.
    pub fn shutdown(&mut self) -> SdkResult<usize> {
        if self.table.is_none() && self.store.is_empty() {
            return Ok(0);
        }
        let unbound = destroy_table(self.table.take(), &mut self.store);
        let released = self.store.destroy_all().map_err(SdkError::Teardown)?;
        info!(unbound, released, "session shut down");
        Ok(released)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }
        if let Err(err) = self.shutdown() {
            error!(error = %err, "session shutdown on drop failed");
        }
    }
}

/// Bind a freshly created object. On failure the creator reference is
/// dropped, which destroys the object, and its buffer comes back.
fn bind_new(
    table: &mut BindingTable,
    store: &mut ObjectStore,
    handle: ObjectHandle,
    name: &str,
) -> Result<(), Rejected> {
    match table.add_binding(name, handle, store) {
        Ok(_) => {
            debug!(name, %handle, kind = %store.kind(handle), "object created and bound");
            Ok(())
        }
        Err(err) => {
            let buffer = match store.reclaim(handle) {
                Ok(object) => object.into_buffer(),
                Err(reclaim_err) => {
                    error!(%handle, error = %reclaim_err, "could not release unbound object");
                    None
                }
            };
            Err(Rejected::new(SdkError::Bind(err), buffer))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PublicCode;

    fn session() -> Session {
        Session::with_config(SessionConfig::default()).unwrap()
    }

    #[test]
    fn new_session_has_no_table() {
        let mut s = Session::new();
        assert!(!s.is_initialized());
        let err = s.create_bind_scalar(1.0, "x").unwrap_err();
        assert_eq!(err.code(), PublicCode::InvalidInput);
        assert_eq!(s.object_count(), 0);

        let rejected = s
            .create_bind_vector(ElementBuffer::from_f64s(&[1.0]), "v")
            .unwrap_err();
        assert!(rejected.buffer().is_some());
        assert!(matches!(s.remove_binding("x"), Err(SdkError::NotInitialized)));
    }

    #[test]
    fn creator_reference_is_retained() {
        let mut s = session();
        s.create_bind_scalar(2.0, "x").unwrap();
        assert_eq!(s.refcount("x"), Some(2));
        s.remove_binding("x").unwrap();
        assert_eq!(s.lookup("x"), None);
        // Unbound but still owned by the session.
        assert_eq!(s.object_count(), 1);
        assert_eq!(s.shutdown().unwrap(), 1);
        assert_eq!(s.object_count(), 0);
    }

    #[test]
    fn zero_capacity_config_rejected() {
        let config = SessionConfig {
            table_capacity: 0,
            ..SessionConfig::default()
        };
        let err = Session::with_config(config).err().unwrap();
        assert!(matches!(err, SdkError::Init(RegistryError::InvalidInput { .. })));
        assert_eq!(err.code(), PublicCode::AllocationFailure);
    }

    #[test]
    fn reinit_releases_old_bindings() {
        let mut s = session();
        s.create_bind_scalar(1.0, "a").unwrap();
        s.init_table(4).unwrap();
        assert_eq!(s.lookup("a"), None);
        assert!(s.bindings().is_empty());
        assert_eq!(s.object_count(), 1);
    }

    #[test]
    fn shutdown_is_idempotent() {
        let mut s = session();
        s.create_bind_scalar(1.0, "a").unwrap();
        assert_eq!(s.shutdown().unwrap(), 1);
        assert_eq!(s.shutdown().unwrap(), 0);
        assert!(!s.is_initialized());
    }

    #[test]
    fn dump_lists_bindings() {
        let mut s = session();
        s.create_bind_scalar(1.0, "a").unwrap();
        let mut out = Vec::new();
        s.dump(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("a -> obj#"));
        assert!(text.ends_with("(type=scalar, refs=2)\n"));
    }
}
