//! Write-once process-lifetime value store
//!
//! Holds every value produced by a singleton producer. Entries are written
//! at most once per key and never removed; a per-key exclusive section
//! guards the check-construct-store sequence so two concurrent first
//! accesses construct exactly once and never observe a half-built value.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use tracing::debug;
use typewire_domain::{Result, TypeKey, Value};

/// Process-lifetime cache of singleton values, keyed by type.
pub(crate) struct SingletonStore {
    values: RwLock<HashMap<TypeKey, Value>>,
    // One construction lock per key; the outer mutex only guards the map of
    // locks, never a construction.
    building: Mutex<HashMap<TypeKey, Arc<Mutex<()>>>>,
}

impl SingletonStore {
    pub(crate) fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            building: Mutex::new(HashMap::new()),
        }
    }

    /// Stored value for `key`, if already constructed.
    pub(crate) fn get(&self, key: TypeKey) -> Option<Value> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }

    /// Return the stored value for `key`, constructing it with `build` if
    /// absent. Holds the key's construction lock across the check, so the
    /// build runs at most once; a failed build stores nothing.
    pub(crate) fn get_or_try_init<F>(&self, key: TypeKey, build: F) -> Result<Value>
    where
        F: FnOnce() -> Result<Value>,
    {
        let slot = {
            let mut building = lock(&self.building);
            Arc::clone(building.entry(key).or_default())
        };
        let _guard = lock(&slot);

        if let Some(existing) = self.get(key) {
            return Ok(existing);
        }

        let value = build()?;
        debug!(singleton = key.name(), "constructed singleton value");
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::clone(&value));
        Ok(value)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
