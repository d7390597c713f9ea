//! Key-value storage backing the token manager.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;

/// Persistent string storage for credentials.
///
/// Implementations synchronize internally; every call is independent and
/// there is no transaction spanning several keys.
pub trait TokenStore: Send + Sync {
    /// Read a value, `None` if it was never set or has been removed.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite a value unconditionally.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}
