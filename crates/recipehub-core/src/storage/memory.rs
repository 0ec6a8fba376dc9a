use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};

use super::KeyValueStore;

/// In-memory KeyValueStore. Clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow!("Memory store lock poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Memory store whose writes to one key (or every key) fail, for exercising
/// storage errors.
#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub(crate) struct FailingStore {
    pub inner: MemoryStore,
    /// Key whose writes fail; None fails them all
    pub fail_key: Option<&'static str>,
}

#[cfg(test)]
impl FailingStore {
    fn check(&self, key: &str) -> Result<()> {
        match self.fail_key {
            Some(fail) if fail != key => Ok(()),
            _ => Err(anyhow!("Disk full while writing {}", key)),
        }
    }
}

#[cfg(test)]
impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check(key)?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check(key)?;
        self.inner.remove(key)
    }
}
