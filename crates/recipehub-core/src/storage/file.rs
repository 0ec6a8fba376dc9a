use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use super::KeyValueStore;

/// Stores each key as a file named after the key inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read stored key: {}", key)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create storage directory {:?}", self.dir))?;

        // Write-then-rename so a concurrent reader never sees a partial value
        let path = self.key_path(key);
        let tmp = self.dir.join(format!(".{}.tmp", key));
        std::fs::write(&tmp, value)
            .with_context(|| format!("Failed to write stored key: {}", key))?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace stored key: {}", key))?;

        debug!(key, "Stored key written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.key_path(key)) {
            Ok(()) => {
                debug!(key, "Stored key removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove stored key: {}", key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session"));
        assert_eq!(store.get("token").unwrap(), None);
    }

    #[test]
    fn test_set_creates_directory_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("session"));

        store.set("token", "abc").unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("abc"));

        store.set("token", "def").unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("def"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());

        store.set("user", "{}").unwrap();
        store.remove("user").unwrap();
        assert_eq!(store.get("user").unwrap(), None);

        // Removing again is fine
        store.remove("user").unwrap();
    }

    #[test]
    fn test_two_stores_share_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let a = FileStore::new(dir.path().to_path_buf());
        let b = FileStore::new(dir.path().to_path_buf());

        a.set("token", "shared").unwrap();
        assert_eq!(b.get("token").unwrap().as_deref(), Some("shared"));
    }
}
