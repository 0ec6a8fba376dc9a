//! Durable key-value storage for session state.
//!
//! The session store only needs string keys mapped to string values, so the
//! backend is kept behind the small `KeyValueStore` trait:
//!
//! - `FileStore`: one file per key in a directory on disk
//! - `MemoryStore`: a shared in-process map, used in tests and for sibling
//!   stores that must observe each other's writes

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

#[cfg(test)]
pub(crate) use memory::FailingStore;

use anyhow::Result;

/// A string-keyed store of string values.
///
/// Implementations are shared across tasks, so every method takes `&self`.
/// Removing a key that does not exist is not an error.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}
