//! Durable key/value persistence for drafts and cached responses.
//!
//! Each form owns two fixed keys (draft + last response); the tongue form
//! adds a third for the last analyzed image. Reads that fail for any reason
//! behave as absence so a corrupt entry can never break a form on mount.

mod disk;
mod memory;
#[cfg(test)]
mod tests;

pub use disk::DiskStore;
pub use memory::MemoryStore;

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

/// Key/value persistence seam. Implementations are local-only and
/// single-writer; none of the methods return errors to callers — a failed
/// read is absence, a failed write is logged and dropped.
pub trait DraftStore: Send + Sync {
    /// Returns the stored value, or `None` if the key is absent or unreadable.
    fn load(&self, key: &str) -> Option<String>;

    /// Overwrites the value unconditionally.
    fn save(&self, key: &str, value: &str);

    /// Removes the entry; removing an absent key is a no-op.
    fn remove(&self, key: &str);
}

/// Typed helpers layered over the raw string slots. A JSON parse failure is
/// treated the same as a missing key.
pub trait DraftStoreExt: DraftStore {
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.load(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "discarding unparseable stored entry");
                None
            }
        }
    }

    fn save_json<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.save(key, &raw),
            Err(e) => warn!(key, error = %e, "failed to serialize entry"),
        }
    }
}

impl<S: DraftStore + ?Sized> DraftStoreExt for S {}
