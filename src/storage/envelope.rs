//! Versioned Envelope
//!
//! Every persisted collection is written as `{"version": N, "data": [...]}`.
//! Loading never fails: anything that cannot be read back as the current
//! version is treated as an empty collection.

use super::backend::{KeyValueStorage, StorageError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::warn;

/// Layout version written by this build.
pub const STORAGE_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    data: &'a [T],
}

#[derive(Deserialize)]
struct Envelope<T> {
    version: u32,
    data: Vec<T>,
}

/// Reads the collection stored under `key`.
///
/// Missing keys, backend failures, malformed JSON and unknown versions all
/// yield an empty `Vec`; the latter three are logged.
pub fn load_collection<T: DeserializeOwned>(storage: &dyn KeyValueStorage, key: &str) -> Vec<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "failed to read stored collection, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Envelope<T>>(&raw) {
        Ok(envelope) if envelope.version == STORAGE_VERSION => envelope.data,
        Ok(envelope) => {
            warn!(
                key,
                found = envelope.version,
                expected = STORAGE_VERSION,
                "stored collection has unsupported version, starting empty"
            );
            Vec::new()
        }
        Err(e) => {
            warn!(key, error = %e, "stored collection is corrupt, starting empty");
            Vec::new()
        }
    }
}

/// Writes `items` under `key` wrapped in the current envelope.
pub fn save_collection<T: Serialize>(
    storage: &dyn KeyValueStorage,
    key: &str,
    items: &[T],
) -> Result<(), StorageError> {
    let envelope = EnvelopeRef {
        version: STORAGE_VERSION,
        data: items,
    };
    let raw = serde_json::to_string(&envelope)?;
    storage.set(key, &raw)
}
