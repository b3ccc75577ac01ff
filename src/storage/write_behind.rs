//! Write-behind wrapper
//!
//! Moves backend writes off the request path: `set` and `remove` record the
//! value as pending and return, a dedicated writer thread applies it to the
//! wrapped backend. Reads see pending values first.

use super::backend::{validate_key, KeyValueStorage, StorageError};
use dashmap::DashMap;
use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

/// `Some(value)` for a pending write, `None` for a pending removal.
type Pending = DashMap<String, Option<String>>;

pub struct WriteBehindStorage {
    inner: Arc<dyn KeyValueStorage>,
    pending: Arc<Pending>,
    queue: Option<UnboundedSender<String>>,
    writer: Option<JoinHandle<()>>,
}

impl WriteBehindStorage {
    /// Wraps `inner` and starts its writer thread.
    pub fn new(inner: Arc<dyn KeyValueStorage>) -> Result<Self, StorageError> {
        let pending = Arc::new(Pending::new());
        let (queue, keys) = unbounded_channel();

        let writer = thread::Builder::new()
            .name("storage-writer".into())
            .spawn({
                let inner = inner.clone();
                let pending = pending.clone();
                move || run_writer(inner.as_ref(), &pending, keys)
            })?;

        Ok(Self {
            inner,
            pending,
            queue: Some(queue),
            writer: Some(writer),
        })
    }

    fn enqueue(&self, key: &str, value: Option<String>) -> Result<(), StorageError> {
        validate_key(key)?;
        self.pending.insert(key.to_string(), value.clone());

        let queued = self
            .queue
            .as_ref()
            .is_some_and(|q| q.send(key.to_string()).is_ok());
        if !queued {
            // Writer is gone; fall back to writing in place.
            self.pending.remove(key);
            return match value {
                Some(value) => self.inner.set(key, &value),
                None => self.inner.remove(key),
            };
        }
        Ok(())
    }
}

fn run_writer(inner: &dyn KeyValueStorage, pending: &Pending, mut keys: UnboundedReceiver<String>) {
    while let Some(key) = keys.blocking_recv() {
        // Several queued writes of one key collapse into the latest value.
        let Some(value) = pending.get(&key).map(|v| v.value().clone()) else {
            continue;
        };

        let result = match &value {
            Some(value) => inner.set(&key, value),
            None => inner.remove(&key),
        };
        if let Err(e) = result {
            warn!(%key, error = %e, "write-behind flush failed");
        }

        pending.remove_if(&key, |_, current| *current == value);
    }
    debug!("storage writer stopped");
}

impl KeyValueStorage for WriteBehindStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        if let Some(value) = self.pending.get(key) {
            return Ok(value.value().clone());
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.enqueue(key, Some(value.to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.enqueue(key, None)
    }
}

impl Drop for WriteBehindStorage {
    /// Flushes every pending write before returning.
    fn drop(&mut self) {
        drop(self.queue.take());
        if let Some(writer) = self.writer.take() {
            if writer.join().is_err() {
                warn!("storage writer panicked, pending writes may be lost");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStorage, MemoryStorage};

    #[test]
    fn pending_writes_are_readable_and_flushed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let file: Arc<dyn KeyValueStorage> = Arc::new(FileStorage::open(dir.path()).unwrap());

        let storage = WriteBehindStorage::new(file.clone()).unwrap();
        for n in 0..50 {
            storage.set("changChaoCart-abc", &format!("[{n}]")).unwrap();
        }
        storage.set("changChaoRentalHistory-abc", "[]").unwrap();
        storage.remove("changChaoRentalHistory-abc").unwrap();

        assert_eq!(
            storage.get("changChaoCart-abc").unwrap().as_deref(),
            Some("[49]")
        );
        assert_eq!(storage.get("changChaoRentalHistory-abc").unwrap(), None);
        drop(storage);

        assert_eq!(
            file.get("changChaoCart-abc").unwrap().as_deref(),
            Some("[49]")
        );
        assert_eq!(file.get("changChaoRentalHistory-abc").unwrap(), None);
    }

    #[test]
    fn reads_fall_through_to_the_backend() {
        let memory: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        memory.set("changChaoCart-old", "[1]").unwrap();

        let storage = WriteBehindStorage::new(memory).unwrap();
        assert_eq!(storage.get("changChaoCart-old").unwrap().as_deref(), Some("[1]"));
        assert_eq!(storage.get("changChaoCart-new").unwrap(), None);
    }

    #[test]
    fn invalid_keys_are_rejected_before_queueing() {
        let storage = WriteBehindStorage::new(Arc::new(MemoryStorage::new())).unwrap();
        assert!(matches!(
            storage.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            storage.remove("a/b"),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
