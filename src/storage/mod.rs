//! Key-Value Storage Module
//!
//! Persistence for per-session cart and rental ledger state:
//! - Storage backends (file-per-key on disk, in-memory)
//! - Versioned envelope used for every persisted collection
//! - Write-behind wrapper keeping backend writes off the request path

pub mod backend;
pub mod envelope;
pub mod write_behind;

pub use backend::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use envelope::{load_collection, save_collection, STORAGE_VERSION};
pub use write_behind::WriteBehindStorage;
