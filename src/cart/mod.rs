//! Shopping Cart Domain Module
//!
//! This module contains all cart business logic, including:
//! - Domain models (line items, durations, inputs, responses)
//! - Business logic helpers (pricing, merging, formatting)
//! - The per-session cart and rental ledger store
//! - REST API handlers

pub mod handlers;
pub mod helpers;
pub mod models;
pub mod store;

// Re-export commonly used types for convenience
pub use handlers::routes;
pub use store::{CartStore, StorageKeys};
