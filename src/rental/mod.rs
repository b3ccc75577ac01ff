//! Rental Ledger Module
//!
//! Records of completed checkouts:
//! - Ledger models (entries, items, status)
//! - Helpers (id generation, rental window, detail view)
//! - REST API handlers for rental history

pub mod handlers;
pub mod helpers;
pub mod models;

pub use handlers::routes;
pub use models::{NewRental, RentalEntry, RentalEntryItem, RentalStatus};
