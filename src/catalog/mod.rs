//! Catalog Module
//!
//! This module contains everything the storefront shows before a tool
//! reaches the cart:
//! - Data models (tools, categories, articles, quick topics)
//! - The built-in data set
//! - Query helpers (search, comparison, rent-versus-buy quotes)
//! - REST API handlers

pub mod data;
pub mod handlers;
pub mod helpers;
pub mod models;
pub mod store;

pub use handlers::routes;
pub use store::Catalog;
