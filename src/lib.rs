//! Tool Rental Storefront Library
//!
//! This library provides the core functionality of a tool rental storefront:
//! catalog browsing, per-session carts, a checkout with simulated payment,
//! rental history and AI tool suggestions.

// Domain modules
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod rental;
pub mod suggest;

// Infrastructure
pub mod args;
pub mod config;
pub mod error;
pub mod router;
pub mod session;
pub mod state;
pub mod storage;

pub use self::{args::Args, config::Config};
