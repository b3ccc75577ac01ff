//! Tool Suggestion Module
//!
//! Forwards a project description to a generative backend and returns the
//! tool names it suggests. The backend sits behind [`ToolSuggestionService`].

pub mod document;
pub mod handlers;
pub mod models;
pub mod service;

pub use handlers::routes;
pub use service::{GenerativeSuggestionService, ToolSuggestionService};
