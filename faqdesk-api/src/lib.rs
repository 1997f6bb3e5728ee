//! faqdesk API Server Library
//!
//! FAQ management, FAQ-grounded chat and admin chat log reporting over HTTP

pub mod app;
pub mod database;
pub mod error;
pub mod models;
pub mod repositories;
pub mod router;

// Re-export the main server function
pub use app::start_server;
