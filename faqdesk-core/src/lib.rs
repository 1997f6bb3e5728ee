//! faqdesk Core Library
//!
//! This library provides core functionality for the faqdesk system including:
//! - Configuration management
//! - Bearer-token authentication and the admin guard
//! - The chat-completion client used by the chat endpoint

pub mod auth;
pub mod client;
pub mod config;

// Re-export commonly used types
pub use auth::{AuthError, AuthMiddleware, AuthenticatedUser};
pub use client::{ChatMessage, ChatRole, ClientError, CompletionClient, OpenAIClient};
pub use config::model::{
    CompletionSettings, Config, DatabaseSettings, ServerSettings, StorageBackend, UserToken,
};
