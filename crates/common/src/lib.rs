//! ChatFlow Common Library
//!
//! Shared code for the ChatFlow backend including:
//! - Domain models (chatbots, documents, identities)
//! - Platform collaborator clients (identity, relational store, blob storage)
//! - Error types and handling
//! - Configuration management
//! - Widget domain authorization logic
//! - Metrics and observability

pub mod config;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod platform;
pub mod widget;

// Re-export commonly used types
pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use models::{Chatbot, ChatbotStatus, Document, DocumentSource, Identity};
pub use platform::{Credential, Platform};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
