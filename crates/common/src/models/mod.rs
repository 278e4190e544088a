//! Domain models
//!
//! Records as the external store returns them, plus the resolved identity.

mod chatbot;
mod document;
mod identity;

pub use chatbot::{Chatbot, ChatbotStatus};
pub use document::{Document, DocumentSource};
pub use identity::Identity;
