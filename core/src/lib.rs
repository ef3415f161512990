// Core TravelMitra chat functionality:
// - API client for Gemini
// - Request/response data structures
// - Conversation session and transcript
// - Configuration loading
// - Shared error types

// Export client module - API client for Gemini
pub mod client;
pub use client::*;

// Export types module - Request/response data structures
pub mod types;
pub use types::*;

// Export config module - Configuration loading
pub mod config;
pub use config::*;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;

// Export session module - Transcript and chat session
pub mod session;
pub use session::{ChatSession, HistoryWindow, Message, Role, Transcript};

pub mod persona;
