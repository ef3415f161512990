//! Conversation state for a single chat session
//!
//! A `ChatSession` owns the transcript of one conversation and forwards each
//! turn to a `ChatBackend`. The transcript is append-only and lives as long as
//! the session; a `HistoryWindow` only limits how much of it is sent along with
//! a request.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::client::ChatBackend;
use crate::errors::GeminiResult;
use crate::types::{Content, Part};

/// Author of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One role-tagged transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub parts: Vec<String>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![text.into()],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![text.into()],
        }
    }

    /// Converts to the wire representation used by `generateContent`
    pub fn to_content(&self) -> Content {
        Content {
            parts: self.parts.iter().cloned().map(Part::text).collect(),
            role: Some(self.role.as_str().to_string()),
        }
    }
}

/// Ordered, append-only record of a conversation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one completed exchange, user turn first.
    pub fn push_exchange(&mut self, user_text: &str, reply: &str) {
        self.messages.push(Message::user(user_text));
        self.messages.push(Message::model(reply));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Bound on how many transcript entries accompany a request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryWindow {
    pub max_messages: Option<usize>,
}

impl HistoryWindow {
    pub fn unbounded() -> Self {
        Self { max_messages: None }
    }

    pub fn last(max_messages: usize) -> Self {
        Self {
            max_messages: Some(max_messages),
        }
    }

    /// Returns the tail of `messages` that should be sent. The result never
    /// starts with a model message.
    pub fn apply<'a>(&self, messages: &'a [Message]) -> &'a [Message] {
        let Some(max) = self.max_messages else {
            return messages;
        };

        let mut window = &messages[messages.len().saturating_sub(max)..];
        while let Some(first) = window.first() {
            if first.role == Role::User {
                break;
            }
            window = &window[1..];
        }
        window
    }
}

/// A conversation with the model, holding its own transcript
pub struct ChatSession {
    backend: Arc<dyn ChatBackend>,
    transcript: Transcript,
    window: HistoryWindow,
}

impl ChatSession {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self::with_window(backend, HistoryWindow::unbounded())
    }

    pub fn with_window(backend: Arc<dyn ChatBackend>, window: HistoryWindow) -> Self {
        Self {
            backend,
            transcript: Transcript::new(),
            window,
        }
    }

    /// Sends one user turn and records the exchange once the model has replied.
    ///
    /// A failed call leaves the transcript untouched.
    pub async fn turn(&mut self, user_text: &str) -> GeminiResult<String> {
        let history = self.window.apply(self.transcript.messages());
        debug!(
            history_len = history.len(),
            transcript_len = self.transcript.len(),
            "Sending chat turn"
        );

        let reply = self.backend.send_message(history, user_text).await?;

        self.transcript.push_exchange(user_text, &reply);
        info!(transcript_len = self.transcript.len(), "Chat turn recorded");
        Ok(reply)
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }
}
