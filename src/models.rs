use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Greeting every new session starts with.
pub const WELCOME_TEXT: &str = "Hoi! Wat kan ik voor je doen?";

/// Who wrote a message.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

// Represents a single utterance in the chat log
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Message {
    #[serde(default = "Uuid::new_v4")] // Generate a new UUID if missing during deserialization
    pub id: Uuid,
    // User messages are always strings; bot messages carry whatever the backend answered
    pub content: Value,
    pub sender: Sender,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(content: impl Into<Value>, sender: Sender) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            sender,
            timestamp: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Value::String(text.into()), Sender::User)
    }

    pub fn bot(content: impl Into<Value>) -> Self {
        Self::new(content, Sender::Bot)
    }

    pub fn welcome() -> Self {
        Self::bot(WELCOME_TEXT)
    }

    /// The content as plain text, if the message holds a string.
    pub fn text(&self) -> Option<&str> {
        self.content.as_str()
    }

    /// Text for display: strings verbatim, anything else as compact JSON.
    pub fn display_text(&self) -> String {
        match &self.content {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}
