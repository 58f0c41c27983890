use crate::models::Message;
use serde::Serialize;

/// What the session controller is doing right now.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Sending,
    Refreshing,
}

// Conversation state owned by a single ChatSession
#[derive(Serialize, Clone, Debug)]
pub struct SessionState {
    pub draft: String,
    pub log: Vec<Message>, // Append-only, insertion order is display order
    pub pending: bool,     // True exactly while phase != Idle
    pub phase: Phase,
    pub available_models: Vec<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            draft: String::new(),
            log: vec![Message::welcome()],
            pending: false,
            phase: Phase::Idle,
            available_models: Vec::new(),
        }
    }

    pub(crate) fn begin(&mut self, phase: Phase) {
        self.phase = phase;
        self.pending = true;
    }

    pub(crate) fn settle(&mut self) {
        self.phase = Phase::Idle;
        self.pending = false;
    }

    pub(crate) fn push(&mut self, message: Message) {
        self.log.push(message);
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
