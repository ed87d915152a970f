use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Assistant,
    Applicant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub speaker: Speaker,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

/// Append-only conversation log. Messages are never edited or reordered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assistant(&mut self, text: impl Into<String>) {
        self.push(Speaker::Assistant, text.into());
    }

    pub fn applicant(&mut self, text: impl Into<String>) {
        self.push(Speaker::Applicant, text.into());
    }

    fn push(&mut self, speaker: Speaker, text: String) {
        self.messages.push(Message {
            speaker,
            text,
            sent_at: Utc::now(),
        });
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of messages whose text equals `text` exactly.
    pub fn count_text(&self, text: &str) -> usize {
        self.messages.iter().filter(|m| m.text == text).count()
    }
}
