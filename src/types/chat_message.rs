use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Who authored a chat message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Typed by the user.
    User,

    /// Produced by the coach, including synthetic error replies.
    Bot,
}

/// A single entry in the conversation.
///
/// Messages are immutable once appended to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The author.
    #[serde(rename = "type")]
    pub sender: Sender,

    /// The text shown to the user.
    pub content: String,

    /// When the message was created.
    #[serde(with = "crate::utils::time")]
    pub timestamp: OffsetDateTime,

    /// Wall-clock round trip of the request that produced this reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,

    /// The model identifier reported by the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Set on synthetic replies standing in for a failed request.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ChatMessage {
    fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            sender,
            content: content.into(),
            timestamp: crate::utils::time::now(),
            response_time_ms: None,
            model: None,
            is_error: false,
        }
    }

    /// A message typed by the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Sender::User, content)
    }

    /// A bot message with no timing information.
    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(Sender::Bot, content)
    }

    /// A bot reply produced by a backend round trip.
    pub fn bot_reply(
        content: impl Into<String>,
        response_time_ms: u64,
        model: impl Into<String>,
    ) -> Self {
        Self {
            response_time_ms: Some(response_time_ms),
            model: Some(model.into()),
            ..Self::new(Sender::Bot, content)
        }
    }

    /// A synthetic bot reply reporting a failed request.
    pub fn error(content: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::new(Sender::Bot, content)
        }
    }

    /// Override the timestamp.
    pub fn at(mut self, timestamp: OffsetDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// True if the user wrote this message.
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}
