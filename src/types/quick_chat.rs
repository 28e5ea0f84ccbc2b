use serde::{Deserialize, Serialize};

use crate::types::UserProfile;

/// Body of `POST quick-chat/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickChatRequest {
    /// The free-text question.
    pub question: String,

    /// The asker's profile.
    pub context: UserProfile,
}

impl QuickChatRequest {
    /// Create a request for `question` asked with `context`.
    pub fn new(question: impl Into<String>, context: UserProfile) -> Self {
        Self {
            question: question.into(),
            context,
        }
    }
}

/// Reply from `POST quick-chat/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickChatResponse {
    /// False when the backend could not answer.
    #[serde(default = "default_success")]
    pub success: bool,

    /// The coach's answer.
    pub response: String,

    /// Display name of the model that answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Server-side timestamp, passed through as sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Server-measured handling time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<f64>,

    /// Provider attribution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub powered_by: Option<String>,

    /// Why the backend fell back to a canned answer, if it did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

pub(crate) fn default_success() -> bool {
    true
}
