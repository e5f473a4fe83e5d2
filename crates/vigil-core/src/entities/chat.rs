use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::AnalysisResult;
use crate::enums::ChatRole;

/// One chat turn. Appended, never edited or removed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Conversational state bound to one analysis snapshot.
///
/// Created by an explicit init; afterwards only mutated by message appends.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub session_id: String,
    pub messages: Vec<ChatMessage>,
    pub analysis_data: Option<AnalysisResult>,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

impl ChatSession {
    /// Fresh session with no messages.
    #[must_use]
    pub fn new(session_id: impl Into<String>, analysis_data: Option<AnalysisResult>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            messages: Vec::new(),
            analysis_data,
            created_at: now,
            last_active_at: now,
        }
    }

    /// Append a message and bump `last_active_at`.
    pub fn push(&mut self, message: ChatMessage) {
        self.last_active_at = self.last_active_at.max(message.timestamp);
        self.messages.push(message);
    }

    /// The most recent `window` messages, oldest first.
    #[must_use]
    pub fn recent(&self, window: usize) -> &[ChatMessage] {
        let start = self.messages.len().saturating_sub(window);
        &self.messages[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_bumps_last_active() {
        let mut session = ChatSession::new("s-1", None);
        let before = session.last_active_at;
        let mut msg = ChatMessage::user("hi");
        msg.timestamp = before + chrono::Duration::seconds(5);
        session.push(msg);
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.last_active_at, before + chrono::Duration::seconds(5));
    }

    #[test]
    fn recent_returns_tail_in_order() {
        let mut session = ChatSession::new("s-1", None);
        for i in 0..5 {
            session.push(ChatMessage::user(format!("m{i}")));
        }
        let tail: Vec<&str> = session.recent(2).iter().map(|m| m.content.as_str()).collect();
        assert_eq!(tail, ["m3", "m4"]);
        assert_eq!(session.recent(50).len(), 5);
    }
}
