//! Conversation transcript
//!
//! An append-only list of [`ChatMessage`] values in insertion order. Messages
//! are never edited; the whole transcript is discarded on logout. The
//! transcript is display state only: exchanges never replay it to the
//! endpoint.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::exchange::ExchangeOutcome;

/// One line of the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique identifier
    pub id: String,
    /// Text as shown to the user
    pub text: String,
    /// `true` for user input, `false` for replies and errors
    pub is_user: bool,
    /// Creation time
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(text: impl Into<String>, is_user: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            is_user,
            timestamp: Utc::now(),
        }
    }

    /// Local wall-clock time formatted as `HH:MM`
    pub fn time_label(&self) -> String {
        self.timestamp.with_timezone(&Local).format("%H:%M").to_string()
    }
}

/// Ordered transcript of one chat session
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Creates an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a user message
    ///
    /// # Examples
    ///
    /// ```
    /// use relaychat::conversation::Conversation;
    ///
    /// let mut conversation = Conversation::new();
    /// let msg = conversation.push_user("Hello");
    /// assert!(msg.is_user);
    /// assert_eq!(conversation.len(), 1);
    /// ```
    pub fn push_user(&mut self, text: impl Into<String>) -> &ChatMessage {
        self.push(ChatMessage::new(text, true))
    }

    /// Appends the reply for an exchange outcome
    ///
    /// Failures are rendered as `Error: <message>`.
    pub fn push_outcome(&mut self, outcome: &ExchangeOutcome) -> &ChatMessage {
        let text = if outcome.is_success() {
            outcome.user_message()
        } else {
            format!("Error: {}", outcome.user_message())
        };
        self.push(ChatMessage::new(text, false))
    }

    fn push(&mut self, message: ChatMessage) -> &ChatMessage {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// All messages in insertion order
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` when the transcript is empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Discards every message
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
