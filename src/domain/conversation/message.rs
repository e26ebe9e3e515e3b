//! Message entity for scripted conversations.
//!
//! Messages are immutable records of what the user said (or clicked) and what
//! the Copilot answered. Each message has a sender, a body, and a timestamp.

use crate::domain::foundation::{DomainError, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::input::ActionId;

/// Unique identifier for a message within a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Creates a new random MessageId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// The person using the helpdesk.
    User,
    /// The scripted Copilot.
    Bot,
}

impl Sender {
    /// Display name shown above a chat bubble.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Bot => "Copilot",
        }
    }
}

/// A button offered alongside a bot reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAction {
    pub id: ActionId,
    pub label: String,
}

/// Content of a message: text plus any buttons it offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    actions: Vec<QuickAction>,
}

impl MessageBody {
    /// Creates a text-only body.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            actions: Vec::new(),
        }
    }

    /// Attaches buttons to the body.
    pub fn with_actions(mut self, actions: Vec<QuickAction>) -> Self {
        self.actions = actions;
        self
    }

    /// Returns the text.
    pub fn as_text(&self) -> &str {
        &self.text
    }

    /// Returns the offered buttons.
    pub fn actions(&self) -> &[QuickAction] {
        &self.actions
    }
}

/// An immutable message within a transcript.
///
/// # Invariants
///
/// - `id` is globally unique
/// - body text is non-empty (validated at construction)
/// - `created_at` is the moment the message entered the transcript; queued
///   replies are restamped by `delivered_now` when they are released
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    sender: Sender,
    body: MessageBody,
    created_at: Timestamp,
}

impl Message {
    /// Creates a new message.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the body text is blank
    pub fn new(sender: Sender, body: MessageBody) -> Result<Self, DomainError> {
        Self::validate_body(&body)?;

        Ok(Self {
            id: MessageId::new(),
            sender,
            body,
            created_at: Timestamp::now(),
        })
    }

    /// Returns the message stamped with the current time.
    ///
    /// Replies are built when they are scheduled; this moves their timestamp
    /// to the moment they are actually shown.
    pub fn delivered_now(self) -> Self {
        Self {
            created_at: Timestamp::now(),
            ..self
        }
    }

    /// Creates a user message from plain text.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if text is blank
    pub fn user(text: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(Sender::User, MessageBody::text(text))
    }

    /// Creates a bot message.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the body text is blank
    pub fn bot(body: MessageBody) -> Result<Self, DomainError> {
        Self::new(Sender::Bot, body)
    }

    /// Returns the message ID.
    pub fn id(&self) -> &MessageId {
        &self.id
    }

    /// Returns the sender.
    pub fn sender(&self) -> Sender {
        self.sender
    }

    /// Returns the body.
    pub fn body(&self) -> &MessageBody {
        &self.body
    }

    /// Shorthand for the body text.
    pub fn text(&self) -> &str {
        self.body.as_text()
    }

    /// Returns when the message was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns true if this message is from the user.
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    /// Returns true if this message is from the bot.
    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }

    fn validate_body(body: &MessageBody) -> Result<(), DomainError> {
        if body.text.trim().is_empty() {
            return Err(DomainError::validation(
                "text",
                "Message text cannot be empty",
            ));
        }
        Ok(())
    }
}
