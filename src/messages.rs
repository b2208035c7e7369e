//! Inbound events and outbound messages — the bot's only external surface.
//!
//! The transport is an external collaborator; the core only ever sees these
//! two types. Typing indicators are explicit events (the transport controls
//! pacing — the core never sleeps).

use serde::{Deserialize, Serialize};

/// One inbound event for a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InboundEvent {
    /// A user message.
    Message { text: String },
    /// Participants joined the conversation.
    MembersJoined {
        member_ids: Vec<String>,
        /// The bot's own id — self-joins never open the menu.
        recipient_id: String,
    },
}

/// One outbound message, emitted in step order within a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutboundMessage {
    Text { text: String },
    /// Typing indicator — lets the client pace the conversation.
    Typing,
    ChoicePrompt {
        prompt: String,
        retry: String,
        options: Vec<String>,
    },
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}
