//! Client -> server intent messages.

use serde::{Deserialize, Serialize};

use crate::{Direction, ProtocolError};

/// Outbound intent, tagged by `action` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Sent once, immediately after the connection opens.
    JoinGame { username: String },
    /// Sent on movement start and re-sent every resend tick while a
    /// direction stays active.
    Move { direction: Direction },
    /// Sent once when all movement keys are released or focus is lost.
    Stop,
}

impl ClientMessage {
    /// Serialize to a single JSON text frame.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a text frame back into a message.
    pub fn parse(frame: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(frame)?)
    }
}
