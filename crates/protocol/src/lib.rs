//! Shared protocol crate for plaza.
//!
//! This crate contains:
//! - Typed client -> server intent messages
//! - Typed server -> client state messages
//! - Shared enums (facing, movement direction) and the Position alias
//!
//! Every frame on the wire is a single JSON object tagged by an `action`
//! field.

mod error;
pub mod messages;

pub use error::ProtocolError;
pub use messages::{Avatar, ClientMessage, JoinReply, JoinSnapshot, Player, ServerMessage};

use serde::{Deserialize, Serialize};

/// Represents a 2D position using glam's Vec2.
pub type Position = glam::Vec2;

/// Direction a player's avatar is facing. Also keys the per-direction frame
/// sequences inside an [`Avatar`] definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    North,
    South,
    East,
    West,
}

/// Movement direction carried by a `move` intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The facing an entity ends up with while moving this way.
    pub const fn facing(self) -> Facing {
        match self {
            Direction::Up => Facing::North,
            Direction::Down => Facing::South,
            Direction::Left => Facing::West,
            Direction::Right => Facing::East,
        }
    }
}
