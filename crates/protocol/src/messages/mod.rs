//! Wire message definitions, split by direction.

mod client;
mod server;

pub use client::ClientMessage;
pub use server::{Avatar, JoinReply, JoinSnapshot, Player, ServerMessage};
