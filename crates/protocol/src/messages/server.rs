//! Server -> client state messages.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Facing, Position, ProtocolError};

/// One player's server-authoritative state. Replaced wholesale on every
/// update that mentions the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub facing: Facing,
    #[serde(rename = "animationFrame", default)]
    pub animation_frame: usize,
    /// Key into the avatar catalog.
    pub avatar: String,
    pub username: String,
}

impl Player {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// An avatar definition: per-facing frame sequences of encoded bitmaps
/// (data URLs). Immutable once received for a given name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    pub name: String,
    pub frames: HashMap<Facing, Vec<String>>,
}

impl Avatar {
    /// Frame sequence for a facing, with a mirror flag. An avatar without an
    /// explicit west sequence reuses east, drawn mirrored.
    pub fn frames_for(&self, facing: Facing) -> Option<(&[String], bool)> {
        if let Some(seq) = self.frames.get(&facing) {
            return Some((seq.as_slice(), false));
        }
        if facing == Facing::West {
            return self
                .frames
                .get(&Facing::East)
                .map(|seq| (seq.as_slice(), true));
        }
        None
    }
}

/// Reply to `join_game`. `success` selects which of the remaining fields are
/// populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinReply {
    pub success: bool,
    #[serde(rename = "playerId", default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub players: HashMap<String, Player>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub avatars: HashMap<String, Avatar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The accepted half of a [`JoinReply`].
#[derive(Debug, Clone, PartialEq)]
pub struct JoinSnapshot {
    pub player_id: String,
    pub players: HashMap<String, Player>,
    pub avatars: HashMap<String, Avatar>,
}

impl JoinReply {
    /// Split into the accepted snapshot or the rejection reason.
    pub fn into_result(self) -> Result<JoinSnapshot, String> {
        if !self.success {
            return Err(self
                .error
                .unwrap_or_else(|| "join rejected without a reason".to_string()));
        }
        let Some(player_id) = self.player_id else {
            return Err("join_game reply missing playerId".to_string());
        };
        Ok(JoinSnapshot {
            player_id,
            players: self.players,
            avatars: self.avatars,
        })
    }
}

/// Inbound message, tagged by `action` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Join reply: full world snapshot on success, error on failure.
    JoinGame(JoinReply),
    /// One player (and their avatar definition) entered the world.
    PlayerJoined { player: Player, avatar: Avatar },
    /// Partial map of moved players; absent players are untouched.
    PlayersMoved { players: HashMap<String, Player> },
    /// One player left the world.
    PlayerLeft {
        #[serde(rename = "playerId")]
        player_id: String,
    },
}

impl ServerMessage {
    /// Parse a text frame. Malformed JSON and unknown `action` values both
    /// surface as [`ProtocolError::Malformed`].
    pub fn parse(frame: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(frame)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: &str, x: f32, y: f32) -> Player {
        Player {
            id: id.to_string(),
            x,
            y,
            facing: Facing::South,
            animation_frame: 0,
            avatar: "wizard".to_string(),
            username: id.to_string(),
        }
    }

    #[test]
    fn parses_accepted_join() {
        let frame = r#"{
            "action": "join_game",
            "success": true,
            "playerId": "p1",
            "players": {
                "p1": {"id":"p1","x":100.0,"y":100.0,"facing":"south",
                       "animationFrame":0,"avatar":"wizard","username":"alice"}
            },
            "avatars": {
                "wizard": {"name":"wizard","frames":{"south":["data:s0"],"north":["data:n0"],"east":["data:e0"]}}
            }
        }"#;
        let ServerMessage::JoinGame(reply) = ServerMessage::parse(frame).unwrap() else {
            panic!("wrong variant");
        };
        let snapshot = reply.into_result().unwrap();
        assert_eq!(snapshot.player_id, "p1");
        assert_eq!(snapshot.players["p1"].position(), Position::new(100.0, 100.0));
        assert_eq!(snapshot.avatars["wizard"].frames[&Facing::South], vec!["data:s0"]);
    }

    #[test]
    fn parses_rejected_join() {
        let frame = r#"{"action":"join_game","success":false,"error":"server full"}"#;
        let ServerMessage::JoinGame(reply) = ServerMessage::parse(frame).unwrap() else {
            panic!("wrong variant");
        };
        assert_eq!(reply.into_result().unwrap_err(), "server full");
    }

    #[test]
    fn parses_players_moved_subset() {
        let frame = r#"{
            "action": "players_moved",
            "players": {"p2": {"id":"p2","x":5.0,"y":6.0,"facing":"east",
                               "animationFrame":1,"avatar":"wizard","username":"bob"}}
        }"#;
        let ServerMessage::PlayersMoved { players } = ServerMessage::parse(frame).unwrap() else {
            panic!("wrong variant");
        };
        assert_eq!(players.len(), 1);
        assert_eq!(players["p2"].animation_frame, 1);
    }

    #[test]
    fn parses_player_left() {
        let frame = r#"{"action":"player_left","playerId":"p9"}"#;
        assert_eq!(
            ServerMessage::parse(frame).unwrap(),
            ServerMessage::PlayerLeft {
                player_id: "p9".to_string()
            }
        );
    }

    #[test]
    fn rejects_malformed_frames() {
        assert!(ServerMessage::parse("not json").is_err());
        assert!(ServerMessage::parse(r#"{"action":"warp_speed"}"#).is_err());
        assert!(ServerMessage::parse(r#"{"players":{}}"#).is_err());
    }

    #[test]
    fn west_frames_fall_back_to_mirrored_east() {
        let avatar = Avatar {
            name: "wizard".to_string(),
            frames: HashMap::from([(Facing::East, vec!["data:e0".to_string()])]),
        };
        let (frames, mirrored) = avatar.frames_for(Facing::West).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0], "data:e0");
        assert!(mirrored);
        let (_, mirrored) = avatar.frames_for(Facing::East).unwrap();
        assert!(!mirrored);
        assert!(avatar.frames_for(Facing::North).is_none());
    }

    #[test]
    fn join_reply_roundtrips_through_json() {
        let reply = JoinReply {
            success: true,
            player_id: Some("p1".to_string()),
            players: HashMap::from([("p1".to_string(), player("p1", 1.0, 2.0))]),
            avatars: HashMap::new(),
            error: None,
        };
        let text = serde_json::to_string(&ServerMessage::JoinGame(reply.clone())).unwrap();
        assert_eq!(
            ServerMessage::parse(&text).unwrap(),
            ServerMessage::JoinGame(reply)
        );
    }
}
