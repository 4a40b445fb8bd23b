// World state store: the client-side mirror of server-authoritative state.
//
// Pure reducer over inbound protocol messages. The store never invents
// state: joins replace it, moves merge into it, leaves remove from it. The
// local player is an alias into the same table, looked up by id, never a
// separate copy.

use std::collections::HashMap;

use protocol::{Avatar, JoinSnapshot, Player, ServerMessage};

/// Logical size of the world backdrop on each axis, in world units.
pub const WORLD_SIZE: f32 = 2048.0;

/// What the caller must do after one message has been applied. Mutation is
/// already complete by the time this is returned, so a redraw triggered from
/// it always observes post-mutation state.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Applied {
    pub redraw: bool,
    /// The local player's position changed; recentre the viewport before
    /// redrawing.
    pub recentre: bool,
    /// The join was rejected with this reason. Nothing changed.
    pub rejected: Option<String>,
}

#[derive(Debug, Default)]
pub struct WorldStore {
    players: HashMap<String, Player>,
    avatars: HashMap<String, Avatar>,
    my_id: Option<String>,
}

impl WorldStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn avatar(&self, name: &str) -> Option<&Avatar> {
        self.avatars.get(name)
    }

    /// Non-owning alias to the local player's table entry, once joined.
    pub fn local_player(&self) -> Option<&Player> {
        self.my_id.as_deref().and_then(|id| self.players.get(id))
    }

    /// Apply one inbound message and report the required follow-up.
    pub fn apply(&mut self, message: ServerMessage) -> Applied {
        match message {
            ServerMessage::JoinGame(reply) => match reply.into_result() {
                Ok(snapshot) => {
                    self.install(snapshot);
                    Applied {
                        redraw: true,
                        recentre: true,
                        rejected: None,
                    }
                }
                Err(reason) => Applied {
                    rejected: Some(reason),
                    ..Applied::default()
                },
            },
            ServerMessage::PlayerJoined { player, avatar } => {
                // Avatar definitions are immutable after first receipt.
                self.avatars.entry(avatar.name.clone()).or_insert(avatar);
                self.players.insert(player.id.clone(), player);
                Applied {
                    redraw: true,
                    ..Applied::default()
                }
            }
            ServerMessage::PlayersMoved { players } => {
                let mut recentre = false;
                for (id, player) in players {
                    if self.my_id.as_deref() == Some(id.as_str()) {
                        recentre = true;
                    }
                    self.players.insert(id, player);
                }
                Applied {
                    redraw: true,
                    recentre,
                    rejected: None,
                }
            }
            ServerMessage::PlayerLeft { player_id } => {
                // Removing an id we never had is fine; the redraw still runs.
                self.players.remove(&player_id);
                Applied {
                    redraw: true,
                    ..Applied::default()
                }
            }
        }
    }

    fn install(&mut self, snapshot: JoinSnapshot) {
        self.players = snapshot.players;
        self.avatars = snapshot.avatars;
        self.my_id = Some(snapshot.player_id);
    }
}
