//! Room membership and the games attached to game rooms.
//!
//! Three kinds of room exist: the global `lobby`, one private `user_<id>`
//! room per logged-in user, and one `game_<id>` room per started game. A
//! room exists while it has members; when the last member leaves, the room
//! and any game attached to it are dropped.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use pairmatch_engine::Game;
use pairmatch_protocol::{ChannelId, GameId, UserId};

use crate::OrchestratorError;

/// Names a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomKey {
    Lobby,
    User(UserId),
    Game(GameId),
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lobby => f.write_str("lobby"),
            Self::User(id) => write!(f, "user_{}", id.0),
            Self::Game(id) => write!(f, "game_{}", id.0),
        }
    }
}

#[derive(Debug, Default)]
struct Room {
    // Ordered so broadcasts reach members in a stable order.
    members: BTreeSet<ChannelId>,
    game: Option<Game>,
    // Stamp of the attached game; changes whenever a game is (re)attached.
    generation: u64,
}

/// Every room and who is in it.
///
/// `memberships` is the reverse index of `rooms` and is kept in sync by
/// [`RoomTable::join`] and [`RoomTable::leave`].
#[derive(Debug, Default)]
pub struct RoomTable {
    rooms: HashMap<RoomKey, Room>,
    memberships: HashMap<ChannelId, HashSet<RoomKey>>,
    last_generation: u64,
}

impl RoomTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `channel` to the room, creating it if needed. Returns `false`
    /// if it was already a member.
    pub fn join(&mut self, key: RoomKey, channel: ChannelId) -> bool {
        let joined = self.rooms.entry(key).or_default().members.insert(channel);
        if joined {
            self.memberships.entry(channel).or_default().insert(key);
            tracing::debug!(room = %key, %channel, "joined room");
        }
        joined
    }

    /// Removes `channel` from the room. Returns `true` if that emptied the
    /// room and it was dropped.
    pub fn leave(&mut self, key: RoomKey, channel: ChannelId) -> bool {
        if let Some(keys) = self.memberships.get_mut(&channel) {
            keys.remove(&key);
            if keys.is_empty() {
                self.memberships.remove(&channel);
            }
        }

        let Some(room) = self.rooms.get_mut(&key) else {
            return false;
        };
        if !room.members.remove(&channel) {
            return false;
        }
        tracing::debug!(room = %key, %channel, "left room");

        if room.members.is_empty() {
            let dropped_game = self.rooms.remove(&key).and_then(|room| room.game);
            if let Some(game) = dropped_game {
                tracing::info!(game_id = %game.id(), status = %game.status(), "game room dropped");
            }
            return true;
        }
        false
    }

    /// Removes `channel` from every room it is in.
    pub fn leave_all(&mut self, channel: ChannelId) {
        for key in self.rooms_of(channel) {
            self.leave(key, channel);
        }
    }

    /// Members of a room, in channel order. Empty if the room doesn't exist.
    pub fn members(&self, key: RoomKey) -> Vec<ChannelId> {
        self.rooms
            .get(&key)
            .map(|room| room.members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Every room `channel` is in.
    pub fn rooms_of(&self, channel: ChannelId) -> Vec<RoomKey> {
        self.memberships
            .get(&channel)
            .map(|keys| keys.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Ids of the game rooms `channel` is in, ascending.
    pub fn game_rooms_of(&self, channel: ChannelId) -> Vec<GameId> {
        let mut ids: Vec<GameId> = self
            .rooms_of(channel)
            .into_iter()
            .filter_map(|key| match key {
                RoomKey::Game(id) => Some(id),
                _ => None,
            })
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Attaches a game to its room, replacing any previous one, and returns
    /// the generation it was stamped with. The room must already have
    /// members.
    pub fn attach_game(&mut self, game: Game) -> Result<u64, OrchestratorError> {
        let id = game.id();
        let room = self
            .rooms
            .get_mut(&RoomKey::Game(id))
            .ok_or(OrchestratorError::RoomNotFound(id))?;
        self.last_generation += 1;
        room.game = Some(game);
        room.generation = self.last_generation;
        Ok(self.last_generation)
    }

    /// Generation of the game currently in room `game_<id>`, if any.
    ///
    /// Generations are unique across the table, so a game started in a
    /// dropped and recreated room never shares one with its predecessor.
    pub fn generation(&self, id: GameId) -> Option<u64> {
        self.rooms
            .get(&RoomKey::Game(id))
            .filter(|room| room.game.is_some())
            .map(|room| room.generation)
    }

    /// The game in room `game_<id>`.
    ///
    /// # Errors
    /// [`OrchestratorError::RoomNotFound`] if the room doesn't exist,
    /// [`OrchestratorError::GameDataMissing`] if it holds no game.
    pub fn game(&self, id: GameId) -> Result<&Game, OrchestratorError> {
        self.rooms
            .get(&RoomKey::Game(id))
            .ok_or(OrchestratorError::RoomNotFound(id))?
            .game
            .as_ref()
            .ok_or(OrchestratorError::GameDataMissing(id))
    }

    /// Mutable access to the game in room `game_<id>`. Same errors as
    /// [`RoomTable::game`].
    pub fn game_mut(&mut self, id: GameId) -> Result<&mut Game, OrchestratorError> {
        self.rooms
            .get_mut(&RoomKey::Game(id))
            .ok_or(OrchestratorError::RoomNotFound(id))?
            .game
            .as_mut()
            .ok_or(OrchestratorError::GameDataMissing(id))
    }
}
