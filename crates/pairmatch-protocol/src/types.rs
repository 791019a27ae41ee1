//! Identifiers and records shared by every pairmatch layer.
//!
//! These are the structures that travel "on the wire" inside client actions
//! and server events, so their serde shape is part of the protocol.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The persistent identifier of a user account.
///
/// Newtype wrapper so a `UserId` can't be passed where a `GameId` is
/// expected. `#[serde(transparent)]` keeps it a plain number on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

/// The identifier of a game record.
///
/// Issued by the persistence backend before an offer is posted, so the
/// server never allocates these itself.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GameId(pub u64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G-{}", self.0)
    }
}

/// Identifies one live client connection.
///
/// A user may hold several connections (two browser tabs); turn order and
/// offer ownership are tracked per connection, not per user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ChannelId(pub u64);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ch-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// An already-authenticated user, as handed over by the client at login.
///
/// The server does not verify credentials; it trusts this object and uses
/// `id` for ownership checks and private-room routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Account id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Optional short name shown on the board.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

impl Identity {
    /// Creates an identity without a nickname.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: UserId(id),
            name: name.into(),
            nickname: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Pairing
// ---------------------------------------------------------------------------

/// A joined offer: both players and their connections, ready to start.
///
/// Returned to the joiner by `joinGame` and sent back verbatim in
/// `startGame`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pairing {
    /// Game record id.
    pub id: GameId,
    /// Number of cards on the board.
    pub board_size: usize,
    /// When the offer was posted (ms since UNIX epoch).
    #[serde(default)]
    pub created_at: u64,
    /// The offer's creator.
    pub player1: Identity,
    /// The player who joined the offer.
    pub player2: Identity,
    /// Connection that posted the offer.
    #[serde(rename = "player1ChannelId")]
    pub player1_channel: ChannelId,
    /// Connection that joined it.
    #[serde(rename = "player2ChannelId")]
    pub player2_channel: ChannelId,
}
