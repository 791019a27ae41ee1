//! Inbound client actions.
//!
//! Every frame a client sends is a [`ClientEnvelope`]: an optional
//! acknowledgment id plus one named [`ClientAction`]. When `ack` is present
//! the server answers with exactly one acknowledgment carrying the same id.
//!
//! ```json
//! { "ack": 4, "action": { "event": "play", "data": { "gameId": 12, "index": 3 } } }
//! ```

use serde::{Deserialize, Serialize};

use crate::{GameId, Identity, Pairing};

/// The top-level inbound frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientEnvelope {
    /// Acknowledgment id chosen by the client. `None` means fire-and-forget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack: Option<u64>,

    /// The requested action.
    pub action: ClientAction,
}

/// A named client action and its payload.
///
/// `#[serde(tag = "event", content = "data")]` gives the adjacently tagged
/// shape `{ "event": "joinGame", "data": 12 }`. Actions without a payload
/// omit `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientAction {
    /// Bind an authenticated identity to this connection.
    Login(Identity),

    /// Unbind the identity; the connection stays open. Clients may send
    /// their user object as `data`; the connection's own login is what gets
    /// unbound either way.
    Logout(Option<Identity>),

    /// List the open offers.
    FetchGames,

    /// Post an offer for a game record the client already created.
    #[serde(rename_all = "camelCase")]
    AddGame { game_id: GameId, board_size: usize },

    /// Take an open offer as the second player.
    JoinGame(GameId),

    /// Withdraw one of the caller's own offers.
    RemoveGame(GameId),

    /// Start the session for a joined offer.
    StartGame(Pairing),

    /// List the sessions the caller is currently part of.
    FetchPlayingGames,

    /// Reveal a card.
    Play(PlayRequest),

    /// Give up a running game.
    QuitGame(GameId),

    /// Leave a finished game's room.
    CloseGame(GameId),

    /// Public chat line broadcast to every connection.
    ChatMessage(String),

    /// Direct message to one user.
    PrivateMessage(PrivateMessage),
}

impl ClientAction {
    /// The wire name of the action, used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login(_) => "login",
            Self::Logout(_) => "logout",
            Self::FetchGames => "fetchGames",
            Self::AddGame { .. } => "addGame",
            Self::JoinGame(_) => "joinGame",
            Self::RemoveGame(_) => "removeGame",
            Self::StartGame(_) => "startGame",
            Self::FetchPlayingGames => "fetchPlayingGames",
            Self::Play(_) => "play",
            Self::QuitGame(_) => "quitGame",
            Self::CloseGame(_) => "closeGame",
            Self::ChatMessage(_) => "chatMessage",
            Self::PrivateMessage(_) => "privateMessage",
        }
    }
}

/// Payload of [`ClientAction::Play`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayRequest {
    /// The game being played.
    pub game_id: GameId,
    /// Card position, `0..boardSize`. Signed so a negative pick decodes
    /// and is rejected by the game rules instead of the codec.
    pub index: i64,
}

/// Payload of [`ClientAction::PrivateMessage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateMessage {
    /// Recipient. Only `id` is used for routing; `name` appears in the
    /// "not online" error.
    pub destination_user: Identity,
    /// Message text.
    pub message: String,
}
