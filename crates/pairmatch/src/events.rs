//! Outbound frames: broadcasts and acknowledgments.
//!
//! Every frame the server writes is a [`ServerFrame`], tagged by `type`:
//!
//! ```json
//! {"type":"ack","ack":4,"response":true}
//! {"type":"event","event":"gameChanged","data":{ ... }}
//! {"type":"error","errorCode":400,"errorMessage":"..."}
//! ```

use pairmatch_engine::Game;
use pairmatch_lobby::Offer;
use pairmatch_protocol::{AckError, Identity, Pairing};
use serde::Serialize;

/// A broadcast pushed to every member of a room.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// The open offers changed. Sent to the lobby room.
    LobbyChanged(Vec<Offer>),
    GameStarted(Game),
    GameChanged(Game),
    GameEnded(Game),
    /// A player disconnected or logged out mid-game.
    GameInterrupted(Game),
    GameQuitted(QuitNotice),
    /// Public chat, sent to every connection.
    ChatMessage(ChatLine),
    /// Direct message, sent to the recipient's private room.
    PrivateMessage(ChatLine),
}

impl ServerEvent {
    /// The wire name, used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LobbyChanged(_) => "lobbyChanged",
            Self::GameStarted(_) => "gameStarted",
            Self::GameChanged(_) => "gameChanged",
            Self::GameEnded(_) => "gameEnded",
            Self::GameInterrupted(_) => "gameInterrupted",
            Self::GameQuitted(_) => "gameQuitted",
            Self::ChatMessage(_) => "chatMessage",
            Self::PrivateMessage(_) => "privateMessage",
        }
    }
}

/// Payload of [`ServerEvent::GameQuitted`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuitNotice {
    /// The player who gave up.
    pub quitter: Identity,
    /// The game after the forfeit.
    pub game: Game,
}

/// Payload of the chat events. `user` is `None` for connections that
/// haven't logged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatLine {
    pub user: Option<Identity>,
    pub message: String,
}

/// The value carried by an acknowledgment.
///
/// Untagged: each action has one success shape, and errors are told apart
/// by their `errorCode` field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AckResponse {
    Error(AckError),
    Offers(Vec<Offer>),
    Offer(Offer),
    Pairing(Pairing),
    Game(Game),
    Games(Vec<Game>),
    Done(bool),
    Delivered { success: bool },
}

/// One frame written to a client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerFrame {
    /// Reply to an inbound frame that carried an `ack` id.
    Ack { ack: u64, response: AckResponse },
    /// A broadcast.
    Event(ServerEvent),
    /// An inbound frame without an `ack` id could not be decoded.
    Error(AckError),
}
