//! The closed error taxonomy returned through acknowledgments.
//!
//! Errors never cross the wire as exceptions: a rejected action is answered
//! with an [`AckError`] carrying a stable numeric code and a readable
//! message. Clients branch on the numeric values, so existing values must
//! never be renumbered.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Every reason an action can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // -- authentication --
    /// The connection has not logged in.
    NotAuthenticated,

    // -- validation --
    /// The frame could not be decoded into an action.
    InvalidPayload,
    /// Card index outside the board.
    InvalidIndex,
    /// A board size that is odd or zero.
    InvalidBoardSize,
    /// The caller tried to join an offer they created.
    CannotJoinOwnGame,

    // -- state --
    /// No open offer with that id.
    GameNotFound,
    /// No room exists for that game.
    RoomNotFound,
    /// The room exists but holds no game.
    GameDataMissing,
    /// The session was never started.
    GameNotStarted,
    /// A running session already exists for that game.
    GameAlreadyStarted,
    /// The game already reached a terminal status.
    GameAlreadyEnded,
    /// Closing a game that is still running.
    GameNotEnded,
    /// A mismatch is being shown; picks are refused until it flips back.
    GameLocked,
    /// It is the other player's turn.
    NotYourTurn,
    /// The card is face up already.
    CardAlreadyRevealed,
    /// The private-message recipient has no live connection.
    UserOffline,

    // -- authorization --
    /// The caller is not one of the game's players.
    NotAParticipant,
    /// The caller tried to withdraw somebody else's offer.
    CannotRemoveOthersGame,

    // -- server --
    /// The server is shutting down and no longer accepts actions.
    ServerUnavailable,
}

impl ErrorCode {
    /// The stable numeric code sent as `errorCode`.
    pub fn code(self) -> u16 {
        match self {
            Self::UserOffline => 1,
            Self::CannotJoinOwnGame => 3,
            Self::CannotRemoveOthersGame => 4,
            Self::NotAParticipant => 10,
            Self::GameAlreadyEnded => 11,
            Self::NotYourTurn => 12,
            Self::CardAlreadyRevealed => 13,
            Self::GameNotEnded => 14,
            Self::GameLocked => 15,
            Self::InvalidIndex => 16,
            Self::GameNotStarted => 17,
            Self::GameAlreadyStarted => 18,
            Self::InvalidBoardSize => 19,
            Self::InvalidPayload => 400,
            Self::NotAuthenticated => 401,
            Self::GameNotFound => 404,
            Self::RoomNotFound => 410,
            Self::GameDataMissing => 500,
            Self::ServerUnavailable => 503,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}({})", self.code())
    }
}

/// The `{ errorCode, errorMessage }` object delivered to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AckError {
    /// Numeric [`ErrorCode::code`].
    pub error_code: u16,
    /// Human-readable description.
    pub error_message: String,
}

impl AckError {
    /// Builds an acknowledgment error from a code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error_code: code.code(),
            error_message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ErrorCode; 19] = [
        ErrorCode::NotAuthenticated,
        ErrorCode::InvalidPayload,
        ErrorCode::InvalidIndex,
        ErrorCode::InvalidBoardSize,
        ErrorCode::CannotJoinOwnGame,
        ErrorCode::GameNotFound,
        ErrorCode::RoomNotFound,
        ErrorCode::GameDataMissing,
        ErrorCode::GameNotStarted,
        ErrorCode::GameAlreadyStarted,
        ErrorCode::GameAlreadyEnded,
        ErrorCode::GameNotEnded,
        ErrorCode::GameLocked,
        ErrorCode::NotYourTurn,
        ErrorCode::CardAlreadyRevealed,
        ErrorCode::UserOffline,
        ErrorCode::NotAParticipant,
        ErrorCode::CannotRemoveOthersGame,
        ErrorCode::ServerUnavailable,
    ];

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<u16> = ALL.iter().map(|c| c.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), ALL.len());
    }

    #[test]
    fn test_codes_clients_depend_on_are_stable() {
        assert_eq!(ErrorCode::UserOffline.code(), 1);
        assert_eq!(ErrorCode::CannotJoinOwnGame.code(), 3);
        assert_eq!(ErrorCode::NotYourTurn.code(), 12);
        assert_eq!(ErrorCode::GameNotFound.code(), 404);
    }

    #[test]
    fn test_ack_error_json_shape() {
        let err = AckError::new(ErrorCode::NotYourTurn, "it is not your turn");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["errorCode"], 12);
        assert_eq!(json["errorMessage"], "it is not your turn");
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::GameLocked.to_string(), "GameLocked(15)");
    }
}
