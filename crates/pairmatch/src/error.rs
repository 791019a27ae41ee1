//! Error types for the pairmatch server.

use pairmatch_engine::GameError;
use pairmatch_protocol::{AckError, ErrorCode, GameId, ProtocolError};
use pairmatch_session::SessionError;
use pairmatch_transport::TransportError;

/// Why the orchestrator refused an action.
///
/// Every variant maps onto a stable [`ErrorCode`] and reaches the client as
/// an [`AckError`]; none of them end the connection except
/// [`OrchestratorError::Unavailable`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrchestratorError {
    #[error("you must log in first")]
    NotAuthenticated,

    #[error("game {0} is not open")]
    GameNotFound(GameId),

    #[error("you cannot join your own game")]
    CannotJoinOwnGame,

    #[error("you cannot remove a game you did not create")]
    CannotRemoveOthersGame,

    #[error("no room for game {0}")]
    RoomNotFound(GameId),

    #[error("room for game {0} holds no game data")]
    GameDataMissing(GameId),

    /// The private-message recipient has no live connection.
    #[error("{0} is not online")]
    UserOffline(String),

    #[error("game {0} has already started")]
    GameAlreadyStarted(GameId),

    /// `startGame` with a pairing that seats one connection in both seats.
    #[error("pairing for game {0} needs two different connections")]
    InvalidPairing(GameId),

    /// `startGame` from a connection that is neither seat of the pairing.
    #[error("you are not playing game {0}")]
    NotAParticipant(GameId),

    /// Rejected by the game rules.
    #[error(transparent)]
    Game(#[from] GameError),

    /// The orchestrator task is gone (server shutting down).
    #[error("server is shutting down")]
    Unavailable,
}

impl OrchestratorError {
    /// The wire error code for this rejection.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotAuthenticated => ErrorCode::NotAuthenticated,
            Self::GameNotFound(_) => ErrorCode::GameNotFound,
            Self::CannotJoinOwnGame => ErrorCode::CannotJoinOwnGame,
            Self::CannotRemoveOthersGame => ErrorCode::CannotRemoveOthersGame,
            Self::RoomNotFound(_) => ErrorCode::RoomNotFound,
            Self::GameDataMissing(_) => ErrorCode::GameDataMissing,
            Self::UserOffline(_) => ErrorCode::UserOffline,
            Self::GameAlreadyStarted(_) => ErrorCode::GameAlreadyStarted,
            Self::NotAParticipant(_) => ErrorCode::NotAParticipant,
            Self::InvalidPairing(_) => ErrorCode::InvalidPayload,
            Self::Game(e) => e.code(),
            Self::Unavailable => ErrorCode::ServerUnavailable,
        }
    }

    /// The acknowledgment payload sent back to the caller.
    pub fn to_ack(&self) -> AckError {
        AckError::new(self.code(), self.to_string())
    }
}

impl From<SessionError> for OrchestratorError {
    fn from(err: SessionError) -> Self {
        match err {
            // An unknown channel has, by definition, never logged in.
            SessionError::NotAuthenticated(_) | SessionError::UnknownChannel(_) => {
                Self::NotAuthenticated
            }
            SessionError::AlreadyOpen(_) => Self::Unavailable,
        }
    }
}

/// Top-level error that wraps the infrastructure errors of every layer.
///
/// The `#[from]` conversions let `?` lift transport, protocol and
/// orchestrator errors into this one type.
#[derive(Debug, thiserror::Error)]
pub enum PairmatchError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The orchestrator refused or could not take a command.
    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairmatch_protocol::ChannelId;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::Accept(std::io::Error::other("gone"));
        let wrapped: PairmatchError = err.into();
        assert!(matches!(wrapped, PairmatchError::Transport(_)));
        assert!(wrapped.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::Decode(serde_json::from_str::<u8>("x").unwrap_err());
        let wrapped: PairmatchError = err.into();
        assert!(matches!(wrapped, PairmatchError::Protocol(_)));
    }

    #[test]
    fn test_from_orchestrator_error() {
        let wrapped: PairmatchError = OrchestratorError::Unavailable.into();
        assert!(matches!(wrapped, PairmatchError::Orchestrator(_)));
    }

    #[test]
    fn test_session_errors_become_not_authenticated() {
        let err: OrchestratorError = SessionError::NotAuthenticated(ChannelId(1)).into();
        assert_eq!(err, OrchestratorError::NotAuthenticated);
        let err: OrchestratorError = SessionError::UnknownChannel(ChannelId(1)).into();
        assert_eq!(err, OrchestratorError::NotAuthenticated);
    }

    #[test]
    fn test_game_error_keeps_engine_code() {
        let err: OrchestratorError = GameError::Locked.into();
        assert_eq!(err.code(), ErrorCode::GameLocked);
        assert_eq!(err.to_ack().error_code, 15);
    }

    #[test]
    fn test_invalid_pairing_is_bad_request() {
        let ack = OrchestratorError::InvalidPairing(GameId(12)).to_ack();
        assert_eq!(ack.error_code, 400);
        assert!(ack.error_message.contains("G-12"));
    }

    #[test]
    fn test_to_ack_carries_message() {
        let ack = OrchestratorError::UserOffline("rui".into()).to_ack();
        assert_eq!(ack.error_code, 1);
        assert_eq!(ack.error_message, "rui is not online");
    }
}
