//! Error types for the game engine.

use pairmatch_protocol::ErrorCode;

/// Reasons the engine refuses an action.
///
/// Every variant leaves the game untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The card index is outside `0..board_size`, negative included.
    #[error("card {index} is outside the board (0..{board_size})")]
    InvalidIndex { index: i64, board_size: usize },

    /// The board size is odd or zero.
    #[error("board size {0} must be an even number between 2 and 1024")]
    InvalidBoardSize(usize),

    /// A supplied board is not a set of pairs `0..board_size/2`.
    #[error("board is not a shuffled set of pairs")]
    InvalidBoard,

    /// The game was never started.
    #[error("game has not started")]
    NotStarted,

    /// `init` was called on a game that already left NotStarted.
    #[error("game has already started")]
    AlreadyStarted,

    /// The game already reached a terminal status.
    #[error("game has already ended")]
    AlreadyEnded,

    /// A mismatched pair is still showing.
    #[error("cards are flipping back, wait a moment")]
    Locked,

    /// The caller's connection does not hold the current turn.
    #[error("it is not your turn")]
    NotYourTurn,

    /// The card is already face up.
    #[error("card {0} is already revealed")]
    CardAlreadyRevealed(usize),

    /// Closing a game that is still being played.
    #[error("cannot close a game that has not ended")]
    NotEnded,

    /// The caller's connection is neither player.
    #[error("you are not playing this game")]
    NotAParticipant,
}

impl GameError {
    /// The wire error code for this rejection.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidIndex { .. } => ErrorCode::InvalidIndex,
            Self::InvalidBoardSize(_) | Self::InvalidBoard => ErrorCode::InvalidBoardSize,
            Self::NotStarted => ErrorCode::GameNotStarted,
            Self::AlreadyStarted => ErrorCode::GameAlreadyStarted,
            Self::AlreadyEnded => ErrorCode::GameAlreadyEnded,
            Self::Locked => ErrorCode::GameLocked,
            Self::NotYourTurn => ErrorCode::NotYourTurn,
            Self::CardAlreadyRevealed(_) => ErrorCode::CardAlreadyRevealed,
            Self::NotEnded => ErrorCode::GameNotEnded,
            Self::NotAParticipant => ErrorCode::NotAParticipant,
        }
    }
}
