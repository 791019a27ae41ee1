//! Engine configuration and the game status state machine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::PlayerSlot;

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Tunables for the game rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How long a mismatched pair stays face up before it flips back.
    /// No picks are accepted during this window.
    pub flip_back_delay: Duration,

    /// Seed for board shuffling. `None` draws from the thread RNG; a fixed
    /// seed makes every board reproducible (debugging, tests).
    pub shuffle_seed: Option<u64>,
}

impl EngineConfig {
    /// Default lock window after a mismatch.
    pub const DEFAULT_FLIP_BACK_DELAY: Duration = Duration::from_millis(2000);
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            flip_back_delay: Self::DEFAULT_FLIP_BACK_DELAY,
            shuffle_seed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// GameStatus
// ---------------------------------------------------------------------------

/// The lifecycle status of a game.
///
/// ```text
/// NotStarted → Running → { Player1Won | Player2Won | Draw | Interrupted }
/// ```
///
/// - **NotStarted**: built from a pairing, board not dealt yet.
/// - **Running**: board dealt, players take turns.
/// - **Player1Won / Player2Won / Draw**: board cleared or a player quit.
/// - **Interrupted**: a player disconnected or logged out mid-game.
///
/// The four terminal statuses are absorbing: once reached, nothing moves
/// the game anywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameStatus {
    NotStarted,
    Running,
    Player1Won,
    Player2Won,
    Draw,
    Interrupted,
}

impl GameStatus {
    /// Returns `true` for the absorbing end states.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Player1Won | Self::Player2Won | Self::Draw | Self::Interrupted
        )
    }

    /// Returns `true` while players may pick cards.
    pub fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns `true` if moving to `target` respects the state machine.
    pub fn can_transition_to(self, target: Self) -> bool {
        match self {
            Self::NotStarted => target == Self::Running,
            Self::Running => target.is_terminal(),
            _ => false,
        }
    }

    /// The status that declares `slot` the winner.
    pub fn won_by(slot: PlayerSlot) -> Self {
        match slot {
            PlayerSlot::One => Self::Player1Won,
            PlayerSlot::Two => Self::Player2Won,
        }
    }

    /// The winning seat, if this status names one.
    pub fn winner(self) -> Option<PlayerSlot> {
        match self {
            Self::Player1Won => Some(PlayerSlot::One),
            Self::Player2Won => Some(PlayerSlot::Two),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NotStarted => "not-started",
            Self::Running => "running",
            Self::Player1Won => "player1-won",
            Self::Player2Won => "player2-won",
            Self::Draw => "draw",
            Self::Interrupted => "interrupted",
        };
        f.write_str(name)
    }
}
