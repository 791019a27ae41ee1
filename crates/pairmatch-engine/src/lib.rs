//! # pairmatch-engine
//!
//! Rules of the two-player memory-matching game.
//!
//! A [`Game`] is a plain state machine: it owns the dealt board, whose turn
//! it is, the pending pick and the scores, and rejects illegal picks with a
//! [`GameError`]. It has no clock and no I/O. The mismatch lock window is
//! closed by whoever owns the game calling [`Game::flip_back`] once
//! [`EngineConfig::flip_back_delay`] has passed.
//!
//! ```text
//! Pairing ──→ Game::new ──→ init ──→ play / quit / interrupt ──→ close
//!             (not-started)  (running)                (terminal)
//! ```

mod board;
mod config;
mod error;
mod game;

pub use board::{Face, MAX_BOARD_SIZE, Slot, shuffled_board};
pub use config::{EngineConfig, GameStatus};
pub use error::GameError;
pub use game::{Game, PlayOutcome, PlayerSlot, Scoreboard};
