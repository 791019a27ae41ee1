//! Board dealing and the per-card reveal state.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::GameError;

/// A card's face value. Each value in `0..board_size/2` is dealt twice.
pub type Face = u32;

/// Largest board the engine will deal.
pub const MAX_BOARD_SIZE: usize = 1024;

/// What the players can see at one board position.
///
/// ```json
/// {"state":"hidden"}
/// {"state":"revealed","face":3}
/// {"state":"matched","face":3}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "face", rename_all = "camelCase")]
pub enum Slot {
    /// Face down.
    Hidden,
    /// Face up as part of the pick-pair being resolved.
    Revealed(Face),
    /// Face up for good: part of a matched pair.
    Matched(Face),
}

impl Slot {
    /// Returns `true` if the card is face down.
    pub fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }

    /// Returns `true` if the card belongs to a matched pair.
    pub fn is_matched(self) -> bool {
        matches!(self, Self::Matched(_))
    }
}

/// Deals a board of `board_size` cards: every face in `0..board_size/2`
/// twice, in Fisher–Yates order.
///
/// # Errors
/// [`GameError::InvalidBoardSize`] if `board_size` is zero, odd, or above
/// [`MAX_BOARD_SIZE`].
pub fn shuffled_board<R: Rng>(board_size: usize, rng: &mut R) -> Result<Vec<Face>, GameError> {
    check_board_size(board_size)?;

    let mut board: Vec<Face> = (0..board_size / 2)
        .flat_map(|face| [face as Face, face as Face])
        .collect();

    for i in (1..board.len()).rev() {
        let j = rng.random_range(0..=i);
        board.swap(i, j);
    }
    Ok(board)
}

/// Checks that `board` holds exactly two of every face in `0..board_size/2`.
pub(crate) fn validate_board(board: &[Face], board_size: usize) -> Result<(), GameError> {
    check_board_size(board_size)?;
    if board.len() != board_size {
        return Err(GameError::InvalidBoard);
    }

    let mut counts = vec![0u8; board_size / 2];
    for &face in board {
        let count = counts
            .get_mut(face as usize)
            .ok_or(GameError::InvalidBoard)?;
        *count += 1;
        if *count > 2 {
            return Err(GameError::InvalidBoard);
        }
    }
    // len == board_size and no face above 2 ⇒ every face appears exactly twice.
    Ok(())
}

fn check_board_size(board_size: usize) -> Result<(), GameError> {
    if board_size == 0 || board_size % 2 != 0 || board_size > MAX_BOARD_SIZE {
        return Err(GameError::InvalidBoardSize(board_size));
    }
    Ok(())
}
