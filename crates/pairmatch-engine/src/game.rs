//! A single two-player game and its rules.

use std::fmt;

use pairmatch_protocol::{ChannelId, GameId, Identity, Pairing};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Face, Slot, shuffled_board, validate_board};
use crate::{GameError, GameStatus};

// ---------------------------------------------------------------------------
// PlayerSlot
// ---------------------------------------------------------------------------

/// Which seat a player occupies. Serialized as the numbers `1` and `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    /// The opposite seat.
    pub fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

impl From<PlayerSlot> for u8 {
    fn from(slot: PlayerSlot) -> Self {
        match slot {
            PlayerSlot::One => 1,
            PlayerSlot::Two => 2,
        }
    }
}

impl TryFrom<u8> for PlayerSlot {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(format!("player slot must be 1 or 2, got {other}")),
        }
    }
}

impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player{}", u8::from(*self))
    }
}

// ---------------------------------------------------------------------------
// Scoreboard
// ---------------------------------------------------------------------------

/// A per-seat counter, serialized as `{"1": n, "2": m}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    #[serde(rename = "1")]
    pub player1: u32,
    #[serde(rename = "2")]
    pub player2: u32,
}

impl Scoreboard {
    /// The count for `slot`.
    pub fn get(&self, slot: PlayerSlot) -> u32 {
        match slot {
            PlayerSlot::One => self.player1,
            PlayerSlot::Two => self.player2,
        }
    }

    fn bump(&mut self, slot: PlayerSlot) {
        match slot {
            PlayerSlot::One => self.player1 += 1,
            PlayerSlot::Two => self.player2 += 1,
        }
    }
}

// ---------------------------------------------------------------------------
// PlayOutcome
// ---------------------------------------------------------------------------

/// What an accepted pick did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// First card of a pick-pair is now face up.
    FirstPick,
    /// The two cards match. `completed` is `true` exactly once per game:
    /// on the pick that cleared the board.
    Match { completed: bool },
    /// The two cards differ. The game is locked until
    /// [`Game::flip_back`] runs.
    Mismatch,
}

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// One memory-matching game between two connections.
///
/// Serializes to the snapshot clients receive. The dealt `board` is never
/// part of a snapshot; face values only leak through `revealedFaces` once a
/// card is turned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    id: GameId,
    board_size: usize,
    created_at: u64,
    #[serde(skip)]
    board: Vec<Face>,
    revealed_faces: Vec<Slot>,
    current_player: PlayerSlot,
    pending_first_pick: Option<usize>,
    locked: bool,
    pairs_won: Scoreboard,
    turns: Scoreboard,
    status: GameStatus,
    player1: Identity,
    player2: Identity,
    #[serde(rename = "player1ChannelId")]
    player1_channel: ChannelId,
    #[serde(rename = "player2ChannelId")]
    player2_channel: ChannelId,
}

impl Game {
    /// Seats both players from a pairing. The board is dealt by [`Game::init`].
    pub fn new(pairing: Pairing) -> Self {
        Self {
            id: pairing.id,
            board_size: pairing.board_size,
            created_at: pairing.created_at,
            board: Vec::new(),
            revealed_faces: Vec::new(),
            current_player: PlayerSlot::One,
            pending_first_pick: None,
            locked: false,
            pairs_won: Scoreboard::default(),
            turns: Scoreboard::default(),
            status: GameStatus::NotStarted,
            player1: pairing.player1,
            player2: pairing.player2,
            player1_channel: pairing.player1_channel,
            player2_channel: pairing.player2_channel,
        }
    }

    /// Deals a shuffled board and moves the game to `Running`.
    ///
    /// # Errors
    /// - [`GameError::InvalidBoardSize`] for an odd or zero board.
    /// - [`GameError::AlreadyStarted`] / [`GameError::AlreadyEnded`] if the
    ///   game already left `NotStarted`.
    pub fn init<R: Rng>(&mut self, rng: &mut R) -> Result<(), GameError> {
        self.check_startable()?;
        let board = shuffled_board(self.board_size, rng)?;
        self.init_with_board(board)
    }

    /// Like [`Game::init`] with a caller-chosen board. The board must hold
    /// every face in `0..board_size/2` exactly twice.
    pub(crate) fn init_with_board(&mut self, board: Vec<Face>) -> Result<(), GameError> {
        self.check_startable()?;
        validate_board(&board, self.board_size)?;
        self.deal(board);
        Ok(())
    }

    fn check_startable(&self) -> Result<(), GameError> {
        if self.status.can_transition_to(GameStatus::Running) {
            Ok(())
        } else if self.status.is_terminal() {
            Err(GameError::AlreadyEnded)
        } else {
            Err(GameError::AlreadyStarted)
        }
    }

    fn deal(&mut self, board: Vec<Face>) {
        self.revealed_faces = vec![Slot::Hidden; board.len()];
        self.board = board;
        self.current_player = PlayerSlot::One;
        self.pending_first_pick = None;
        self.locked = false;
        self.pairs_won = Scoreboard::default();
        self.turns = Scoreboard::default();
        self.status = GameStatus::Running;
        tracing::info!(game_id = %self.id, board_size = self.board_size, "game dealt");
    }

    /// Turns card `index` for the connection `caller`.
    ///
    /// Guards run in a fixed order and a rejected pick changes nothing.
    /// `index` is signed so that negative picks from the wire get
    /// [`GameError::InvalidIndex`] like any other out-of-range pick.
    pub fn play(&mut self, index: i64, caller: ChannelId) -> Result<PlayOutcome, GameError> {
        let index = match usize::try_from(index) {
            Ok(i) if i < self.board_size => i,
            _ => {
                return Err(GameError::InvalidIndex {
                    index,
                    board_size: self.board_size,
                });
            }
        };
        if self.status.is_terminal() {
            return Err(GameError::AlreadyEnded);
        }
        if !self.status.is_running() {
            return Err(GameError::NotStarted);
        }
        if self.locked {
            return Err(GameError::Locked);
        }
        if caller != self.channel(self.current_player) {
            return Err(GameError::NotYourTurn);
        }
        if !self.revealed_faces[index].is_hidden() {
            return Err(GameError::CardAlreadyRevealed(index));
        }

        let face = self.board[index];
        let Some(first) = self.pending_first_pick else {
            self.revealed_faces[index] = Slot::Revealed(face);
            self.pending_first_pick = Some(index);
            return Ok(PlayOutcome::FirstPick);
        };

        let player = self.current_player;
        self.turns.bump(player);

        if self.board[first] == face {
            self.revealed_faces[first] = Slot::Matched(face);
            self.revealed_faces[index] = Slot::Matched(face);
            self.pending_first_pick = None;
            self.pairs_won.bump(player);

            let completed = self.is_complete();
            if completed {
                self.status = self.final_status();
                tracing::info!(game_id = %self.id, status = %self.status, "board cleared");
            }
            Ok(PlayOutcome::Match { completed })
        } else {
            // Both cards stay up; pending_first_pick is cleared by flip_back.
            self.revealed_faces[index] = Slot::Revealed(face);
            self.locked = true;
            Ok(PlayOutcome::Mismatch)
        }
    }

    /// Ends the lock window after a mismatch: hides the unmatched cards and
    /// passes the turn.
    ///
    /// If the game ended while the cards were showing, the cards are hidden
    /// and the lock cleared but the turn stays put. Returns `false` if the
    /// game was not locked.
    pub fn flip_back(&mut self) -> bool {
        if !self.locked {
            return false;
        }
        for slot in &mut self.revealed_faces {
            if let Slot::Revealed(_) = slot {
                *slot = Slot::Hidden;
            }
        }
        self.pending_first_pick = None;
        self.locked = false;
        if self.status.is_running() {
            self.current_player = self.current_player.other();
        }
        true
    }

    /// Forfeits the game for `caller`; the opponent wins. Returns the
    /// quitter's seat.
    pub fn quit(&mut self, caller: ChannelId) -> Result<PlayerSlot, GameError> {
        if self.status.is_terminal() {
            return Err(GameError::AlreadyEnded);
        }
        let quitter = self.seat_of(caller).ok_or(GameError::NotAParticipant)?;
        let winner = GameStatus::won_by(quitter.other());
        if !self.status.can_transition_to(winner) {
            return Err(GameError::NotStarted);
        }
        self.status = winner;
        tracing::info!(game_id = %self.id, %quitter, "player quit");
        Ok(quitter)
    }

    /// Checks that `caller` may close this finished game. Returns the
    /// caller's seat.
    pub fn close(&self, caller: ChannelId) -> Result<PlayerSlot, GameError> {
        if !self.status.is_terminal() {
            return Err(GameError::NotEnded);
        }
        self.seat_of(caller).ok_or(GameError::NotAParticipant)
    }

    /// Forces `Interrupted` unless the game already ended. Returns `true` if
    /// the status changed.
    pub fn interrupt(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = GameStatus::Interrupted;
        tracing::info!(game_id = %self.id, "game interrupted");
        true
    }

    /// Returns `true` once the game reached a terminal status.
    pub fn game_ended(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns `true` if every card is matched.
    pub fn is_complete(&self) -> bool {
        !self.revealed_faces.is_empty() && self.revealed_faces.iter().all(|s| s.is_matched())
    }

    fn final_status(&self) -> GameStatus {
        use std::cmp::Ordering;
        match self.pairs_won.player1.cmp(&self.pairs_won.player2) {
            Ordering::Greater => GameStatus::Player1Won,
            Ordering::Less => GameStatus::Player2Won,
            Ordering::Equal => GameStatus::Draw,
        }
    }

    /// The seat held by `channel`, if any.
    pub fn seat_of(&self, channel: ChannelId) -> Option<PlayerSlot> {
        if channel == self.player1_channel {
            Some(PlayerSlot::One)
        } else if channel == self.player2_channel {
            Some(PlayerSlot::Two)
        } else {
            None
        }
    }

    /// Returns `true` if `channel` is one of the two players.
    pub fn is_participant(&self, channel: ChannelId) -> bool {
        self.seat_of(channel).is_some()
    }

    /// The connection seated at `slot`.
    pub fn channel(&self, slot: PlayerSlot) -> ChannelId {
        match slot {
            PlayerSlot::One => self.player1_channel,
            PlayerSlot::Two => self.player2_channel,
        }
    }

    /// The user seated at `slot`.
    pub fn player(&self, slot: PlayerSlot) -> &Identity {
        match slot {
            PlayerSlot::One => &self.player1,
            PlayerSlot::Two => &self.player2,
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn board_size(&self) -> usize {
        self.board_size
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn current_player(&self) -> PlayerSlot {
        self.current_player
    }

    pub fn pending_first_pick(&self) -> Option<usize> {
        self.pending_first_pick
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn revealed_faces(&self) -> &[Slot] {
        &self.revealed_faces
    }

    pub fn pairs_won(&self) -> Scoreboard {
        self.pairs_won
    }

    pub fn turns(&self) -> Scoreboard {
        self.turns
    }
}
