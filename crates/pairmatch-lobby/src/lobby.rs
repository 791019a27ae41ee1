//! The lobby registry.

use indexmap::IndexMap;
use pairmatch_protocol::{ChannelId, GameId, Identity};

use crate::Offer;

/// Tracks every open offer, keyed by game id.
///
/// Backed by an `IndexMap` so listings come back in the order offers were
/// posted. Removal uses `shift_remove` to keep that order intact.
#[derive(Debug, Default)]
pub struct Lobby {
    offers: IndexMap<GameId, Offer>,
}

impl Lobby {
    /// Creates an empty lobby.
    pub fn new() -> Self {
        Self::default()
    }

    /// Posts an offer and returns a copy of it.
    ///
    /// `game_id` must already be issued by the persistence backend. Posting
    /// an id that is already listed replaces the old offer, so there is
    /// never more than one live offer per id. `board_size` is stored as
    /// given.
    pub fn add_game(
        &mut self,
        creator: Identity,
        channel: ChannelId,
        game_id: GameId,
        board_size: usize,
    ) -> Offer {
        let offer = Offer::new(creator, channel, game_id, board_size);
        if self.offers.insert(game_id, offer.clone()).is_some() {
            tracing::debug!(%game_id, "offer replaced");
        }
        tracing::info!(
            %game_id,
            %channel,
            user = %offer.creator.id,
            board_size,
            "offer added"
        );
        offer
    }

    /// Removes an offer. Removing an id that isn't listed is a no-op.
    pub fn remove_game(&mut self, game_id: GameId) -> Option<Offer> {
        let removed = self.offers.shift_remove(&game_id);
        if removed.is_some() {
            tracing::info!(%game_id, "offer removed");
        }
        removed
    }

    /// Looks up an offer.
    pub fn get_game(&self, game_id: GameId) -> Option<&Offer> {
        self.offers.get(&game_id)
    }

    /// Returns `true` if an offer with this id is listed.
    pub fn exists_game(&self, game_id: GameId) -> bool {
        self.offers.contains_key(&game_id)
    }

    /// Snapshot of every listed offer, oldest first.
    pub fn get_games(&self) -> Vec<Offer> {
        self.offers.values().cloned().collect()
    }

    /// Drops every offer posted by `channel` and returns what is left.
    ///
    /// Called when a connection logs out or disconnects so its offers don't
    /// linger with nobody behind them.
    pub fn leave_lobby(&mut self, channel: ChannelId) -> Vec<Offer> {
        let before = self.offers.len();
        self.offers
            .retain(|_, offer| offer.creator_channel != channel);
        let dropped = before - self.offers.len();
        if dropped > 0 {
            tracing::info!(%channel, dropped, "offers withdrawn on leave");
        }
        self.get_games()
    }

    /// Number of listed offers.
    pub fn len(&self) -> usize {
        self.offers.len()
    }

    /// Returns `true` if no offers are listed.
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }
}
