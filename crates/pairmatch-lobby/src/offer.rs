//! The open-offer record.

use std::time::{SystemTime, UNIX_EPOCH};

use pairmatch_protocol::{ChannelId, GameId, Identity, Pairing};
use serde::{Deserialize, Serialize};

/// A game advertised in the lobby, waiting for a second player.
///
/// The creator is serialized as `player1`/`player1ChannelId` because that is
/// the seat they take once the offer is joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    /// Game record id issued by the persistence backend.
    pub id: GameId,
    /// When the offer was posted (ms since UNIX epoch).
    pub created_at: u64,
    /// Number of cards on the board.
    pub board_size: usize,
    /// The user who posted the offer.
    #[serde(rename = "player1")]
    pub creator: Identity,
    /// The connection that posted it.
    #[serde(rename = "player1ChannelId")]
    pub creator_channel: ChannelId,
}

impl Offer {
    /// Builds a new offer stamped with the current time.
    pub fn new(
        creator: Identity,
        creator_channel: ChannelId,
        id: GameId,
        board_size: usize,
    ) -> Self {
        Self {
            id,
            created_at: now_millis(),
            board_size,
            creator,
            creator_channel,
        }
    }

    /// Seats `joiner` as player 2 and turns the offer into a [`Pairing`].
    pub fn into_pairing(self, joiner: Identity, joiner_channel: ChannelId) -> Pairing {
        Pairing {
            id: self.id,
            board_size: self.board_size,
            created_at: self.created_at,
            player1: self.creator,
            player2: joiner,
            player1_channel: self.creator_channel,
            player2_channel: joiner_channel,
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offer_new_is_timestamped() {
        let offer = Offer::new(Identity::new(1, "ana"), ChannelId(4), GameId(10), 12);
        assert!(offer.created_at > 0);
        assert_eq!(offer.board_size, 12);
    }

    #[test]
    fn test_offer_json_uses_player1_names() {
        let offer = Offer::new(Identity::new(1, "ana"), ChannelId(4), GameId(10), 12);
        let json = serde_json::to_value(&offer).unwrap();
        assert_eq!(json["id"], 10);
        assert_eq!(json["boardSize"], 12);
        assert_eq!(json["player1"]["name"], "ana");
        assert_eq!(json["player1ChannelId"], 4);
        assert!(json["createdAt"].is_u64());
    }

    #[test]
    fn test_into_pairing_seats_joiner_as_player2() {
        let offer = Offer::new(Identity::new(1, "ana"), ChannelId(4), GameId(10), 12);
        let created_at = offer.created_at;

        let pairing = offer.into_pairing(Identity::new(2, "rui"), ChannelId(5));

        assert_eq!(pairing.id, GameId(10));
        assert_eq!(pairing.board_size, 12);
        assert_eq!(pairing.created_at, created_at);
        assert_eq!(pairing.player1.name, "ana");
        assert_eq!(pairing.player2.name, "rui");
        assert_eq!(pairing.player1_channel, ChannelId(4));
        assert_eq!(pairing.player2_channel, ChannelId(5));
    }
}
