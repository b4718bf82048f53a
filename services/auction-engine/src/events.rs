//! Events emitted by engine operations
//!
//! Each operation returns the transitions it actually performed. An empty
//! list means the command was a no-op in the current state.

use auction_types::ids::{PlayerId, TeamName};
use auction_types::numeric::Amount;
use auction_types::player::Round;
use auction_types::state::AuctionStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuctionEvent {
    /// First player of the queue opened
    AuctionStarted { player_id: PlayerId },

    /// Round two opened explicitly
    RoundTwoStarted { player_id: PlayerId },

    /// A player became current; bidding restarts at its base price
    PlayerLoaded {
        player_id: PlayerId,
        base_price: Amount,
        status: AuctionStatus,
    },

    /// The current player was passed without a sale
    PlayerPassed { player_id: PlayerId, round: Round },

    /// No unsold player is left to load
    AuctionFinished,

    BidAccepted {
        player_id: PlayerId,
        team: TeamName,
        amount: Amount,
    },

    SaleFinalized {
        player_id: PlayerId,
        team: TeamName,
        price: Amount,
        remaining_purse: Amount,
    },

    AuctionReset { players: usize, teams: usize },
}
