//! The singleton auction state
//!
//! Status machine:
//! ```text
//! not_started --start--> in_progress --advance/pass--> in_progress | round2
//!      ^                      |                               |
//!      |                      +-----advance (queue empty)-----+--> finished
//!      +------------------------ reset (from any state) ------------+
//! in_progress | finished --start round two--> round2
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::AuctionError;
use crate::ids::{PlayerId, TeamName};
use crate::numeric::Amount;
use crate::player::{Player, Round};
use crate::team::Team;

/// Auction lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuctionStatus {
    #[default]
    NotStarted,
    InProgress,
    #[serde(rename = "round2")]
    Round2,
    Finished,
}

impl AuctionStatus {
    /// Status entered when a player of the given round is loaded
    pub fn for_round(round: Round) -> Self {
        match round {
            Round::One => AuctionStatus::InProgress,
            Round::Two => AuctionStatus::Round2,
        }
    }

    /// Bids are only taken while a round is running
    pub fn is_active(&self) -> bool {
        matches!(self, AuctionStatus::InProgress | AuctionStatus::Round2)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuctionStatus::NotStarted => "not_started",
            AuctionStatus::InProgress => "in_progress",
            AuctionStatus::Round2 => "round2",
            AuctionStatus::Finished => "finished",
        }
    }
}

impl fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current item, highest bid and lifecycle status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionState {
    #[serde(default)]
    pub current_player_id: Option<PlayerId>,
    #[serde(default)]
    pub highest_bid: Amount,
    #[serde(default)]
    pub highest_bidder: Option<TeamName>,
    #[serde(default)]
    pub status: AuctionStatus,
}

impl AuctionState {
    /// State before the first `start`
    pub fn initial() -> Self {
        Self::default()
    }

    /// Open bidding on `player`, starting at its base price
    pub fn load(&mut self, player: &Player, status: AuctionStatus) {
        self.current_player_id = Some(player.id);
        self.highest_bid = player.base_price;
        self.highest_bidder = None;
        self.status = status;
    }

    /// Terminal transition once the queue is exhausted
    pub fn finish(&mut self) {
        self.current_player_id = None;
        self.highest_bid = Amount::ZERO;
        self.highest_bidder = None;
        self.status = AuctionStatus::Finished;
    }

    /// Drop the standing bid after a sale
    pub fn clear_bid(&mut self) {
        self.highest_bid = Amount::ZERO;
        self.highest_bidder = None;
    }

    pub fn record_bid(&mut self, team: TeamName, amount: Amount) {
        self.highest_bid = amount;
        self.highest_bidder = Some(team);
    }

    /// Check the cross-record invariants against the full player and team sets.
    pub fn check_invariants(&self, players: &[Player], teams: &[Team]) -> Result<(), AuctionError> {
        match self.current_player_id {
            Some(id) => {
                if !players.iter().any(|p| p.id == id) {
                    return Err(AuctionError::Invariant(format!(
                        "current player {} does not exist",
                        id
                    )));
                }
                if self.status == AuctionStatus::Finished {
                    return Err(AuctionError::Invariant(
                        "finished auction still has a current player".to_string(),
                    ));
                }
            }
            None => {
                if !self.highest_bid.is_zero() || self.highest_bidder.is_some() {
                    return Err(AuctionError::Invariant(
                        "standing bid without a current player".to_string(),
                    ));
                }
            }
        }

        if let Some(bidder) = &self.highest_bidder {
            if !teams.iter().any(|t| &t.team_name == bidder) {
                return Err(AuctionError::Invariant(format!(
                    "highest bidder {} is not a registered team",
                    bidder
                )));
            }
        }

        Ok(())
    }
}
