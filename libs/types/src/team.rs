//! Bidding teams

use serde::{Deserialize, Serialize};

use crate::errors::AuctionError;
use crate::ids::TeamName;
use crate::numeric::Amount;

/// A team and its remaining spendable budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub team_name: TeamName,
    pub purse: Amount,
}

impl Team {
    pub fn new(team_name: TeamName, purse: Amount) -> Self {
        Self { team_name, purse }
    }

    pub fn can_afford(&self, amount: Amount) -> bool {
        self.purse >= amount
    }

    /// Debit a finalized sale from the purse.
    ///
    /// Fails rather than letting the purse drop below zero.
    pub fn debit(&mut self, amount: Amount) -> Result<(), AuctionError> {
        self.purse = self.purse.checked_sub(amount).ok_or_else(|| {
            AuctionError::Invariant(format!(
                "purse of {} ({}) cannot cover {}",
                self.team_name, self.purse, amount
            ))
        })?;
        Ok(())
    }
}

/// Admin intake form for a new team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamIntake {
    pub team_name: String,
    #[serde(default)]
    pub purse: Option<Amount>,
}
