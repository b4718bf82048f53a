//! Bid acceptance rule
//!
//! A bid is accepted iff the auction is running, the current player is
//! still for sale, the team is known, its purse covers the amount, and the
//! amount is strictly above the standing bid. Checks run in that order and
//! the first failure is the reported reason. Evaluation never mutates.

use auction_types::errors::{AuctionError, RuleViolation, ValidationError};
use auction_types::ids::TeamName;
use auction_types::numeric::Amount;

use crate::events::AuctionEvent;
use crate::ledger::Ledger;

/// Decide whether `team` may bid `amount` against the ledger as it stands.
pub(crate) fn evaluate(ledger: &Ledger, team: &TeamName, amount: Amount) -> Result<(), AuctionError> {
    if amount.is_zero() {
        return Err(ValidationError::NonPositiveAmount.into());
    }

    let state = &ledger.state;
    if !state.status.is_active() {
        return Err(RuleViolation::NoActiveAuction { status: state.status }.into());
    }

    let player = ledger.current_player().ok_or(RuleViolation::NoCurrentPlayer)?;
    if player.sold {
        return Err(RuleViolation::PlayerAlreadySold { player: player.id }.into());
    }

    let bidder = ledger.team(team).ok_or_else(|| ValidationError::UnknownTeam {
        team: team.to_string(),
    })?;
    if !bidder.can_afford(amount) {
        return Err(RuleViolation::InsufficientPurse {
            required: amount,
            available: bidder.purse,
        }
        .into());
    }

    if amount <= state.highest_bid {
        return Err(RuleViolation::BidNotHigher {
            amount,
            highest: state.highest_bid,
        }
        .into());
    }

    Ok(())
}

/// Evaluate and, if accepted, record the bid as the new highest.
pub(crate) fn apply(ledger: &mut Ledger, team: &TeamName, amount: Amount) -> Result<AuctionEvent, AuctionError> {
    evaluate(ledger, team, amount)?;

    let player_id = ledger
        .state
        .current_player_id
        .ok_or(RuleViolation::NoCurrentPlayer)?;
    ledger.state.record_bid(team.clone(), amount);

    Ok(AuctionEvent::BidAccepted {
        player_id,
        team: team.clone(),
        amount,
    })
}
