//! Error types for the auction
//!
//! Comprehensive error taxonomy using thiserror. Validation and rule
//! failures are rejections, not faults: they carry a reason for the caller
//! and never leave state half-applied.

use thiserror::Error;

use crate::ids::PlayerId;
use crate::numeric::Amount;
use crate::state::AuctionStatus;

/// Top-level auction error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuctionError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Rule(#[from] RuleViolation),

    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("State invariant violated: {0}")]
    Invariant(String),
}

impl AuctionError {
    /// Stable reason category reported to clients
    pub fn category(&self) -> &'static str {
        match self {
            AuctionError::Validation(_) => "VALIDATION_ERROR",
            AuctionError::Rule(_) => "RULE_VIOLATION",
            AuctionError::Persistence(_) => "PERSISTENCE_ERROR",
            AuctionError::Invariant(_) => "INVARIANT_VIOLATION",
        }
    }

    /// Whether the error is a rejection of the request rather than a system fault
    pub fn is_rejection(&self) -> bool {
        matches!(self, AuctionError::Validation(_) | AuctionError::Rule(_))
    }
}

/// Malformed or missing input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing team")]
    MissingTeam,

    #[error("Unknown team: {team}")]
    UnknownTeam { team: String },

    #[error("Missing bid amount")]
    MissingAmount,

    #[error("Invalid bid amount: {0}")]
    MalformedAmount(String),

    #[error("Bid amount must be positive")]
    NonPositiveAmount,

    #[error("Field must not be empty: {field}")]
    EmptyField { field: &'static str },

    #[error("Team already registered: {team}")]
    DuplicateTeam { team: String },

    #[error("User already exists: {username}")]
    DuplicateUser { username: String },

    #[error("Invalid round: {0} (expected 1 or 2)")]
    InvalidRound(u64),

    #[error("Invalid role: {0}")]
    InvalidRole(String),
}

/// A well-formed request that the auction rules refuse
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("No active auction (status: {status})")]
    NoActiveAuction { status: AuctionStatus },

    #[error("No active player")]
    NoCurrentPlayer,

    #[error("Player {player} is already sold")]
    PlayerAlreadySold { player: PlayerId },

    #[error("Insufficient purse: required {required}, available {available}")]
    InsufficientPurse { required: Amount, available: Amount },

    #[error("Bid {amount} must be higher than current highest bid {highest}")]
    BidNotHigher { amount: Amount, highest: Amount },
}
