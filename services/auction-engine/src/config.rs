//! Engine configuration

use auction_types::numeric::Amount;

/// Purse given to teams registered without one, and restored on reset
pub const DEFAULT_STARTING_PURSE: u64 = 10_000;

/// Base price given to players registered without one
pub const DEFAULT_BASE_PRICE: u64 = 100;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub starting_purse: Amount,
    pub default_base_price: Amount,
    /// Snapshots buffered per streaming subscriber before it starts skipping
    pub snapshot_channel_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            starting_purse: Amount::from_u64(DEFAULT_STARTING_PURSE),
            default_base_price: Amount::from_u64(DEFAULT_BASE_PRICE),
            snapshot_channel_capacity: 64,
        }
    }
}
