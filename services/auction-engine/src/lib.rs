//! Auction Engine Service
//!
//! Owns the authoritative auction state: the player queue, team purses and
//! the singleton `AuctionState`. Every mutating operation runs inside one
//! critical section, is persisted before it is acknowledged, and is then
//! published as an immutable snapshot.
//!
//! **Key Invariants:**
//! - At most one accepted highest bid per player at any time
//! - Accepted bids are strictly increasing and always affordable
//! - A sale debits the winning purse exactly once
//! - A failed durable write leaves memory and store as they were

pub mod config;
pub mod engine;
pub mod events;
pub mod snapshot;

mod arbitrator;
mod ledger;

pub use config::EngineConfig;
pub use engine::AuctionEngine;
pub use events::AuctionEvent;
pub use snapshot::{AuctionSnapshot, SnapshotPublisher};
