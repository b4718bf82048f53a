//! Snapshot publisher
//!
//! After each committed mutation the engine captures an immutable
//! `AuctionSnapshot` and swaps it in behind an `RwLock<Arc<_>>`. Readers
//! only clone the `Arc`, so they never wait on the engine's critical section
//! or on each other beyond the pointer copy, and never see a torn state.
//! The same `Arc` is fanned out to streaming subscribers.

use auction_types::player::Player;
use auction_types::state::AuctionState;
use auction_types::team::Team;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::ledger::Ledger;

/// Point-in-time view of the whole auction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionSnapshot {
    /// Incremented once per committed mutation
    pub version: u64,
    /// Resolved record of `state.current_player_id`
    pub current_player: Option<Player>,
    pub state: AuctionState,
    pub players: Vec<Player>,
    pub teams: Vec<Team>,
}

impl AuctionSnapshot {
    pub(crate) fn capture(version: u64, ledger: &Ledger) -> Self {
        Self {
            version,
            current_player: ledger.current_player().cloned(),
            state: ledger.state.clone(),
            players: ledger.players.clone(),
            teams: ledger.teams.clone(),
        }
    }
}

pub struct SnapshotPublisher {
    current: RwLock<Arc<AuctionSnapshot>>,
    tx: broadcast::Sender<Arc<AuctionSnapshot>>,
}

impl SnapshotPublisher {
    pub(crate) fn new(initial: AuctionSnapshot, capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            current: RwLock::new(Arc::new(initial)),
            tx,
        }
    }

    /// Latest published snapshot
    pub fn latest(&self) -> Arc<AuctionSnapshot> {
        Arc::clone(&self.current.read())
    }

    /// Receive every snapshot published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<AuctionSnapshot>> {
        self.tx.subscribe()
    }

    /// Capture and publish the ledger as the next version.
    ///
    /// Must be called with the engine's critical section held so versions
    /// are assigned in commit order.
    pub(crate) fn publish(&self, ledger: &Ledger) -> Arc<AuctionSnapshot> {
        let version = self.current.read().version + 1;
        let snapshot = Arc::new(AuctionSnapshot::capture(version, ledger));
        *self.current.write() = Arc::clone(&snapshot);

        // No subscribers is fine; pollers read `latest`.
        let _ = self.tx.send(Arc::clone(&snapshot));
        snapshot
    }
}
