//! Auction engine core
//!
//! Single owner of the ledger. Every operation follows the same commit path:
//!
//! 1. enter the critical section
//! 2. run the transition on a draft copy of the ledger
//! 3. persist each key the draft changed (compensating on partial failure)
//! 4. commit the draft and publish a new snapshot
//!
//! Operations are therefore totally ordered by entry into the section, and
//! a rejected or failed operation leaves no trace in memory or in the store.

use auction_types::errors::AuctionError;
use auction_types::ids::TeamName;
use auction_types::numeric::Amount;
use auction_types::player::{Player, PlayerIntake};
use auction_types::state::AuctionState;
use auction_types::team::{Team, TeamIntake};
use parking_lot::Mutex;
use persistence::{load, StateStore, StoreError, StoreKey};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

use crate::arbitrator;
use crate::config::EngineConfig;
use crate::events::AuctionEvent;
use crate::ledger::{Ledger, LEDGER_KEYS};
use crate::snapshot::{AuctionSnapshot, SnapshotPublisher};

pub struct AuctionEngine {
    ledger: Mutex<Ledger>,
    store: Arc<dyn StateStore>,
    config: EngineConfig,
    publisher: SnapshotPublisher,
}

impl AuctionEngine {
    /// Load the persisted ledger and start serving it.
    ///
    /// Refuses to open over a state that violates the cross-record invariants.
    pub fn open(store: Arc<dyn StateStore>, config: EngineConfig) -> Result<Self, AuctionError> {
        let ledger = Ledger {
            players: load::<Vec<Player>>(store.as_ref(), StoreKey::Players).map_err(persistence_error)?,
            teams: load::<Vec<Team>>(store.as_ref(), StoreKey::Teams).map_err(persistence_error)?,
            state: load::<AuctionState>(store.as_ref(), StoreKey::AuctionState).map_err(persistence_error)?,
        };
        ledger.check_invariants()?;

        info!(
            players = ledger.players.len(),
            teams = ledger.teams.len(),
            status = %ledger.state.status,
            "Auction engine opened"
        );

        let publisher = SnapshotPublisher::new(
            AuctionSnapshot::capture(0, &ledger),
            config.snapshot_channel_capacity,
        );

        Ok(Self {
            ledger: Mutex::new(ledger),
            store,
            config,
            publisher,
        })
    }

    // ── Auctioneer operations ───────────────────────────────────────

    pub fn start_auction(&self) -> Result<Vec<AuctionEvent>, AuctionError> {
        self.commit("start_auction", |ledger| Ok(ledger.start()))
    }

    pub fn advance_to_next_player(&self) -> Result<Vec<AuctionEvent>, AuctionError> {
        self.commit("advance_to_next_player", |ledger| Ok(ledger.advance()))
    }

    pub fn pass_current_player(&self) -> Result<Vec<AuctionEvent>, AuctionError> {
        self.commit("pass_current_player", |ledger| Ok(ledger.pass()))
    }

    pub fn finalize_sale(&self) -> Result<Vec<AuctionEvent>, AuctionError> {
        self.commit("finalize_sale", |ledger| ledger.finalize())
    }

    pub fn start_round_two(&self) -> Result<Vec<AuctionEvent>, AuctionError> {
        self.commit("start_round_two", |ledger| Ok(ledger.start_round_two()))
    }

    pub fn reset_auction(&self) -> Result<Vec<AuctionEvent>, AuctionError> {
        let starting_purse = self.config.starting_purse;
        self.commit("reset_auction", |ledger| Ok(ledger.reset(starting_purse)))
    }

    // ── Bidding ─────────────────────────────────────────────────────

    /// Arbitrate one bid against the live state.
    pub fn place_bid(&self, team: &TeamName, amount: Amount) -> Result<AuctionEvent, AuctionError> {
        let result = self.commit("place_bid", |ledger| arbitrator::apply(ledger, team, amount));
        if let Err(err) = &result {
            if err.is_rejection() {
                debug!(team = %team, amount = %amount, reason = %err, "Bid rejected");
            }
        }
        result
    }

    // ── Intake ──────────────────────────────────────────────────────

    pub fn register_player(&self, intake: PlayerIntake) -> Result<Player, AuctionError> {
        let default_base_price = self.config.default_base_price;
        self.commit("register_player", |ledger| {
            ledger.register_player(intake, default_base_price)
        })
    }

    pub fn register_team(&self, intake: TeamIntake) -> Result<Team, AuctionError> {
        let starting_purse = self.config.starting_purse;
        self.commit("register_team", |ledger| ledger.register_team(intake, starting_purse))
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// Latest committed view; never blocks on a running operation.
    pub fn snapshot(&self) -> Arc<AuctionSnapshot> {
        self.publisher.latest()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<AuctionSnapshot>> {
        self.publisher.subscribe()
    }

    // ── Commit path ─────────────────────────────────────────────────

    fn commit<R, F>(&self, op: &'static str, transition: F) -> Result<R, AuctionError>
    where
        F: FnOnce(&mut Ledger) -> Result<R, AuctionError>,
    {
        let mut ledger = self.ledger.lock();
        let mut draft = ledger.clone();

        let output = transition(&mut draft)?;
        if draft == *ledger {
            debug!(op, "No state change");
            return Ok(output);
        }
        draft.check_invariants()?;

        self.persist(op, &ledger, &draft)?;
        *ledger = draft;

        let snapshot = self.publisher.publish(&ledger);
        info!(
            op,
            version = snapshot.version,
            status = %ledger.state.status,
            current_player = ?ledger.state.current_player_id,
            highest_bid = %ledger.state.highest_bid,
            "Auction state committed"
        );
        Ok(output)
    }

    /// Write every key `after` changed. On failure, restore the keys already
    /// written to their `before` values and report the original error.
    fn persist(&self, op: &'static str, before: &Ledger, after: &Ledger) -> Result<(), AuctionError> {
        let mut written: Vec<StoreKey> = Vec::with_capacity(LEDGER_KEYS.len());

        for key in LEDGER_KEYS {
            if !before.differs(after, key) {
                continue;
            }
            if let Err(err) = after.save_key(self.store.as_ref(), key) {
                error!(op, key = %key, error = %err, "State write failed; rolling back");
                for done in written.iter().rev() {
                    if let Err(rollback_err) = before.save_key(self.store.as_ref(), *done) {
                        error!(op, key = %done, error = %rollback_err, "Rollback write failed");
                    }
                }
                return Err(persistence_error(err));
            }
            written.push(key);
        }

        Ok(())
    }
}

fn persistence_error(err: StoreError) -> AuctionError {
    AuctionError::Persistence(err.to_string())
}
