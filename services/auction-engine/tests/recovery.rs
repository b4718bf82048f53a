//! Restarting the engine over the same data directory.

use std::sync::Arc;

use auction_engine::{AuctionEngine, EngineConfig};
use auction_types::errors::AuctionError;
use auction_types::ids::TeamName;
use auction_types::numeric::Amount;
use auction_types::player::PlayerIntake;
use auction_types::state::AuctionStatus;
use auction_types::team::TeamIntake;
use persistence::{JsonFileStore, StateStore};
use tempfile::TempDir;

fn open(dir: &TempDir) -> AuctionEngine {
    let store: Arc<dyn StateStore> = Arc::new(JsonFileStore::open(dir.path()).unwrap());
    AuctionEngine::open(store, EngineConfig::default()).unwrap()
}

fn seed(engine: &AuctionEngine) -> TeamName {
    for name in ["P1", "P2", "P3"] {
        engine
            .register_player(PlayerIntake {
                name: name.to_string(),
                role: "Batter".to_string(),
                base_price: None,
                image_ref: Some(format!("{}.png", name.to_lowercase())),
            })
            .unwrap();
    }
    engine
        .register_team(TeamIntake {
            team_name: "Hawks".to_string(),
            purse: Some(Amount::from_u64(5_000)),
        })
        .unwrap()
        .team_name
}

#[test]
fn test_fresh_directory_opens_empty() {
    let dir = TempDir::new().unwrap();
    let engine = open(&dir);
    let snapshot = engine.snapshot();
    assert!(snapshot.players.is_empty());
    assert!(snapshot.teams.is_empty());
    assert_eq!(snapshot.state.status, AuctionStatus::NotStarted);
}

#[test]
fn test_restart_resumes_committed_state() {
    let dir = TempDir::new().unwrap();
    let before = {
        let engine = open(&dir);
        let hawks = seed(&engine);
        engine.start_auction().unwrap();
        engine.place_bid(&hawks, Amount::from_u64(750)).unwrap();
        engine.finalize_sale().unwrap();
        engine.advance_to_next_player().unwrap();
        engine.pass_current_player().unwrap();
        engine.place_bid(&hawks, Amount::from_u64(300)).unwrap();
        engine.snapshot()
    };

    let engine = open(&dir);
    let after = engine.snapshot();

    assert_eq!(after.players, before.players);
    assert_eq!(after.teams, before.teams);
    assert_eq!(after.state, before.state);
    assert_eq!(after.current_player, before.current_player);
    // versions restart with the process
    assert_eq!(after.version, 0);

    // the standing bid survived and can still be sold
    let hawks = TeamName::new("Hawks").unwrap();
    engine.finalize_sale().unwrap();
    let team = engine.snapshot().teams.iter().find(|t| t.team_name == hawks).cloned().unwrap();
    assert_eq!(team.purse, Amount::from_u64(5_000 - 750 - 300));
}

#[test]
fn test_registered_defaults_survive_restart() {
    let dir = TempDir::new().unwrap();
    {
        let engine = open(&dir);
        seed(&engine);
    }
    let snapshot = open(&dir).snapshot();
    assert_eq!(snapshot.players.len(), 3);
    assert!(snapshot.players.iter().all(|p| p.base_price == Amount::from_u64(100)));
    assert_eq!(snapshot.players[1].image_ref, "p2.png");
}

#[test]
fn test_open_refuses_corrupt_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("teams.json"), "{ not json").unwrap();

    let store: Arc<dyn StateStore> = Arc::new(JsonFileStore::open(dir.path()).unwrap());
    let err = AuctionEngine::open(store, EngineConfig::default()).err().unwrap();
    assert!(matches!(err, AuctionError::Persistence(_)));
}

#[test]
fn test_open_refuses_unknown_bidder() {
    let dir = TempDir::new().unwrap();
    {
        let engine = open(&dir);
        let hawks = seed(&engine);
        engine.start_auction().unwrap();
        engine.place_bid(&hawks, Amount::from_u64(400)).unwrap();
    }
    // the bidding team vanishes from disk between runs
    std::fs::write(dir.path().join("teams.json"), "[]").unwrap();

    let store: Arc<dyn StateStore> = Arc::new(JsonFileStore::open(dir.path()).unwrap());
    let err = AuctionEngine::open(store, EngineConfig::default()).err().unwrap();
    assert!(matches!(err, AuctionError::Invariant(_)));
}
