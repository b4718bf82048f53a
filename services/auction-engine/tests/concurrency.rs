//! Racing bidders against one engine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use auction_engine::{AuctionEngine, AuctionEvent, EngineConfig};
use auction_types::ids::TeamName;
use auction_types::numeric::Amount;
use auction_types::player::PlayerIntake;
use auction_types::state::AuctionStatus;
use auction_types::team::TeamIntake;
use persistence::{MemoryStore, StateStore};

fn running_engine(teams: usize) -> Arc<AuctionEngine> {
    let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
    let engine = AuctionEngine::open(store, EngineConfig::default()).unwrap();
    engine
        .register_player(PlayerIntake {
            name: "Contested".to_string(),
            role: "Bowler".to_string(),
            base_price: Some(Amount::from_u64(100)),
            image_ref: None,
        })
        .unwrap();
    for i in 0..teams {
        engine
            .register_team(TeamIntake {
                team_name: format!("T{}", i),
                purse: Some(Amount::from_u64(1_000_000)),
            })
            .unwrap();
    }
    engine.start_auction().unwrap();
    Arc::new(engine)
}

#[test]
fn test_equal_racing_bids_accept_exactly_one() {
    let engine = running_engine(2);
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = (0..2)
        .map(|i| {
            let engine = Arc::clone(&engine);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let team = TeamName::new(format!("T{}", i)).unwrap();
                barrier.wait();
                engine.place_bid(&team, Amount::from_u64(500)).is_ok()
            })
        })
        .collect();

    let accepted = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(accepted, 1);
    assert_eq!(engine.snapshot().state.highest_bid, Amount::from_u64(500));
}

#[test]
fn test_racing_bids_settle_on_the_maximum() {
    let teams = 8;
    let engine = running_engine(teams);
    let barrier = Arc::new(Barrier::new(teams));

    let handles: Vec<_> = (0..teams)
        .map(|i| {
            let engine = Arc::clone(&engine);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let team = TeamName::new(format!("T{}", i)).unwrap();
                barrier.wait();
                let mut accepted = Vec::new();
                for step in 0..50u64 {
                    let amount = Amount::from_u64(200 + step * teams as u64 + i as u64);
                    if let Ok(AuctionEvent::BidAccepted { amount, .. }) = engine.place_bid(&team, amount) {
                        accepted.push(amount);
                    }
                }
                accepted
            })
        })
        .collect();

    let mut all: Vec<Amount> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    all.sort();

    let max_accepted = *all.last().unwrap();
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.state.highest_bid, max_accepted);
    // the highest possible amount can never be rejected as not higher
    assert_eq!(max_accepted, Amount::from_u64(200 + 49 * teams as u64 + (teams as u64 - 1)));
    // accepted amounts are distinct, one commit each
    let count = all.len();
    all.dedup();
    assert_eq!(all.len(), count);
    // setup committed one player, `teams` teams and the start
    assert_eq!(snapshot.version, (teams + 2 + count) as u64);
}

#[test]
fn test_concurrent_finalize_debits_once() {
    let engine = running_engine(1);
    let team = TeamName::new("T0").unwrap();
    engine.place_bid(&team, Amount::from_u64(700)).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || engine.finalize_sale().unwrap().len())
        })
        .collect();

    let sales: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(sales, 1);
    assert_eq!(engine.snapshot().teams[0].purse, Amount::from_u64(1_000_000 - 700));
}

#[test]
fn test_readers_see_consistent_snapshots_during_writes() {
    let engine = running_engine(4);
    for i in 0..3 {
        engine
            .register_player(PlayerIntake {
                name: format!("Queued{}", i),
                role: "Batter".to_string(),
                base_price: None,
                image_ref: None,
            })
            .unwrap();
    }
    let stop = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let mut last_version = 0;
                let mut reads = 0usize;
                loop {
                    let snapshot = engine.snapshot();
                    assert!(snapshot.version >= last_version);
                    last_version = snapshot.version;
                    assert_eq!(
                        snapshot.current_player.as_ref().map(|p| p.id),
                        snapshot.state.current_player_id
                    );
                    if let Some(bidder) = &snapshot.state.highest_bidder {
                        assert!(snapshot.teams.iter().any(|t| &t.team_name == bidder));
                        assert!(snapshot.current_player.is_some());
                    }
                    if snapshot.state.status == AuctionStatus::Finished {
                        assert!(snapshot.state.current_player_id.is_none());
                    }
                    reads += 1;
                    if stop.load(Ordering::Acquire) {
                        break;
                    }
                }
                reads
            })
        })
        .collect();

    let writer = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for round in 0..60u64 {
                for i in 0..4u64 {
                    let team = TeamName::new(format!("T{}", i)).unwrap();
                    let _ = engine.place_bid(&team, Amount::from_u64(200 + round * 10 + i));
                }
                match round % 4 {
                    0 => {
                        engine.finalize_sale().unwrap();
                        engine.advance_to_next_player().unwrap();
                    }
                    1 => {
                        engine.pass_current_player().unwrap();
                    }
                    2 => {
                        engine.start_round_two().unwrap();
                    }
                    _ => {
                        engine.reset_auction().unwrap();
                        engine.start_auction().unwrap();
                    }
                }
            }
        })
    };

    writer.join().unwrap();
    stop.store(true, Ordering::Release);
    let reads: usize = readers.into_iter().map(|h| h.join().unwrap()).sum();
    assert!(reads >= 4);

    let snapshot = engine.snapshot();
    assert_eq!(
        snapshot.current_player.as_ref().map(|p| p.id),
        snapshot.state.current_player_id
    );
}
