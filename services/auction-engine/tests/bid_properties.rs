use std::sync::Arc;

use auction_engine::{AuctionEngine, AuctionEvent, EngineConfig};
use auction_types::ids::TeamName;
use auction_types::numeric::Amount;
use auction_types::player::PlayerIntake;
use auction_types::team::TeamIntake;
use persistence::{MemoryStore, StateStore};
use proptest::prelude::*;

const TEAMS: [(&str, u64); 3] = [("A", 5_000), ("B", 1_500), ("C", 300)];

fn running_engine() -> AuctionEngine {
    let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
    let engine = AuctionEngine::open(store, EngineConfig::default()).unwrap();
    engine
        .register_player(PlayerIntake {
            name: "P".to_string(),
            role: "Keeper".to_string(),
            base_price: Some(Amount::from_u64(100)),
            image_ref: None,
        })
        .unwrap();
    for (name, purse) in TEAMS {
        engine
            .register_team(TeamIntake {
                team_name: name.to_string(),
                purse: Some(Amount::from_u64(purse)),
            })
            .unwrap();
    }
    engine.start_auction().unwrap();
    engine
}

proptest! {
    #[test]
    fn accepted_bids_strictly_increase_and_are_affordable(
        bids in prop::collection::vec((0usize..3, 0u64..6_000), 1..60)
    ) {
        let engine = running_engine();
        let mut last = Amount::from_u64(100);

        for (team_idx, raw) in bids {
            let (name, purse) = TEAMS[team_idx];
            let team = TeamName::new(name).unwrap();
            let amount = Amount::from_u64(raw);

            match engine.place_bid(&team, amount) {
                Ok(AuctionEvent::BidAccepted { amount: accepted, .. }) => {
                    prop_assert!(accepted > last);
                    prop_assert!(accepted.as_u64() <= purse);
                    last = accepted;
                }
                Ok(other) => prop_assert!(false, "unexpected event {:?}", other),
                Err(_) => {
                    prop_assert!(raw == 0 || raw > purse || amount <= last);
                }
            }
            prop_assert_eq!(engine.snapshot().state.highest_bid, last);
        }
    }

    #[test]
    fn finalize_never_overdraws(
        bids in prop::collection::vec((0usize..3, 1u64..6_000), 1..30)
    ) {
        let engine = running_engine();
        for (team_idx, raw) in bids {
            let team = TeamName::new(TEAMS[team_idx].0).unwrap();
            let _ = engine.place_bid(&team, Amount::from_u64(raw));
        }
        engine.finalize_sale().unwrap();

        let snapshot = engine.snapshot();
        for (team, (_, purse)) in snapshot.teams.iter().zip(TEAMS) {
            let spent: u64 = snapshot
                .players
                .iter()
                .filter(|p| p.sold_to.as_ref() == Some(&team.team_name))
                .map(|p| p.final_price.as_u64())
                .sum();
            prop_assert_eq!(team.purse.as_u64() + spent, purse);
        }
    }
}
