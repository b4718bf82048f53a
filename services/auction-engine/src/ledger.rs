//! The engine's owned record set and its pure state transitions
//!
//! Nothing here locks or persists; `AuctionEngine` runs these transitions
//! on a draft copy inside its critical section.

use auction_types::errors::{AuctionError, ValidationError};
use auction_types::ids::{PlayerId, TeamName};
use auction_types::numeric::Amount;
use auction_types::player::{Player, PlayerIntake, Round};
use auction_types::state::{AuctionState, AuctionStatus};
use auction_types::team::{Team, TeamIntake};
use persistence::{save, StateStore, StoreError, StoreKey};

use crate::events::AuctionEvent;

/// Keys the ledger persists, in write order
pub(crate) const LEDGER_KEYS: [StoreKey; 3] =
    [StoreKey::Players, StoreKey::Teams, StoreKey::AuctionState];

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Ledger {
    /// Queue order is intake order
    pub players: Vec<Player>,
    pub teams: Vec<Team>,
    pub state: AuctionState,
}

impl Ledger {
    // ── Lookups ─────────────────────────────────────────────────────

    pub fn current_player(&self) -> Option<&Player> {
        let id = self.state.current_player_id?;
        self.players.iter().find(|p| p.id == id)
    }

    pub fn team(&self, name: &TeamName) -> Option<&Team> {
        self.teams.iter().find(|t| &t.team_name == name)
    }

    fn team_mut(&mut self, name: &TeamName) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| &t.team_name == name)
    }

    /// Id the next registered player receives
    pub fn next_player_id(&self) -> Result<PlayerId, AuctionError> {
        match self.players.iter().map(|p| p.id).max() {
            None => Ok(PlayerId::FIRST),
            Some(max) => max.next().ok_or_else(|| {
                AuctionError::Invariant(format!("no player id left after {}", max))
            }),
        }
    }

    /// First unsold player in queue order, skipping `exclude`
    fn first_unsold_index(&self, exclude: Option<PlayerId>) -> Option<usize> {
        self.players
            .iter()
            .position(|p| p.is_unsold() && Some(p.id) != exclude)
    }

    fn first_unsold_in_round(&self, round: Round) -> Option<usize> {
        self.players
            .iter()
            .position(|p| p.is_unsold() && p.round == round)
    }

    // ── Persistence ─────────────────────────────────────────────────

    pub fn differs(&self, other: &Ledger, key: StoreKey) -> bool {
        match key {
            StoreKey::Players => self.players != other.players,
            StoreKey::Teams => self.teams != other.teams,
            StoreKey::AuctionState => self.state != other.state,
            StoreKey::Users => false,
        }
    }

    pub fn save_key(&self, store: &dyn StateStore, key: StoreKey) -> Result<(), StoreError> {
        match key {
            StoreKey::Players => save(store, key, &self.players),
            StoreKey::Teams => save(store, key, &self.teams),
            StoreKey::AuctionState => save(store, key, &self.state),
            StoreKey::Users => Ok(()),
        }
    }

    pub fn check_invariants(&self) -> Result<(), AuctionError> {
        self.state.check_invariants(&self.players, &self.teams)
    }

    // ── Transitions ─────────────────────────────────────────────────

    /// Open the first unsold player. No-op unless the auction has not started.
    pub fn start(&mut self) -> Vec<AuctionEvent> {
        if self.state.status != AuctionStatus::NotStarted {
            return Vec::new();
        }
        let Some(idx) = self.first_unsold_index(None) else {
            return Vec::new();
        };

        let player = &self.players[idx];
        self.state.load(player, AuctionStatus::InProgress);
        vec![
            AuctionEvent::AuctionStarted { player_id: player.id },
            loaded_event(player, AuctionStatus::InProgress),
        ]
    }

    /// Load the next unsold player of any round, or finish the auction.
    pub fn advance(&mut self) -> Vec<AuctionEvent> {
        match self.first_unsold_index(self.state.current_player_id) {
            Some(idx) => {
                let player = &self.players[idx];
                let status = AuctionStatus::for_round(player.round);
                self.state.load(player, status);
                vec![loaded_event(player, status)]
            }
            None => {
                self.state.finish();
                vec![AuctionEvent::AuctionFinished]
            }
        }
    }

    /// Defer the current round-one player to round two, then advance.
    pub fn pass(&mut self) -> Vec<AuctionEvent> {
        let mut events = Vec::new();
        if let Some(id) = self.state.current_player_id {
            if let Some(player) = self.players.iter_mut().find(|p| p.id == id) {
                if player.is_unsold() && player.defer_to_round_two() {
                    events.push(AuctionEvent::PlayerPassed {
                        player_id: player.id,
                        round: player.round,
                    });
                }
            }
        }
        events.extend(self.advance());
        events
    }

    /// Turn the standing bid into a sale. No-op without a current player and bidder.
    pub fn finalize(&mut self) -> Result<Vec<AuctionEvent>, AuctionError> {
        let (Some(player_id), Some(team_name)) =
            (self.state.current_player_id, self.state.highest_bidder.clone())
        else {
            return Ok(Vec::new());
        };
        let price = self.state.highest_bid;

        let team = self.team_mut(&team_name).ok_or_else(|| {
            AuctionError::Invariant(format!("highest bidder {} is not a registered team", team_name))
        })?;
        team.debit(price)?;
        let remaining_purse = team.purse;

        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or_else(|| AuctionError::Invariant(format!("current player {} does not exist", player_id)))?;
        player.mark_sold(team_name.clone(), price);

        self.state.clear_bid();
        Ok(vec![AuctionEvent::SaleFinalized {
            player_id,
            team: team_name,
            price,
            remaining_purse,
        }])
    }

    /// Load the first unsold round-two player. No-op if there is none.
    pub fn start_round_two(&mut self) -> Vec<AuctionEvent> {
        let Some(idx) = self.first_unsold_in_round(Round::Two) else {
            return Vec::new();
        };
        let player = &self.players[idx];
        self.state.load(player, AuctionStatus::Round2);
        vec![
            AuctionEvent::RoundTwoStarted { player_id: player.id },
            loaded_event(player, AuctionStatus::Round2),
        ]
    }

    /// Unsell everything, refill every purse, and return to `not_started`.
    pub fn reset(&mut self, starting_purse: Amount) -> Vec<AuctionEvent> {
        for player in &mut self.players {
            player.reset();
        }
        for team in &mut self.teams {
            team.purse = starting_purse;
        }
        self.state = AuctionState::initial();
        vec![AuctionEvent::AuctionReset {
            players: self.players.len(),
            teams: self.teams.len(),
        }]
    }

    // ── Intake ──────────────────────────────────────────────────────

    pub fn register_player(
        &mut self,
        intake: PlayerIntake,
        default_base_price: Amount,
    ) -> Result<Player, AuctionError> {
        let player = Player::register(self.next_player_id()?, intake, default_base_price)?;
        self.players.push(player.clone());
        Ok(player)
    }

    pub fn register_team(
        &mut self,
        intake: TeamIntake,
        starting_purse: Amount,
    ) -> Result<Team, AuctionError> {
        let name = TeamName::new(&intake.team_name)?;
        if self.team(&name).is_some() {
            return Err(ValidationError::DuplicateTeam {
                team: name.to_string(),
            }
            .into());
        }
        let team = Team::new(name, intake.purse.unwrap_or(starting_purse));
        self.teams.push(team.clone());
        Ok(team)
    }
}

fn loaded_event(player: &Player, status: AuctionStatus) -> AuctionEvent {
    AuctionEvent::PlayerLoaded {
        player_id: player.id,
        base_price: player.base_price,
        status,
    }
}
