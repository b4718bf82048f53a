//! Auction items ("players") and their intake form

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::ValidationError;
use crate::ids::{PlayerId, TeamName};
use crate::numeric::Amount;

/// Image shown when intake supplies none
pub const DEFAULT_IMAGE_REF: &str = "default.png";

/// Bidding round a player belongs to
///
/// Serialized as the integers `1` and `2`; anything else is rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub enum Round {
    #[default]
    One,
    Two,
}

impl TryFrom<u64> for Round {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Round::One),
            2 => Ok(Round::Two),
            other => Err(ValidationError::InvalidRound(other)),
        }
    }
}

impl From<Round> for u64 {
    fn from(round: Round) -> Self {
        match round {
            Round::One => 1,
            Round::Two => 2,
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u64::from(*self))
    }
}

/// Admin intake form for a new player
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerIntake {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub base_price: Option<Amount>,
    #[serde(default, alias = "image")]
    pub image_ref: Option<String>,
}

/// An item put up for auction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: String,
    pub base_price: Amount,
    #[serde(rename = "image", default = "default_image_ref")]
    pub image_ref: String,
    #[serde(default)]
    pub sold: bool,
    #[serde(default)]
    pub sold_to: Option<TeamName>,
    #[serde(default)]
    pub round: Round,
    #[serde(default)]
    pub final_price: Amount,
}

fn default_image_ref() -> String {
    DEFAULT_IMAGE_REF.to_string()
}

impl Player {
    /// Build a fresh, unsold round-one player from an intake form
    pub fn register(
        id: PlayerId,
        intake: PlayerIntake,
        default_base_price: Amount,
    ) -> Result<Self, ValidationError> {
        let name = intake.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyField { field: "name" });
        }
        let role = intake.role.trim();
        if role.is_empty() {
            return Err(ValidationError::EmptyField { field: "role" });
        }

        let image_ref = intake
            .image_ref
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(default_image_ref);

        Ok(Self {
            id,
            name: name.to_string(),
            role: role.to_string(),
            base_price: intake.base_price.unwrap_or(default_base_price),
            image_ref,
            sold: false,
            sold_to: None,
            round: Round::One,
            final_price: Amount::ZERO,
        })
    }

    /// Still open for sale
    pub fn is_unsold(&self) -> bool {
        !self.sold
    }

    /// Record a binding sale
    pub fn mark_sold(&mut self, team: TeamName, price: Amount) {
        self.sold = true;
        self.sold_to = Some(team);
        self.final_price = price;
    }

    /// Defer an unsold round-one player to round two.
    ///
    /// Returns `true` when the round actually changed.
    pub fn defer_to_round_two(&mut self) -> bool {
        if self.round == Round::One {
            self.round = Round::Two;
            true
        } else {
            false
        }
    }

    /// Back to unsold, round one
    pub fn reset(&mut self) {
        self.sold = false;
        self.sold_to = None;
        self.final_price = Amount::ZERO;
        self.round = Round::One;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intake(name: &str, role: &str) -> PlayerIntake {
        PlayerIntake {
            name: name.to_string(),
            role: role.to_string(),
            base_price: None,
            image_ref: None,
        }
    }

    #[test]
    fn test_register_applies_defaults() {
        let player = Player::register(PlayerId::FIRST, intake("Asha", "Batter"), Amount::from_u64(100)).unwrap();
        assert_eq!(player.base_price, Amount::from_u64(100));
        assert_eq!(player.image_ref, DEFAULT_IMAGE_REF);
        assert_eq!(player.round, Round::One);
        assert!(player.is_unsold());
        assert_eq!(player.final_price, Amount::ZERO);
    }

    #[test]
    fn test_register_requires_name_and_role() {
        assert_eq!(
            Player::register(PlayerId::FIRST, intake(" ", "Batter"), Amount::ZERO),
            Err(ValidationError::EmptyField { field: "name" })
        );
        assert_eq!(
            Player::register(PlayerId::FIRST, intake("Asha", ""), Amount::ZERO),
            Err(ValidationError::EmptyField { field: "role" })
        );
    }

    #[test]
    fn test_round_wire_format() {
        assert_eq!(serde_json::to_string(&Round::Two).unwrap(), "2");
        assert_eq!(serde_json::from_str::<Round>("1").unwrap(), Round::One);
        assert!(serde_json::from_str::<Round>("3").is_err());
    }

    #[test]
    fn test_defer_only_from_round_one() {
        let mut player = Player::register(PlayerId::FIRST, intake("Asha", "Batter"), Amount::ZERO).unwrap();
        assert!(player.defer_to_round_two());
        assert!(!player.defer_to_round_two());
        assert_eq!(player.round, Round::Two);
    }

    #[test]
    fn test_reset_clears_sale() {
        let mut player = Player::register(PlayerId::FIRST, intake("Asha", "Batter"), Amount::ZERO).unwrap();
        player.defer_to_round_two();
        player.mark_sold(TeamName::new("Falcons").unwrap(), Amount::from_u64(700));
        player.reset();
        assert!(player.is_unsold());
        assert_eq!(player.sold_to, None);
        assert_eq!(player.final_price, Amount::ZERO);
        assert_eq!(player.round, Round::One);
    }

    #[test]
    fn test_reads_legacy_record_layout() {
        let json = r#"{"id":3,"name":"Ravi","role":"Bowler","base_price":150,"image":"Ravi.png",
                       "sold":true,"sold_to":"Falcons","round":2,"final_price":900}"#;
        let player: Player = serde_json::from_str(json).unwrap();
        assert_eq!(player.id, PlayerId::new(3));
        assert_eq!(player.image_ref, "Ravi.png");
        assert_eq!(player.sold_to.as_ref().map(|t| t.as_str()), Some("Falcons"));
        assert_eq!(player.round, Round::Two);
    }
}
