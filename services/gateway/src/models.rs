use crate::users::Role;
use auction_engine::AuctionEvent;
use auction_types::errors::ValidationError;
use auction_types::ids::TeamName;
use auction_types::numeric::Amount;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw bid body. Fields stay loose so a malformed bid is reported as a
/// validation error with a reason rather than a generic parse failure.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceBidRequest {
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub amount: Option<Value>,
}

impl PlaceBidRequest {
    pub fn validate(self) -> Result<(TeamName, Amount), ValidationError> {
        let team = match self.team {
            Some(team) => TeamName::new(team)?,
            None => return Err(ValidationError::MissingTeam),
        };
        let amount = parse_amount(self.amount.ok_or(ValidationError::MissingAmount)?)?;
        Ok((team, amount))
    }
}

/// Accepts a JSON integer or a string holding one.
fn parse_amount(raw: Value) -> Result<Amount, ValidationError> {
    let value = match &raw {
        Value::Number(n) => match (n.as_u64(), n.as_i64()) {
            (Some(v), _) => v,
            (None, Some(_)) => return Err(ValidationError::NonPositiveAmount),
            (None, None) => return Err(ValidationError::MalformedAmount(n.to_string())),
        },
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<u64>() {
                Ok(v) => v,
                Err(_) if s.parse::<i64>().is_ok() => return Err(ValidationError::NonPositiveAmount),
                Err(_) => return Err(ValidationError::MalformedAmount(s.to_string())),
            }
        }
        Value::Null => return Err(ValidationError::MissingAmount),
        other => return Err(ValidationError::MalformedAmount(other.to_string())),
    };
    if value == 0 {
        return Err(ValidationError::NonPositiveAmount);
    }
    Ok(Amount::from_u64(value))
}

#[derive(Debug, Clone, Serialize)]
pub struct BidResponse {
    pub status: &'static str,
    pub event: AuctionEvent,
}

/// Reply to every auctioneer command; an empty `events` list means no-op
#[derive(Debug, Clone, Serialize)]
pub struct CommandResponse {
    pub status: &'static str,
    pub events: Vec<AuctionEvent>,
}

impl CommandResponse {
    pub fn success(events: Vec<AuctionEvent>) -> Self {
        Self {
            status: "success",
            events,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub team_name: Option<TeamName>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddUserRequest {
    pub username: String,
    pub password: String,
    pub role: String,
    #[serde(default)]
    pub team_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub role: Role,
    pub team_name: Option<TeamName>,
}
