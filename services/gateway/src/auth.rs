use crate::error::AppError;
use crate::state::AppState;
use crate::users::{Role, UserRecord};
use auction_types::ids::TeamName;
use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,
    pub role: Role,
    #[serde(default)]
    pub team_name: Option<TeamName>,
}

/// HS256 signing and verification of session tokens
pub struct TokenAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenAuthority {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn issue(&self, user: &UserRecord) -> Result<String, AppError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AppError::Internal(e.into()))?;
        let claims = Claims {
            sub: user.username.clone(),
            exp: (now + self.ttl).as_secs(),
            role: user.role,
            team_name: user.team_name.clone(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(e.into()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
    }
}

/// Caller identity taken from a verified bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub username: String,
    pub role: Role,
    pub team_name: Option<TeamName>,
}

impl AuthenticatedUser {
    pub fn require_admin(&self) -> Result<(), AppError> {
        match self.role {
            Role::Admin => Ok(()),
            _ => Err(self.denied("admin")),
        }
    }

    pub fn require_auctioneer(&self) -> Result<(), AppError> {
        match self.role {
            Role::Auctioneer | Role::Admin => Ok(()),
            Role::Bidder => Err(self.denied("auctioneer")),
        }
    }

    /// The bidder's own team
    pub fn require_bidder(&self) -> Result<&TeamName, AppError> {
        match (self.role, &self.team_name) {
            (Role::Bidder, Some(team)) => Ok(team),
            (Role::Bidder, None) => Err(AppError::Forbidden(format!(
                "Bidder {} has no team",
                self.username
            ))),
            _ => Err(self.denied("bidder")),
        }
    }

    fn denied(&self, needed: &str) -> AppError {
        AppError::Forbidden(format!(
            "{} role required, {} is {}",
            needed, self.username, self.role
        ))
    }
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing authentication credentials".into()))?;
        let value = header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid header string".into()))?;
        let token = value
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Expected a bearer token".into()))?;

        let claims = state.tokens.verify(token.trim())?;
        Ok(AuthenticatedUser {
            username: claims.sub,
            role: claims.role,
            team_name: claims.team_name,
        })
    }
}
