//! User directory
//!
//! Resolves credentials to a role (and, for bidders, a team). Records live
//! under the store's `users` key and are rewritten whole on every change.

use auction_types::errors::{AuctionError, ValidationError};
use auction_types::ids::TeamName;
use parking_lot::RwLock;
use persistence::{load, save, StateStore, StoreKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Bidder,
    Auctioneer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Bidder => "bidder",
            Role::Auctioneer => "auctioneer",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bidder" => Ok(Role::Bidder),
            "auctioneer" => Ok(Role::Auctioneer),
            "admin" => Ok(Role::Admin),
            _ => Err(ValidationError::InvalidRole(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    /// Hex SHA-256 of `username:password`
    pub password_hash: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<TeamName>,
}

pub fn password_hash(username: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

pub struct UserDirectory {
    users: RwLock<BTreeMap<String, UserRecord>>,
    store: Arc<dyn StateStore>,
}

impl UserDirectory {
    pub fn open(store: Arc<dyn StateStore>) -> Result<Self, AuctionError> {
        let records: Vec<UserRecord> = load(store.as_ref(), StoreKey::Users)
            .map_err(|e| AuctionError::Persistence(e.to_string()))?;
        let users = records
            .into_iter()
            .map(|u| (u.username.clone(), u))
            .collect();
        Ok(Self {
            users: RwLock::new(users),
            store,
        })
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }

    /// The matching record, or `None` for unknown users and wrong passwords.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<UserRecord> {
        let users = self.users.read();
        let user = users.get(username)?;
        (user.password_hash == password_hash(username, password)).then(|| user.clone())
    }

    pub fn add_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
        team_name: Option<TeamName>,
    ) -> Result<UserRecord, AuctionError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ValidationError::EmptyField { field: "username" }.into());
        }
        if password.is_empty() {
            return Err(ValidationError::EmptyField { field: "password" }.into());
        }
        let team_name = match role {
            Role::Bidder => Some(team_name.ok_or(ValidationError::MissingTeam)?),
            _ => None,
        };

        let record = UserRecord {
            username: username.to_string(),
            password_hash: password_hash(username, password),
            role,
            team_name,
        };

        let mut users = self.users.write();
        if users.contains_key(username) {
            return Err(ValidationError::DuplicateUser {
                username: username.to_string(),
            }
            .into());
        }

        let mut draft = users.clone();
        draft.insert(record.username.clone(), record.clone());
        let records: Vec<&UserRecord> = draft.values().collect();
        save(self.store.as_ref(), StoreKey::Users, &records)
            .map_err(|e| AuctionError::Persistence(e.to_string()))?;
        *users = draft;

        info!(username = %record.username, role = %record.role, "User added");
        Ok(record)
    }

    /// Seed one admin into an empty directory. Returns whether a user was added.
    pub fn bootstrap_admin(&self, username: &str, password: &str) -> Result<bool, AuctionError> {
        if !self.is_empty() {
            return Ok(false);
        }
        self.add_user(username, password, Role::Admin, None)?;
        info!(username, "Bootstrap admin created");
        Ok(true)
    }
}
