//! Store interface
//!
//! The trait speaks `serde_json::Value` so it stays object safe and can sit
//! behind `Arc<dyn StateStore>`; `load`/`save` add the typed layer.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::io;
use thiserror::Error;

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {key}: {source}")]
    Io {
        key: StoreKey,
        #[source]
        source: io::Error,
    },

    #[error("Corrupt value under {key}: {message}")]
    Corrupt { key: StoreKey, message: String },

    #[error("Serialization error on {key}: {message}")]
    Serialization { key: StoreKey, message: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

// ── Keys ────────────────────────────────────────────────────────────

/// Logical keys held by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoreKey {
    Players,
    Teams,
    AuctionState,
    Users,
}

impl StoreKey {
    pub const ALL: [StoreKey; 4] = [
        StoreKey::Players,
        StoreKey::Teams,
        StoreKey::AuctionState,
        StoreKey::Users,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Players => "players",
            StoreKey::Teams => "teams",
            StoreKey::AuctionState => "auction_state",
            StoreKey::Users => "users",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Trait ───────────────────────────────────────────────────────────

/// Durable key-value storage
pub trait StateStore: Send + Sync {
    /// Current value under `key`, or `None` when nothing was ever written.
    fn read(&self, key: StoreKey) -> Result<Option<Value>, StoreError>;

    /// Replace the value under `key`. Returns only once the write is durable.
    fn write(&self, key: StoreKey, value: &Value) -> Result<(), StoreError>;
}

/// Read and decode `key`, falling back to `T::default()` when absent.
pub fn load<T>(store: &dyn StateStore, key: StoreKey) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    match store.read(key)? {
        Some(value) => serde_json::from_value(value).map_err(|e| StoreError::Corrupt {
            key,
            message: e.to_string(),
        }),
        None => Ok(T::default()),
    }
}

/// Encode and write `value` under `key`.
pub fn save<T>(store: &dyn StateStore, key: StoreKey, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
{
    let encoded = serde_json::to_value(value).map_err(|e| StoreError::Serialization {
        key,
        message: e.to_string(),
    })?;
    store.write(key, &encoded)
}
