//! Gateway configuration
//!
//! Everything comes from `AUCTION_*` environment variables layered over
//! `GatewayConfig::default()`. Unparsable values are ignored with a warning.

use auction_engine::EngineConfig;
use auction_types::numeric::Amount;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const DEV_JWT_SECRET: &str = "auction-dev-secret";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub engine: EngineConfig,
    /// Per-team bid bucket size
    pub bid_rate_capacity: u32,
    /// Tokens per second
    pub bid_rate_refill: f64,
    pub admin_user: Option<String>,
    pub admin_password: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            data_dir: PathBuf::from("data"),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl: Duration::from_secs(12 * 60 * 60),
            engine: EngineConfig::default(),
            bid_rate_capacity: 20,
            bid_rate_refill: 10.0,
            admin_user: None,
            admin_password: None,
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = parsed(&lookup, "AUCTION_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(dir) = lookup("AUCTION_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        match lookup("AUCTION_JWT_SECRET") {
            Some(secret) if !secret.is_empty() => config.jwt_secret = secret,
            _ => warn!("AUCTION_JWT_SECRET not set, using the development secret"),
        }
        if let Some(secs) = parsed::<u64>(&lookup, "AUCTION_TOKEN_TTL_SECS") {
            config.token_ttl = Duration::from_secs(secs);
        }

        // Engine
        if let Some(purse) = parsed::<u64>(&lookup, "AUCTION_STARTING_PURSE") {
            config.engine.starting_purse = Amount::from_u64(purse);
        }
        if let Some(base) = parsed::<u64>(&lookup, "AUCTION_DEFAULT_BASE_PRICE") {
            config.engine.default_base_price = Amount::from_u64(base);
        }
        if let Some(cap) = parsed(&lookup, "AUCTION_SNAPSHOT_CHANNEL_CAPACITY") {
            config.engine.snapshot_channel_capacity = cap;
        }

        // Rate limiting
        if let Some(cap) = parsed(&lookup, "AUCTION_BID_RATE_CAPACITY") {
            config.bid_rate_capacity = cap;
        }
        if let Some(refill) = parsed(&lookup, "AUCTION_BID_RATE_REFILL") {
            config.bid_rate_refill = refill;
        }

        config.admin_user = lookup("AUCTION_ADMIN_USER").filter(|v| !v.is_empty());
        config.admin_password = lookup("AUCTION_ADMIN_PASSWORD").filter(|v| !v.is_empty());

        config
    }
}

/// `AUCTION_LOG_JSON=1|true` switches the log formatter to JSON.
pub fn log_json_from_env() -> bool {
    matches!(
        std::env::var("AUCTION_LOG_JSON").as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE")
    )
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable configuration value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> GatewayConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GatewayConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(config.token_ttl, Duration::from_secs(43_200));
        assert_eq!(config.engine.starting_purse, Amount::from_u64(10_000));
        assert_eq!(config.engine.default_base_price, Amount::from_u64(100));
        assert_eq!(config.bid_rate_capacity, 20);
        assert!(config.admin_user.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("AUCTION_BIND_ADDR", "127.0.0.1:9000"),
            ("AUCTION_DATA_DIR", "/var/lib/auction"),
            ("AUCTION_JWT_SECRET", "s3cret"),
            ("AUCTION_STARTING_PURSE", "25000"),
            ("AUCTION_BID_RATE_REFILL", "2.5"),
            ("AUCTION_ADMIN_USER", "root"),
            ("AUCTION_ADMIN_PASSWORD", "pw"),
        ]);
        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/auction"));
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.engine.starting_purse, Amount::from_u64(25_000));
        assert_eq!(config.bid_rate_refill, 2.5);
        assert_eq!(config.admin_user.as_deref(), Some("root"));
        assert_eq!(config.admin_password.as_deref(), Some("pw"));
    }

    #[test]
    fn test_unparsable_values_fall_back() {
        let config = config_from(&[
            ("AUCTION_STARTING_PURSE", "lots"),
            ("AUCTION_BIND_ADDR", "nowhere"),
            ("AUCTION_BID_RATE_CAPACITY", "-3"),
        ]);
        assert_eq!(config.engine.starting_purse, Amount::from_u64(10_000));
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.bid_rate_capacity, 20);
    }
}
