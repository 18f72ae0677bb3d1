//! Service configuration read from the environment.

use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    /// Maximum number of open costing drafts
    pub draft_capacity: u64,
    /// Hard lifetime of a draft
    pub draft_ttl: Duration,
    /// A draft untouched for this long is discarded
    pub draft_idle: Duration,
    pub cors_allow_any: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8090".to_string(),
            draft_capacity: 1000,
            draft_ttl: Duration::from_secs(8 * 60 * 60),
            draft_idle: Duration::from_secs(2 * 60 * 60),
            cors_allow_any: false,
        }
    }
}

impl Config {
    /// Read configuration from environment variables, falling back to defaults.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a local `.env` file.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            listen_addr: lookup("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            draft_capacity: parse_or(&lookup, "DRAFT_CAPACITY", defaults.draft_capacity),
            draft_ttl: Duration::from_secs(parse_or(
                &lookup,
                "DRAFT_TTL_SECS",
                defaults.draft_ttl.as_secs(),
            )),
            draft_idle: Duration::from_secs(parse_or(
                &lookup,
                "DRAFT_IDLE_SECS",
                defaults.draft_idle.as_secs(),
            )),
            cors_allow_any: parse_or(&lookup, "CORS_ALLOW_ANY", defaults.cors_allow_any),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring malformed {}={:?}, using default", key, raw);
                default
            }
        },
        None => default,
    }
}
