//! Lookup configuration, overridable from the environment.

use std::time::Duration;

use thiserror::Error;

use crate::infra::address::{AddressError, TonAddress};
use crate::infra::tonapi::DEFAULT_BASE_URL;

/// The G-Bot collection on mainnet.
pub const DEFAULT_COLLECTION: &str = "EQDgZmQpDJbO6laHvvibaXYXMlEAYEH6LnUtA5J19W18dENp";

pub const ENV_BASE_URL: &str = "GBOT_TONAPI_URL";
pub const ENV_COLLECTION: &str = "GBOT_COLLECTION";
pub const ENV_API_KEY: &str = "TONAPI_KEY";
pub const ENV_TIMEOUT_SECS: &str = "GBOT_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GBOT_COLLECTION is not a valid TON address: {0}")]
    Collection(#[from] AddressError),
    #[error("GBOT_TIMEOUT_SECS must be a positive number of seconds, got {0:?}")]
    Timeout(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct LookupConfig {
    pub base_url: String,
    pub collection: String,
    pub api_key: Option<String>,
    pub timeout: Option<Duration>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            api_key: None,
            timeout: None,
        }
    }
}

impl LookupConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Overlays values from `lookup` on the defaults. Empty values are unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(base_url) = get(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        if let Some(collection) = get(ENV_COLLECTION) {
            config.collection = TonAddress::parse(&collection)?.to_canonical();
        }
        config.api_key = get(ENV_API_KEY);
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            let secs = raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::Timeout(raw.clone()))?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }
}
