use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_FEED_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_FEED_MIN_INTERVAL_MS: u64 = 2_000;
pub const DEFAULT_DESTINATION_NAME: &str = "the destination";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LocationAccuracy {
    #[default]
    High,
    Balanced,
    Low,
}

/// Parameters handed to the position source when a subscription starts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeedConfig {
    pub accuracy: LocationAccuracy,
    /// Nominal period between fixes.
    pub interval_ms: u64,
    /// Fixes arriving faster than this are coalesced by the platform.
    pub min_interval_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            accuracy: LocationAccuracy::High,
            interval_ms: DEFAULT_FEED_INTERVAL_MS,
            min_interval_ms: DEFAULT_FEED_MIN_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TrackerConfig {
    pub feed: FeedConfig,
    /// Name used in the arrival message when reverse lookup gives nothing.
    pub fallback_destination_name: String,
    pub geocode_max_results: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            fallback_destination_name: DEFAULT_DESTINATION_NAME.to_string(),
            geocode_max_results: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("feed interval_ms must be > 0")]
    ZeroInterval,
    #[error("feed min_interval_ms must be in 1..={interval_ms}, got {min_interval_ms}")]
    MinInterval { min_interval_ms: u64, interval_ms: u64 },
    #[error("fallback_destination_name must not be blank")]
    BlankFallbackName,
    #[error("geocode_max_results must be >= 1")]
    ZeroGeocodeResults,
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let feed = &self.feed;
        if feed.interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if feed.min_interval_ms == 0 || feed.min_interval_ms > feed.interval_ms {
            return Err(ConfigError::MinInterval {
                min_interval_ms: feed.min_interval_ms,
                interval_ms: feed.interval_ms,
            });
        }
        if self.fallback_destination_name.trim().is_empty() {
            return Err(ConfigError::BlankFallbackName);
        }
        if self.geocode_max_results == 0 {
            return Err(ConfigError::ZeroGeocodeResults);
        }
        Ok(())
    }
}
