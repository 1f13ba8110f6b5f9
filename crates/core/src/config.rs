//! Configuration structures for the kalshi-bars system.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Resolution;
use crate::units::parse_timezone;

/// Main configuration for bar normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Exchange configuration.
    pub exchange: ExchangeConfig,
    /// Bar configuration.
    pub bars: BarConfig,
    /// Upstream request configuration.
    pub requests: RequestConfig,
}

impl Config {
    /// Parse a configuration from JSON. Missing sections take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.requests.interval_days == 0 {
            return Err(Error::config("requests.interval_days must be positive"));
        }
        self.exchange.zone()?;
        Ok(())
    }

    /// Exchange timezone.
    pub fn exchange_zone(&self) -> Result<Tz> {
        self.exchange.zone()
    }
}

/// Exchange-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Exchange name.
    pub name: String,
    /// IANA timezone of the exchange calendar.
    pub timezone: String,
}

impl ExchangeConfig {
    pub fn zone(&self) -> Result<Tz> {
        parse_timezone(&self.timezone)
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            name: "kalshi".to_string(),
            timezone: "America/New_York".to_string(),
        }
    }
}

/// Bar building configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BarConfig {
    /// Candlestick resolution.
    pub resolution: Resolution,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::Minute,
        }
    }
}

/// Upstream request chunking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    /// Days covered by a single candlestick request.
    pub interval_days: u32,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self { interval_days: 3 }
    }
}
