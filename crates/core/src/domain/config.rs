//! Declarative device priority configuration
//!
//! The config document is JSON:
//!
//! ```json
//! {
//!   "check_frequency_seconds": 600,
//!   "fallback_to_current": true,
//!   "devices": [
//!     { "name": "Element", "rate": "max" },
//!     { "name": "MacBook Pro Speakers", "rate": 48000 }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, instrument};

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Interval reported by `--print-interval` when the document omits one
pub const DEFAULT_CHECK_FREQUENCY_SECS: i64 = 3600;

/// Errors that can occur while loading a configuration document
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Rate to apply once a device is chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRate", into = "RawRate")]
pub enum RateSpec {
    /// A fixed nominal rate in Hz, always positive
    Fixed(f64),
    /// The device's highest available rate
    Max,
}

impl RateSpec {
    /// Fixed rate, rejecting values that are not a positive finite number
    pub fn fixed(hz: f64) -> std::result::Result<Self, String> {
        if hz.is_finite() && hz > 0.0 {
            Ok(RateSpec::Fixed(hz))
        } else {
            Err(format!("rate must be a positive number of Hz, got {}", hz))
        }
    }
}

impl fmt::Display for RateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateSpec::Fixed(hz) => write!(f, "{:.0} Hz", hz),
            RateSpec::Max => f.write_str("max"),
        }
    }
}

/// Wire form of a rate: the string `"max"` or a number
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawRate {
    Number(f64),
    Text(String),
}

impl TryFrom<RawRate> for RateSpec {
    type Error = String;

    fn try_from(raw: RawRate) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawRate::Text(text) if text.eq_ignore_ascii_case("max") => Ok(RateSpec::Max),
            RawRate::Text(text) => Err(format!(
                "rate must be \"max\" or a number, got \"{}\"",
                text
            )),
            RawRate::Number(hz) => RateSpec::fixed(hz),
        }
    }
}

impl From<RateSpec> for RawRate {
    fn from(rate: RateSpec) -> Self {
        match rate {
            RateSpec::Fixed(hz) => RawRate::Number(hz),
            RateSpec::Max => RawRate::Text("max".to_string()),
        }
    }
}

/// One entry of the priority list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDeviceEntry {
    /// Case-insensitive substring of the device's display name
    pub name: String,
    pub rate: RateSpec,
}

/// Parsed configuration document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Polling cadence for an external scheduler; never acted on here.
    /// Any integer is accepted and echoed as-is.
    #[serde(default)]
    pub check_frequency_seconds: Option<i64>,

    #[serde(default)]
    pub fallback_to_current: Option<bool>,

    /// Devices in priority order
    pub devices: Vec<ConfigDeviceEntry>,
}

impl RunConfig {
    /// Load configuration from a JSON file
    #[instrument(skip(path))]
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading configuration");

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_json(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(
            devices = config.devices.len(),
            fallback = config.fallback_enabled(),
            "Configuration loaded successfully"
        );
        Ok(config)
    }

    /// Parse a JSON document
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Effective check interval in seconds
    pub fn check_frequency(&self) -> i64 {
        self.check_frequency_seconds
            .unwrap_or(DEFAULT_CHECK_FREQUENCY_SECS)
    }

    /// Whether to fall back to the live default device when nothing matches
    pub fn fallback_enabled(&self) -> bool {
        self.fallback_to_current.unwrap_or(false)
    }
}

/// Expand a leading `~` to the user's home directory
pub fn expand_tilde<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();

    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };

    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
