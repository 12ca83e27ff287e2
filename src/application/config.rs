//! Engine configuration.
//!
//! Loaded from a JSON file by the binary and overridden from command-line flags.

use crate::domain::asset::AssetId;
use crate::error::{PayrollError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Rate expiry windows at or below this many seconds are rejected.
pub const MIN_RATE_EXPIRY: u64 = 60;

/// Upper bound on the allowed settlement assets, which bounds the work of one payout.
pub const MAX_ALLOWED_ASSETS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollConfig {
    /// Asset salaries and balances are denominated in.
    pub denomination_asset: AssetId,

    /// Maximum age in seconds of an oracle quote used for conversion.
    #[serde(default = "default_rate_expiry")]
    pub rate_expiry: u64,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub json_logs: bool,
}

fn default_rate_expiry() -> u64 {
    3_600
}

fn default_log_level() -> String {
    "info".to_string()
}

impl PayrollConfig {
    pub fn new(denomination_asset: impl Into<AssetId>) -> Self {
        Self {
            denomination_asset: denomination_asset.into(),
            rate_expiry: default_rate_expiry(),
            log_level: default_log_level(),
            json_logs: false,
        }
    }

    pub fn with_rate_expiry(mut self, seconds: u64) -> Self {
        self.rate_expiry = seconds;
        self
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| PayrollError::Validation(format!("Invalid configuration: {e}")))
    }

    pub fn validate(&self) -> Result<()> {
        check_rate_expiry(self.rate_expiry)
    }
}

pub(crate) fn check_rate_expiry(seconds: u64) -> Result<()> {
    if seconds <= MIN_RATE_EXPIRY {
        return Err(PayrollError::ExpiryTimeTooShort);
    }
    Ok(())
}
