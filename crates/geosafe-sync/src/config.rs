//! Engine and session configuration.

use crate::error::{Error, Result};
use geosafe_model::Identity;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for a sync engine.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the remote report service
    pub api_url: String,

    /// Data directory for the local report cache
    pub data_dir: PathBuf,

    /// Wait between the end of one poll attempt and the start of the next
    pub poll_interval: Duration,

    /// Upper bound on every remote call
    pub request_timeout: Duration,

    /// How long a success notice stays up
    pub success_display: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000".to_string(),
            data_dir: PathBuf::from("./geosafe-data"),
            poll_interval: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            success_display: Duration::from_secs(3),
        }
    }
}

impl SyncConfig {
    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let api_url = std::env::var("GEOSAFE_API_URL").unwrap_or(defaults.api_url);

        let data_dir = std::env::var("GEOSAFE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        Ok(Self {
            api_url,
            data_dir,
            poll_interval: env_secs("GEOSAFE_POLL_INTERVAL_SECS", defaults.poll_interval)?,
            request_timeout: env_secs("GEOSAFE_REQUEST_TIMEOUT_SECS", defaults.request_timeout)?,
            success_display: env_secs("GEOSAFE_SUCCESS_DISPLAY_SECS", defaults.success_display)?,
        })
    }
}

/// Session identity from `GEOSAFE_USER` / `GEOSAFE_ADMIN`.
///
/// Admin sessions default to the username `Admin`; regular sessions to
/// `guest`.
pub fn identity_from_env() -> Identity {
    let is_admin = std::env::var("GEOSAFE_ADMIN")
        .map(|v| parse_flag(&v))
        .unwrap_or(false);

    let username = std::env::var("GEOSAFE_USER")
        .ok()
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| if is_admin { "Admin" } else { "guest" }.to_string());

    Identity { username, is_admin }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

fn env_secs(name: &str, default: Duration) -> Result<Duration> {
    match std::env::var(name) {
        Ok(raw) => parse_secs(name, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_secs(name: &str, raw: &str) -> Result<Duration> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(|s| Duration::try_from_secs_f64(s).ok())
        .filter(|d| !d.is_zero())
        .ok_or_else(|| Error::Config(format!("{} must be a positive number of seconds, got {:?}", name, raw)))
}
