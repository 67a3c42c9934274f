//! Service configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;

/// Process-wide runtime settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Rust log filter directive, used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log output format
    #[serde(default)]
    pub log_format: LogFormat,

    /// Directory for downloaded images (default: system temp dir)
    pub temp_dir: Option<PathBuf>,

    /// Bound on every external call, in seconds
    #[serde(default = "default_call_timeout")]
    pub call_timeout_secs: u64,

    /// Seconds a chat worker waits for new events before retiring
    #[serde(default = "default_session_idle")]
    pub session_idle_secs: u64,
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl ServiceConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }

    /// Directory for downloaded images
    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Validate service configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.call_timeout_secs == 0 || self.call_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.session_idle_secs == 0 {
            return Err(ValidationError::InvalidIdlePeriod);
        }
        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            temp_dir: None,
            call_timeout_secs: default_call_timeout(),
            session_idle_secs: default_session_idle(),
        }
    }
}

fn default_log_level() -> String {
    "info,expiry_reminder=debug".to_string()
}

fn default_call_timeout() -> u64 {
    30
}

fn default_session_idle() -> u64 {
    900
}
