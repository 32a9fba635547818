// =============================================================================
// Service Configuration — JSON file + environment overrides
// =============================================================================
//
// All fields carry `#[serde(default)]` so that a partial (or missing) config
// file still yields a usable configuration. Environment variables take
// precedence over the file for deployment-specific values.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::types::Interval;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_bybit_base_url() -> String {
    "https://api.bybit.com".to_string()
}

fn default_category() -> String {
    "spot".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_symbol() -> String {
    "BTCUSDT".to_string()
}

fn default_limit() -> u32 {
    250
}

// =============================================================================
// ServiceConfig
// =============================================================================

/// Top-level configuration for the snapshot service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    // --- Server ---------------------------------------------------------------

    /// Address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    // --- Candle source --------------------------------------------------------

    /// Bybit REST base URL (no trailing slash).
    #[serde(default = "default_bybit_base_url")]
    pub bybit_base_url: String,

    /// Bybit market category passed with every kline request.
    #[serde(default = "default_category")]
    pub category: String,

    /// Per-request timeout for the upstream kline fetch.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    // --- Request defaults -----------------------------------------------------

    #[serde(default = "default_symbol")]
    pub default_symbol: String,

    #[serde(default)]
    pub default_interval: Interval,

    #[serde(default = "default_limit")]
    pub default_limit: u32,

    // --- Presentation ---------------------------------------------------------

    /// UTC offset (minutes) used to render `dateTime` in snapshots.
    #[serde(default)]
    pub display_utc_offset_minutes: i32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            bybit_base_url: default_bybit_base_url(),
            category: default_category(),
            request_timeout_secs: default_request_timeout_secs(),
            default_symbol: default_symbol(),
            default_interval: Interval::default(),
            default_limit: default_limit(),
            display_utc_offset_minutes: 0,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// Returns an error when the file is missing or malformed so the caller
    /// can fall back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read service config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse service config from {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            base_url = %config.bybit_base_url,
            "service config loaded"
        );

        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup("SNAPSHOT_BIND_ADDR").filter(|s| !s.trim().is_empty()) {
            self.bind_addr = addr.trim().to_string();
        }
        if let Some(url) = lookup("BYBIT_BASE_URL").filter(|s| !s.trim().is_empty()) {
            self.bybit_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(raw) = lookup("SNAPSHOT_DISPLAY_UTC_OFFSET_MINUTES") {
            match raw.trim().parse::<i32>() {
                Ok(minutes) => self.display_utc_offset_minutes = minutes,
                Err(e) => warn!(value = %raw, error = %e, "ignoring invalid display offset"),
            }
        }
    }

    /// Display offset for `dateTime`. Out-of-range values fall back to UTC.
    pub fn display_offset(&self) -> FixedOffset {
        self.display_utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                warn!(
                    minutes = self.display_utc_offset_minutes,
                    "display offset out of range, using UTC"
                );
                Utc.fix()
            })
    }
}
