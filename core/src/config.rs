//! Immutable client configuration.
//!
//! # Design
//! `ClientConfig` is built once at the composition root and handed to
//! `ApiClient`. Environment lookup goes through `from_lookup` so tests can
//! feed values without touching the process environment.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::warn;

use crate::resolve::trim_base;

/// Environment variable holding the backend base URL.
pub const BASE_URL_VAR: &str = "DARSHANA_API_URL";

/// Older name for the base URL, read when `DARSHANA_API_URL` is unset.
pub const LEGACY_BASE_URL_VAR: &str = "NEXT_PUBLIC_API_URL";

/// Environment variable overriding the request timeout, in milliseconds.
pub const TIMEOUT_VAR: &str = "DARSHANA_API_TIMEOUT_MS";

/// Base URL used when neither base URL variable is set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Settings shared by every request the client builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    default_headers: BTreeMap<String, String>,
    timeout: Duration,
}

impl ClientConfig {
    /// Build a config for `base_url` with the default JSON header and timeout.
    pub fn new(base_url: &str) -> Self {
        let mut default_headers = BTreeMap::new();
        default_headers.insert("content-type".to_string(), "application/json".to_string());
        Self {
            base_url: trim_base(base_url).to_string(),
            default_headers,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = [BASE_URL_VAR, LEGACY_BASE_URL_VAR]
            .into_iter()
            .filter_map(|key| lookup(key))
            .map(|v| v.trim().to_string())
            .find(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut config = Self::new(&base_url);
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => config.timeout = Duration::from_millis(ms),
                _ => warn!(value = %raw, "ignoring invalid {TIMEOUT_VAR}"),
            }
        }
        config
    }

    /// Replace the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add or replace a header sent on every request. Names are lowercased.
    ///
    /// `content-type` is pinned to `application/json` and cannot be replaced.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        let name = name.to_ascii_lowercase();
        if name == "content-type" {
            warn!(value, "content-type is fixed to application/json");
            return self;
        }
        self.default_headers.insert(name, value.to_string());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_headers(&self) -> &BTreeMap<String, String> {
        &self.default_headers
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
