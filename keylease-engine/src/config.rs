//! Engine configuration.
//!
//! Configuration is always handed to [`crate::HttpEngine::new`] explicitly.
//! [`EngineConfig::from_env`] is a convenience for binaries that want the
//! `KEYLEASE_*` overrides; the library never reads the environment on its own.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Overrides [`EngineConfig::request_timeout_secs`].
pub const ENV_REQUEST_TIMEOUT: &str = "KEYLEASE_REQUEST_TIMEOUT_SECS";
/// Overrides [`EngineConfig::connect_timeout_secs`].
pub const ENV_CONNECT_TIMEOUT: &str = "KEYLEASE_CONNECT_TIMEOUT_SECS";
/// Overrides [`EngineConfig::user_agent`].
pub const ENV_USER_AGENT: &str = "KEYLEASE_USER_AGENT";
/// Overrides [`EngineConfig::api_prefix`].
pub const ENV_API_PREFIX: &str = "KEYLEASE_API_PREFIX";

/// Total request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// TCP/TLS connect timeout in seconds.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Settings for the HTTP license engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Whole-request timeout; expiry surfaces as a network failure.
    pub request_timeout_secs: u64,
    /// Connect timeout.
    pub connect_timeout_secs: u64,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Path prefix placed between the server URL and each endpoint.
    pub api_prefix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            user_agent: concat!("keylease/", env!("CARGO_PKG_VERSION")).to_string(),
            api_prefix: "/v1".to_string(),
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with any `KEYLEASE_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Applies `KEYLEASE_*` environment overrides to this config.
    ///
    /// Unparsable numbers are ignored with a warning.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(secs) = env_secs(ENV_REQUEST_TIMEOUT) {
            self.request_timeout_secs = secs;
        }
        if let Some(secs) = env_secs(ENV_CONNECT_TIMEOUT) {
            self.connect_timeout_secs = secs;
        }
        if let Ok(agent) = std::env::var(ENV_USER_AGENT) {
            if !agent.trim().is_empty() {
                self.user_agent = agent;
            }
        }
        if let Ok(prefix) = std::env::var(ENV_API_PREFIX) {
            self.api_prefix = prefix;
        }
        self
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the connect timeout.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Joins `server_url`, the API prefix and `path` into one URL.
    #[must_use]
    pub fn endpoint(&self, server_url: &str, path: &str) -> String {
        let base = server_url.trim_end_matches('/');
        let prefix = self.api_prefix.trim().trim_matches('/');
        if prefix.is_empty() {
            format!("{base}{path}")
        } else {
            format!("{base}/{prefix}{path}")
        }
    }
}

fn env_secs(name: &str) -> Option<u64> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(secs),
        _ => {
            warn!(variable = name, value = %raw, "ignoring invalid timeout override");
            None
        }
    }
}
