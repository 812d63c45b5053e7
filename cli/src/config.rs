//! Runtime configuration loaded from the environment.
use std::env;
use std::time::Duration;

use mastermind_core::DEFAULT_BASE_URL;

/// Settings for the interactive client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
        }
    }
}

impl Config {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `MASTERMIND_BASE_URL` - Service endpoint (default: the public server)
    /// - `MASTERMIND_TIMEOUT_SECS` - Request timeout in seconds (default: none)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("MASTERMIND_BASE_URL").filter(|url| !url.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }

        // Zero and unparsable values leave the timeout disabled.
        config.request_timeout = read_var::<u64>(&lookup, "MASTERMIND_TIMEOUT_SECS")
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        config
    }
}

fn read_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}
