use std::time::Duration;

use foldiff_types::options::duration_ms;
use foldiff_types::DiffOptions;
use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SessionResult};

/// Configuration for a [`DiffSession`](crate::DiffSession).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Quiet period after the last input change before the provider runs.
    #[serde(rename = "debounce_ms", with = "duration_ms")]
    pub debounce: Duration,
    /// Initial options handed to the diff provider.
    pub diff: DiffOptions,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(1000),
            diff: DiffOptions::default(),
        }
    }
}

impl SessionConfig {
    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> SessionResult<Self> {
        toml::from_str(source).map_err(|e| SessionError::Config(e.to_string()))
    }

    /// Replace the debounce interval.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Replace the diff options.
    pub fn with_diff_options(mut self, diff: DiffOptions) -> Self {
        self.diff = diff;
        self
    }
}
