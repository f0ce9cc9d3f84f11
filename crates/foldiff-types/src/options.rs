use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Options handed to a diff provider on every computation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Compare lines with leading and trailing whitespace removed.
    pub ignore_trim_whitespace: bool,
    /// Advisory time budget for one computation.
    #[serde(rename = "max_computation_time_ms", with = "duration_ms")]
    pub max_computation_time: Duration,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            ignore_trim_whitespace: true,
            max_computation_time: Duration::from_millis(5000),
        }
    }
}

impl DiffOptions {
    /// Options with an explicit whitespace policy and time budget.
    pub fn new(ignore_trim_whitespace: bool, max_computation_time: Duration) -> Self {
        Self {
            ignore_trim_whitespace,
            max_computation_time,
        }
    }

    /// `true` if the provider should run without a deadline.
    ///
    /// A zero budget means "no limit".
    pub fn is_unbounded(&self) -> bool {
        self.max_computation_time.is_zero()
    }
}

/// Serialize a [`Duration`] as whole milliseconds.
pub mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
