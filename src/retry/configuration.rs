//! Configuration types for the ready-made retry strategies.
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
/// How many times, and how often, a failed message is retried by
/// [`RetryWithDelay`](crate::retry::RetryWithDelay).
///
/// Numbers are accepted as strings as well, to play nicely with configuration sourced from
/// environment variables.
pub struct RetrySettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    /// How many times a message is returned to the queue before giving up.
    pub max_retries: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    /// How long a returned message waits before being processed again, in milliseconds.
    pub delay_milliseconds: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay_milliseconds: 1_000,
        }
    }
}

impl RetrySettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_milliseconds)
    }
}
