use crate::context::{Headers, MetadataValue};
use std::time::Duration;

/// Transport-level options applied when delivering a message.
///
/// Use the `with_*` methods to build it step by step:
///
/// ```rust
/// use service_bus_common::delivery::DeliveryOptions;
/// use std::time::Duration;
///
/// let options = DeliveryOptions::new()
///     .with_header("tenant", "acme")
///     .with_priority(5)
///     .with_expiration(Duration::from_secs(30));
///
/// assert!(options.is_persistent());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryOptions {
    headers: Headers,
    priority: Option<u8>,
    expiration: Option<Duration>,
    persistent: bool,
}

impl Default for DeliveryOptions {
    fn default() -> Self {
        // Messages survive a broker restart unless told otherwise.
        Self {
            headers: Headers::new(),
            priority: None,
            expiration: None,
            persistent: true,
        }
    }
}

impl DeliveryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a transport header to the outgoing message.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Discard the message if it has not been consumed within `expiration`.
    #[must_use]
    pub fn with_expiration(mut self, expiration: Duration) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Allow the broker to drop the message on restart.
    #[must_use]
    pub fn transient(mut self) -> Self {
        self.persistent = false;
        self
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn priority(&self) -> Option<u8> {
        self.priority
    }

    pub fn expiration(&self) -> Option<Duration> {
        self.expiration
    }

    pub fn is_persistent(&self) -> bool {
        self.persistent
    }
}
