use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// A scalar value carried in message metadata or headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl MetadataValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The value as an integer.
    ///
    /// Numeric strings are parsed: transports that only carry strings in their headers (e.g.
    /// the retry counter after a round-trip through the broker) still yield a number.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::String(value) => value.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Integer(value) => Some(*value as f64),
            Self::String(value) => value.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(value) => write!(f, "{}", value),
            Self::Integer(value) => write!(f, "{}", value),
            Self::Float(value) => write!(f, "{}", value),
            Self::String(value) => f.write_str(value),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for MetadataValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u32> for MetadataValue {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<V: Into<MetadataValue>> From<Option<V>> for MetadataValue {
    fn from(value: Option<V>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

/// Key/value pairs attached to a message.
pub type Variables = BTreeMap<String, MetadataValue>;

/// Headers of an incoming message.
pub type Headers = BTreeMap<String, MetadataValue>;

/// Metadata keys and values owned by the framework.
///
/// Application code can read them, but must never repurpose them for its own data. The values
/// must round-trip byte-for-byte through any transport serialization.
pub mod keys {
    /// Identifier shared by all the messages caused by the same initial message.
    pub const SERVICE_BUS_TRACE_ID: &str = "x-trace-id";
    /// The encoder used to serialize the payload.
    pub const SERVICE_BUS_SERIALIZER_TYPE: &str = "x-encoder-type";
    /// The type of the message carried in the payload.
    pub const SERVICE_BUS_MESSAGE_TYPE: &str = "x-message-type";
    /// How many times the delivery of the message has been retried.
    pub const SERVICE_BUS_MESSAGE_RETRY_COUNT: &str = "x-retry-count";
    /// The component in which the processing of the message failed.
    pub const SERVICE_BUS_MESSAGE_FAILED_IN: &str = "x-failed-in";
    /// What kind of actor produced the message - see the `ACTOR_KIND_*` values.
    pub const SERVICE_BUS_ACTOR_KIND: &str = "x-actor-kind";

    pub const ACTOR_KIND_EXTERNAL: &str = "external";
    pub const ACTOR_KIND_INTERNAL_HANDLER: &str = "internalHandler";
    pub const ACTOR_KIND_INTERNAL_AGGREGATE: &str = "internalAggregate";
    pub const ACTOR_KIND_INTERNAL_SAGA: &str = "internalSaga";

    pub const INTERNAL_METADATA_KEYS: [&str; 6] = [
        SERVICE_BUS_TRACE_ID,
        SERVICE_BUS_SERIALIZER_TYPE,
        SERVICE_BUS_MESSAGE_TYPE,
        SERVICE_BUS_MESSAGE_RETRY_COUNT,
        SERVICE_BUS_MESSAGE_FAILED_IN,
        SERVICE_BUS_ACTOR_KIND,
    ];

    /// Returns `true` if `key` is reserved for the framework.
    pub fn is_reserved(key: &str) -> bool {
        INTERNAL_METADATA_KEYS.contains(&key)
    }
}

/// Read-only view over the metadata of the message currently being processed.
pub trait IncomingMessageMetadata: Send + Sync + fmt::Debug {
    fn message_id(&self) -> &str;

    fn trace_id(&self) -> &str;

    fn variables(&self) -> &Variables;

    fn has(&self, key: &str) -> bool {
        self.variables().contains_key(key)
    }

    /// The value stored under `key`, or `default` if there is none.
    fn get(&self, key: &str, default: MetadataValue) -> MetadataValue {
        self.variables().get(key).cloned().unwrap_or(default)
    }
}

/// The metadata of a received message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceivedMetadata {
    message_id: String,
    trace_id: String,
    variables: Variables,
}

impl ReceivedMetadata {
    pub fn new<I, K, V>(message_id: impl Into<String>, trace_id: impl Into<String>, variables: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<MetadataValue>,
    {
        Self {
            message_id: message_id.into(),
            trace_id: trace_id.into(),
            variables: collect_variables(variables),
        }
    }

    /// The metadata a message will carry once delivered: a fresh message id, the trace id of the
    /// message that caused it and the variables attached by the sender.
    pub fn for_delivery(trace_id: impl Into<String>, outcome: &OutcomeMessageMetadata) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            trace_id: trace_id.into(),
            variables: outcome.variables().clone(),
        }
    }
}

impl IncomingMessageMetadata for ReceivedMetadata {
    fn message_id(&self) -> &str {
        &self.message_id
    }

    fn trace_id(&self) -> &str {
        &self.trace_id
    }

    fn variables(&self) -> &Variables {
        &self.variables
    }
}

/// Metadata attached to an outgoing message.
///
/// `OutcomeMessageMetadata` is an immutable value: [`OutcomeMessageMetadata::with`] returns an
/// updated copy and leaves the original untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeMessageMetadata {
    variables: Variables,
}

impl OutcomeMessageMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_variables<I, K, V>(variables: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<MetadataValue>,
    {
        Self {
            variables: collect_variables(variables),
        }
    }

    /// A copy of this metadata with `key` set to `value`.
    #[must_use]
    pub fn with(&self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        let mut variables = self.variables.clone();
        variables.insert(key.into(), value.into());
        Self { variables }
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn has(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    pub fn get(&self, key: &str, default: MetadataValue) -> MetadataValue {
        self.variables.get(key).cloned().unwrap_or(default)
    }
}

fn collect_variables<I, K, V>(variables: I) -> Variables
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<MetadataValue>,
{
    variables
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}
