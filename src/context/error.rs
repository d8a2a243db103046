use crate::messages::Message;
use std::sync::Arc;

/// Returned when an outgoing message could not be handed over to the transport.
///
/// It carries the message itself, so that the caller can decide whether to retry the delivery
/// or give up, and the trace id of the message being processed.
#[derive(thiserror::Error, Debug)]
#[error("Failed to deliver a `{}` message (trace id `{trace_id}`)", .message.message_type())]
pub struct MessageDeliveryFailed {
    pub message: Arc<dyn Message>,
    pub trace_id: String,
    #[source]
    pub source: anyhow::Error,
}

impl MessageDeliveryFailed {
    pub fn new(
        message: Arc<dyn Message>,
        trace_id: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self {
            message,
            trace_id: trace_id.into(),
            source: source.into(),
        }
    }
}
