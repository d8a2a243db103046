use crate::messages::Message;
use std::sync::Arc;

/// A handler failed to process a message.
///
/// Raised by [`MessageExecutor`](crate::executor::MessageExecutor)s: it wraps the handler error
/// with the message and its trace id so that a [`RetryStrategy`](crate::retry::RetryStrategy)
/// can decide what happens next.
#[derive(thiserror::Error, Debug)]
#[error("Message execution failed: {source}")]
pub struct MessageExecutionFailed {
    pub message: Arc<dyn Message>,
    pub trace_id: String,
    #[source]
    pub source: anyhow::Error,
}

impl MessageExecutionFailed {
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
