//! A collection of retry strategies.
use crate::context::{
    keys, MessageDeliveryFailed, MetadataValue, OutcomeMessageMetadata, ServiceBusContext,
};
use crate::messages::Message;
use crate::retry::{FailureContext, RetrySettings, RetryStrategy};
use std::sync::Arc;

/// Never retry: every failed message is abandoned and logged.
pub struct NeverRetry;

#[async_trait::async_trait]
impl RetryStrategy for NeverRetry {
    async fn retry(
        &self,
        message: Arc<dyn Message>,
        context: Arc<dyn ServiceBusContext>,
        details: FailureContext,
    ) -> Result<(), MessageDeliveryFailed> {
        self.backoff(message, context, details).await
    }

    async fn backoff(
        &self,
        _message: Arc<dyn Message>,
        context: Arc<dyn ServiceBusContext>,
        details: FailureContext,
    ) -> Result<(), MessageDeliveryFailed> {
        abandon(context.as_ref(), &details);
        Ok(())
    }
}

/// Return failed messages to the queue, after a delay, until they have been retried
/// `max_retries` times. Then give up.
///
/// The retry count travels with the message, in the `x-retry-count` metadata key.
pub struct RetryWithDelay {
    settings: RetrySettings,
}

impl RetryWithDelay {
    pub fn new(settings: RetrySettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl RetryStrategy for RetryWithDelay {
    async fn retry(
        &self,
        message: Arc<dyn Message>,
        context: Arc<dyn ServiceBusContext>,
        details: FailureContext,
    ) -> Result<(), MessageDeliveryFailed> {
        let incoming = context.metadata();
        let retries = incoming
            .get(keys::SERVICE_BUS_MESSAGE_RETRY_COUNT, MetadataValue::Integer(0))
            .as_integer()
            .unwrap_or(0);

        if retries >= i64::from(self.settings.max_retries) {
            return self.backoff(message, context, details).await;
        }

        let metadata = OutcomeMessageMetadata::from_variables(incoming.variables().clone())
            .with(keys::SERVICE_BUS_TRACE_ID, incoming.trace_id())
            .with(keys::SERVICE_BUS_MESSAGE_RETRY_COUNT, retries + 1)
            .with(keys::SERVICE_BUS_MESSAGE_FAILED_IN, details.failed_in());

        context.logger().warning(
            "Message processing failed, returning it to the queue",
            &[
                ("attempt", (retries + 1).into()),
                ("failed_in", details.failed_in().into()),
            ],
        );

        context
            .return_to_queue(self.settings.delay(), Some(metadata))
            .await
    }

    async fn backoff(
        &self,
        _message: Arc<dyn Message>,
        context: Arc<dyn ServiceBusContext>,
        details: FailureContext,
    ) -> Result<(), MessageDeliveryFailed> {
        abandon(context.as_ref(), &details);
        Ok(())
    }
}

fn abandon(context: &dyn ServiceBusContext, details: &FailureContext) {
    for (executor, error) in &details.executors {
        context.logger().error(
            "Giving up on message processing",
            &[
                ("executor", executor.as_str().into()),
                ("reason", error.as_str().into()),
            ],
        );
    }
}
