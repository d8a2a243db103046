use crate::context::{MessageDeliveryFailed, ServiceBusContext};
use crate::messages::Message;
use crate::retry::FailureContext;
use std::sync::Arc;

/// What happens to a message after its processing failed.
///
/// The bus runtime calls [`RetryStrategy::retry`] when an executor fails with a
/// [`MessageExecutionFailed`](crate::executor::MessageExecutionFailed) error. A strategy can
/// decide to give up straight away: [`RetryStrategy::backoff`] is where the message is
/// abandoned - logged, dead-lettered, etc.
#[async_trait::async_trait]
pub trait RetryStrategy: Send + Sync {
    async fn retry(
        &self,
        message: Arc<dyn Message>,
        context: Arc<dyn ServiceBusContext>,
        details: FailureContext,
    ) -> Result<(), MessageDeliveryFailed>;

    async fn backoff(
        &self,
        message: Arc<dyn Message>,
        context: Arc<dyn ServiceBusContext>,
        details: FailureContext,
    ) -> Result<(), MessageDeliveryFailed>;
}
