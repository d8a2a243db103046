use crate::context::{
    ContextLogger, Headers, IncomingMessageMetadata, MessageDeliveryFailed,
    OutcomeMessageMetadata, ValidationViolations,
};
use crate::delivery::DeliveryOptions;
use crate::messages::Message;
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Duration;

/// The execution context a message handler receives alongside the message.
///
/// # Scope
///
/// The context is scoped to a single message: headers, metadata and logger all refer to the
/// message currently being processed and are available for the whole duration of its
/// processing. It is implemented by the bus runtime - this crate only defines the contract.
///
/// # Delivery
///
/// [`ServiceBusContext::delivery`] and friends enqueue outgoing messages. They fail with
/// [`MessageDeliveryFailed`], which carries the rejected message and the trace id, leaving the
/// decision to retry to the caller.
#[async_trait::async_trait]
pub trait ServiceBusContext: Send + Sync {
    /// The validation violations found on the incoming message, if validation is enabled and the
    /// message is invalid.
    fn violations(&self) -> Option<&ValidationViolations>;

    /// Enqueue an outgoing message.
    async fn delivery(
        &self,
        message: Arc<dyn Message>,
        options: Option<DeliveryOptions>,
        metadata: Option<OutcomeMessageMetadata>,
    ) -> Result<(), MessageDeliveryFailed>;

    /// Returns `true` if [`ServiceBusContext::delivery_bulk`] submits all messages atomically.
    ///
    /// Unless this returns `true`, callers must not assume all-or-nothing semantics.
    fn is_bulk_delivery_atomic(&self) -> bool {
        false
    }

    /// Enqueue several outgoing messages.
    ///
    /// The default implementation submits every message independently and concurrently: all
    /// deliveries are attempted and the first failure, if any, is returned. Transports that
    /// support atomic multi-message submission should override it (and
    /// [`ServiceBusContext::is_bulk_delivery_atomic`]).
    async fn delivery_bulk(
        &self,
        messages: Vec<Arc<dyn Message>>,
        options: Option<DeliveryOptions>,
        metadata: Option<OutcomeMessageMetadata>,
    ) -> Result<(), MessageDeliveryFailed> {
        let deliveries = messages
            .into_iter()
            .map(|message| self.delivery(message, options.clone(), metadata.clone()));

        join_all(deliveries)
            .await
            .into_iter()
            .collect::<Result<Vec<()>, _>>()
            .map(|_| ())
    }

    /// Return the message currently being processed back to the queue, after `delay`.
    async fn return_to_queue(
        &self,
        delay: Duration,
        metadata: Option<OutcomeMessageMetadata>,
    ) -> Result<(), MessageDeliveryFailed>;

    /// A logger bound to the message currently being processed.
    fn logger(&self) -> &dyn ContextLogger;

    /// The headers of the message currently being processed.
    fn headers(&self) -> &Headers;

    /// The metadata of the message currently being processed.
    fn metadata(&self) -> &dyn IncomingMessageMetadata;
}
