use crate::context::ServiceBusContext;
use crate::executor::{extensions::scoped, MessageExecutionFailed};
use crate::handlers::MessageHandler;
use crate::messages::Message;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

static NEXT_EXECUTOR: AtomicUsize = AtomicUsize::new(1);

/// Runs a message through one handler.
///
/// The bus runtime builds one executor per registered [`MessageHandler`], via a
/// [`MessageExecutorFactory`], and calls it for every matching message.
#[async_trait::async_trait]
pub trait MessageExecutor: Send + Sync {
    /// Identifies the executor, e.g. in a [`FailureContext`](crate::retry::FailureContext).
    /// Two executors living in the same process never share an id.
    fn id(&self) -> &str;

    async fn execute(
        &self,
        message: Arc<dyn Message>,
        context: Arc<dyn ServiceBusContext>,
    ) -> Result<(), MessageExecutionFailed>;
}

/// Turns handler descriptors into executors.
pub trait MessageExecutorFactory: Send + Sync {
    fn create(&self, handler: MessageHandler) -> Arc<dyn MessageExecutor>;
}

/// A bare-bones [`MessageExecutor`]: it invokes the handler within message-local storage and
/// wraps failures into [`MessageExecutionFailed`].
///
/// It does not retry: that is up to a [`RetryStrategy`](crate::retry::RetryStrategy).
#[derive(Debug)]
pub struct HandlerExecutor {
    id: String,
    handler: MessageHandler,
}

impl HandlerExecutor {
    /// The id is `<message type>::<method>#<sequence number>`: several handlers for the same
    /// message can share a method name.
    pub fn new(handler: MessageHandler) -> Self {
        let id = format!(
            "{}::{}#{}",
            handler.message_type().short_name(),
            handler.method_name(),
            NEXT_EXECUTOR.fetch_add(1, Ordering::Relaxed)
        );
        Self { id, handler }
    }

    /// Use an id chosen by the caller. Keeping it unique is then up to the caller.
    pub fn with_id(handler: MessageHandler, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            handler,
        }
    }

    pub fn handler(&self) -> &MessageHandler {
        &self.handler
    }
}

#[async_trait::async_trait]
impl MessageExecutor for HandlerExecutor {
    fn id(&self) -> &str {
        &self.id
    }

    #[tracing::instrument(
        name = "message_execution",
        skip_all,
        fields(
            message_type = %message.message_type(),
            trace_id = %context.metadata().trace_id(),
        )
    )]
    async fn execute(
        &self,
        message: Arc<dyn Message>,
        context: Arc<dyn ServiceBusContext>,
    ) -> Result<(), MessageExecutionFailed> {
        let trace_id = context.metadata().trace_id().to_owned();
        let invocation = self.handler.invoke(Arc::clone(&message), context);

        match scoped(invocation).await {
            Ok(()) => {
                tracing::debug!("Message processed");
                Ok(())
            }
            Err(e) => {
                let error = MessageExecutionFailed::new(message, trace_id, e);
                tracing::error!(
                    executor = %self.id,
                    "Message processing failed: {:?}",
                    error.source
                );
                Err(error)
            }
        }
    }
}

/// Builds a [`HandlerExecutor`] for every handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExecutorFactory;

impl MessageExecutorFactory for DefaultExecutorFactory {
    fn create(&self, handler: MessageHandler) -> Arc<dyn MessageExecutor> {
        Arc::new(HandlerExecutor::new(handler))
    }
}
