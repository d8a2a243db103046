//! The `Handler` trait is heavily inspired by `tide`'s approach to endpoint handlers.
use crate::context::ServiceBusContext;
use crate::handlers::UnexpectedMessageType;
use crate::messages::{downcast_message, Message};
use futures_util::future::BoxFuture;
use futures_util::stream::BoxStream;
use std::any::type_name;
use std::future::Future;
use std::sync::Arc;

/// The outcome of processing a message.
pub type HandlerResult = Result<(), anyhow::Error>;

/// The asynchronous completion returned by handlers.
pub type HandlerFuture = BoxFuture<'static, HandlerResult>;

/// A lazily produced sequence of processing steps.
pub type HandlerStream = BoxStream<'static, HandlerResult>;

/// The type-erased callable stored in a [`MessageHandler`](crate::handlers::MessageHandler).
pub type InvocationTarget =
    Box<dyn Fn(Arc<dyn Message>, Arc<dyn ServiceBusContext>) -> HandlerFuture + Send + Sync>;

/// Implementers of the `Handler` trait process messages of type `M`.
///
/// # Scope
///
/// `handle` only gets the message and its [`ServiceBusContext`]: outgoing messages are sent
/// through the context, failures are reported by returning an error. What happens next - a
/// retry, a dead letter - is up to the executor and its retry strategy.
///
/// # Implementors
///
/// While you can implement `Handler` for a struct or enum, most of the time you will be relying
/// on our implementation of `Handler` for async functions that have a matching signature -
/// `Fn(Arc<M>, Arc<dyn ServiceBusContext>) -> Fut`. See [`AsyncClosure`].
#[async_trait::async_trait]
pub trait Handler<M: Message>: Send + Sync + 'static {
    async fn handle(&self, message: Arc<M>, context: Arc<dyn ServiceBusContext>)
        -> HandlerResult;
}

/// Implement the [`Handler`] trait for all Boxed handlers.
///
/// E.g. Box<dyn Handler<M>>.
#[async_trait::async_trait]
impl<M, H> Handler<M> for Box<H>
where
    M: Message,
    H: Handler<M> + ?Sized,
{
    async fn handle(
        &self,
        message: Arc<M>,
        context: Arc<dyn ServiceBusContext>,
    ) -> HandlerResult {
        H::handle(self, message, context).await
    }
}

/// `AsyncClosure` is implemented for all functions of the form:
/// ```ignore
/// async fn(message: Arc<M>, context: Arc<dyn ServiceBusContext>) -> Result<(), impl Into<anyhow::Error>>;
/// ```
///
/// When combined with the [`ClosureHandler`] type, you get a [`Handler`].
/// `MessageHandlerBuilder::handler` will automatically perform this wrapping for you.
pub trait AsyncClosure<M>: Send + Sync + 'static {
    type Output: Future<Output = Result<(), Self::Err>> + Send + 'static;
    type Err: Into<anyhow::Error> + 'static;
    fn call(&self, message: Arc<M>, context: Arc<dyn ServiceBusContext>) -> Self::Output;
}

impl<F, Fut, Err, M> AsyncClosure<M> for F
where
    F: Fn(Arc<M>, Arc<dyn ServiceBusContext>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), Err>> + Send + 'static,
    Err: Into<anyhow::Error> + 'static,
{
    type Err = Err;
    type Output = Fut;

    fn call(&self, message: Arc<M>, context: Arc<dyn ServiceBusContext>) -> Self::Output {
        (self)(message, context)
    }
}

/// Wrapper type to turn an [`AsyncClosure`] into a [`Handler`].
pub struct ClosureHandler<F>(pub F);

#[async_trait::async_trait]
impl<M, F> Handler<M> for ClosureHandler<F>
where
    M: Message,
    F: AsyncClosure<M>,
{
    async fn handle(
        &self,
        message: Arc<M>,
        context: Arc<dyn ServiceBusContext>,
    ) -> HandlerResult {
        self.0.call(message, context).await.map_err(Into::into)
    }
}

/// Erase the message type of `handler`.
///
/// The returned target downcasts incoming messages to `M`: anything else resolves to an
/// [`UnexpectedMessageType`] error.
pub(crate) fn invocation_target<M, H>(handler: Arc<H>) -> InvocationTarget
where
    M: Message,
    H: Handler<M> + ?Sized,
{
    Box::new(
        move |message: Arc<dyn Message>, context: Arc<dyn ServiceBusContext>| -> HandlerFuture {
            let handler = Arc::clone(&handler);
            Box::pin(async move {
                let message = downcast_message::<M>(message).map_err(|message| {
                    UnexpectedMessageType {
                        expected: type_name::<M>(),
                        received: message.message_type(),
                    }
                })?;
                handler.handle(message, context).await
            })
        },
    )
}
