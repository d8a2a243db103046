use crate::context::ServiceBusContext;
use crate::handlers::{
    handler::{invocation_target, AsyncClosure, ClosureHandler},
    AsyncVocabulary, Handler, HandlerArgument, HandlerFuture, IntrospectionError, InvocationTarget,
    MethodSignature, ReturnDeclaration,
};
use crate::messages::{AsAny, Message};
use crate::reflection::{TypeCatalog, TypeIdentity};
use std::fmt;
use std::sync::Arc;

/// Handler-specific configuration, opaque at this layer.
///
/// Runtimes define their own options types and get them back with
/// [`downcast_ref`](#method.downcast_ref).
pub trait HandlerOptions: AsAny + fmt::Debug {}

impl dyn HandlerOptions {
    pub fn downcast_ref<T: HandlerOptions>(&self) -> Option<&T> {
        AsAny::as_any(self).downcast_ref::<T>()
    }
}

/// The options of a handler that was not given any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOptions;

impl HandlerOptions for NoOptions {}

/// A dispatch-ready description of a message handler.
///
/// Use [`MessageHandler::builder`] to start composing a `MessageHandler` using a fluent builder
/// API.
///
/// # Lifecycle
///
/// A `MessageHandler` is built once, when the handler is registered, and never changes
/// afterwards: there are no setters. It can be shared across concurrent message-processing tasks
/// without locking.
///
/// # Equality
///
/// Two descriptors are equal if they describe the same method: message type, method name,
/// arguments, return declaration and description. Invocation targets and options are not
/// compared.
pub struct MessageHandler {
    message_type: TypeIdentity,
    method_name: String,
    arguments: Vec<HandlerArgument>,
    return_declaration: ReturnDeclaration,
    options: Arc<dyn HandlerOptions>,
    description: Option<String>,
    target: InvocationTarget,
}

impl MessageHandler {
    /// Start building a [`MessageHandler`].
    ///
    /// `catalog` tells object types apart from scalars and knows their ancestors; `signature`
    /// describes the handler method (see [`method_signature!`](crate::method_signature)).
    pub fn builder(catalog: &TypeCatalog, signature: MethodSignature) -> MessageHandlerBuilder<'_> {
        MessageHandlerBuilder::new(catalog, signature)
    }

    pub fn message_type(&self) -> TypeIdentity {
        self.message_type
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn has_arguments(&self) -> bool {
        !self.arguments.is_empty()
    }

    /// The arguments, in declaration order.
    pub fn arguments(&self) -> &[HandlerArgument] {
        &self.arguments
    }

    pub fn return_declaration(&self) -> &ReturnDeclaration {
        &self.return_declaration
    }

    pub fn options(&self) -> &dyn HandlerOptions {
        self.options.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Run the handler against `message`.
    pub fn invoke(
        &self,
        message: Arc<dyn Message>,
        context: Arc<dyn ServiceBusContext>,
    ) -> HandlerFuture {
        (self.target)(message, context)
    }
}

impl PartialEq for MessageHandler {
    fn eq(&self, other: &Self) -> bool {
        self.message_type == other.message_type
            && self.method_name == other.method_name
            && self.arguments == other.arguments
            && self.return_declaration == other.return_declaration
            && self.description == other.description
    }
}

impl fmt::Debug for MessageHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageHandler")
            .field("message_type", &self.message_type)
            .field("method_name", &self.method_name)
            .field("arguments", &self.arguments)
            .field("return_declaration", &self.return_declaration)
            .field("options", &self.options)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// A builder to compose a [`MessageHandler`] with a fluent API.
///
/// Use [`MessageHandler::builder`] as entrypoint.
///
/// The finalisers - [`handler`](MessageHandlerBuilder::handler),
/// [`raw_handler`](MessageHandlerBuilder::raw_handler),
/// [`raw_arc_handler`](MessageHandlerBuilder::raw_arc_handler) and
/// [`raw_target`](MessageHandlerBuilder::raw_target) - describe the signature and either return
/// a complete descriptor or an [`IntrospectionError`]: there is no partially built handler.
///
/// The invocation target must originate from the method `signature` describes. This is not
/// checked.
pub struct MessageHandlerBuilder<'a> {
    catalog: &'a TypeCatalog,
    signature: MethodSignature,
    vocabulary: AsyncVocabulary,
    message_type: Option<TypeIdentity>,
    options: Arc<dyn HandlerOptions>,
    description: Option<String>,
}

impl<'a> MessageHandlerBuilder<'a> {
    pub(super) fn new(catalog: &'a TypeCatalog, signature: MethodSignature) -> Self {
        Self {
            catalog,
            signature,
            vocabulary: AsyncVocabulary::default(),
            message_type: None,
            options: Arc::new(NoOptions),
            description: None,
        }
    }

    /// Attach handler-specific options.
    #[must_use]
    pub fn with_options<O: HandlerOptions>(self, options: O) -> Self {
        self.with_arc_options(Arc::new(options))
    }

    /// A version of [`MessageHandlerBuilder::with_options`] for already Arc-ed options.
    #[must_use]
    pub fn with_arc_options(mut self, options: Arc<dyn HandlerOptions>) -> Self {
        self.options = options;
        self
    }

    /// A human-readable description, used for diagnostics only.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Classify return types against the async marker types of a specific runtime.
    ///
    /// Defaults to [`AsyncVocabulary::default`].
    #[must_use]
    pub fn with_async_vocabulary(mut self, vocabulary: AsyncVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Register the handler for `M`, regardless of its signature.
    ///
    /// Without it, typed finalisers use their message type and [`raw_target`] falls back to
    /// the type of the first argument.
    ///
    /// [`raw_target`]: MessageHandlerBuilder::raw_target
    #[must_use]
    pub fn for_message_type<M: ?Sized + 'static>(self) -> Self {
        self.for_message_identity(TypeIdentity::of::<M>())
    }

    #[must_use]
    pub fn for_message_identity(mut self, message_type: TypeIdentity) -> Self {
        self.message_type = Some(message_type);
        self
    }

    /// Finalise the builder with an async function or closure.
    ///
    /// ```rust
    /// use service_bus_common::context::ServiceBusContext;
    /// use service_bus_common::handlers::{HandlerFuture, MessageHandler};
    /// use service_bus_common::messages::Message;
    /// use service_bus_common::method_signature;
    /// use service_bus_common::reflection::TypeCatalog;
    /// use std::sync::Arc;
    ///
    /// #[derive(Debug)]
    /// struct OrderPlaced;
    ///
    /// impl Message for OrderPlaced {}
    ///
    /// async fn on_order(
    ///     _order: Arc<OrderPlaced>,
    ///     _context: Arc<dyn ServiceBusContext>,
    /// ) -> Result<(), anyhow::Error> {
    ///     Ok(())
    /// }
    ///
    /// let mut catalog = TypeCatalog::new();
    /// catalog.register_class::<OrderPlaced>();
    ///
    /// let handler = MessageHandler::builder(
    ///     &catalog,
    ///     method_signature!(fn on_order(order: OrderPlaced, context) -> HandlerFuture),
    /// )
    /// .handler(on_order)
    /// .unwrap();
    ///
    /// assert!(handler.return_declaration().is_future_like());
    /// assert_eq!(handler.arguments()[0].type_class_name(), Some(std::any::type_name::<OrderPlaced>()));
    /// ```
    pub fn handler<M, F>(self, handler: F) -> Result<MessageHandler, IntrospectionError>
    where
        M: Message,
        F: AsyncClosure<M>,
    {
        self.raw_handler(ClosureHandler(handler))
    }

    /// Finalise the builder with a type implementing [`Handler`].
    pub fn raw_handler<M, H>(self, handler: H) -> Result<MessageHandler, IntrospectionError>
    where
        M: Message,
        H: Handler<M>,
    {
        self.typed(Arc::new(handler))
    }

    /// A version of [`MessageHandlerBuilder::raw_handler`] for already Arc-ed handlers.
    pub fn raw_arc_handler<M: Message>(
        self,
        handler: Arc<dyn Handler<M>>,
    ) -> Result<MessageHandler, IntrospectionError> {
        self.typed(handler)
    }

    /// Finalise the builder with an already type-erased invocation target.
    pub fn raw_target(self, target: InvocationTarget) -> Result<MessageHandler, IntrospectionError> {
        self.build(None, target)
    }

    fn typed<M, H>(self, handler: Arc<H>) -> Result<MessageHandler, IntrospectionError>
    where
        M: Message,
        H: Handler<M> + ?Sized,
    {
        self.build(Some(TypeIdentity::of::<M>()), invocation_target(handler))
    }

    fn build(
        self,
        handled: Option<TypeIdentity>,
        target: InvocationTarget,
    ) -> Result<MessageHandler, IntrospectionError> {
        let method_name = self.signature.name().to_owned();
        match self.describe(handled, target) {
            Ok(handler) => {
                tracing::debug!(
                    method = %handler.method_name,
                    message_type = %handler.message_type,
                    arguments = handler.arguments.len(),
                    "Registered message handler"
                );
                Ok(handler)
            }
            Err(e) => {
                tracing::error!(
                    method = %method_name,
                    error = %e,
                    "Rejected message handler with an unsupported signature"
                );
                Err(e)
            }
        }
    }

    fn describe(
        self,
        handled: Option<TypeIdentity>,
        target: InvocationTarget,
    ) -> Result<MessageHandler, IntrospectionError> {
        let method_name = self.signature.name();

        let arguments = self
            .signature
            .parameters()
            .iter()
            .enumerate()
            .map(|(index, parameter)| HandlerArgument::new(parameter, index + 1, self.catalog))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| e.in_method(method_name))?;

        let return_declaration = match self.signature.return_type() {
            Some(declared) => ReturnDeclaration::create(declared, &self.vocabulary)
                .map_err(|e| e.in_method(method_name))?,
            None => ReturnDeclaration::create_void(),
        };

        let message_type = self
            .message_type
            .or(handled)
            .or_else(|| arguments.first().and_then(HandlerArgument::type_class))
            .ok_or_else(|| IntrospectionError::MissingMessageType {
                method: method_name.to_owned(),
            })?;

        Ok(MessageHandler {
            message_type,
            method_name: method_name.to_owned(),
            arguments,
            return_declaration,
            options: self.options,
            description: self.description,
            target,
        })
    }
}
