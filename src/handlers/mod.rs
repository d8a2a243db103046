//! Describe message handlers so that a dispatcher can invoke them uniformly.
//!
//! Start from [`MessageHandler::builder`]: it turns a [`MethodSignature`] (usually written with
//! [`method_signature!`](crate::method_signature)) and a handler into an immutable
//! [`MessageHandler`] descriptor.
mod argument;
mod builders;
mod error;
mod handler;
mod return_declaration;
mod signature;

pub use argument::{ArgumentType, HandlerArgument};
pub use builders::{HandlerOptions, MessageHandler, MessageHandlerBuilder, NoOptions};
pub use error::{IntrospectionError, UnexpectedMessageType};
pub use handler::{
    AsyncClosure, ClosureHandler, Handler, HandlerFuture, HandlerResult, HandlerStream,
    InvocationTarget,
};
pub use return_declaration::{AsyncVocabulary, ReturnDeclaration};
pub use signature::{MethodSignature, ParameterSignature, TypeSignature};
