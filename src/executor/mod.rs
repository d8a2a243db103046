//! Executors run incoming messages through their handlers.
//! Check out [`MessageExecutor`] and [`HandlerExecutor`].
pub use error::MessageExecutionFailed;
pub use extensions::{
    get_message_local_item, remove_message_local_item, set_message_local_item,
};
pub use message_executor::{
    DefaultExecutorFactory, HandlerExecutor, MessageExecutor, MessageExecutorFactory,
};

mod error;
mod extensions;
mod message_executor;
