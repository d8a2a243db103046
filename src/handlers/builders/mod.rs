mod message_handler;

pub use message_handler::{HandlerOptions, MessageHandler, MessageHandlerBuilder, NoOptions};
