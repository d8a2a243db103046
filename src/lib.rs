//! `service-bus-common` holds the contracts shared by the pieces of a message bus: what a
//! message handler looks like, what execution context it receives and what metadata travels
//! alongside a message.
//!
//! [`MessageHandler`](crate::handlers::MessageHandler) and
//! [`ServiceBusContext`](crate::context::ServiceBusContext) are the best starting points to
//! learn more about what `service-bus-common` provides.
//!
//! There is no transport and no dispatch loop here: they live in the bus runtime, which
//! implements [`ServiceBusContext`](crate::context::ServiceBusContext) and drives
//! [`MessageExecutor`](crate::executor::MessageExecutor)s.

pub mod context;
pub mod delivery;
pub mod executor;
pub mod handlers;
pub mod messages;
pub mod reflection;
pub mod retry;
