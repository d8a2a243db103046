//! The message abstraction shared by handlers, contexts and executors.
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// A message (command or event) travelling through the bus.
///
/// Messages move around as `Arc<dyn Message>`; handlers get them back with their concrete type.
/// Opting in is a one-liner:
///
/// ```rust
/// use service_bus_common::messages::Message;
///
/// #[derive(Debug)]
/// struct OrderPlaced {
///     order_id: u64,
/// }
///
/// impl Message for OrderPlaced {}
/// ```
pub trait Message: AsAny + fmt::Debug {
    /// The fully qualified name of the concrete message type.
    fn message_type(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// A [`Message`] announcing something that already happened, as opposed to a command.
pub trait Event: Message {}

/// Type-erasure plumbing for [`Message`]. Implemented for every eligible type.
#[doc(hidden)]
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl dyn Message {
    /// Returns `true` if the message is a `T`.
    pub fn is<T: Message>(&self) -> bool {
        AsAny::as_any(self).is::<T>()
    }

    pub fn downcast_ref<T: Message>(&self) -> Option<&T> {
        AsAny::as_any(self).downcast_ref::<T>()
    }
}

/// Recover the concrete type of a shared message.
///
/// On failure the original message is handed back, untouched.
pub fn downcast_message<T: Message>(
    message: Arc<dyn Message>,
) -> Result<Arc<T>, Arc<dyn Message>> {
    AsAny::into_any(Arc::clone(&message))
        .downcast::<T>()
        .map_err(|_| message)
}
