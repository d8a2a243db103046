//! Message-local storage: a type-map that lives as long as the execution of one message.
//!
//! Executors open a fresh storage scope around every handler invocation. Anything running
//! inside that invocation (the handler, the `ServiceBusContext` implementation, helpers they
//! call into) can stash and retrieve values by type without threading them through arguments,
//! e.g. the tenant a message belongs to, so that it can be attached to log records.
#![allow(clippy::declare_interior_mutable_const)] // silence tokio::task_local warning

use std::cell::RefCell;
use std::future::Future;
use task_local_extensions::Extensions;

tokio::task_local! {
    static MESSAGE_LOCAL: RefCell<Extensions>;
}

/// Run `fut` with an empty message-local storage.
/// The storage, and everything put into it, is dropped when `fut` completes.
pub(crate) async fn scoped<T>(fut: impl Future<Output = T>) -> T {
    MESSAGE_LOCAL.scope(RefCell::new(Extensions::new()), fut).await
}

/// `None` outside of a message execution.
fn with_storage<R>(f: impl FnOnce(&mut Extensions) -> R) -> Option<R> {
    MESSAGE_LOCAL.try_with(|storage| f(&mut storage.borrow_mut())).ok()
}

/// Retrieve a copy of the item of type `T` in message-local storage.
///
/// It returns `None` if there is no such item or if it is called outside of a message
/// execution.
pub fn get_message_local_item<T: Send + Sync + Clone + 'static>() -> Option<T> {
    with_storage(|storage| storage.get::<T>().cloned()).flatten()
}

/// Put an item in message-local storage, replacing the previous item of the same type.
pub fn set_message_local_item<T: Send + Sync + 'static>(item: T) {
    if with_storage(|storage| storage.insert(item)).is_none() {
        tracing::warn!(
            item_type = std::any::type_name::<T>(),
            "Set a message-local item outside of a message execution."
        );
    }
}

/// Take the item of type `T` out of message-local storage.
pub fn remove_message_local_item<T: Send + Sync + 'static>() -> Option<T> {
    with_storage(|storage| storage.remove::<T>()).flatten()
}
