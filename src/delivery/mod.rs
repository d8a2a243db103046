//! Options for outgoing messages. Check out [`DeliveryOptions`].
mod options;

pub use options::DeliveryOptions;
