//! What happens to a message after its processing failed. Check out [`RetryStrategy`].
pub use configuration::RetrySettings;
pub use failure_context::FailureContext;
pub use strategies::{NeverRetry, RetryWithDelay};
pub use strategy::RetryStrategy;

mod configuration;
mod failure_context;
mod strategies;
mod strategy;
