//! The per-message execution context handed to message handlers, and the metadata travelling
//! alongside each message. Check out [`ServiceBusContext`] as a starting point.
pub use error::MessageDeliveryFailed;
pub use logger::{ContextLogger, DefaultContextLogger, LogExtra};
pub use metadata::{
    keys, Headers, IncomingMessageMetadata, MetadataValue, OutcomeMessageMetadata,
    ReceivedMetadata, Variables,
};
pub use service_bus_context::ServiceBusContext;
pub use validation::{ValidationViolation, ValidationViolations};

mod error;
mod logger;
mod metadata;
mod service_bus_context;
mod validation;
