use crate::context::metadata::{keys, IncomingMessageMetadata, MetadataValue};
use crate::messages::Message;
use std::error::Error;
use std::sync::Arc;
use tracing::Level;

/// Additional key/value pairs attached to a log record.
pub type LogExtra<'a> = &'a [(&'a str, MetadataValue)];

/// A logger bound to the message currently being processed.
///
/// Every record emitted through a `ContextLogger` is enriched with the identity of the message
/// being processed - its id, its trace id and how many times its delivery was retried - so
/// that log lines can be correlated without each handler having to add those fields by hand.
pub trait ContextLogger: Send + Sync {
    fn log(&self, level: Level, message: &str, extra: LogExtra<'_>);

    /// Log an error together with its chain of causes.
    fn throwable(&self, error: &(dyn Error + 'static), extra: LogExtra<'_>, level: Level) {
        let mut causes = vec![];
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        let mut enriched = extra.to_vec();
        if !causes.is_empty() {
            enriched.push(("caused_by", causes.join(": ").into()));
        }
        self.log(level, &error.to_string(), &enriched);
    }

    fn error(&self, message: &str, extra: LogExtra<'_>) {
        self.log(Level::ERROR, message, extra)
    }

    fn warning(&self, message: &str, extra: LogExtra<'_>) {
        self.log(Level::WARN, message, extra)
    }

    fn info(&self, message: &str, extra: LogExtra<'_>) {
        self.log(Level::INFO, message, extra)
    }

    fn debug(&self, message: &str, extra: LogExtra<'_>) {
        self.log(Level::DEBUG, message, extra)
    }
}

/// A [`ContextLogger`] emitting `tracing` events.
///
/// The message type, message id, trace id and retry count are recorded as structured fields;
/// the caller-supplied extras are recorded as a single `extra` field.
#[derive(Debug, Clone)]
pub struct DefaultContextLogger {
    message: Arc<dyn Message>,
    metadata: Arc<dyn IncomingMessageMetadata>,
}

impl DefaultContextLogger {
    pub fn new(message: Arc<dyn Message>, metadata: Arc<dyn IncomingMessageMetadata>) -> Self {
        Self { message, metadata }
    }

    /// How many times the delivery of the current message was retried. Defaults to 0.
    pub fn retries(&self) -> i64 {
        self.metadata
            .get(keys::SERVICE_BUS_MESSAGE_RETRY_COUNT, MetadataValue::Integer(0))
            .as_integer()
            .unwrap_or(0)
    }

    /// The fields every record is enriched with.
    pub fn enrichment(&self) -> Vec<(&'static str, MetadataValue)> {
        let Enrichment {
            incoming_message,
            message_id,
            trace_id,
            retries,
        } = self.fields();
        vec![
            ("incoming_message", incoming_message.into()),
            ("message_id", message_id.into()),
            ("trace_id", trace_id.into()),
            ("retries", retries.into()),
        ]
    }

    fn fields(&self) -> Enrichment<'_> {
        Enrichment {
            incoming_message: self.message.message_type(),
            message_id: self.metadata.message_id(),
            trace_id: self.metadata.trace_id(),
            retries: self.retries(),
        }
    }
}

/// Shared by [`DefaultContextLogger::enrichment`] and the emitted `tracing` events.
#[derive(Debug, PartialEq)]
struct Enrichment<'a> {
    incoming_message: &'static str,
    message_id: &'a str,
    trace_id: &'a str,
    retries: i64,
}

impl ContextLogger for DefaultContextLogger {
    fn log(&self, level: Level, message: &str, extra: LogExtra<'_>) {
        let Enrichment {
            incoming_message,
            message_id,
            trace_id,
            retries,
        } = self.fields();

        // `tracing` needs the level at compile time.
        macro_rules! emit {
            ($macro:ident) => {
                tracing::$macro!(
                    incoming_message,
                    message_id,
                    trace_id,
                    retries,
                    extra = ?extra,
                    "{}",
                    message
                )
            };
        }

        match level {
            Level::ERROR => emit!(error),
            Level::WARN => emit!(warn),
            Level::INFO => emit!(info),
            Level::DEBUG => emit!(debug),
            _ => emit!(trace),
        }
    }
}
