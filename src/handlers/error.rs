use std::fmt;

/// Returned when a handler signature cannot be turned into a [`MessageHandler`] descriptor.
///
/// Both variants are fatal: the handler must not be registered.
///
/// [`MessageHandler`]: crate::handlers::MessageHandler
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IntrospectionError {
    /// The handler declares a union return type.
    #[error("Union return types are not supported")]
    UnsupportedReturnShape {
        /// The offending method (empty if the return type was classified on its own).
        method: String,
        /// The members of the union.
        declared: Vec<&'static str>,
    },
    /// One of the handler arguments declares a union type.
    #[error("Union types are not supported for argument `{argument}` of `{}`", DisplayMethod(.method))]
    UnsupportedParameterShape {
        method: String,
        argument: String,
        declared: Vec<&'static str>,
    },
    /// A raw invocation target was provided, but the message type could not be determined.
    #[error("Cannot determine the message type handled by `{method}`: declare it explicitly or type its first argument")]
    MissingMessageType { method: String },
}

impl IntrospectionError {
    /// Attach the name of the method being described.
    pub(crate) fn in_method(mut self, name: &str) -> Self {
        match &mut self {
            Self::UnsupportedReturnShape { method, .. }
            | Self::UnsupportedParameterShape { method, .. }
            | Self::MissingMessageType { method } => {
                if method.is_empty() {
                    *method = name.to_owned();
                }
            }
        }
        self
    }

    /// The name of the method that was rejected.
    pub fn method(&self) -> &str {
        match self {
            Self::UnsupportedReturnShape { method, .. }
            | Self::UnsupportedParameterShape { method, .. }
            | Self::MissingMessageType { method } => method,
        }
    }
}

struct DisplayMethod<'a>(&'a str);

impl fmt::Display for DisplayMethod<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<unknown method>")
        } else {
            f.write_str(self.0)
        }
    }
}

/// The invocation target of a handler received a message of a type it cannot process.
#[derive(thiserror::Error, Debug)]
#[error("A handler for `{expected}` messages cannot process a `{received}` message")]
pub struct UnexpectedMessageType {
    pub expected: &'static str,
    pub received: &'static str,
}
