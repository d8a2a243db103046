/// Errors raised by the reflection utilities.
///
/// They are always propagated to the caller (framework bootstrap or test code): a failed lookup
/// is never turned into a default value.
#[derive(thiserror::Error, Debug)]
pub enum ReflectionError {
    /// No type in the object's ancestor chain declares a field with that name.
    #[error("Property `{field}` not exists in `{type_name}`")]
    UnknownField {
        field: String,
        type_name: &'static str,
    },
    /// The field exists, but it does not hold a value of the requested type.
    #[error("Property `{field}` of `{type_name}` is not of type `{expected}`")]
    FieldTypeMismatch {
        field: String,
        type_name: &'static str,
        expected: &'static str,
    },
    /// The method could not be invoked - either it does not exist or it rejected its arguments.
    #[error("Failed to invoke `{method}` on `{type_name}`")]
    ReflectionInvocationFailed {
        method: String,
        type_name: &'static str,
        #[source]
        source: anyhow::Error,
    },
    /// The type could not be resolved, or it cannot be instantiated without its constructor.
    #[error("Class `{0}` not exists")]
    TypeNotFound(String),
}
