use crate::handlers::{HandlerFuture, HandlerStream, IntrospectionError, TypeSignature};
use crate::reflection::TypeIdentity;

/// The marker types a runtime uses for asynchronous results.
///
/// [`ReturnDeclaration::create`] compares declared return types against these identities.
/// The default vocabulary is this crate's [`HandlerFuture`] and [`HandlerStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsyncVocabulary {
    pub future: TypeIdentity,
    pub lazy_sequence: TypeIdentity,
}

impl AsyncVocabulary {
    pub fn new(future: TypeIdentity, lazy_sequence: TypeIdentity) -> Self {
        Self {
            future,
            lazy_sequence,
        }
    }

    /// A vocabulary built from two marker types.
    pub fn of<F: ?Sized + 'static, S: ?Sized + 'static>() -> Self {
        Self::new(TypeIdentity::of::<F>(), TypeIdentity::of::<S>())
    }
}

impl Default for AsyncVocabulary {
    fn default() -> Self {
        Self::of::<HandlerFuture, HandlerStream>()
    }
}

/// How the result of a handler should be consumed by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnDeclaration {
    /// Nothing to consume.
    Void,
    /// A single asynchronous completion to await.
    Future(TypeIdentity),
    /// A stream of steps the dispatcher drives to completion.
    LazySequence(TypeIdentity),
    /// Any other value: the call is synchronous.
    Other(TypeIdentity),
}

impl ReturnDeclaration {
    /// Classify a declared return type. `()` is [`ReturnDeclaration::Void`].
    ///
    /// Union return types are rejected with [`IntrospectionError::UnsupportedReturnShape`].
    pub fn create(
        declared: &TypeSignature,
        vocabulary: &AsyncVocabulary,
    ) -> Result<Self, IntrospectionError> {
        match declared {
            TypeSignature::Named(identity) if identity.is::<()>() => Ok(Self::Void),
            TypeSignature::Named(identity) if *identity == vocabulary.future => {
                Ok(Self::Future(*identity))
            }
            TypeSignature::Named(identity) if *identity == vocabulary.lazy_sequence => {
                Ok(Self::LazySequence(*identity))
            }
            TypeSignature::Named(identity) => Ok(Self::Other(*identity)),
            TypeSignature::Union(_) => Err(IntrospectionError::UnsupportedReturnShape {
                method: String::new(),
                declared: declared.member_names(),
            }),
        }
    }

    /// Used for methods without a declared return type.
    pub fn create_void() -> Self {
        Self::Void
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }

    pub fn is_future_like(&self) -> bool {
        matches!(self, Self::Future(_))
    }

    pub fn is_lazy_sequence_like(&self) -> bool {
        matches!(self, Self::LazySequence(_))
    }
}
