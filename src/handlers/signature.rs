use crate::reflection::TypeIdentity;
use std::fmt;

/// A declared type, as written in a handler signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSignature {
    /// A single named type.
    Named(TypeIdentity),
    /// `A | B | ...`.
    ///
    /// Handlers cannot declare union types: this variant exists so that such signatures can be
    /// described, and then rejected.
    Union(Vec<TypeIdentity>),
}

impl TypeSignature {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Named(TypeIdentity::of::<T>())
    }

    pub fn union(members: Vec<TypeIdentity>) -> Self {
        Self::Union(members)
    }

    pub(crate) fn member_names(&self) -> Vec<&'static str> {
        match self {
            Self::Named(identity) => vec![identity.name()],
            Self::Union(members) => members.iter().map(TypeIdentity::name).collect(),
        }
    }
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.member_names().join(" | "))
    }
}

/// A parameter of a handler signature. `declared` is `None` for untyped parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSignature {
    pub name: String,
    pub declared: Option<TypeSignature>,
}

/// The shape of a handler method: its name, its parameters in declaration order and its
/// return type, if one is declared.
///
/// Build it with the fluent API or, more conveniently, with [`method_signature!`]:
///
/// ```rust
/// use service_bus_common::handlers::{HandlerFuture, MethodSignature, TypeSignature};
/// use service_bus_common::method_signature;
///
/// #[derive(Debug)]
/// struct OrderPlaced;
///
/// let from_macro = method_signature!(fn on_order(order: OrderPlaced, context) -> HandlerFuture);
/// let by_hand = MethodSignature::new("on_order")
///     .parameter("order", TypeSignature::of::<OrderPlaced>())
///     .untyped_parameter("context")
///     .returns(TypeSignature::of::<HandlerFuture>());
///
/// assert_eq!(from_macro, by_hand);
/// ```
///
/// [`method_signature!`]: crate::method_signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    name: String,
    parameters: Vec<ParameterSignature>,
    return_type: Option<TypeSignature>,
}

impl MethodSignature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: vec![],
            return_type: None,
        }
    }

    /// Append a typed parameter.
    #[must_use]
    pub fn parameter(mut self, name: impl Into<String>, declared: TypeSignature) -> Self {
        self.parameters.push(ParameterSignature {
            name: name.into(),
            declared: Some(declared),
        });
        self
    }

    /// Append a parameter without a declared type.
    #[must_use]
    pub fn untyped_parameter(mut self, name: impl Into<String>) -> Self {
        self.parameters.push(ParameterSignature {
            name: name.into(),
            declared: None,
        });
        self
    }

    #[must_use]
    pub fn returns(mut self, declared: TypeSignature) -> Self {
        self.return_type = Some(declared);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[ParameterSignature] {
        &self.parameters
    }

    pub fn return_type(&self) -> Option<&TypeSignature> {
        self.return_type.as_ref()
    }
}

/// Describe a handler method with Rust-like syntax.
///
/// - `name: Type` is a typed parameter;
/// - a bare `name` is an untyped parameter;
/// - `A | B` is a union type (rejected when the descriptor is built);
/// - the return type is optional.
///
/// ```rust
/// use service_bus_common::handlers::HandlerStream;
/// use service_bus_common::method_signature;
///
/// struct Refund;
/// struct Chargeback;
///
/// let signature = method_signature!(fn on_dispute(dispute: Refund | Chargeback, context) -> HandlerStream);
///
/// assert_eq!(signature.name(), "on_dispute");
/// assert_eq!(signature.parameters().len(), 2);
/// assert!(signature.parameters()[1].declared.is_none());
/// ```
#[macro_export]
macro_rules! method_signature {
    (@params $signature:expr;) => {
        $signature
    };
    (@params $signature:expr; $arg:ident : $($ty:ty)|+ $(, $($rest:tt)*)?) => {
        $crate::method_signature!(
            @params $signature.parameter(stringify!($arg), $crate::method_signature!(@type $($ty)|+));
            $($($rest)*)?
        )
    };
    (@params $signature:expr; $arg:ident $(, $($rest:tt)*)?) => {
        $crate::method_signature!(
            @params $signature.untyped_parameter(stringify!($arg));
            $($($rest)*)?
        )
    };
    (@type $ty:ty) => {
        $crate::handlers::TypeSignature::of::<$ty>()
    };
    (@type $($ty:ty)|+) => {
        $crate::handlers::TypeSignature::union(vec![$($crate::reflection::TypeIdentity::of::<$ty>()),+])
    };
    (fn $name:ident ($($params:tt)*) $(-> $($ret:ty)|+)?) => {{
        let signature = $crate::method_signature!(
            @params $crate::handlers::MethodSignature::new(stringify!($name));
            $($params)*
        );
        $(let signature = signature.returns($crate::method_signature!(@type $($ret)|+));)?
        signature
    }};
}
