use crate::handlers::{IntrospectionError, ParameterSignature, TypeSignature};
use crate::reflection::{TypeCatalog, TypeIdentity};

/// The declared type of a [`HandlerArgument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentType {
    /// A class or an interface registered in the [`TypeCatalog`].
    ///
    /// Its ancestors are captured when the argument is described, nearest first.
    Object {
        class: TypeIdentity,
        ancestors: Vec<TypeIdentity>,
    },
    /// Anything else - primitives, strings, collections, unregistered types.
    Scalar(TypeIdentity),
}

/// One argument of a handler method.
///
/// Built once, when the handler is registered, and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerArgument {
    name: String,
    position: usize,
    declared: Option<ArgumentType>,
}

impl HandlerArgument {
    /// Describe `parameter`, the `position`-th (1-based) parameter of a method.
    ///
    /// Fails with [`IntrospectionError::UnsupportedParameterShape`] if the parameter declares a
    /// union type.
    pub fn new(
        parameter: &ParameterSignature,
        position: usize,
        catalog: &TypeCatalog,
    ) -> Result<Self, IntrospectionError> {
        let declared = match &parameter.declared {
            None => None,
            Some(TypeSignature::Named(identity)) => Some(if catalog.is_object_type(identity) {
                ArgumentType::Object {
                    class: *identity,
                    ancestors: catalog.ancestors(identity),
                }
            } else {
                ArgumentType::Scalar(*identity)
            }),
            Some(union @ TypeSignature::Union(_)) => {
                return Err(IntrospectionError::UnsupportedParameterShape {
                    method: String::new(),
                    argument: parameter.name.clone(),
                    declared: union.member_names(),
                })
            }
        };

        Ok(Self {
            name: parameter.name.clone(),
            position,
            declared,
        })
    }

    pub fn argument_name(&self) -> &str {
        &self.name
    }

    /// 1-based position in the method signature.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn has_type(&self) -> bool {
        self.declared.is_some()
    }

    pub fn is_object_type(&self) -> bool {
        matches!(self.declared, Some(ArgumentType::Object { .. }))
    }

    pub fn declared_type(&self) -> Option<&ArgumentType> {
        self.declared.as_ref()
    }

    /// The class or interface of an object-typed argument.
    pub fn type_class(&self) -> Option<TypeIdentity> {
        match &self.declared {
            Some(ArgumentType::Object { class, .. }) => Some(*class),
            _ => None,
        }
    }

    /// The name of the class or interface of an object-typed argument.
    pub fn type_class_name(&self) -> Option<&'static str> {
        self.type_class().map(|class| class.name())
    }

    /// Returns `true` if the argument is an object and its type is `T` or one of
    /// its descendants/implementors. Scalars and untyped arguments are never assignable.
    pub fn is_assignable_to<T: ?Sized + 'static>(&self) -> bool {
        self.is_assignable_to_identity(&TypeIdentity::of::<T>())
    }

    pub fn is_assignable_to_identity(&self, candidate: &TypeIdentity) -> bool {
        match &self.declared {
            Some(ArgumentType::Object { class, ancestors }) => {
                class == candidate || ancestors.contains(candidate)
            }
            _ => false,
        }
    }
}
