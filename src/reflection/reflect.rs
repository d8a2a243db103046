//! Explicit field and method accessors, standing in for runtime reflection.
//!
//! A type opts in by implementing [`Reflect`]: it describes which fields can be read and
//! written by name, which methods can be invoked by name, which embedded value plays the role
//! of its parent and how to build a "blank" instance without running its regular constructor.
//!
//! The accessor table is rebuilt on every call: there is no cache and no shared state, so the
//! functions in this module are re-entrant and can be used concurrently on independent objects.
use crate::reflection::ReflectionError;
use std::any::{type_name, Any};

/// Types whose fields and methods can be accessed by name.
///
/// # Example
///
/// ```rust
/// use service_bus_common::reflection::{read_field, Reflect, Reflection};
///
/// struct Account {
///     balance: u64,
/// }
///
/// impl Reflect for Account {
///     fn reflection() -> Reflection<Self> {
///         Reflection::<Self>::new().field("balance", |a| &a.balance, |a| &mut a.balance)
///     }
/// }
///
/// let account = Account { balance: 42 };
/// assert_eq!(read_field::<_, u64>(&account, "balance").unwrap(), 42);
/// ```
pub trait Reflect: Sized + 'static {
    fn reflection() -> Reflection<Self>;
}

/// The value returned by a reflected method.
pub type MethodOutput = Result<Box<dyn Any + Send>, anyhow::Error>;

/// The signature of a reflected method.
pub type MethodInvoker<T> = fn(&mut T, Arguments) -> MethodOutput;

/// Positional arguments passed to a reflected method.
#[derive(Default)]
pub struct Arguments(Vec<Option<Box<dyn Any + Send>>>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an argument.
    #[must_use]
    pub fn with<V: Any + Send>(mut self, value: V) -> Self {
        self.0.push(Some(Box::new(value)));
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take the argument at `position` (0-based) out of the list.
    ///
    /// It fails if the argument is missing, was already taken or is not a `V`.
    pub fn take<V: Any>(&mut self, position: usize) -> Result<V, anyhow::Error> {
        let slot = self
            .0
            .get_mut(position)
            .ok_or_else(|| anyhow::anyhow!("Missing argument at position {}", position))?;
        let value = slot
            .take()
            .ok_or_else(|| anyhow::anyhow!("Argument at position {} was already taken", position))?;
        match value.downcast::<V>() {
            Ok(value) => Ok(*value),
            Err(value) => {
                // Put it back: a later `take` with the right type should still succeed.
                *slot = Some(value);
                Err(anyhow::anyhow!(
                    "Argument at position {} is not of type `{}`",
                    position,
                    type_name::<V>()
                ))
            }
        }
    }
}

trait FieldAccess<T> {
    fn get<'a>(&self, object: &'a T) -> &'a dyn Any;
    fn get_mut<'a>(&self, object: &'a mut T) -> &'a mut dyn Any;
}

struct TypedField<T, V> {
    get: fn(&T) -> &V,
    get_mut: fn(&mut T) -> &mut V,
}

impl<T, V: Any> FieldAccess<T> for TypedField<T, V> {
    fn get<'a>(&self, object: &'a T) -> &'a dyn Any {
        (self.get)(object)
    }

    fn get_mut<'a>(&self, object: &'a mut T) -> &'a mut dyn Any {
        (self.get_mut)(object)
    }
}

/// Type-erased link from a type to the value it embeds as its parent.
trait ParentAccess<T> {
    fn find_field<'a>(&self, object: &'a T, name: &str) -> Option<&'a dyn Any>;
    fn find_field_mut<'a>(&self, object: &'a mut T, name: &str) -> Option<&'a mut dyn Any>;
    fn invoke(&self, object: &mut T, name: &str, arguments: Arguments) -> Option<MethodOutput>;
}

struct ParentLink<T, P> {
    get: fn(&T) -> &P,
    get_mut: fn(&mut T) -> &mut P,
}

impl<T, P: Reflect> ParentAccess<T> for ParentLink<T, P> {
    fn find_field<'a>(&self, object: &'a T, name: &str) -> Option<&'a dyn Any> {
        P::reflection().find_field((self.get)(object), name)
    }

    fn find_field_mut<'a>(&self, object: &'a mut T, name: &str) -> Option<&'a mut dyn Any> {
        P::reflection().find_field_mut((self.get_mut)(object), name)
    }

    fn invoke(&self, object: &mut T, name: &str, arguments: Arguments) -> Option<MethodOutput> {
        P::reflection().invoke((self.get_mut)(object), name, arguments)
    }
}

/// The accessor table of a [`Reflect`] type.
pub struct Reflection<T> {
    fields: Vec<(&'static str, Box<dyn FieldAccess<T>>)>,
    methods: Vec<(&'static str, MethodInvoker<T>)>,
    parent: Option<Box<dyn ParentAccess<T>>>,
    blank: Option<fn() -> T>,
}

impl<T: 'static> Default for Reflection<T> {
    fn default() -> Self {
        Self {
            fields: vec![],
            methods: vec![],
            parent: None,
            blank: None,
        }
    }
}

impl<T: 'static> Reflection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expose a field under `name`.
    #[must_use]
    pub fn field<V: Any>(
        mut self,
        name: &'static str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> Self {
        self.fields
            .push((name, Box::new(TypedField { get, get_mut })));
        self
    }

    /// Expose a method under `name`.
    #[must_use]
    pub fn method(mut self, name: &'static str, invoker: MethodInvoker<T>) -> Self {
        self.methods.push((name, invoker));
        self
    }

    /// Declare the embedded value that plays the role of this type's parent.
    ///
    /// Lookups that fail on this type continue on the parent, and on the parent's parent,
    /// nearest first.
    #[must_use]
    pub fn extends<P: Reflect>(mut self, get: fn(&T) -> &P, get_mut: fn(&mut T) -> &mut P) -> Self {
        self.parent = Some(Box::new(ParentLink { get, get_mut }));
        self
    }

    /// How to build an instance without going through the type's regular constructor.
    #[must_use]
    pub fn blank(mut self, instantiate: fn() -> T) -> Self {
        self.blank = Some(instantiate);
        self
    }

    pub(crate) fn instantiate_blank(&self) -> Option<T> {
        self.blank.map(|instantiate| instantiate())
    }

    fn find_field<'a>(&self, object: &'a T, name: &str) -> Option<&'a dyn Any> {
        match self.fields.iter().find(|(field, _)| *field == name) {
            Some((_, access)) => Some(access.get(object)),
            None => self
                .parent
                .as_ref()
                .and_then(|parent| parent.find_field(object, name)),
        }
    }

    fn find_field_mut<'a>(&self, object: &'a mut T, name: &str) -> Option<&'a mut dyn Any> {
        match self.fields.iter().find(|(field, _)| *field == name) {
            Some((_, access)) => Some(access.get_mut(object)),
            None => self
                .parent
                .as_ref()
                .and_then(|parent| parent.find_field_mut(object, name)),
        }
    }

    fn invoke(&self, object: &mut T, name: &str, arguments: Arguments) -> Option<MethodOutput> {
        match self.methods.iter().find(|(method, _)| *method == name) {
            Some((_, invoker)) => Some(invoker(object, arguments)),
            None => self
                .parent
                .as_ref()
                .and_then(|parent| parent.invoke(object, name, arguments)),
        }
    }
}

/// Read the value of a field, searching `object`'s own fields first and then its ancestors.
pub fn read_field<T: Reflect, V: Any + Clone>(object: &T, name: &str) -> Result<V, ReflectionError> {
    let value = T::reflection()
        .find_field(object, name)
        .ok_or_else(|| unknown_field::<T>(name))?;
    value
        .downcast_ref::<V>()
        .cloned()
        .ok_or_else(|| field_type_mismatch::<T, V>(name))
}

/// Overwrite the value of a field, searching `object`'s own fields first and then its ancestors.
pub fn write_field<T: Reflect, V: Any>(
    object: &mut T,
    name: &str,
    value: V,
) -> Result<(), ReflectionError> {
    let slot = T::reflection()
        .find_field_mut(object, name)
        .ok_or_else(|| unknown_field::<T>(name))?;
    let slot = slot
        .downcast_mut::<V>()
        .ok_or_else(|| field_type_mismatch::<T, V>(name))?;
    *slot = value;
    Ok(())
}

/// Invoke a method by name, searching `object`'s own methods first and then its ancestors.
pub fn invoke_method<T: Reflect>(
    object: &mut T,
    name: &str,
    arguments: Arguments,
) -> Result<Box<dyn Any + Send>, ReflectionError> {
    let outcome = T::reflection().invoke(object, name, arguments).unwrap_or_else(|| {
        Err(anyhow::anyhow!(
            "Method `{}` does not exist in `{}`",
            name,
            type_name::<T>()
        ))
    });
    outcome.map_err(|source| ReflectionError::ReflectionInvocationFailed {
        method: name.to_owned(),
        type_name: type_name::<T>(),
        source,
    })
}

/// Build an instance of `T` without running its regular constructor.
pub fn instantiate_without_constructor<T: Reflect>() -> Result<T, ReflectionError> {
    T::reflection()
        .instantiate_blank()
        .ok_or_else(|| ReflectionError::TypeNotFound(type_name::<T>().to_owned()))
}

fn unknown_field<T>(name: &str) -> ReflectionError {
    ReflectionError::UnknownField {
        field: name.to_owned(),
        type_name: type_name::<T>(),
    }
}

fn field_type_mismatch<T, V>(name: &str) -> ReflectionError {
    ReflectionError::FieldTypeMismatch {
        field: name.to_owned(),
        type_name: type_name::<T>(),
        expected: type_name::<V>(),
    }
}
