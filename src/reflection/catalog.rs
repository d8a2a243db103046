use crate::reflection::{Reflect, ReflectionError, TypeIdentity};
use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet, VecDeque};

/// Whether a registered type is a concrete class or an interface (a trait object).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
}

type BlankInstantiator = fn() -> Option<Box<dyn Any + Send + Sync>>;

struct CatalogEntry {
    identity: TypeIdentity,
    kind: TypeKind,
    parents: Vec<TypeIdentity>,
    blank: Option<BlankInstantiator>,
}

/// The registration table of object types known to the application.
///
/// The handler introspection layer asks the catalog two questions:
///
/// - is a declared parameter type a class or an interface (an "object type"), as opposed to a
///   scalar?
/// - what are the ancestors of an object type, to decide whether an argument is assignable to
///   another type?
///
/// The catalog also resolves type names for [`TypeCatalog::instantiate_without_constructor`].
///
/// # Lifecycle
///
/// A catalog is populated once, at start-up, and only read afterwards: share it behind an `Arc`
/// (or a `&'static`) and it can be queried concurrently without locking.
///
/// # Example
///
/// ```rust
/// use service_bus_common::reflection::{TypeCatalog, TypeIdentity};
///
/// trait Event {}
/// struct DomainEvent;
/// struct OrderPlaced;
///
/// let mut catalog = TypeCatalog::new();
/// catalog.register_interface::<dyn Event>();
/// catalog.register_class::<DomainEvent>().implements::<dyn Event>();
/// catalog.register_class::<OrderPlaced>().extends::<DomainEvent>();
///
/// assert!(catalog.is_subtype(
///     &TypeIdentity::of::<OrderPlaced>(),
///     &TypeIdentity::of::<dyn Event>()
/// ));
/// ```
#[derive(Default)]
pub struct TypeCatalog {
    entries: HashMap<TypeId, CatalogEntry>,
}

/// A handle to declare the parents of a type that was just registered.
///
/// Returned by the `register_*` methods on [`TypeCatalog`].
pub struct TypeRegistration<'a> {
    entry: &'a mut CatalogEntry,
}

impl<'a> TypeRegistration<'a> {
    /// Declare `P` as a parent class.
    pub fn extends<P: ?Sized + 'static>(self) -> Self {
        self.with_parent(TypeIdentity::of::<P>())
    }

    /// Declare `P` as an implemented interface.
    pub fn implements<P: ?Sized + 'static>(self) -> Self {
        self.with_parent(TypeIdentity::of::<P>())
    }

    /// Declare a parent by identity.
    pub fn with_parent(self, parent: TypeIdentity) -> Self {
        if parent != self.entry.identity && !self.entry.parents.contains(&parent) {
            self.entry.parents.push(parent);
        }
        self
    }
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a concrete type.
    ///
    /// Registering the same type twice keeps the parents declared the first time.
    pub fn register_class<T: 'static>(&mut self) -> TypeRegistration<'_> {
        self.register(TypeIdentity::of::<T>(), TypeKind::Class, None)
    }

    /// Register an interface - usually a trait object, e.g. `dyn Event`.
    pub fn register_interface<T: ?Sized + 'static>(&mut self) -> TypeRegistration<'_> {
        self.register(TypeIdentity::of::<T>(), TypeKind::Interface, None)
    }

    /// Register a concrete [`Reflect`] type, making it available to
    /// [`TypeCatalog::instantiate_without_constructor`].
    pub fn register_reflect<T: Reflect + Send + Sync>(&mut self) -> TypeRegistration<'_> {
        self.register(
            TypeIdentity::of::<T>(),
            TypeKind::Class,
            Some(instantiate_blank::<T> as BlankInstantiator),
        )
    }

    fn register(
        &mut self,
        identity: TypeIdentity,
        kind: TypeKind,
        blank: Option<BlankInstantiator>,
    ) -> TypeRegistration<'_> {
        let entry = self
            .entries
            .entry(identity.id())
            .or_insert_with(|| CatalogEntry {
                identity,
                kind,
                parents: vec![],
                blank: None,
            });
        entry.kind = kind;
        if blank.is_some() {
            entry.blank = blank;
        }
        TypeRegistration { entry }
    }

    /// Returns `true` if `identity` was registered as a class or an interface.
    pub fn is_object_type(&self, identity: &TypeIdentity) -> bool {
        self.entries.contains_key(&identity.id())
    }

    pub fn kind(&self, identity: &TypeIdentity) -> Option<TypeKind> {
        self.entries.get(&identity.id()).map(|entry| entry.kind)
    }

    /// All the ancestors of `identity`, nearest first, without duplicates.
    ///
    /// Parents that were declared but never registered themselves are included, but their own
    /// ancestors are unknown.
    pub fn ancestors(&self, identity: &TypeIdentity) -> Vec<TypeIdentity> {
        let mut ancestors = vec![];
        let mut seen = HashSet::from([identity.id()]);
        let mut queue = VecDeque::from([*identity]);

        while let Some(current) = queue.pop_front() {
            let Some(entry) = self.entries.get(&current.id()) else {
                continue;
            };
            for parent in &entry.parents {
                if seen.insert(parent.id()) {
                    ancestors.push(*parent);
                    queue.push_back(*parent);
                }
            }
        }
        ancestors
    }

    /// Returns `true` if `identity` is `candidate` or one of its descendants/implementors.
    pub fn is_subtype(&self, identity: &TypeIdentity, candidate: &TypeIdentity) -> bool {
        identity == candidate || self.ancestors(identity).contains(candidate)
    }

    /// Resolve a registered type by name.
    ///
    /// Fully qualified names always resolve. A name without its module path resolves only if
    /// exactly one registered type carries it.
    pub fn resolve(&self, name: &str) -> Option<TypeIdentity> {
        let mut by_short_name = None;
        let mut ambiguous = false;

        for entry in self.entries.values() {
            if entry.identity.name() == name {
                return Some(entry.identity);
            }
            if entry.identity.short_name() == name {
                ambiguous |= by_short_name.is_some();
                by_short_name = Some(entry.identity);
            }
        }

        if ambiguous {
            None
        } else {
            by_short_name
        }
    }

    /// Build an instance of the named type without running its regular constructor.
    ///
    /// Only types registered via [`TypeCatalog::register_reflect`] whose [`Reflection`] declares
    /// a [`blank`] instantiator can be built this way; everything else fails with
    /// [`ReflectionError::TypeNotFound`].
    ///
    /// [`Reflection`]: crate::reflection::Reflection
    /// [`blank`]: crate::reflection::Reflection::blank
    pub fn instantiate_without_constructor(
        &self,
        name: &str,
    ) -> Result<Box<dyn Any + Send + Sync>, ReflectionError> {
        self.resolve(name)
            .and_then(|identity| self.entries.get(&identity.id()))
            .and_then(|entry| entry.blank)
            .and_then(|instantiate| instantiate())
            .ok_or_else(|| ReflectionError::TypeNotFound(name.to_owned()))
    }
}

fn instantiate_blank<T: Reflect + Send + Sync>() -> Option<Box<dyn Any + Send + Sync>> {
    T::reflection()
        .instantiate_blank()
        .map(|instance| Box::new(instance) as Box<dyn Any + Send + Sync>)
}
