use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// The compile-time identity of a type: its [`TypeId`] and its fully qualified name.
///
/// `TypeIdentity` is what the handler introspection layer compares against instead of type
/// names as strings - two identities are equal if and only if they refer to the same type.
/// The name is kept around for diagnostics and for name-based lookups in a
/// [`TypeCatalog`](crate::reflection::TypeCatalog).
///
/// It works for trait objects as well: `TypeIdentity::of::<dyn Event>()` is how an "interface"
/// is represented.
#[derive(Clone, Copy)]
pub struct TypeIdentity {
    id: TypeId,
    name: &'static str,
}

impl TypeIdentity {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The fully qualified name, as returned by [`std::any::type_name`].
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The name without its module path - e.g. `OrderPlaced` for `my_app::orders::OrderPlaced`.
    ///
    /// Generic arguments are preserved verbatim. The auto-trait bounds of a trait object are
    /// dropped: `dyn my_app::Event + Send + Sync` is `Event`.
    pub fn short_name(&self) -> &'static str {
        let head = &self.name[..bounds_start(self.name)];
        let path = head.split('<').next().unwrap_or(head);
        match path.rfind("::") {
            Some(index) => &head[index + 2..],
            None => head,
        }
    }

    /// Returns `true` if this identity refers to `T`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

/// Where the top-level `+ Bound`s of a type name start, or its length if there are none.
fn bounds_start(name: &str) -> usize {
    let mut depth = 0usize;
    for (index, c) in name.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            '+' if depth == 0 => return name[..index].trim_end().len(),
            _ => {}
        }
    }
    name.len()
}

impl PartialEq for TypeIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeIdentity {}

impl Hash for TypeIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeIdentity").field(&self.name).finish()
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
