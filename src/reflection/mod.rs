//! Registration-time type information and explicit accessors.
//!
//! Rust has no runtime reflection: everything the message handler introspection layer needs to
//! know about types is registered explicitly, once, in a [`TypeCatalog`]. Field and method
//! access by name goes through the accessor tables declared by [`Reflect`] implementors.
pub use catalog::{TypeCatalog, TypeKind, TypeRegistration};
pub use error::ReflectionError;
pub use identity::TypeIdentity;
pub use reflect::{
    instantiate_without_constructor, invoke_method, read_field, write_field, Arguments,
    MethodInvoker, MethodOutput, Reflect, Reflection,
};

mod catalog;
mod error;
mod identity;
mod reflect;
