//! graft Registry
//!
//! Runtime schema lookup: for each entity type, the ordered attribute
//! descriptors that tell the merge engine which attributes are primitive
//! fields and which are many-to-one or one-to-many associations.
//! The registry is immutable after construction via RegistryBuilder or a
//! JSON SchemaDocument.

mod builder;
mod document;
mod registry;
mod types;

pub use builder::{RegistryBuilder, RegistryError, TypeBuilder};
pub use document::{AttrDocument, SchemaDocument, TypeDocument};
pub use registry::Registry;
pub use types::*;
