//! graft Core Types
//!
//! This crate provides the foundational types shared by every graft crate:
//! - Identity types (EntityHandle, TypeId, Identifier, CollectionRef)
//! - Value types (the Value enum of primitive field values)
//! - The incoming attribute model (Attribute, AssociationValue, AttributeMap)
//! - The EntityStore contract that persistence backends implement
//! - Store error types

mod attribute;
mod error;
mod id;
mod store;
mod value;

pub use attribute::*;
pub use error::*;
pub use id::*;
pub use store::*;
pub use value::*;
