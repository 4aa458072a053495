//! Identity types for graft.
//!
//! Two kinds of identity live here:
//! - [`EntityHandle`] and [`TypeId`]: opaque indexes assigned by a store or
//!   registry, never shown to callers as domain data.
//! - [`Identifier`]: the domain identity carried by incoming association
//!   values and by persisted entities, used to match one against the other.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to one node of an externally owned entity graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityHandle(pub u64);

impl EntityHandle {
    /// Create a new EntityHandle from a raw value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Identifier for an entity type in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub u32);

impl TypeId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// The hashable payload of an [`Identifier`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    Int(i64),
    String(String),
}

impl IdValue {
    /// An id value is blank when it is a string with no visible characters.
    pub fn is_blank(&self) -> bool {
        match self {
            IdValue::Int(_) => false,
            IdValue::String(s) => s.trim().is_empty(),
        }
    }
}

impl fmt::Display for IdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdValue::Int(i) => write!(f, "{}", i),
            IdValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for IdValue {
    fn from(i: i64) -> Self {
        IdValue::Int(i)
    }
}

impl From<i32> for IdValue {
    fn from(i: i32) -> Self {
        IdValue::Int(i as i64)
    }
}

impl From<String> for IdValue {
    fn from(s: String) -> Self {
        IdValue::String(s)
    }
}

impl From<&str> for IdValue {
    fn from(s: &str) -> Self {
        IdValue::String(s.to_string())
    }
}

/// Value-or-absent identity token attached to a sub-object.
///
/// Identifiers compare by their wrapped value. An empty identifier (absent
/// value or blank string) means "no identity yet": it never matches an
/// existing entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier {
    value: Option<IdValue>,
}

impl Identifier {
    /// Create an identifier wrapping a value.
    pub fn new(value: impl Into<IdValue>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    /// Create an identifier with no value.
    pub fn empty() -> Self {
        Self { value: None }
    }

    /// The wrapped value, if any.
    pub fn value(&self) -> Option<&IdValue> {
        self.value.as_ref()
    }

    /// Returns true when this identifier carries no usable identity.
    pub fn is_empty(&self) -> bool {
        self.value.as_ref().map_or(true, IdValue::is_blank)
    }

    /// The value to match on, or None when empty.
    pub fn key(&self) -> Option<&IdValue> {
        self.value.as_ref().filter(|v| !v.is_blank())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}", value),
            None => write!(f, "<empty>"),
        }
    }
}

impl From<IdValue> for Identifier {
    fn from(value: IdValue) -> Self {
        Identifier { value: Some(value) }
    }
}

impl From<i64> for Identifier {
    fn from(i: i64) -> Self {
        Identifier::new(i)
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Identifier::new(s)
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        Identifier::new(s)
    }
}

/// Names one child-collection slot: the owning entity plus association name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionRef {
    pub owner: EntityHandle,
    pub association: String,
}

impl CollectionRef {
    pub fn new(owner: EntityHandle, association: impl Into<String>) -> Self {
        Self {
            owner,
            association: association.into(),
        }
    }
}

impl fmt::Display for CollectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.association)
    }
}
