//! Schema definition types.

use graft_core::{TypeId, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Declared type of a primitive attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveType {
    String,
    Int,
    Float,
    Bool,
    Timestamp,
    Duration,
    List,
    /// Accepts any value.
    Any,
}

impl PrimitiveType {
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveType::String => "String",
            PrimitiveType::Int => "Int",
            PrimitiveType::Float => "Float",
            PrimitiveType::Bool => "Bool",
            PrimitiveType::Timestamp => "Timestamp",
            PrimitiveType::Duration => "Duration",
            PrimitiveType::List => "List",
            PrimitiveType::Any => "Any",
        }
    }

    /// Check if a value may be assigned to an attribute of this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            // Null is compatible with anything
            (_, Value::Null) | (PrimitiveType::Any, _) => true,
            (PrimitiveType::String, Value::String(_))
            | (PrimitiveType::Int, Value::Int(_))
            | (PrimitiveType::Float, Value::Float(_))
            | (PrimitiveType::Bool, Value::Bool(_))
            | (PrimitiveType::Timestamp, Value::Timestamp(_))
            | (PrimitiveType::Duration, Value::Duration(_))
            | (PrimitiveType::List, Value::List(_)) => true,
            // Int can be used where Float is expected
            (PrimitiveType::Float, Value::Int(_)) => true,
            // Timestamp and Duration are Int-based
            (PrimitiveType::Timestamp | PrimitiveType::Duration, Value::Int(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cardinality of an association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// Single-valued: the slot holds at most one linked entity.
    ManyToOne,
    /// Multi-valued: the slot holds a collection of entities.
    OneToMany,
}

/// Association attribute details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationDef {
    pub cardinality: Cardinality,
    /// Name of the target entity type in the registry.
    pub target_type: String,
    /// Key handed to the resolver to materialize target entities
    /// (the target's data source name). Defaults to the target type name.
    pub target_key: String,
}

/// Whether an attribute is a raw field or an association.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrKind {
    Primitive(PrimitiveType),
    Association(AssociationDef),
}

/// Attribute definition within a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrDef {
    /// Attribute name.
    pub name: String,
    pub kind: AttrKind,
    /// Whether merges may not assign this attribute.
    pub read_only: bool,
}

impl AttrDef {
    pub fn primitive(name: impl Into<String>, primitive_type: PrimitiveType) -> Self {
        Self {
            name: name.into(),
            kind: AttrKind::Primitive(primitive_type),
            read_only: false,
        }
    }

    pub fn many_to_one(name: impl Into<String>, target_type: impl Into<String>) -> Self {
        Self::association(name, Cardinality::ManyToOne, target_type)
    }

    pub fn one_to_many(name: impl Into<String>, target_type: impl Into<String>) -> Self {
        Self::association(name, Cardinality::OneToMany, target_type)
    }

    fn association(
        name: impl Into<String>,
        cardinality: Cardinality,
        target_type: impl Into<String>,
    ) -> Self {
        let target_type = target_type.into();
        Self {
            name: name.into(),
            kind: AttrKind::Association(AssociationDef {
                cardinality,
                target_key: target_type.clone(),
                target_type,
            }),
            read_only: false,
        }
    }

    /// Override the resolver key of an association. No effect on primitives.
    pub fn with_target_key(mut self, key: impl Into<String>) -> Self {
        if let AttrKind::Association(assoc) = &mut self.kind {
            assoc.target_key = key.into();
        }
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, AttrKind::Primitive(_))
    }

    pub fn association_def(&self) -> Option<&AssociationDef> {
        match &self.kind {
            AttrKind::Association(assoc) => Some(assoc),
            AttrKind::Primitive(_) => None,
        }
    }
}

/// Entity type definition: an ordered set of attribute descriptors.
#[derive(Debug, Clone)]
pub struct TypeDef {
    /// Unique identifier.
    pub id: TypeId,
    /// Type name.
    pub name: String,
    /// Attribute definitions in declaration order.
    attributes: Vec<AttrDef>,
    /// Position of each attribute by name.
    positions: HashMap<String, usize>,
}

impl TypeDef {
    pub fn new(id: TypeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            attributes: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Append an attribute. Returns false if the name is already taken.
    pub(crate) fn push_attr(&mut self, attr: AttrDef) -> bool {
        if self.positions.contains_key(&attr.name) {
            return false;
        }
        self.positions.insert(attr.name.clone(), self.attributes.len());
        self.attributes.push(attr);
        true
    }

    /// Get an attribute definition by name.
    pub fn get_attr(&self, name: &str) -> Option<&AttrDef> {
        self.positions.get(name).map(|&i| &self.attributes[i])
    }

    /// Check if this type has an attribute.
    pub fn has_attr(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// All attributes in declaration order.
    pub fn attrs(&self) -> impl Iterator<Item = &AttrDef> {
        self.attributes.iter()
    }

    /// Association attributes in declaration order.
    pub fn associations(&self) -> impl Iterator<Item = (&AttrDef, &AssociationDef)> {
        self.attributes
            .iter()
            .filter_map(|attr| attr.association_def().map(|assoc| (attr, assoc)))
    }

    pub fn attr_count(&self) -> usize {
        self.attributes.len()
    }
}
