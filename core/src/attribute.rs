//! Incoming attribute model.
//!
//! An [`AttributeMap`] describes the desired state of one entity. Keys absent
//! from the map are left untouched by a merge; present keys carry one of the
//! three [`Attribute`] shapes.

use crate::{IdValue, Identifier, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Named attributes of one entity, in deterministic order.
pub type AttributeMap = BTreeMap<String, Attribute>;

/// One incoming attribute value.
///
/// `None` at the association level means "clear this association".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Attribute {
    /// A raw field value.
    Primitive(Value),
    /// Single-valued association.
    ManyToOne(Option<AssociationValue>),
    /// Multi-valued association.
    OneToMany(Option<Vec<AssociationValue>>),
}

impl Attribute {
    pub fn primitive(value: impl Into<Value>) -> Self {
        Attribute::Primitive(value.into())
    }

    pub fn many_to_one(value: AssociationValue) -> Self {
        Attribute::ManyToOne(Some(value))
    }

    pub fn one_to_many(values: Vec<AssociationValue>) -> Self {
        Attribute::OneToMany(Some(values))
    }

    /// A many-to-one attribute that unlinks the current child.
    pub fn clear_many_to_one() -> Self {
        Attribute::ManyToOne(None)
    }

    /// A one-to-many attribute that clears the whole collection.
    pub fn clear_one_to_many() -> Self {
        Attribute::OneToMany(None)
    }

    /// The shape of this attribute.
    pub fn kind(&self) -> AttributeKind {
        match self {
            Attribute::Primitive(_) => AttributeKind::Primitive,
            Attribute::ManyToOne(_) => AttributeKind::ManyToOne,
            Attribute::OneToMany(_) => AttributeKind::OneToMany,
        }
    }
}

/// Discriminant of [`Attribute`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Primitive,
    ManyToOne,
    OneToMany,
}

impl AttributeKind {
    pub fn name(&self) -> &'static str {
        match self {
            AttributeKind::Primitive => "Primitive",
            AttributeKind::ManyToOne => "ManyToOne",
            AttributeKind::OneToMany => "OneToMany",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Desired state of one (possibly new) associated sub-object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssociationValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Identifier>,
    #[serde(default)]
    pub attributes: AttributeMap,
}

impl AssociationValue {
    /// A value with no identity, which always materializes a new entity.
    pub fn new() -> Self {
        Self::default()
    }

    /// A value identified by `id`.
    pub fn with_id(id: impl Into<Identifier>) -> Self {
        Self {
            identifier: Some(id.into()),
            attributes: AttributeMap::new(),
        }
    }

    /// Add an attribute.
    pub fn attr(mut self, name: impl Into<String>, attribute: impl IntoAttribute) -> Self {
        self.attributes
            .insert(name.into(), attribute.into_attribute());
        self
    }

    /// Replace all attributes.
    pub fn with_attributes(mut self, attributes: AttributeMap) -> Self {
        self.attributes = attributes;
        self
    }

    /// The identity to match on, or None when absent or empty.
    pub fn key(&self) -> Option<&IdValue> {
        self.identifier.as_ref().and_then(Identifier::key)
    }
}

/// Conversion used by [`attrs!`](crate::attrs) and [`AssociationValue::attr`].
pub trait IntoAttribute {
    fn into_attribute(self) -> Attribute;
}

impl IntoAttribute for Attribute {
    fn into_attribute(self) -> Attribute {
        self
    }
}

impl IntoAttribute for AssociationValue {
    fn into_attribute(self) -> Attribute {
        Attribute::ManyToOne(Some(self))
    }
}

impl IntoAttribute for Vec<AssociationValue> {
    fn into_attribute(self) -> Attribute {
        Attribute::OneToMany(Some(self))
    }
}

macro_rules! primitive_into_attribute {
    ($($ty:ty),+) => {
        $(
            impl IntoAttribute for $ty {
                fn into_attribute(self) -> Attribute {
                    Attribute::Primitive(Value::from(self))
                }
            }
        )+
    };
}

primitive_into_attribute!(Value, bool, i32, i64, f64, String, &str);

/// Helper macro to create incoming attribute maps.
///
/// Primitive Rust values become [`Attribute::Primitive`], an
/// [`AssociationValue`] becomes a many-to-one and a `Vec<AssociationValue>`
/// becomes a one-to-many.
#[macro_export]
macro_rules! attrs {
    () => {
        $crate::AttributeMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        {
            let mut map = $crate::AttributeMap::new();
            $(
                map.insert(
                    $key.to_string(),
                    $crate::IntoAttribute::into_attribute($value),
                );
            )+
            map
        }
    };
}
