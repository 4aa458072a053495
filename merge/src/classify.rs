//! Attribute classification against an entity schema.

use graft_core::{AssociationValue, Attribute, AttributeKind, AttributeMap, Value};
use graft_registry::{AssociationDef, AttrDef, AttrKind, Cardinality, TypeDef};
use tracing::debug;

use crate::error::{MergeError, MergeResult};
use crate::options::{MergeOptions, UnknownAttributePolicy};

/// Incoming attributes split by declared kind, in schema declaration order.
#[derive(Debug, Default)]
pub struct Classification<'a> {
    pub primitives: Vec<(&'a str, &'a Value)>,
    pub associations: Vec<AssociationEntry<'a>>,
}

/// One incoming association attribute with its descriptor.
#[derive(Debug)]
pub struct AssociationEntry<'a> {
    pub name: &'a str,
    pub def: &'a AssociationDef,
    pub incoming: Incoming<'a>,
}

/// Incoming association payload. `None` clears the slot.
#[derive(Debug, Clone, Copy)]
pub enum Incoming<'a> {
    Single(Option<&'a AssociationValue>),
    Many(Option<&'a [AssociationValue]>),
}

/// Partition `attributes` into primitives and associations using `type_def`.
pub fn classify<'a>(
    type_def: &'a TypeDef,
    attributes: &'a AttributeMap,
    options: &MergeOptions,
) -> MergeResult<Classification<'a>> {
    for name in attributes.keys() {
        if type_def.has_attr(name) {
            continue;
        }
        match options.unknown_attributes {
            UnknownAttributePolicy::Reject => {
                return Err(MergeError::unknown_attribute(&type_def.name, name));
            }
            UnknownAttributePolicy::Ignore => {
                debug!(type_name = %type_def.name, attr = %name, "ignoring unknown attribute");
            }
        }
    }

    let mut classification = Classification::default();

    for attr_def in type_def.attrs() {
        let Some(attribute) = attributes.get(&attr_def.name) else {
            continue;
        };

        if attr_def.read_only {
            return Err(MergeError::read_only_attribute(&type_def.name, &attr_def.name));
        }

        match (&attr_def.kind, attribute) {
            (AttrKind::Primitive(primitive_type), Attribute::Primitive(value)) => {
                if options.check_primitive_types && !primitive_type.accepts(value) {
                    return Err(MergeError::invalid_primitive_type(
                        &type_def.name,
                        &attr_def.name,
                        primitive_type.name(),
                        value.type_name(),
                    ));
                }
                classification.primitives.push((attr_def.name.as_str(), value));
            }
            (AttrKind::Association(def), Attribute::ManyToOne(value))
                if def.cardinality == Cardinality::ManyToOne =>
            {
                classification.associations.push(AssociationEntry {
                    name: &attr_def.name,
                    def,
                    incoming: Incoming::Single(value.as_ref()),
                });
            }
            (AttrKind::Association(def), Attribute::OneToMany(values))
                if def.cardinality == Cardinality::OneToMany =>
            {
                classification.associations.push(AssociationEntry {
                    name: &attr_def.name,
                    def,
                    incoming: Incoming::Many(values.as_deref()),
                });
            }
            (_, attribute) => {
                return Err(MergeError::schema_mismatch(
                    &type_def.name,
                    &attr_def.name,
                    declared_kind(attr_def).name(),
                    attribute.kind().name(),
                ));
            }
        }
    }

    Ok(classification)
}

fn declared_kind(attr_def: &AttrDef) -> AttributeKind {
    match &attr_def.kind {
        AttrKind::Primitive(_) => AttributeKind::Primitive,
        AttrKind::Association(def) => match def.cardinality {
            Cardinality::ManyToOne => AttributeKind::ManyToOne,
            Cardinality::OneToMany => AttributeKind::OneToMany,
        },
    }
}
