//! RegistryBuilder for constructing an immutable Registry.

use crate::{AttrDef, AttrKind, AttrDocument, Registry, SchemaDocument, TypeDef};
use graft_core::TypeId;
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during registry construction.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate type name: {0}")]
    DuplicateTypeName(String),

    #[error("Duplicate attribute {attr} on type {type_name}")]
    DuplicateAttribute { type_name: String, attr: String },

    #[error("Unknown target type {target} for association {type_name}.{attr}")]
    UnknownTargetType {
        type_name: String,
        attr: String,
        target: String,
    },

    #[error("Invalid attribute {type_name}.{attr}: {reason}")]
    InvalidAttribute {
        type_name: String,
        attr: String,
        reason: String,
    },

    #[error("Cannot parse schema document: {0}")]
    Parse(String),
}

/// Builder for constructing an immutable Registry.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    /// Next type ID to allocate.
    next_type_id: u32,
    /// Types being built.
    types: HashMap<TypeId, TypeDef>,
    /// Type name to ID mapping.
    type_names: HashMap<String, TypeId>,
}

impl RegistryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type definition.
    pub fn add_type(&mut self, name: impl Into<String>) -> TypeBuilder<'_> {
        let name = name.into();
        let id = TypeId::new(self.next_type_id);
        self.next_type_id += 1;

        TypeBuilder {
            builder: self,
            id,
            name,
            attributes: Vec::new(),
        }
    }

    /// Add every type described by a schema document.
    pub fn load_document(&mut self, document: SchemaDocument) -> Result<(), RegistryError> {
        for type_doc in document.types {
            let mut type_builder = self.add_type(type_doc.name.clone());
            for attr_doc in type_doc.attributes {
                type_builder = type_builder.attr(attr_from_document(&type_doc.name, attr_doc)?);
            }
            type_builder.done()?;
        }
        Ok(())
    }

    /// Build the immutable Registry.
    ///
    /// Every association must point at a registered type.
    pub fn build(self) -> Result<Registry, RegistryError> {
        for type_def in self.types.values() {
            for (attr, assoc) in type_def.associations() {
                if !self.type_names.contains_key(&assoc.target_type) {
                    return Err(RegistryError::UnknownTargetType {
                        type_name: type_def.name.clone(),
                        attr: attr.name.clone(),
                        target: assoc.target_type.clone(),
                    });
                }
            }
        }

        Ok(Registry::new(self.types, self.type_names))
    }
}

/// Builder for a type definition.
pub struct TypeBuilder<'a> {
    builder: &'a mut RegistryBuilder,
    id: TypeId,
    name: String,
    attributes: Vec<AttrDef>,
}

impl<'a> TypeBuilder<'a> {
    /// Add an attribute.
    pub fn attr(mut self, attr: AttrDef) -> Self {
        self.attributes.push(attr);
        self
    }

    /// Finish building this type.
    pub fn done(self) -> Result<TypeId, RegistryError> {
        // Check for duplicate name
        if self.builder.type_names.contains_key(&self.name) {
            return Err(RegistryError::DuplicateTypeName(self.name));
        }

        let mut type_def = TypeDef::new(self.id, self.name.clone());
        for attr in self.attributes {
            let attr_name = attr.name.clone();
            if !type_def.push_attr(attr) {
                return Err(RegistryError::DuplicateAttribute {
                    type_name: self.name,
                    attr: attr_name,
                });
            }
        }

        self.builder.type_names.insert(self.name, self.id);
        self.builder.types.insert(self.id, type_def);

        Ok(self.id)
    }
}

fn attr_from_document(type_name: &str, doc: AttrDocument) -> Result<AttrDef, RegistryError> {
    let invalid = |reason: &str| RegistryError::InvalidAttribute {
        type_name: type_name.to_string(),
        attr: doc.name.clone(),
        reason: reason.to_string(),
    };

    let mut attr = match (doc.primitive, &doc.many_to_one, &doc.one_to_many) {
        (Some(primitive), None, None) => AttrDef::primitive(doc.name.clone(), primitive),
        (None, Some(target), None) => AttrDef::many_to_one(doc.name.clone(), target.clone()),
        (None, None, Some(target)) => AttrDef::one_to_many(doc.name.clone(), target.clone()),
        (None, None, None) => return Err(invalid("no type or association declared")),
        _ => return Err(invalid("declares more than one kind")),
    };

    if let Some(key) = doc.target_key.clone() {
        if !matches!(attr.kind, AttrKind::Association(_)) {
            return Err(invalid("target_key is only valid on associations"));
        }
        attr = attr.with_target_key(key);
    }
    if doc.read_only {
        attr = attr.read_only();
    }
    Ok(attr)
}
