//! The Registry - immutable schema lookup.

use crate::{AssociationDef, RegistryBuilder, RegistryError, SchemaDocument, TypeDef};
use graft_core::TypeId;
use std::collections::HashMap;

/// The Registry provides runtime lookup of entity schemas.
/// It is immutable after construction.
#[derive(Debug, Default)]
pub struct Registry {
    /// Type definitions by ID.
    types: HashMap<TypeId, TypeDef>,
    /// Type ID lookup by name.
    type_names: HashMap<String, TypeId>,
}

impl Registry {
    /// Create a registry (use RegistryBuilder for construction).
    pub(crate) fn new(types: HashMap<TypeId, TypeDef>, type_names: HashMap<String, TypeId>) -> Self {
        Self { types, type_names }
    }

    /// Build a registry from a JSON schema document.
    pub fn from_json(source: &str) -> Result<Self, RegistryError> {
        let document: SchemaDocument =
            serde_json::from_str(source).map_err(|e| RegistryError::Parse(e.to_string()))?;
        let mut builder = RegistryBuilder::new();
        builder.load_document(document)?;
        builder.build()
    }

    // ==================== Type Lookups ====================

    /// Get a type definition by name.
    pub fn get_type_by_name(&self, name: &str) -> Option<&TypeDef> {
        self.type_names.get(name).and_then(|id| self.types.get(id))
    }

    /// Get a type definition by ID.
    pub fn get_type(&self, id: TypeId) -> Option<&TypeDef> {
        self.types.get(&id)
    }

    /// Get a type ID by name.
    pub fn get_type_id(&self, name: &str) -> Option<TypeId> {
        self.type_names.get(name).copied()
    }

    /// The schema of an association's target type.
    pub fn target_type(&self, association: &AssociationDef) -> Option<&TypeDef> {
        self.get_type_by_name(&association.target_type)
    }

    /// Get all type definitions.
    pub fn all_types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    /// Get the number of types.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}
