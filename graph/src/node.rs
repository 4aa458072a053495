//! Entity nodes stored by the in-memory graph.

use graft_core::{EntityHandle, Fields, Identifier, Value};
use std::collections::BTreeMap;

/// One entity of the in-memory graph.
#[derive(Debug, Clone)]
pub struct Node {
    /// Handle of this node.
    pub handle: EntityHandle,
    /// Resolver key of the entity's type.
    pub type_key: String,
    /// Domain identity, if assigned.
    pub identifier: Option<Identifier>,
    /// Bumped on every mutation of this node.
    pub version: u64,
    /// Primitive field values.
    pub fields: Fields,
    /// Single-valued association slots.
    children: BTreeMap<String, EntityHandle>,
    /// Multi-valued association slots.
    collections: BTreeMap<String, Vec<EntityHandle>>,
}

impl Node {
    /// Create a new node with the given properties.
    pub fn new(
        handle: EntityHandle,
        type_key: impl Into<String>,
        identifier: Option<Identifier>,
        fields: Fields,
    ) -> Self {
        Self {
            handle,
            type_key: type_key.into(),
            identifier,
            version: 1,
            fields,
            children: BTreeMap::new(),
            collections: BTreeMap::new(),
        }
    }

    /// Get a field value by name.
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Set a field value.
    pub fn set_field(&mut self, name: String, value: Value) {
        self.fields.insert(name, value);
        self.version += 1;
    }

    /// The entity linked in a single-valued slot.
    pub fn child(&self, association: &str) -> Option<EntityHandle> {
        self.children.get(association).copied()
    }

    /// Link or unlink a single-valued slot.
    pub fn set_child(&mut self, association: &str, child: Option<EntityHandle>) {
        match child {
            Some(child) => {
                self.children.insert(association.to_string(), child);
            }
            None => {
                self.children.remove(association);
            }
        }
        self.version += 1;
    }

    /// All linked single-valued slots.
    pub fn children(&self) -> impl Iterator<Item = (&str, EntityHandle)> {
        self.children.iter().map(|(name, h)| (name.as_str(), *h))
    }

    /// Members of a multi-valued slot, if it was ever set.
    pub fn collection(&self, association: &str) -> Option<&[EntityHandle]> {
        self.collections.get(association).map(Vec::as_slice)
    }

    /// All multi-valued slots.
    pub fn collections(&self) -> impl Iterator<Item = (&str, &[EntityHandle])> {
        self.collections
            .iter()
            .map(|(name, members)| (name.as_str(), members.as_slice()))
    }

    pub fn add_member(&mut self, association: &str, member: EntityHandle) {
        self.collections
            .entry(association.to_string())
            .or_default()
            .push(member);
        self.version += 1;
    }

    /// Remove one occurrence of `member`. Returns false if it was not present.
    pub fn remove_member(&mut self, association: &str, member: EntityHandle) -> bool {
        let Some(members) = self.collections.get_mut(association) else {
            return false;
        };
        match members.iter().position(|m| *m == member) {
            Some(index) => {
                members.remove(index);
                self.version += 1;
                true
            }
            None => false,
        }
    }

    /// Empty a multi-valued slot, leaving an empty collection behind.
    pub fn clear_collection(&mut self, association: &str) {
        self.collections
            .entry(association.to_string())
            .or_default()
            .clear();
        self.version += 1;
    }
}
