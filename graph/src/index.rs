//! Index structures for efficient entity lookup.

use graft_core::{EntityHandle, IdValue};
use std::collections::{HashMap, HashSet};

/// Index from type key to entity handles.
#[derive(Debug, Default)]
pub struct TypeIndex {
    index: HashMap<String, HashSet<EntityHandle>>,
}

impl TypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, type_key: &str, handle: EntityHandle) {
        self.index
            .entry(type_key.to_string())
            .or_default()
            .insert(handle);
    }

    pub fn get(&self, type_key: &str) -> impl Iterator<Item = EntityHandle> + '_ {
        self.index
            .get(type_key)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }
}

/// Unique index from (type key, identifier value) to entity handle.
///
/// Only non-blank identifiers are indexed.
#[derive(Debug, Default)]
pub struct IdentityIndex {
    index: HashMap<String, HashMap<IdValue, EntityHandle>>,
}

impl IdentityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an identity. Returns the handle already holding it, if any,
    /// in which case the index is left unchanged.
    pub fn insert(
        &mut self,
        type_key: &str,
        id: &IdValue,
        handle: EntityHandle,
    ) -> Result<(), EntityHandle> {
        let ids = self.index.entry(type_key.to_string()).or_default();
        match ids.get(id) {
            Some(existing) if *existing != handle => Err(*existing),
            _ => {
                ids.insert(id.clone(), handle);
                Ok(())
            }
        }
    }

    pub fn get(&self, type_key: &str, id: &IdValue) -> Option<EntityHandle> {
        self.index.get(type_key).and_then(|ids| ids.get(id)).copied()
    }
}
