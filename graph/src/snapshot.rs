//! Owned, comparable views of entity subtrees.

use crate::Graph;
use graft_core::{EntityHandle, Fields, Identifier, StoreResult, StoreError, Value};
use std::collections::BTreeMap;

/// A detached copy of an entity and everything reachable from it.
///
/// Collection members are sorted so two snapshots compare equal when their
/// collections hold the same members in any order.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySnapshot {
    pub type_key: String,
    pub identifier: Option<Identifier>,
    pub fields: Fields,
    pub children: BTreeMap<String, EntitySnapshot>,
    pub collections: BTreeMap<String, Vec<EntitySnapshot>>,
    /// The entity already appears on the path from the root; nothing below
    /// it was captured.
    pub cyclic: bool,
}

impl EntitySnapshot {
    pub fn new(type_key: impl Into<String>) -> Self {
        Self {
            type_key: type_key.into(),
            identifier: None,
            fields: Fields::new(),
            children: BTreeMap::new(),
            collections: BTreeMap::new(),
            cyclic: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<Identifier>) -> Self {
        self.identifier = Some(id.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn child(mut self, association: impl Into<String>, child: EntitySnapshot) -> Self {
        self.children.insert(association.into(), child);
        self
    }

    pub fn members(
        mut self,
        association: impl Into<String>,
        mut members: Vec<EntitySnapshot>,
    ) -> Self {
        sort_members(&mut members);
        self.collections.insert(association.into(), members);
        self
    }
}

fn sort_members(members: &mut [EntitySnapshot]) {
    members.sort_by_cached_key(|m| format!("{:?}", m));
}

impl Graph {
    /// Capture the subtree rooted at `handle`.
    pub fn snapshot(&self, handle: EntityHandle) -> StoreResult<EntitySnapshot> {
        let mut path = Vec::new();
        self.capture(handle, &mut path)
    }

    fn capture(
        &self,
        handle: EntityHandle,
        path: &mut Vec<EntityHandle>,
    ) -> StoreResult<EntitySnapshot> {
        let node = self
            .get_entity(handle)
            .ok_or(StoreError::EntityNotFound(handle))?;

        let mut snapshot = EntitySnapshot::new(node.type_key.clone());
        snapshot.identifier = node.identifier.clone();
        snapshot.fields = node.fields.clone();

        if path.contains(&handle) {
            snapshot.cyclic = true;
            return Ok(snapshot);
        }

        path.push(handle);
        for (association, child) in node.children() {
            let child = self.capture(child, path)?;
            snapshot.children.insert(association.to_string(), child);
        }
        for (association, members) in node.collections() {
            let mut captured = members
                .iter()
                .map(|member| self.capture(*member, path))
                .collect::<StoreResult<Vec<_>>>()?;
            sort_members(&mut captured);
            snapshot.collections.insert(association.to_string(), captured);
        }
        path.pop();

        Ok(snapshot)
    }
}
