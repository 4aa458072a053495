//! In-memory entity graph implementing the store contract.

use crate::index::{IdentityIndex, TypeIndex};
use crate::node::Node;
use graft_core::{
    CollectionRef, EntityCollection, EntityHandle, EntityStore, Fields, Identifier, StoreError,
    StoreResult, Value,
};
use std::collections::HashMap;
use std::fmt;
use tracing::trace;

/// Handle allocator.
#[derive(Debug)]
struct IdAllocator {
    next_handle: u64,
}

impl IdAllocator {
    fn new() -> Self {
        Self { next_handle: 1 }
    }

    fn alloc(&mut self) -> EntityHandle {
        let handle = EntityHandle::new(self.next_handle);
        self.next_handle += 1;
        handle
    }
}

/// How `find_or_create` treats identifiers with no matching entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolveMode {
    /// Materialize a new entity carrying the identifier.
    #[default]
    CreateMissing,
    /// Fail with `NotResolvable`. Values without an identifier still create.
    ExistingOnly,
}

/// Domain-level reference to a graph entity: its type key and identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityKey {
    pub type_key: String,
    pub identifier: Identifier,
}

impl EntityKey {
    pub fn new(type_key: impl Into<String>, identifier: impl Into<Identifier>) -> Self {
        Self {
            type_key: type_key.into(),
            identifier: identifier.into(),
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.type_key, self.identifier)
    }
}

/// The in-memory entity graph.
#[derive(Debug)]
pub struct Graph {
    /// Node storage
    nodes: HashMap<EntityHandle, Node>,
    /// Handle allocator
    id_alloc: IdAllocator,
    /// Type index
    type_index: TypeIndex,
    /// Identity index
    identity_index: IdentityIndex,
    mode: ResolveMode,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Create a new empty graph that creates missing entities on resolve.
    pub fn new() -> Self {
        Self::with_mode(ResolveMode::default())
    }

    pub fn with_mode(mode: ResolveMode) -> Self {
        Self {
            nodes: HashMap::new(),
            id_alloc: IdAllocator::new(),
            type_index: TypeIndex::new(),
            identity_index: IdentityIndex::new(),
            mode,
        }
    }

    pub fn mode(&self) -> ResolveMode {
        self.mode
    }

    // ==================== Entity Operations ====================

    /// Create a new entity. Empty identifiers are dropped; a non-empty one
    /// must be unique within `type_key`.
    pub fn create_entity(
        &mut self,
        type_key: &str,
        identifier: Option<Identifier>,
        fields: Fields,
    ) -> StoreResult<EntityHandle> {
        let identifier = identifier.filter(|id| !id.is_empty());
        let handle = self.id_alloc.alloc();
        if let Some(key) = identifier.as_ref().and_then(Identifier::key) {
            self.identity_index
                .insert(type_key, key, handle)
                .map_err(|existing| {
                    StoreError::InvalidOperation(format!(
                        "{} with identifier {} already exists as {}",
                        type_key, key, existing
                    ))
                })?;
        }
        self.type_index.insert(type_key, handle);
        self.nodes
            .insert(handle, Node::new(handle, type_key, identifier, fields));

        trace!(%handle, type_key, "created entity");
        Ok(handle)
    }

    /// Get an entity by handle.
    pub fn get_entity(&self, handle: EntityHandle) -> Option<&Node> {
        self.nodes.get(&handle)
    }

    fn node(&self, handle: EntityHandle) -> StoreResult<&Node> {
        self.nodes
            .get(&handle)
            .ok_or(StoreError::EntityNotFound(handle))
    }

    fn node_mut(&mut self, handle: EntityHandle) -> StoreResult<&mut Node> {
        self.nodes
            .get_mut(&handle)
            .ok_or(StoreError::EntityNotFound(handle))
    }

    fn ensure_exists(&self, handle: EntityHandle) -> StoreResult<()> {
        self.node(handle).map(|_| ())
    }

    /// Look up an entity by type key and identity.
    pub fn find(&self, type_key: &str, identifier: &Identifier) -> Option<EntityHandle> {
        identifier
            .key()
            .and_then(|key| self.identity_index.get(type_key, key))
    }

    /// The domain key of an identified entity.
    pub fn key_of(&self, handle: EntityHandle) -> Option<EntityKey> {
        let node = self.nodes.get(&handle)?;
        let identifier = node.identifier.clone()?;
        Some(EntityKey {
            type_key: node.type_key.clone(),
            identifier,
        })
    }

    // ==================== Queries ====================

    /// Handles of every entity with this type key.
    pub fn entities_by_type(&self, type_key: &str) -> impl Iterator<Item = EntityHandle> + '_ {
        self.type_index.get(type_key)
    }

    pub fn entity_count(&self) -> usize {
        self.nodes.len()
    }
}

impl EntityStore for Graph {
    type Object = EntityKey;

    fn as_entity(&self, object: &EntityKey) -> StoreResult<EntityHandle> {
        self.find(&object.type_key, &object.identifier)
            .ok_or_else(|| StoreError::not_resolvable(&object.type_key, &object.identifier))
    }

    fn identifier(&self, entity: EntityHandle) -> StoreResult<Option<Identifier>> {
        Ok(self.node(entity)?.identifier.clone())
    }

    fn get_child(
        &self,
        entity: EntityHandle,
        association: &str,
    ) -> StoreResult<Option<EntityHandle>> {
        Ok(self.node(entity)?.child(association))
    }

    fn set_child(
        &mut self,
        entity: EntityHandle,
        association: &str,
        child: Option<EntityHandle>,
    ) -> StoreResult<()> {
        if let Some(child) = child {
            self.ensure_exists(child)?;
        }
        self.node_mut(entity)?.set_child(association, child);
        Ok(())
    }

    fn get_child_collection(
        &self,
        entity: EntityHandle,
        association: &str,
    ) -> StoreResult<Option<EntityCollection>> {
        let node = self.node(entity)?;
        Ok(node.collection(association).map(|members| {
            EntityCollection::new(CollectionRef::new(entity, association), members.to_vec())
        }))
    }

    fn add_entity(&mut self, collection: &CollectionRef, member: EntityHandle) -> StoreResult<()> {
        self.ensure_exists(member)?;
        self.node_mut(collection.owner)?
            .add_member(&collection.association, member);
        Ok(())
    }

    fn remove_entity(
        &mut self,
        collection: &CollectionRef,
        member: EntityHandle,
    ) -> StoreResult<()> {
        let removed = self
            .node_mut(collection.owner)?
            .remove_member(&collection.association, member);
        if removed {
            Ok(())
        } else {
            Err(StoreError::member_not_found(collection.clone(), member))
        }
    }

    fn clear_collection(&mut self, collection: &CollectionRef) -> StoreResult<()> {
        self.node_mut(collection.owner)?
            .clear_collection(&collection.association);
        Ok(())
    }

    fn set_primitive_attribute(
        &mut self,
        entity: EntityHandle,
        name: &str,
        value: Value,
    ) -> StoreResult<()> {
        self.node_mut(entity)?.set_field(name.to_string(), value);
        Ok(())
    }

    fn find_or_create(
        &mut self,
        type_key: &str,
        identifier: Option<&Identifier>,
    ) -> StoreResult<EntityHandle> {
        match identifier.filter(|id| !id.is_empty()) {
            Some(id) => {
                if let Some(existing) = self.find(type_key, id) {
                    trace!(handle = %existing, type_key, identifier = %id, "resolved existing entity");
                    return Ok(existing);
                }
                match self.mode {
                    ResolveMode::CreateMissing => {
                        self.create_entity(type_key, Some(id.clone()), Fields::new())
                    }
                    ResolveMode::ExistingOnly => Err(StoreError::not_resolvable(type_key, id)),
                }
            }
            None => self.create_entity(type_key, None, Fields::new()),
        }
    }
}
