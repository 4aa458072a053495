//! The persistence contract consumed by the merge engine.
//!
//! A store owns the entity graph. The engine only holds [`EntityHandle`]s
//! and reaches the graph through this trait, so it never needs to know the
//! concrete persistence technology or domain class.

use crate::{CollectionRef, EntityHandle, Identifier, StoreResult, Value};

/// Read/write access to an externally owned entity graph.
///
/// Implementations must return child views consistent with the schema's
/// declared cardinality for each association name, and `find_or_create`
/// must be idempotent for equal non-empty identifiers within one merge.
pub trait EntityStore {
    /// The concrete domain object callers hold.
    type Object: ?Sized;

    /// Adapt a domain object into a handle of the generic entity view.
    fn as_entity(&self, object: &Self::Object) -> StoreResult<EntityHandle>;

    /// The identity of an entity, if it has one.
    fn identifier(&self, entity: EntityHandle) -> StoreResult<Option<Identifier>>;

    /// The entity currently linked in a single-valued slot.
    fn get_child(&self, entity: EntityHandle, association: &str)
        -> StoreResult<Option<EntityHandle>>;

    /// Link `child` into a single-valued slot, or unlink when `None`.
    fn set_child(
        &mut self,
        entity: EntityHandle,
        association: &str,
        child: Option<EntityHandle>,
    ) -> StoreResult<()>;

    /// The current members of a multi-valued slot, or None if it was never set.
    fn get_child_collection(
        &self,
        entity: EntityHandle,
        association: &str,
    ) -> StoreResult<Option<EntityCollection>>;

    /// Add a member to a collection.
    fn add_entity(&mut self, collection: &CollectionRef, member: EntityHandle) -> StoreResult<()>;

    /// Detach a member from a collection. The member itself is not destroyed.
    fn remove_entity(&mut self, collection: &CollectionRef, member: EntityHandle)
        -> StoreResult<()>;

    /// Detach every member of a collection.
    fn clear_collection(&mut self, collection: &CollectionRef) -> StoreResult<()>;

    /// Assign a raw primitive field.
    fn set_primitive_attribute(
        &mut self,
        entity: EntityHandle,
        name: &str,
        value: Value,
    ) -> StoreResult<()>;

    /// Return an existing entity of `type_key` with this identifier, or a
    /// newly materialized one.
    fn find_or_create(
        &mut self,
        type_key: &str,
        identifier: Option<&Identifier>,
    ) -> StoreResult<EntityHandle>;
}

/// Snapshot of one child collection: its slot and current members.
///
/// Membership, not position, is significant; the member list is a multiset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityCollection {
    reference: CollectionRef,
    members: Vec<EntityHandle>,
}

impl EntityCollection {
    pub fn new(reference: CollectionRef, members: Vec<EntityHandle>) -> Self {
        Self { reference, members }
    }

    /// The slot this snapshot was taken from.
    pub fn reference(&self) -> &CollectionRef {
        &self.reference
    }

    pub fn members(&self) -> &[EntityHandle] {
        &self.members
    }

    pub fn contains(&self, member: EntityHandle) -> bool {
        self.members.contains(&member)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
