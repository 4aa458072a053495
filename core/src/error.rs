//! Error types raised by entity stores.

use crate::{CollectionRef, EntityHandle};
use thiserror::Error;

/// Errors that can occur while reading or mutating an entity graph.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found.
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityHandle),

    /// The entity has no association with this name.
    #[error("Unknown association: {association} on entity {entity}")]
    UnknownAssociation {
        entity: EntityHandle,
        association: String,
    },

    /// The entity is not a member of the collection.
    #[error("Entity {member} is not a member of {collection}")]
    MemberNotFound {
        collection: CollectionRef,
        member: EntityHandle,
    },

    /// The resolver could neither locate nor create the entity.
    #[error("Cannot resolve {type_key} with identifier {identifier}")]
    NotResolvable { type_key: String, identifier: String },

    /// Invalid operation.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Failure reported by the persistence backend.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn unknown_association(entity: EntityHandle, association: impl Into<String>) -> Self {
        Self::UnknownAssociation {
            entity,
            association: association.into(),
        }
    }

    pub fn member_not_found(collection: CollectionRef, member: EntityHandle) -> Self {
        Self::MemberNotFound { collection, member }
    }

    pub fn not_resolvable(type_key: impl Into<String>, identifier: impl ToString) -> Self {
        Self::NotResolvable {
            type_key: type_key.into(),
            identifier: identifier.to_string(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Returns true when the error reports a missing entity or membership.
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            StoreError::EntityNotFound(_) | StoreError::MemberNotFound { .. }
        )
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
