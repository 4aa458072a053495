//! Merge error types.

use graft_core::StoreError;
use thiserror::Error;

/// Result type for merge operations.
pub type MergeResult<T> = Result<T, MergeError>;

/// Errors that can occur while planning or applying a merge.
///
/// Every error aborts the whole merge. Errors raised while planning leave
/// the graph unmodified apart from entities the resolver materialized.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("Unknown type: {name}")]
    UnknownType { name: String },

    #[error("Unknown attribute: {attr} on type {type_name}")]
    UnknownAttribute { type_name: String, attr: String },

    #[error("Schema mismatch for {type_name}.{attr}: declared {expected}, got {actual}")]
    SchemaMismatch {
        type_name: String,
        attr: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid attribute type: expected {expected}, got {actual} for {type_name}.{attr}")]
    InvalidPrimitiveType {
        type_name: String,
        attr: String,
        expected: String,
        actual: String,
    },

    #[error("Cannot modify readonly attribute: {attr} on type {type_name}")]
    ReadOnlyAttribute { type_name: String, attr: String },

    #[error("Cannot resolve {type_key}: {source}")]
    Resolution {
        type_key: String,
        #[source]
        source: StoreError,
    },

    #[error("Lookup failed: {source}")]
    Lookup {
        #[source]
        source: StoreError,
    },

    #[error("Invalid merge options: {0}")]
    InvalidOptions(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl MergeError {
    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType { name: name.into() }
    }

    pub fn unknown_attribute(type_name: impl Into<String>, attr: impl Into<String>) -> Self {
        Self::UnknownAttribute {
            type_name: type_name.into(),
            attr: attr.into(),
        }
    }

    pub fn schema_mismatch(
        type_name: impl Into<String>,
        attr: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::SchemaMismatch {
            type_name: type_name.into(),
            attr: attr.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_primitive_type(
        type_name: impl Into<String>,
        attr: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidPrimitiveType {
            type_name: type_name.into(),
            attr: attr.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn read_only_attribute(type_name: impl Into<String>, attr: impl Into<String>) -> Self {
        Self::ReadOnlyAttribute {
            type_name: type_name.into(),
            attr: attr.into(),
        }
    }

    pub fn resolution(type_key: impl Into<String>, source: StoreError) -> Self {
        Self::Resolution {
            type_key: type_key.into(),
            source,
        }
    }

    /// Wrap a store error, classifying missing entities and memberships as
    /// lookup failures.
    pub fn from_store(source: StoreError) -> Self {
        if source.is_lookup() {
            Self::Lookup { source }
        } else {
            Self::Store(source)
        }
    }

    /// The input disagrees with the schema.
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(
            self,
            MergeError::UnknownType { .. }
                | MergeError::UnknownAttribute { .. }
                | MergeError::SchemaMismatch { .. }
                | MergeError::InvalidPrimitiveType { .. }
                | MergeError::ReadOnlyAttribute { .. }
        )
    }

    /// The resolver could not locate or create a target entity.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(self, MergeError::Resolution { .. })
    }

    /// An entity or membership expected by the plan was not found.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, MergeError::Lookup { .. })
    }
}
