//! Serializable schema documents.
//!
//! A document is the configuration-side description of a registry:
//!
//! ```json
//! { "types": [ { "name": "Parcel", "attributes": [
//!     { "name": "label", "type": "string" },
//!     { "name": "owner", "many_to_one": "Person" },
//!     { "name": "buildings", "one_to_many": "Building", "target_key": "buildings_ds" }
//! ] } ] }
//! ```

use crate::PrimitiveType;
use serde::{Deserialize, Serialize};

/// A full schema: every entity type known to the registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub types: Vec<TypeDocument>,
}

/// One entity type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDocument {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<AttrDocument>,
}

/// One attribute. Exactly one of `type`, `many_to_one` or `one_to_many`
/// must be present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttrDocument {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub primitive: Option<PrimitiveType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub many_to_one: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_to_many: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_key: Option<String>,
    #[serde(default)]
    pub read_only: bool,
}
