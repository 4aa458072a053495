//! Merge configuration.

use crate::error::{MergeError, MergeResult};
use serde::{Deserialize, Serialize};

/// What to do with incoming attributes the schema does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownAttributePolicy {
    /// Skip them and log at debug level.
    #[default]
    Ignore,
    /// Fail the merge with `UnknownAttribute`.
    Reject,
}

/// Configuration for a [`MergeEngine`](crate::MergeEngine).
///
/// Missing keys in a JSON document fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeOptions {
    pub unknown_attributes: UnknownAttributePolicy,
    /// Check primitive values against the declared primitive type.
    pub check_primitive_types: bool,
    /// Relink a many-to-one slot instead of updating the current child when
    /// the incoming identifier differs from the child's.
    pub relink_on_identity_change: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            unknown_attributes: UnknownAttributePolicy::Ignore,
            check_primitive_types: true,
            relink_on_identity_change: false,
        }
    }
}

impl MergeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject unknown attributes and check primitive types.
    pub fn strict() -> Self {
        Self {
            unknown_attributes: UnknownAttributePolicy::Reject,
            check_primitive_types: true,
            ..Self::default()
        }
    }

    pub fn from_json(source: &str) -> MergeResult<Self> {
        serde_json::from_str(source).map_err(|e| MergeError::InvalidOptions(e.to_string()))
    }

    pub fn with_unknown_attributes(mut self, policy: UnknownAttributePolicy) -> Self {
        self.unknown_attributes = policy;
        self
    }

    pub fn with_primitive_type_checks(mut self, enabled: bool) -> Self {
        self.check_primitive_types = enabled;
        self
    }

    pub fn with_relink_on_identity_change(mut self, enabled: bool) -> Self {
        self.relink_on_identity_change = enabled;
        self
    }
}
