//! graft Merge
//!
//! Reconcile a partial attribute map against a persisted entity graph.
//!
//! Responsibilities:
//! - Classify incoming attributes against the schema
//! - Build an immutable plan, resolving every target entity up front
//! - Apply the plan through the `EntityStore` contract
//! - Report what changed
//!
//! # Module Structure
//!
//! - `executor` - `MergeEngine`, the entry point
//! - `classify` - attribute classification and validation
//! - `ops/` - plan construction and execution per operation family
//! - `plan` - the operation tree
//! - `options` - merge configuration
//! - `error` - error types for merge failures
//! - `result` - mutation counts

mod classify;
mod error;
mod executor;
mod ops;
mod options;
mod plan;
mod result;

pub use error::{MergeError, MergeResult};
pub use executor::MergeEngine;
pub use options::{MergeOptions, UnknownAttributePolicy};
pub use plan::{Operation, Plan, UpdateEntity};
pub use result::MergeOutcome;
