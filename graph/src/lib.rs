//! graft Graph
//!
//! In-memory entity store. Entities are nodes keyed by [`EntityHandle`],
//! indexed by type key and by domain identifier, and linked through named
//! single-valued slots and multi-valued collections.
//!
//! [`Graph`] implements [`graft_core::EntityStore`], so it can back a merge
//! directly; it is also what the test suites merge into.
//!
//! [`EntityHandle`]: graft_core::EntityHandle

mod graph;
mod index;
mod node;
mod snapshot;

pub use graph::{EntityKey, Graph, ResolveMode};
pub use index::{IdentityIndex, TypeIndex};
pub use node::Node;
pub use snapshot::EntitySnapshot;
