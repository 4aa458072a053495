//! Plan construction and execution, one module per operation family.
//!
//! Each family exposes a `build` function used while planning and an
//! `apply` function used while executing:
//! - `update` - primitive fields plus recursion into associations
//! - `many_to_one` - single-valued slots (link, unlink, update in place)
//! - `one_to_many` - collections (set diff by identifier, clear)

mod many_to_one;
mod one_to_many;
mod update;

pub use update::{apply_update, build_update};

use graft_core::{AssociationValue, EntityHandle, EntityStore};
use graft_registry::{AssociationDef, Registry, TypeDef};
use tracing::trace;

use crate::error::{MergeError, MergeResult};
use crate::options::MergeOptions;
use crate::plan::Operation;
use crate::result::MergeOutcome;

/// Read-only state shared by every build step of one plan.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub registry: &'a Registry,
    pub options: &'a MergeOptions,
}

impl<'a> BuildContext<'a> {
    pub fn new(registry: &'a Registry, options: &'a MergeOptions) -> Self {
        Self { registry, options }
    }

    /// Schema of an association's target type.
    fn target_type(&self, def: &AssociationDef) -> MergeResult<&'a TypeDef> {
        self.registry
            .target_type(def)
            .ok_or_else(|| MergeError::unknown_type(&def.target_type))
    }
}

/// Locate or materialize the entity an incoming value describes.
///
/// Empty identifiers are not forwarded, so the store always creates.
fn resolve<S>(store: &mut S, def: &AssociationDef, value: &AssociationValue) -> MergeResult<EntityHandle>
where
    S: EntityStore + ?Sized,
{
    let identifier = value.identifier.as_ref().filter(|id| !id.is_empty());
    let handle = store
        .find_or_create(&def.target_key, identifier)
        .map_err(|e| MergeError::resolution(&def.target_key, e))?;
    trace!(target_key = %def.target_key, %handle, "resolved target entity");
    Ok(handle)
}

/// Execute one operation and everything nested below it.
pub fn apply_operation<S>(
    store: &mut S,
    op: Operation,
    outcome: &mut MergeOutcome,
) -> MergeResult<()>
where
    S: EntityStore + ?Sized,
{
    trace!(operation = op.name(), "applying operation");
    match op {
        Operation::UpdateChild {
            parent,
            association,
            update,
        } => many_to_one::apply_update_child(store, parent, &association, update, outcome),
        Operation::LinkChild {
            parent,
            association,
            update,
        } => many_to_one::apply_link(store, parent, &association, update, outcome),
        Operation::UnlinkChild {
            parent,
            association,
        } => many_to_one::apply_unlink(store, parent, &association, outcome),
        Operation::ClearCollection { collection } => {
            one_to_many::apply_clear(store, &collection, outcome)
        }
        Operation::AddMember { collection, update } => {
            one_to_many::apply_add(store, &collection, update, outcome)
        }
        Operation::UpdateMember { collection, update } => {
            one_to_many::apply_update_member(store, &collection, update, outcome)
        }
        Operation::RemoveMember {
            collection, member, ..
        } => one_to_many::apply_remove(store, &collection, member, outcome),
    }
}
