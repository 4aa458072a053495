//! Single-valued association reconciliation.
//!
//! | incoming | current child | operation |
//! |---|---|---|
//! | none | any | `UnlinkChild` |
//! | value | none | `LinkChild` with a resolved entity |
//! | value | child | `UpdateChild` on the current child |

use graft_core::{AssociationValue, CollectionRef, EntityHandle, EntityStore, Identifier, StoreError};
use graft_registry::{AssociationDef, TypeDef};
use tracing::trace;

use super::{apply_update, build_update, resolve, BuildContext};
use crate::error::{MergeError, MergeResult};
use crate::plan::{Operation, UpdateEntity};
use crate::result::MergeOutcome;

pub fn build<S>(
    ctx: &BuildContext<'_>,
    store: &mut S,
    parent: EntityHandle,
    association: &str,
    def: &AssociationDef,
    target: &TypeDef,
    incoming: Option<&AssociationValue>,
) -> MergeResult<Operation>
where
    S: EntityStore + ?Sized,
{
    let Some(value) = incoming else {
        trace!(%parent, association, "planning unlink");
        return Ok(Operation::UnlinkChild {
            parent,
            association: association.to_string(),
        });
    };

    let current = store
        .get_child(parent, association)
        .map_err(MergeError::from_store)?;

    match current {
        Some(child) if !identity_changed(ctx, &*store, child, value)? => {
            let update = build_update(ctx, store, child, target, &value.attributes)?;
            Ok(Operation::UpdateChild {
                parent,
                association: association.to_string(),
                update,
            })
        }
        _ => {
            let resolved = resolve(store, def, value)?;
            let update = build_update(ctx, store, resolved, target, &value.attributes)?;
            Ok(Operation::LinkChild {
                parent,
                association: association.to_string(),
                update,
            })
        }
    }
}

/// With relinking enabled, an incoming identifier that differs from the
/// current child's replaces the child instead of updating it.
fn identity_changed<S>(
    ctx: &BuildContext<'_>,
    store: &S,
    child: EntityHandle,
    value: &AssociationValue,
) -> MergeResult<bool>
where
    S: EntityStore + ?Sized,
{
    if !ctx.options.relink_on_identity_change {
        return Ok(false);
    }
    let Some(incoming) = value.key() else {
        return Ok(false);
    };
    let current = store.identifier(child).map_err(MergeError::from_store)?;
    Ok(current.as_ref().and_then(Identifier::key) != Some(incoming))
}

pub fn apply_link<S>(
    store: &mut S,
    parent: EntityHandle,
    association: &str,
    update: UpdateEntity,
    outcome: &mut MergeOutcome,
) -> MergeResult<()>
where
    S: EntityStore + ?Sized,
{
    store
        .set_child(parent, association, Some(update.entity))
        .map_err(MergeError::from_store)?;
    outcome.children_linked += 1;
    apply_update(store, update, outcome)
}

pub fn apply_unlink<S>(
    store: &mut S,
    parent: EntityHandle,
    association: &str,
    outcome: &mut MergeOutcome,
) -> MergeResult<()>
where
    S: EntityStore + ?Sized,
{
    store
        .set_child(parent, association, None)
        .map_err(MergeError::from_store)?;
    outcome.children_unlinked += 1;
    Ok(())
}

/// The child must still be linked where the plan found it.
pub fn apply_update_child<S>(
    store: &mut S,
    parent: EntityHandle,
    association: &str,
    update: UpdateEntity,
    outcome: &mut MergeOutcome,
) -> MergeResult<()>
where
    S: EntityStore + ?Sized,
{
    let current = store
        .get_child(parent, association)
        .map_err(MergeError::from_store)?;
    if current != Some(update.entity) {
        return Err(MergeError::Lookup {
            source: StoreError::member_not_found(
                CollectionRef::new(parent, association),
                update.entity,
            ),
        });
    }
    apply_update(store, update, outcome)
}
