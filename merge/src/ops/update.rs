//! UPDATE - reconcile one entity's fields and declared associations.

use graft_core::{AttributeMap, EntityHandle, EntityStore};
use graft_registry::TypeDef;
use tracing::trace;

use super::{apply_operation, many_to_one, one_to_many, BuildContext};
use crate::classify::{classify, Incoming};
use crate::error::{MergeError, MergeResult};
use crate::plan::UpdateEntity;
use crate::result::MergeOutcome;

/// Build the update of `entity` from the attributes present in the map.
pub fn build_update<S>(
    ctx: &BuildContext<'_>,
    store: &mut S,
    entity: EntityHandle,
    type_def: &TypeDef,
    attributes: &AttributeMap,
) -> MergeResult<UpdateEntity>
where
    S: EntityStore + ?Sized,
{
    let classification = classify(type_def, attributes, ctx.options)?;

    let mut update = UpdateEntity::new(entity, type_def.name.clone());
    update.primitives = classification
        .primitives
        .iter()
        .map(|(name, value)| (name.to_string(), (*value).clone()))
        .collect();

    for entry in &classification.associations {
        let target = ctx.target_type(entry.def)?;
        match entry.incoming {
            Incoming::Single(value) => {
                let op = many_to_one::build(ctx, store, entity, entry.name, entry.def, target, value)?;
                update.children.push(op);
            }
            Incoming::Many(values) => {
                let ops =
                    one_to_many::build(ctx, store, entity, entry.name, entry.def, target, values)?;
                update.children.extend(ops);
            }
        }
    }

    Ok(update)
}

/// Assign the collected primitives, then run child operations in build order.
pub fn apply_update<S>(
    store: &mut S,
    update: UpdateEntity,
    outcome: &mut MergeOutcome,
) -> MergeResult<()>
where
    S: EntityStore + ?Sized,
{
    let UpdateEntity {
        entity,
        type_name,
        primitives,
        children,
    } = update;
    trace!(%entity, type_name = %type_name, fields = primitives.len(), "updating entity");

    for (name, value) in primitives {
        store
            .set_primitive_attribute(entity, &name, value)
            .map_err(MergeError::from_store)?;
        outcome.primitives_assigned += 1;
    }
    outcome.entities_updated += 1;

    for op in children {
        apply_operation(store, op, outcome)?;
    }
    Ok(())
}
