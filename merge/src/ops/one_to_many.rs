//! Multi-valued association reconciliation: a set diff keyed by identifier.

use graft_core::{
    AssociationValue, CollectionRef, EntityHandle, EntityStore, IdValue, Identifier, StoreError,
};
use graft_registry::{AssociationDef, TypeDef};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use tracing::trace;

use super::{apply_update, build_update, resolve, BuildContext};
use crate::error::{MergeError, MergeResult};
use crate::plan::{Operation, UpdateEntity};
use crate::result::MergeOutcome;

/// Plan the operations that turn the current collection into `incoming`.
///
/// Incoming values whose identifier matches a current member update it;
/// every other value is resolved and added. Identified members missing from
/// the input are removed after all adds and updates, once per stored
/// occurrence. Members without an identifier are never matched, so never
/// removed.
pub fn build<S>(
    ctx: &BuildContext<'_>,
    store: &mut S,
    parent: EntityHandle,
    association: &str,
    def: &AssociationDef,
    target: &TypeDef,
    incoming: Option<&[AssociationValue]>,
) -> MergeResult<Vec<Operation>>
where
    S: EntityStore + ?Sized,
{
    let collection = CollectionRef::new(parent, association);
    let Some(values) = incoming else {
        trace!(%collection, "planning clear");
        return Ok(vec![Operation::ClearCollection { collection }]);
    };

    let current = store
        .get_child_collection(parent, association)
        .map_err(MergeError::from_store)?;

    // identified members grouped by identifier, in first-seen order
    let mut old: Vec<CurrentMember> = Vec::new();
    let mut old_index: HashMap<IdValue, usize> = HashMap::new();
    for &member in current.iter().flat_map(|c| c.members()) {
        let Some(identifier) = store.identifier(member).map_err(MergeError::from_store)? else {
            continue;
        };
        let Some(key) = identifier.key().cloned() else {
            continue;
        };
        match old_index.get(&key) {
            Some(&at) => old[at].occurrences.push(member),
            None => {
                old_index.insert(key.clone(), old.len());
                old.push(CurrentMember {
                    key,
                    identifier,
                    occurrences: vec![member],
                });
            }
        }
    }

    let values = fold_repeated(values);
    let new_ids: HashSet<&IdValue> = values.iter().filter_map(|v| v.key()).collect();

    let mut ops = Vec::with_capacity(values.len());
    for value in &values {
        let existing = value
            .key()
            .and_then(|k| old_index.get(k))
            .and_then(|&at| old[at].occurrences.first().copied());
        let member = match existing {
            Some(member) => member,
            None => resolve(store, def, value)?,
        };

        let update = build_update(ctx, store, member, target, &value.attributes)?;
        let op = match existing {
            Some(_) => Operation::UpdateMember {
                collection: collection.clone(),
                update,
            },
            None => Operation::AddMember {
                collection: collection.clone(),
                update,
            },
        };
        ops.push(op);
    }

    for dropped in old.iter().filter(|m| !new_ids.contains(&m.key)) {
        for &member in &dropped.occurrences {
            ops.push(Operation::RemoveMember {
                collection: collection.clone(),
                member,
                identifier: dropped.identifier.clone(),
            });
        }
    }

    trace!(%collection, operations = ops.len(), "planned collection diff");
    Ok(ops)
}

/// Every stored occurrence of one identified current member.
struct CurrentMember {
    key: IdValue,
    identifier: Identifier,
    occurrences: Vec<EntityHandle>,
}

/// Fold values sharing an identifier into the first of them. Later
/// attributes replace earlier ones key by key.
fn fold_repeated(values: &[AssociationValue]) -> Vec<Cow<'_, AssociationValue>> {
    let mut folded: Vec<Cow<'_, AssociationValue>> = Vec::with_capacity(values.len());
    let mut positions: HashMap<&IdValue, usize> = HashMap::new();
    for value in values {
        let Some(key) = value.key() else {
            folded.push(Cow::Borrowed(value));
            continue;
        };
        match positions.get(key) {
            Some(&at) => {
                let first = folded[at].to_mut();
                for (name, attribute) in &value.attributes {
                    first.attributes.insert(name.clone(), attribute.clone());
                }
            }
            None => {
                positions.insert(key, folded.len());
                folded.push(Cow::Borrowed(value));
            }
        }
    }
    folded
}

pub fn apply_clear<S>(
    store: &mut S,
    collection: &CollectionRef,
    outcome: &mut MergeOutcome,
) -> MergeResult<()>
where
    S: EntityStore + ?Sized,
{
    store
        .clear_collection(collection)
        .map_err(MergeError::from_store)?;
    outcome.collections_cleared += 1;
    Ok(())
}

pub fn apply_add<S>(
    store: &mut S,
    collection: &CollectionRef,
    update: UpdateEntity,
    outcome: &mut MergeOutcome,
) -> MergeResult<()>
where
    S: EntityStore + ?Sized,
{
    store
        .add_entity(collection, update.entity)
        .map_err(MergeError::from_store)?;
    outcome.members_added += 1;
    apply_update(store, update, outcome)
}

/// The member must still belong to the collection.
pub fn apply_update_member<S>(
    store: &mut S,
    collection: &CollectionRef,
    update: UpdateEntity,
    outcome: &mut MergeOutcome,
) -> MergeResult<()>
where
    S: EntityStore + ?Sized,
{
    let is_member = store
        .get_child_collection(collection.owner, &collection.association)
        .map_err(MergeError::from_store)?
        .is_some_and(|current| current.contains(update.entity));
    if !is_member {
        return Err(MergeError::Lookup {
            source: StoreError::member_not_found(collection.clone(), update.entity),
        });
    }
    apply_update(store, update, outcome)
}

pub fn apply_remove<S>(
    store: &mut S,
    collection: &CollectionRef,
    member: EntityHandle,
    outcome: &mut MergeOutcome,
) -> MergeResult<()>
where
    S: EntityStore + ?Sized,
{
    store
        .remove_entity(collection, member)
        .map_err(MergeError::from_store)?;
    outcome.members_removed += 1;
    Ok(())
}
