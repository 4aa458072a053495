//! The operation tree produced by planning and consumed by applying.

use graft_core::{CollectionRef, EntityHandle, EntityStore, Identifier, Value};
use std::fmt;

use crate::error::MergeResult;
use crate::ops;
use crate::result::MergeOutcome;

/// Reconcile one entity's primitive fields and the associations present in
/// the input. Never creates or deletes the entity itself.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateEntity {
    pub entity: EntityHandle,
    pub type_name: String,
    /// Primitive assignments in schema order.
    pub primitives: Vec<(String, Value)>,
    /// Association operations in build order.
    pub children: Vec<Operation>,
}

impl UpdateEntity {
    pub fn new(entity: EntityHandle, type_name: impl Into<String>) -> Self {
        Self {
            entity,
            type_name: type_name.into(),
            primitives: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Number of operations below this update.
    pub fn operation_count(&self) -> usize {
        self.children.iter().map(Operation::operation_count).sum()
    }
}

/// One node of the plan tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Update the child already linked in a single-valued slot.
    UpdateChild {
        parent: EntityHandle,
        association: String,
        update: UpdateEntity,
    },
    /// Link a resolved entity into a single-valued slot, then update it.
    LinkChild {
        parent: EntityHandle,
        association: String,
        update: UpdateEntity,
    },
    /// Empty a single-valued slot.
    UnlinkChild {
        parent: EntityHandle,
        association: String,
    },
    /// Detach every member of a collection.
    ClearCollection { collection: CollectionRef },
    /// Add a resolved entity to a collection, then update it.
    AddMember {
        collection: CollectionRef,
        update: UpdateEntity,
    },
    /// Update an entity already in a collection.
    UpdateMember {
        collection: CollectionRef,
        update: UpdateEntity,
    },
    /// Detach a member whose identifier is no longer supplied.
    RemoveMember {
        collection: CollectionRef,
        member: EntityHandle,
        identifier: Identifier,
    },
}

impl Operation {
    /// The nested update carried by this operation, if any.
    pub fn update(&self) -> Option<&UpdateEntity> {
        match self {
            Operation::UpdateChild { update, .. }
            | Operation::LinkChild { update, .. }
            | Operation::AddMember { update, .. }
            | Operation::UpdateMember { update, .. } => Some(update),
            Operation::UnlinkChild { .. }
            | Operation::ClearCollection { .. }
            | Operation::RemoveMember { .. } => None,
        }
    }

    /// This operation plus everything nested below it.
    pub fn operation_count(&self) -> usize {
        1 + self.update().map_or(0, UpdateEntity::operation_count)
    }

    /// Short operation name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::UpdateChild { .. } => "update_child",
            Operation::LinkChild { .. } => "link_child",
            Operation::UnlinkChild { .. } => "unlink_child",
            Operation::ClearCollection { .. } => "clear_collection",
            Operation::AddMember { .. } => "add_member",
            Operation::UpdateMember { .. } => "update_member",
            Operation::RemoveMember { .. } => "remove_member",
        }
    }
}

/// An immutable merge plan: every target entity is already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    root: UpdateEntity,
}

impl Plan {
    pub(crate) fn new(root: UpdateEntity) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &UpdateEntity {
        &self.root
    }

    /// Number of association operations in the tree. The root update is not
    /// counted.
    pub fn operation_count(&self) -> usize {
        self.root.operation_count()
    }

    /// All operations in execution order.
    pub fn operations(&self) -> Vec<&Operation> {
        fn walk<'a>(update: &'a UpdateEntity, out: &mut Vec<&'a Operation>) {
            for op in &update.children {
                out.push(op);
                if let Some(nested) = op.update() {
                    walk(nested, out);
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.root, &mut out);
        out
    }

    /// Execute the plan against `store`. Nothing is resolved here.
    pub fn apply<S>(self, store: &mut S) -> MergeResult<MergeOutcome>
    where
        S: EntityStore + ?Sized,
    {
        let mut outcome = MergeOutcome::default();
        ops::apply_update(store, self.root, &mut outcome)?;
        Ok(outcome)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_update(f, &self.root, 0)
    }
}

fn write_update(f: &mut fmt::Formatter<'_>, update: &UpdateEntity, depth: usize) -> fmt::Result {
    write!(f, "{:indent$}update {} {}", "", update.type_name, update.entity, indent = depth * 2)?;
    if !update.primitives.is_empty() {
        let names: Vec<&str> = update.primitives.iter().map(|(n, _)| n.as_str()).collect();
        write!(f, " set {}", names.join(", "))?;
    }
    writeln!(f)?;

    for op in &update.children {
        let indent = (depth + 1) * 2;
        match op {
            Operation::UpdateChild { association, .. } => {
                writeln!(f, "{:indent$}update child {}", "", association)?
            }
            Operation::LinkChild {
                association,
                update,
                ..
            } => writeln!(f, "{:indent$}link {} -> {}", "", association, update.entity)?,
            Operation::UnlinkChild { association, .. } => {
                writeln!(f, "{:indent$}unlink {}", "", association)?
            }
            Operation::ClearCollection { collection } => {
                writeln!(f, "{:indent$}clear {}", "", collection)?
            }
            Operation::AddMember { collection, update } => {
                writeln!(f, "{:indent$}add {} to {}", "", update.entity, collection)?
            }
            Operation::UpdateMember { collection, update } => {
                writeln!(f, "{:indent$}update {} in {}", "", update.entity, collection)?
            }
            Operation::RemoveMember {
                collection,
                member,
                identifier,
            } => writeln!(
                f,
                "{:indent$}remove {} ({}) from {}",
                "", member, identifier, collection
            )?,
        }
        if let Some(nested) = op.update() {
            write_update(f, nested, depth + 2)?;
        }
    }
    Ok(())
}
