//! Merge engine - coordinates planning and applying.
//!
//! Planning delegates to the operation modules in `ops/`:
//! - `ops/update.rs` - primitive fields and recursion
//! - `ops/many_to_one.rs` - single-valued slots
//! - `ops/one_to_many.rs` - collections

use graft_core::{AttributeMap, EntityHandle, EntityStore};
use graft_registry::Registry;
use tracing::debug;

use crate::error::{MergeError, MergeResult};
use crate::ops::{self, BuildContext};
use crate::options::MergeOptions;
use crate::plan::Plan;
use crate::result::MergeOutcome;

/// Merge engine over one schema registry.
#[derive(Debug, Clone)]
pub struct MergeEngine<'r> {
    registry: &'r Registry,
    options: MergeOptions,
}

impl<'r> MergeEngine<'r> {
    /// Create an engine with default options.
    pub fn new(registry: &'r Registry) -> Self {
        Self::with_options(registry, MergeOptions::default())
    }

    pub fn with_options(registry: &'r Registry, options: MergeOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Build the plan that reconciles `entity`, of schema type `type_name`,
    /// with `attributes`.
    ///
    /// The only store mutation allowed here is `find_or_create`.
    pub fn plan<S>(
        &self,
        store: &mut S,
        entity: EntityHandle,
        type_name: &str,
        attributes: &AttributeMap,
    ) -> MergeResult<Plan>
    where
        S: EntityStore + ?Sized,
    {
        let type_def = self
            .registry
            .get_type_by_name(type_name)
            .ok_or_else(|| MergeError::unknown_type(type_name))?;

        let ctx = BuildContext::new(self.registry, &self.options);
        let root = ops::build_update(&ctx, store, entity, type_def, attributes)?;
        let plan = Plan::new(root);

        debug!(%entity, type_name, operations = plan.operation_count(), "planned merge");
        Ok(plan)
    }

    /// Execute a plan. Never resolves entities.
    pub fn apply<S>(&self, store: &mut S, plan: Plan) -> MergeResult<MergeOutcome>
    where
        S: EntityStore + ?Sized,
    {
        let entity = plan.root().entity;
        let outcome = plan.apply(store)?;
        debug!(%entity, %outcome, "applied merge");
        Ok(outcome)
    }

    /// Plan, then apply.
    pub fn merge<S>(
        &self,
        store: &mut S,
        entity: EntityHandle,
        type_name: &str,
        attributes: &AttributeMap,
    ) -> MergeResult<MergeOutcome>
    where
        S: EntityStore + ?Sized,
    {
        let plan = self.plan(store, entity, type_name, attributes)?;
        self.apply(store, plan)
    }

    /// Adapt a domain object into its entity handle.
    pub fn as_entity<S>(&self, store: &S, object: &S::Object) -> MergeResult<EntityHandle>
    where
        S: EntityStore + ?Sized,
    {
        Ok(store.as_entity(object)?)
    }

    /// Merge `attributes` into the entity behind a domain object.
    pub fn merge_entity<S>(
        &self,
        store: &mut S,
        object: &S::Object,
        type_name: &str,
        attributes: &AttributeMap,
    ) -> MergeResult<MergeOutcome>
    where
        S: EntityStore + ?Sized,
    {
        let entity = self.as_entity(&*store, object)?;
        self.merge(store, entity, type_name, attributes)
    }
}
