//! Merge result types.

use std::fmt;

/// Counts of the mutations performed by applying a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Entities whose update ran, root included.
    pub entities_updated: usize,
    pub primitives_assigned: usize,
    pub children_linked: usize,
    pub children_unlinked: usize,
    pub collections_cleared: usize,
    pub members_added: usize,
    pub members_removed: usize,
}

impl MergeOutcome {
    /// Number of link, unlink, clear, add and remove mutations.
    pub fn structural_changes(&self) -> usize {
        self.children_linked
            + self.children_unlinked
            + self.collections_cleared
            + self.members_added
            + self.members_removed
    }
}

impl fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entities updated, {} fields set, {} linked, {} unlinked, {} cleared, {} added, {} removed",
            self.entities_updated,
            self.primitives_assigned,
            self.children_linked,
            self.children_unlinked,
            self.collections_cleared,
            self.members_added,
            self.members_removed
        )
    }
}
