use crate::types::{TrackId, TrackSet};

/// Changes that make a target collection equal to a source collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub to_add: Vec<TrackId>,
    pub to_remove: Vec<TrackId>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    pub fn len(&self) -> usize {
        self.to_add.len() + self.to_remove.len()
    }
}

/// Computes `source - target` as additions and `target - source` as removals.
///
/// Both lists come back sorted so repeated runs log the same order; the
/// applier does not depend on it.
pub fn reconcile(source: &TrackSet, target: &TrackSet) -> ChangeSet {
    let mut to_add: Vec<TrackId> = source.difference(target).cloned().collect();
    let mut to_remove: Vec<TrackId> = target.difference(source).cloned().collect();
    to_add.sort_unstable();
    to_remove.sort_unstable();

    ChangeSet { to_add, to_remove }
}
