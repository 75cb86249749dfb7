//! Canonical tree state: the latest snapshot plus per-node expansion flags.
//!
//! Snapshots replace the tree wholesale. The expansion map outlives them and
//! is never authoritative for shape; a node without an entry is expanded.

use std::collections::HashMap;

use crate::tree::{NodeId, TaskNode};
use crate::hlog_debug;

/// Per-node "is expanded" flags. Only ever grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionMap {
    flags: HashMap<NodeId, bool>,
}

impl ExpansionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored flag, or `true` for a node never toggled.
    pub fn get(&self, id: &NodeId) -> bool {
        self.flags.get(id).copied().unwrap_or(true)
    }

    pub fn set(&mut self, id: NodeId, expanded: bool) {
        self.flags.insert(id, expanded);
    }

    /// Flip the flag, treating a missing entry as expanded. Returns the new value.
    pub fn toggle(&mut self, id: &NodeId) -> bool {
        let flag = self.flags.entry(id.clone()).or_insert(true);
        *flag = !*flag;
        *flag
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.flags.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

/// Holds the latest task-tree snapshot and the expansion map.
///
/// `Empty` until the first snapshot arrives, `Populated` afterwards. A null
/// snapshot returns the store to `Empty` but keeps expansion flags.
#[derive(Debug, Clone, Default)]
pub struct TreeStore {
    tree: Option<TaskNode>,
    expansion: ExpansionMap,
    snapshots: u64,
}

impl TreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current tree. `None` clears the view.
    ///
    /// The incoming root is marked expanded so the newest plan is visible
    /// on arrival.
    pub fn apply_snapshot(&mut self, snapshot: Option<TaskNode>) {
        self.snapshots += 1;
        match snapshot {
            Some(root) => {
                let root_id = root.root_id();
                hlog_debug!(
                    "TreeStore::apply_snapshot root={} nodes={}",
                    root_id,
                    root.node_count()
                );
                self.expansion.set(root_id, true);
                self.tree = Some(root);
            }
            None => {
                hlog_debug!("TreeStore::apply_snapshot cleared");
                self.tree = None;
            }
        }
    }

    /// Flip the expansion flag for `id`. Returns the new value.
    pub fn toggle(&mut self, id: &NodeId) -> bool {
        self.expansion.toggle(id)
    }

    pub fn is_expanded(&self, id: &NodeId) -> bool {
        self.expansion.get(id)
    }

    pub fn set_expanded(&mut self, id: &NodeId, expanded: bool) {
        self.expansion.set(id.clone(), expanded);
    }

    /// Expand every node of the current tree that has children.
    pub fn expand_all(&mut self) {
        self.set_all(true);
    }

    /// Collapse every node of the current tree that has children.
    pub fn collapse_all(&mut self) {
        self.set_all(false);
    }

    fn set_all(&mut self, expanded: bool) {
        let Some(tree) = &self.tree else { return };
        for (id, node) in tree.identified() {
            if !node.is_leaf() {
                self.expansion.set(id, expanded);
            }
        }
    }

    pub fn tree(&self) -> Option<&TaskNode> {
        self.tree.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_none()
    }

    pub fn expansion(&self) -> &ExpansionMap {
        &self.expansion
    }

    /// Number of snapshots applied so far, null ones included.
    pub fn snapshot_count(&self) -> u64 {
        self.snapshots
    }
}
