//! Projection of the tree store into a flat list of visible rows.
//!
//! This is a pure function of `(snapshot, expansion)`: it never mutates the
//! store. Rows come out in depth-first pre-order with children in their
//! original order; collapsed subtrees are skipped but stay in the model.

use ratatui::style::Color;

use crate::store::TreeStore;
use crate::tree::{NodeId, TaskNode, TaskStatus};

pub const DEFAULT_INDENT: usize = 2;

const MARKER: &str = "▸";
const TOGGLE_EXPANDED: &str = "▾";
const TOGGLE_COLLAPSED: &str = "▸";

const COLOR_COMPLETED: Color = Color::Green;
const COLOR_IN_PROGRESS: Color = Color::Blue;
const COLOR_FAILED: Color = Color::Red;
const COLOR_PENDING: Color = Color::Gray;
const COLOR_NEUTRAL: Color = Color::DarkGray;

/// One visible line of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub id: NodeId,
    pub depth: usize,
    pub name: String,
    pub status: TaskStatus,
    /// `Some(expanded)` for nodes with children, `None` for leaves.
    pub toggle: Option<bool>,
}

impl TreeRow {
    /// `"{name} ({status})"`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.status)
    }

    pub fn has_toggle(&self) -> bool {
        self.toggle.is_some()
    }

    pub fn indent(&self, width: usize) -> String {
        " ".repeat(self.depth * width)
    }

    pub fn toggle_glyph(&self) -> Option<&'static str> {
        self.toggle.map(|expanded| {
            if expanded {
                TOGGLE_EXPANDED
            } else {
                TOGGLE_COLLAPSED
            }
        })
    }
}

/// Visible rows for the store's current tree. Empty when there is no tree.
pub fn project(store: &TreeStore) -> Vec<TreeRow> {
    let Some(root) = store.tree() else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    let mut stack: Vec<(NodeId, &TaskNode, usize)> = vec![(root.root_id(), root, 0)];

    while let Some((id, node, depth)) = stack.pop() {
        let expanded = store.is_expanded(&id);
        let toggle = (!node.is_leaf()).then_some(expanded);

        if toggle == Some(true) {
            let ids = node.child_ids(&id);
            stack.extend(
                ids.into_iter()
                    .zip(node.children.iter())
                    .map(|(child_id, child)| (child_id, child, depth + 1))
                    .rev(),
            );
        }

        rows.push(TreeRow {
            id,
            depth,
            name: node.name.clone(),
            status: node.status.clone(),
            toggle,
        });
    }

    rows
}

/// Marker color for a status. Unrecognised statuses get a neutral color.
pub fn status_color(status: &TaskStatus) -> Color {
    match status {
        TaskStatus::Completed => COLOR_COMPLETED,
        TaskStatus::InProgress => COLOR_IN_PROGRESS,
        TaskStatus::Failed => COLOR_FAILED,
        TaskStatus::Pending => COLOR_PENDING,
        TaskStatus::Unknown(_) => COLOR_NEUTRAL,
    }
}

pub fn marker() -> &'static str {
    MARKER
}

/// Plain-text rendering, one row per line, for non-interactive output.
pub fn render_text(store: &TreeStore, indent: usize) -> String {
    let rows = project(store);
    if rows.is_empty() {
        return "Waiting for data...\n".to_string();
    }

    let mut out = String::new();
    for row in rows {
        out.push_str(&row.indent(indent));
        out.push_str(MARKER);
        out.push(' ');
        out.push_str(&row.label());
        if let Some(glyph) = row.toggle_glyph() {
            out.push(' ');
            out.push_str(glyph);
        }
        out.push('\n');
    }
    out
}
