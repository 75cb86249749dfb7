//! Test fixtures for integration tests.
//!
//! Provides helpers for:
//! - Building task trees tersely
//! - Serializing snapshots as feed lines
//! - Reading projected rows back as labels

#![allow(dead_code)]

use htnview::feed::TASK_NODE_UPDATE;
use htnview::store::TreeStore;
use htnview::tree::{TaskNode, TaskStatus};
use htnview::view::project;

pub fn node(name: &str, status: &str, children: Vec<TaskNode>) -> TaskNode {
    TaskNode::new(name, TaskStatus::from(status)).with_children(children)
}

pub fn leaf(name: &str, status: &str) -> TaskNode {
    node(name, status, vec![])
}

/// The tree from the "make tea" example plan.
pub fn tea_plan() -> TaskNode {
    node(
        "Make tea",
        "in-progress",
        vec![
            node(
                "Boil water",
                "completed",
                vec![leaf("Fill kettle", "completed"), leaf("Switch on", "completed")],
            ),
            node(
                "Brew",
                "in-progress",
                vec![leaf("Add teabag", "completed"), leaf("Pour water", "pending")],
            ),
            leaf("Serve", "pending"),
        ],
    )
}

/// A `task_node_update` envelope line, newline terminated.
pub fn envelope_line(snapshot: Option<&TaskNode>) -> String {
    let value = serde_json::json!({
        "event": TASK_NODE_UPDATE,
        "data": snapshot,
    });
    format!("{}\n", value)
}

/// `label()` of each visible row, indented two spaces per level.
pub fn visible(store: &TreeStore) -> Vec<String> {
    project(store)
        .into_iter()
        .map(|r| format!("{}{}", r.indent(2), r.label()))
        .collect()
}
