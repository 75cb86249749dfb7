//! Task tree data model received from the planner feed.
//!
//! A snapshot is a single [`TaskNode`] owning its children. Decoding is
//! lenient where the planner is known to be sloppy: `children` may be
//! absent or `null`, `status` may carry values outside the known set, and
//! the older `task_name`/`node_name` keys are accepted as aliases.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Execution status of a task in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Failed,
    /// Any status string the viewer does not recognise.
    Unknown(String),
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Unknown(s) if s.is_empty() => "unknown",
            TaskStatus::Unknown(s) => s.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, TaskStatus::Unknown(_))
    }
}

impl From<&str> for TaskStatus {
    fn from(s: &str) -> Self {
        match s {
            "pending" => TaskStatus::Pending,
            "in-progress" => TaskStatus::InProgress,
            // The planner marks a finished root as "succeeded".
            "completed" | "succeeded" => TaskStatus::Completed,
            "failed" => TaskStatus::Failed,
            other => TaskStatus::Unknown(other.to_string()),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TaskStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw {
            Some(s) => TaskStatus::from(s.as_str()),
            None => TaskStatus::Unknown(String::new()),
        })
    }
}

/// One node of a hierarchical plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskNode {
    /// Display name. Not unique across the tree.
    #[serde(alias = "task_name")]
    pub name: String,
    /// Server-assigned identifier, when the planner provides one.
    #[serde(default, alias = "node_name", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub children: Vec<TaskNode>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<TaskNode>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<TaskNode>>::deserialize(deserializer)?.unwrap_or_default())
}

impl TaskNode {
    pub fn new(name: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            name: name.into(),
            id: None,
            status,
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_children(mut self, children: Vec<TaskNode>) -> Self {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Identity of this node when it is the root of a snapshot.
    pub fn root_id(&self) -> NodeId {
        match &self.id {
            Some(id) => NodeId::server(id),
            None => NodeId::new(escape_segment(&self.name)),
        }
    }

    /// Identities of the direct children, given this node's identity.
    ///
    /// Returned in child order. Siblings sharing a name are told apart by
    /// an occurrence suffix, so `[a, b, a]` yields `a`, `b`, `a~1`.
    pub fn child_ids(&self, own_id: &NodeId) -> Vec<NodeId> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        self.children
            .iter()
            .map(|child| {
                if let Some(id) = &child.id {
                    return NodeId::server(id);
                }
                let occurrence = seen.entry(child.name.as_str()).or_insert(0);
                let segment = if *occurrence == 0 {
                    escape_segment(&child.name)
                } else {
                    format!("{}~{}", escape_segment(&child.name), occurrence)
                };
                *occurrence += 1;
                NodeId::new(format!("{}/{}", own_id.as_str(), segment))
            })
            .collect()
    }

    /// Every `(id, node)` pair of the subtree in depth-first pre-order.
    pub fn identified(&self) -> Vec<(NodeId, &TaskNode)> {
        let mut out = Vec::with_capacity(self.node_count());
        let mut stack = vec![(self.root_id(), self)];
        while let Some((id, node)) = stack.pop() {
            let ids = node.child_ids(&id);
            stack.extend(ids.into_iter().zip(node.children.iter()).rev());
            out.push((id, node));
        }
        out
    }
}

/// Stable identity used to key per-node UI state.
///
/// Either the planner's own identifier behind a `#` (`#abc-1`) or the
/// escaped name-path from the root (`Root/Sub1/Leaf~1`). Path segments
/// escape `#`, so the two kinds never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identity for a planner-assigned id.
    pub fn server(id: &str) -> Self {
        Self(format!("#{}", id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

fn escape_segment(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if matches!(c, '\\' | '/' | '~' | '#') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
