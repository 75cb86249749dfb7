//! Line codec for the planner feed.
//!
//! The feed is newline-delimited JSON. A line is either an event envelope
//! `{"event": "task_node_update", "data": <node|null>}` or a bare task node.
//! Nothing here fails: bad input becomes [`FeedEvent::Malformed`] and the
//! caller keeps its last good tree.

use serde_json::Value;

use crate::tree::TaskNode;

/// Event name carrying a full task-tree snapshot.
pub const TASK_NODE_UPDATE: &str = "task_node_update";

/// Deepest plan accepted, counted in nodes from the root.
///
/// Each node level costs two JSON containers (the node object and its
/// `children` array), and the envelope one more, which keeps the deepest
/// accepted line under serde_json's nesting limit of 128.
pub const MAX_TREE_DEPTH: usize = 60;

const MAX_NESTING: usize = 2 * MAX_TREE_DEPTH + 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// A replacement tree. `None` is an explicit null payload.
    Snapshot(Option<TaskNode>),
    /// An envelope for some other event name.
    Ignored(String),
    /// Unparseable line or wrong payload shape.
    Malformed(String),
}

/// Decode a single feed line. Blank lines yield `None`.
pub fn decode_line(line: &str) -> Option<FeedEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if json_nesting(line) > MAX_NESTING {
        return Some(FeedEvent::Malformed(format!(
            "plan nested deeper than {} levels",
            MAX_TREE_DEPTH
        )));
    }

    let value: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => return Some(FeedEvent::Malformed(format!("invalid JSON: {}", e))),
    };

    Some(decode_value(value))
}

/// Deepest `{`/`[` nesting in `line`, ignoring brackets inside strings.
fn json_nesting(line: &str) -> usize {
    let (mut depth, mut max) = (0usize, 0usize);
    let (mut in_string, mut escaped) = (false, false);
    for b in line.bytes() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                max = max.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}

fn decode_value(value: Value) -> FeedEvent {
    match value {
        Value::Null => FeedEvent::Snapshot(None),
        Value::Object(mut obj) if obj.contains_key("event") => {
            let event = match obj.remove("event") {
                Some(Value::String(s)) => s,
                other => return FeedEvent::Malformed(format!("bad event name: {:?}", other)),
            };
            if event != TASK_NODE_UPDATE {
                return FeedEvent::Ignored(event);
            }
            match obj.remove("data") {
                None => FeedEvent::Malformed("envelope has no data".to_string()),
                Some(Value::Null) => FeedEvent::Snapshot(None),
                Some(data) => decode_node(data),
            }
        }
        other => decode_node(other),
    }
}

fn decode_node(value: Value) -> FeedEvent {
    match serde_json::from_value::<TaskNode>(value) {
        Ok(node) => FeedEvent::Snapshot(Some(node)),
        Err(e) => FeedEvent::Malformed(format!("not a task node: {}", e)),
    }
}
