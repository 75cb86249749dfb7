use std::sync::atomic::{AtomicU64, Ordering};

use crate::tea::ConnectionState;
use crate::view::{TreeRow, DEFAULT_INDENT};

static VERSION_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn next_version() -> u64 {
    VERSION_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Immutable view of the model handed to the render thread.
#[derive(Debug, Clone)]
pub struct RenderState {
    pub version: u64,
    /// Visible rows, already folded.
    pub rows: Vec<TreeRow>,
    /// False until a snapshot arrives (or after a null one).
    pub has_tree: bool,
    pub selected: usize,
    pub connection: ConnectionState,
    pub addr: String,
    pub snapshots: u64,
    pub indent: usize,
    /// Whether the keymap legend is expanded (toggled by '?')
    pub show_keymap: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            version: 0,
            rows: Vec::new(),
            has_tree: false,
            selected: 0,
            connection: ConnectionState::default(),
            addr: String::new(),
            snapshots: 0,
            indent: DEFAULT_INDENT,
            show_keymap: false,
        }
    }
}
