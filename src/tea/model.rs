//! Model for the TEA (The Elm Architecture) pattern.
//!
//! The Model is pure application state - no channels, no handles, no runtime infrastructure.

use crate::config::Config;
use crate::render::{next_version, RenderState};
use crate::store::TreeStore;
use crate::tree::NodeId;
use crate::view::{project, TreeRow};

/// State of the planner feed as last reported by the feed actor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Connecting,
    Connected,
    Disconnected(String),
}

impl ConnectionState {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnected(_) => "disconnected",
        }
    }
}

/// Pure application state - the single source of truth.
pub struct Model {
    // Core state
    pub store: TreeStore,

    // Cursor over visible rows. The id keeps the cursor on the same node
    // when snapshots or folding shift row indices.
    pub selected: usize,
    pub selected_id: Option<NodeId>,

    pub connection: ConnectionState,

    // UI toggle state
    /// Whether the keymap legend is expanded (toggled by '?')
    pub show_keymap: bool,

    // Dirty flag - set when state changes and render is needed
    pub dirty: bool,

    // Config (immutable after init)
    pub config: Config,
}

impl Model {
    pub fn new(config: Config) -> Self {
        Self {
            store: TreeStore::new(),
            selected: 0,
            selected_id: None,
            connection: ConnectionState::default(),
            show_keymap: false,
            dirty: true,
            config,
        }
    }

    /// Currently visible rows.
    pub fn rows(&self) -> Vec<TreeRow> {
        project(&self.store)
    }

    pub fn selected_row(&self) -> Option<TreeRow> {
        self.rows().into_iter().nth(self.selected)
    }

    /// Move the cursor to row `index` of the current projection.
    pub fn select(&mut self, index: usize) {
        let rows = self.rows();
        self.select_in(&rows, index);
    }

    fn select_in(&mut self, rows: &[TreeRow], index: usize) {
        if rows.is_empty() {
            self.selected = 0;
            self.selected_id = None;
            return;
        }
        self.selected = index.min(rows.len() - 1);
        self.selected_id = Some(rows[self.selected].id.clone());
    }

    /// Re-anchor the cursor after the visible rows changed.
    ///
    /// Follows the selected node by id; if it is no longer visible, keeps
    /// the row index, clamped to the new row count.
    pub fn sync_selection(&mut self) {
        let rows = self.rows();
        let index = self
            .selected_id
            .as_ref()
            .and_then(|id| rows.iter().position(|r| &r.id == id))
            .unwrap_or(self.selected);
        self.select_in(&rows, index);
    }

    /// Create an immutable snapshot for the render thread.
    ///
    /// Each snapshot gets a monotonically increasing version number so the
    /// render thread can skip redundant draws.
    pub fn snapshot(&self) -> RenderState {
        RenderState {
            version: next_version(),
            rows: self.rows(),
            has_tree: !self.store.is_empty(),
            selected: self.selected,
            connection: self.connection.clone(),
            addr: self.config.effective_addr().to_string(),
            snapshots: self.store.snapshot_count(),
            indent: self.config.indent_width(),
            show_keymap: self.show_keymap,
        }
    }
}
