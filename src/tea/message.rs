//! Messages for the TEA (The Elm Architecture) pattern.
//!
//! Messages are inputs to the update function - they come from the keyboard
//! or from the feed actor.

use crossterm::event::KeyEvent;

use crate::tree::TaskNode;

/// Input messages to the update function.
#[derive(Debug)]
pub enum Message {
    // Keyboard/terminal events
    Key(KeyEvent),
    Resize(u16, u16),

    // From the feed actor
    FeedConnected,
    /// Connection lost or refused, with the reason.
    FeedDisconnected(String),
    /// A replacement tree; `None` clears the view.
    SnapshotReceived(Option<TaskNode>),
}
