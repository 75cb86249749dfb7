//! Pure update function for the TEA (The Elm Architecture) pattern.
//!
//! The update function takes a model and a message, mutates the model,
//! and returns a list of commands to execute. Every message is applied in
//! one synchronous step, so snapshots and toggles never interleave.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::{hlog, hlog_debug, hlog_warn};

use super::command::Command;
use super::message::Message;
use super::model::{ConnectionState, Model};

/// Pure update function: Model + Message → Commands
pub fn update(model: &mut Model, msg: Message) -> Vec<Command> {
    let mut cmds = Vec::new();

    match msg {
        Message::Key(key) => {
            if key.kind != KeyEventKind::Release {
                model.dirty = true; // Keyboard input always triggers render
                update_tree_mode(model, key, &mut cmds);
            }
        }

        Message::Resize(_, _) => {
            model.dirty = true; // Resize triggers re-render
        }

        Message::FeedConnected => {
            hlog!("Message::FeedConnected");
            model.connection = ConnectionState::Connected;
            model.dirty = true;
        }

        Message::FeedDisconnected(reason) => {
            hlog_warn!("Message::FeedDisconnected reason={}", reason);
            // Keep showing the last tree.
            model.connection = ConnectionState::Disconnected(reason);
            model.dirty = true;
        }

        Message::SnapshotReceived(snapshot) => {
            hlog_debug!(
                "Message::SnapshotReceived root={:?}",
                snapshot.as_ref().map(|n| n.name.as_str())
            );
            model.store.apply_snapshot(snapshot);
            model.sync_selection();
            model.dirty = true;
        }
    }

    cmds
}

fn update_tree_mode(model: &mut Model, key: KeyEvent, cmds: &mut Vec<Command>) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            let count = model.rows().len();
            if count > 0 {
                model.select((model.selected + 1) % count);
            }
        }

        KeyCode::Char('k') | KeyCode::Up => {
            let count = model.rows().len();
            if count > 0 {
                model.select(model.selected.checked_sub(1).unwrap_or(count - 1));
            }
        }

        KeyCode::Char('g') | KeyCode::Home => model.select(0),

        KeyCode::Char('G') | KeyCode::End => model.select(usize::MAX),

        KeyCode::Enter | KeyCode::Char(' ') => {
            if let Some(row) = model.selected_row().filter(|r| r.has_toggle()) {
                let expanded = model.store.toggle(&row.id);
                hlog_debug!("Toggle id={} expanded={}", row.id, expanded);
                model.sync_selection();
            }
        }

        KeyCode::Char('l') | KeyCode::Right => set_selected_expanded(model, true),

        KeyCode::Char('h') | KeyCode::Left => set_selected_expanded(model, false),

        KeyCode::Char('E') => {
            model.store.expand_all();
            model.sync_selection();
        }

        KeyCode::Char('C') => {
            model.store.collapse_all();
            model.sync_selection();
        }

        KeyCode::Char('q') | KeyCode::Esc => {
            cmds.push(Command::Quit);
        }

        KeyCode::Char('?') => {
            model.show_keymap = !model.show_keymap;
        }

        _ => {}
    }
}

/// Expand or collapse the row under the cursor. Leaves are left alone.
fn set_selected_expanded(model: &mut Model, expanded: bool) {
    if let Some(row) = model.selected_row().filter(|r| r.has_toggle()) {
        model.store.set_expanded(&row.id, expanded);
        model.sync_selection();
    }
}
