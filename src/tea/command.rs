//! Commands for the TEA (The Elm Architecture) pattern.
//!
//! Commands are outputs from the update function - they represent side effects
//! to be executed by the runtime. Toggles and snapshots are applied inside
//! `update` itself; only lifecycle effects leave it.

/// Output commands from the update function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // App lifecycle
    Quit,
}
