pub mod config;
pub mod error;
pub mod log;

// Tree state and its projection
pub mod feed;
pub mod store;
pub mod tree;
pub mod view;

// Decoupled game loop architecture
pub mod actors;
pub mod app;
pub mod render;
pub mod tea;
pub mod ui;

pub use error::{Error, Result};
pub use store::{ExpansionMap, TreeStore};
pub use tree::{NodeId, TaskNode, TaskStatus};
