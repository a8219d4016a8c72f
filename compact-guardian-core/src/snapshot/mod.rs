//! Snapshot rendering and storage

pub mod render;
pub mod store;

pub use render::{render, SnapshotMeta, TRUNCATION_MARKER};
pub use store::SnapshotStore;
