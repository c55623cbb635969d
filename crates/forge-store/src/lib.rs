//! Forge stores
//!
//! Shared pipeline state behind explicit interfaces, injected into the
//! engine at construction time.
//!
//! # Core Concepts
//!
//! - [`ResultStore`]: fingerprint → result cache (later writer wins)
//! - [`HistoryStore`]: append-only generation history
//! - [`MemoryResultStore`] / [`MemoryHistoryStore`]: in-process backing
//! - [`JsonFileResultStore`] / [`JsonlHistoryStore`]: file-backed backing
//! - [`MemoryLearningStore`]: reference learning-capability implementation

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod error;
mod file;
mod learning;
mod memory;
mod traits;

// Re-exports
pub use error::StoreError;
pub use file::{JsonFileResultStore, JsonlHistoryStore};
pub use learning::MemoryLearningStore;
pub use memory::{MemoryHistoryStore, MemoryResultStore};
pub use traits::{HistoryStore, ResultStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
