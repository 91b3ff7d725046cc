//! # teletask-store
//!
//! Persistent task store for Teletask (SQLite-backed).

pub mod audit;
pub mod store;
pub mod task;

pub use audit::AuditLogger;
pub use store::Store;
pub use task::{CompletedTask, Task};
