//! Repository layer: store contracts and their SQLite implementations.
//!
//! # Responsibility
//! - Define the task and notification store contracts used by services.
//! - Isolate SQLite query details from use-case orchestration.
//!
//! # Invariants
//! - Repositories only accept connections with all migrations applied.
//! - Missing rows surface as semantic not-found errors, not silent no-ops.

pub mod notification_repo;
pub mod task_repo;
