//! Domain model for the day planner.
//!
//! # Responsibility
//! - Define task templates, their derived occurrences, and notification
//!   audit records.
//!
//! # Invariants
//! - Templates are the only durable schedule data; occurrences are derived.
//! - Every template mutation produces exactly one notification record.

pub mod notification;
pub mod occurrence;
pub mod task;
