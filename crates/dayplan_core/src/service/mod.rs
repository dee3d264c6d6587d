//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into planner use-cases.
//! - Keep CLI and other callers decoupled from storage details.

pub mod notification_service;
pub mod planner_service;
