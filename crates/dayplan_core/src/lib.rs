//! Core domain logic for the day planner.
//! This crate is the single source of truth for scheduling invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schedule;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::notification::{
    default_message, Notification, NotificationId, NotificationKind,
};
pub use model::occurrence::{resolve_template, Occurrence, OccurrenceKey};
pub use model::task::{
    Importance, Task, TaskDraft, TaskId, TaskKind, TaskValidationError, TimeOfDay,
};
pub use repo::notification_repo::{
    NotificationListQuery, NotificationRepository, NotificationView,
    SqliteNotificationRepository,
};
pub use repo::task_repo::{RepoError, RepoResult, SqliteTaskRepository, TaskRepository};
pub use schedule::day_view::{for_day, DayAgenda};
pub use schedule::recurrence::{expand, materialize};
pub use service::notification_service::{NotificationService, NotificationServiceError};
pub use service::planner_service::{PlannerResult, PlannerService, PlannerServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
