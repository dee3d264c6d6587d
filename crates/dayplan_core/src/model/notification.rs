//! Notification audit records.
//!
//! # Responsibility
//! - Build one immutable audit record per template mutation.
//! - Provide the read/archive lifecycle helpers.
//!
//! # Invariants
//! - `importance` and `task_type` are copied at creation time and are never
//!   re-derived from the template afterwards.
//! - Archiving always implies read.

use crate::model::task::{Importance, Task, TaskId, TaskKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type NotificationId = Uuid;

/// Event that produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Created,
    Updated,
    Deleted,
    /// Reserved for time-based reminders; not produced by mutations.
    Reminder,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::Reminder => "reminder",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub task_id: TaskId,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
    pub is_archived: bool,
    pub importance: Importance,
    pub task_type: TaskKind,
}

impl Notification {
    /// Records a mutation of `task` at the current time.
    pub fn record(task: &Task, kind: NotificationKind, message: impl Into<String>) -> Self {
        Self::record_at(task, kind, message, Utc::now())
    }

    /// Records a mutation of `task` at an explicit timestamp.
    pub fn record_at(
        task: &Task,
        kind: NotificationKind,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id: task.id.clone(),
            title: task.title.clone(),
            message: message.into(),
            kind,
            timestamp,
            is_read: false,
            is_archived: false,
            importance: task.importance,
            task_type: task.kind,
        }
    }

    pub fn mark_read(&mut self) {
        self.is_read = true;
    }

    /// Archives the record; archived records are always read.
    pub fn archive(&mut self) {
        self.is_archived = true;
        self.is_read = true;
    }

    /// Unread and still in the recent list (counts toward the badge).
    pub fn is_unread(&self) -> bool {
        !self.is_read && !self.is_archived
    }
}

/// Default message text for a mutation of a given template kind.
///
/// e.g. `Class created successfully`, `Meeting deleted`.
pub fn default_message(kind: NotificationKind, task_kind: TaskKind) -> String {
    let label = task_kind.label();
    match kind {
        NotificationKind::Created => format!("{label} created successfully"),
        NotificationKind::Updated => format!("{label} updated successfully"),
        NotificationKind::Deleted => format!("{label} deleted"),
        NotificationKind::Reminder => format!("{label} reminder"),
    }
}
