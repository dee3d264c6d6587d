//! Planner use-case service.
//!
//! # Responsibility
//! - Create, update and delete task templates.
//! - Record exactly one notification per successful mutation.
//! - Serve the day agenda from the current template set.
//!
//! # Invariants
//! - Edits always target the owning template, never a single generated
//!   occurrence.
//! - Delete only accepts exact template IDs.
//! - A missing target changes nothing and records no notification.
//! - The template write and its notification commit together or not at
//!   all; both stores must share one connection.

use crate::model::notification::{default_message, Notification, NotificationKind};
use crate::model::occurrence::{resolve_template, OccurrenceKey};
use crate::model::task::{Task, TaskDraft, TaskId, TaskValidationError};
use crate::repo::notification_repo::NotificationRepository;
use crate::repo::task_repo::{RepoError, RepoResult, TaskRepository};
use crate::schedule::day_view::DayAgenda;
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from planner use-cases.
#[derive(Debug)]
pub enum PlannerServiceError {
    /// Input failed template validation.
    InvalidTask(TaskValidationError),
    /// No template matches the given identifier.
    TaskNotFound(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for PlannerServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTask(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PlannerServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTask(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::TaskNotFound(_) => None,
        }
    }
}

impl From<TaskValidationError> for PlannerServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::InvalidTask(value)
    }
}

impl From<RepoError> for PlannerServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::TaskNotFound(id) => Self::TaskNotFound(id.to_string()),
            RepoError::Validation(err) => Self::InvalidTask(err),
            other => Self::Repo(other),
        }
    }
}

pub type PlannerResult<T> = Result<T, PlannerServiceError>;

/// Planner facade over task and notification stores.
pub struct PlannerService<T: TaskRepository, N: NotificationRepository> {
    tasks: T,
    notifications: N,
}

impl<T: TaskRepository, N: NotificationRepository> PlannerService<T, N> {
    pub fn new(tasks: T, notifications: N) -> Self {
        Self {
            tasks,
            notifications,
        }
    }

    /// Creates a template with a fresh ID and records `created`.
    pub fn create_task(&self, draft: TaskDraft) -> PlannerResult<Task> {
        let task = Task::create(draft)?;
        self.tasks.with_transaction(|| {
            self.tasks.upsert_task(&task)?;
            self.record(&task, NotificationKind::Created)
        })?;

        info!(
            "event=task_create module=service status=ok task_id={} kind={} recurring={}",
            task.id,
            task.kind.as_str(),
            task.weekly_recurrence_end().is_some()
        );
        Ok(task)
    }

    /// Replaces every editable field of the template with `id` and records
    /// `updated`.
    pub fn update_task(&self, id: &TaskId, draft: TaskDraft) -> PlannerResult<Task> {
        let Some(mut task) = self.tasks.get_task(id)? else {
            warn!(
                "event=task_update module=service status=not_found target={}",
                id
            );
            return Err(PlannerServiceError::TaskNotFound(id.to_string()));
        };
        self.apply_update(&mut task, draft)?;
        Ok(task)
    }

    /// Edits the template that owns an occurrence.
    pub fn update_occurrence(&self, key: &OccurrenceKey, draft: TaskDraft) -> PlannerResult<Task> {
        self.update_task(&key.template_id, draft)
    }

    /// Edits by template ID or legacy `<template-id>-<YYYY-MM-DD>` occurrence
    /// ID, always mutating the owning template.
    pub fn edit(&self, raw_id: &str, draft: TaskDraft) -> PlannerResult<Task> {
        let mut task = self.resolve_task(raw_id)?;
        self.apply_update(&mut task, draft)?;
        Ok(task)
    }

    /// Finds the template for a template ID or legacy occurrence ID.
    pub fn resolve_task(&self, raw_id: &str) -> PlannerResult<Task> {
        let templates = self.tasks.list_tasks()?;
        match resolve_template(&templates, raw_id) {
            Some(task) => Ok(task.clone()),
            None => {
                warn!(
                    "event=task_resolve module=service status=not_found target={}",
                    raw_id.trim()
                );
                Err(PlannerServiceError::TaskNotFound(raw_id.trim().to_string()))
            }
        }
    }

    /// Deletes the template with exactly `id` and records `deleted`.
    ///
    /// Generated occurrence IDs are not resolved here.
    pub fn delete_task(&self, id: &TaskId) -> PlannerResult<Task> {
        let Some(task) = self.tasks.get_task(id)? else {
            warn!(
                "event=task_delete module=service status=not_found target={}",
                id
            );
            return Err(PlannerServiceError::TaskNotFound(id.to_string()));
        };

        self.tasks.with_transaction(|| {
            self.tasks.remove_task(&task.id)?;
            self.record(&task, NotificationKind::Deleted)
        })?;

        info!(
            "event=task_delete module=service status=ok task_id={}",
            task.id
        );
        Ok(task)
    }

    /// All templates in insertion order.
    pub fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        self.tasks.list_tasks()
    }

    /// Agenda for `date`, built from a fresh read of the template store.
    pub fn agenda_for(&self, date: NaiveDate) -> RepoResult<DayAgenda> {
        let templates = self.tasks.list_tasks()?;
        Ok(DayAgenda::new(date, templates))
    }

    fn apply_update(&self, task: &mut Task, draft: TaskDraft) -> PlannerResult<()> {
        task.apply_draft(draft)?;
        let task: &Task = task;
        self.tasks.with_transaction(|| {
            self.tasks.upsert_task(task)?;
            self.record(task, NotificationKind::Updated)
        })?;

        info!(
            "event=task_update module=service status=ok task_id={} kind={}",
            task.id,
            task.kind.as_str()
        );
        Ok(())
    }

    fn record(&self, task: &Task, kind: NotificationKind) -> RepoResult<()> {
        let notification = Notification::record(task, kind, default_message(kind, task.kind));
        self.notifications.prepend_notification(&notification)
    }
}
