//! Notification use-case service.
//!
//! # Responsibility
//! - Serve the recent/unread/archived views and the unread badge count.
//! - Acknowledge, archive and delete notification records.

use crate::model::notification::{Notification, NotificationId};
use crate::repo::notification_repo::{
    NotificationListQuery, NotificationRepository, NotificationView,
};
use crate::repo::task_repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum NotificationServiceError {
    NotificationNotFound(NotificationId),
    Repo(RepoError),
}

impl Display for NotificationServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotificationNotFound(id) => write!(f, "notification not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NotificationServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::NotificationNotFound(_) => None,
        }
    }
}

impl From<RepoError> for NotificationServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotificationNotFound(id) => Self::NotificationNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub struct NotificationService<N: NotificationRepository> {
    repo: N,
}

impl<N: NotificationRepository> NotificationService<N> {
    pub fn new(repo: N) -> Self {
        Self { repo }
    }

    /// Lists one view newest-first.
    pub fn list(
        &self,
        view: NotificationView,
        limit: Option<u32>,
    ) -> Result<Vec<Notification>, NotificationServiceError> {
        let query = NotificationListQuery { view, limit };
        Ok(self.repo.list_notifications(&query)?)
    }

    /// Badge count: records neither read nor archived.
    pub fn unread_count(&self) -> Result<u32, NotificationServiceError> {
        Ok(self.repo.count_unread()?)
    }

    pub fn mark_read(&self, id: NotificationId) -> Result<(), NotificationServiceError> {
        self.repo.mark_read(id)?;
        info!("event=notification_read module=service status=ok notification_id={id}");
        Ok(())
    }

    /// Archives a record; it also becomes read.
    pub fn archive(&self, id: NotificationId) -> Result<(), NotificationServiceError> {
        self.repo.archive(id)?;
        info!("event=notification_archive module=service status=ok notification_id={id}");
        Ok(())
    }

    pub fn delete(&self, id: NotificationId) -> Result<(), NotificationServiceError> {
        self.repo.delete_notification(id)?;
        info!("event=notification_delete module=service status=ok notification_id={id}");
        Ok(())
    }
}
