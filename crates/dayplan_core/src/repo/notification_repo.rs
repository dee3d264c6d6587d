//! Notification store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist notification records newest-first.
//! - Provide the recent/unread/archived views and read/archive/delete
//!   state changes.
//!
//! # Invariants
//! - `prepend_notification` places the record ahead of all existing ones.
//! - Archiving sets `is_read = 1` in the same statement.

use crate::db::migrations::ensure_migrated;
use crate::model::notification::{Notification, NotificationId, NotificationKind};
use crate::model::task::TaskId;
use crate::repo::task_repo::{
    bool_to_int, parse_flag, parse_importance, parse_kind, parse_timestamp_column, RepoError,
    RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

const NOTIFICATION_SELECT_SQL: &str = "SELECT
    id,
    task_id,
    title,
    message,
    type,
    timestamp,
    is_read,
    is_archived,
    importance,
    task_type
FROM notifications";

/// Filtered view over the notification collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotificationView {
    /// Every record, archived or not.
    #[default]
    All,
    /// Records that are not archived.
    Recent,
    /// Records that are neither read nor archived.
    Unread,
    /// Archived records only.
    Archived,
}

impl NotificationView {
    fn where_clause(self) -> &'static str {
        match self {
            Self::All => "",
            Self::Recent => " WHERE is_archived = 0",
            Self::Unread => " WHERE is_archived = 0 AND is_read = 0",
            Self::Archived => " WHERE is_archived = 1",
        }
    }
}

/// Query options for listing notifications.
#[derive(Debug, Clone, Default)]
pub struct NotificationListQuery {
    pub view: NotificationView,
    pub limit: Option<u32>,
}

/// Notification record store.
pub trait NotificationRepository {
    /// Stores `notification` at the head of the collection.
    fn prepend_notification(&self, notification: &Notification) -> RepoResult<()>;
    /// Lists records newest-first.
    fn list_notifications(&self, query: &NotificationListQuery) -> RepoResult<Vec<Notification>>;
    fn get_notification(&self, id: NotificationId) -> RepoResult<Option<Notification>>;
    fn count_unread(&self) -> RepoResult<u32>;
    fn mark_read(&self, id: NotificationId) -> RepoResult<()>;
    fn archive(&self, id: NotificationId) -> RepoResult<()>;
    fn delete_notification(&self, id: NotificationId) -> RepoResult<()>;
}

/// SQLite-backed notification store.
pub struct SqliteNotificationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNotificationRepository<'conn> {
    /// Constructs a repository over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_migrated(conn)?;
        Ok(Self { conn })
    }

    fn update_state(&self, id: NotificationId, set_clause: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!("UPDATE notifications SET {set_clause} WHERE id = ?1;"),
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotificationNotFound(id));
        }

        Ok(())
    }
}

impl NotificationRepository for SqliteNotificationRepository<'_> {
    fn prepend_notification(&self, notification: &Notification) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO notifications (
                id,
                task_id,
                title,
                message,
                type,
                timestamp,
                is_read,
                is_archived,
                importance,
                task_type
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                notification.id.to_string(),
                notification.task_id.as_str(),
                notification.title.as_str(),
                notification.message.as_str(),
                notification.kind.as_str(),
                notification.timestamp.to_rfc3339(),
                bool_to_int(notification.is_read),
                bool_to_int(notification.is_archived),
                notification.importance.as_str(),
                notification.task_type.as_str(),
            ],
        )?;

        Ok(())
    }

    fn list_notifications(&self, query: &NotificationListQuery) -> RepoResult<Vec<Notification>> {
        let mut sql = format!("{NOTIFICATION_SELECT_SQL}{}", query.view.where_clause());
        let mut bind_values: Vec<Value> = Vec::new();

        sql.push_str(" ORDER BY seq DESC");
        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut notifications = Vec::new();

        while let Some(row) = rows.next()? {
            notifications.push(parse_notification_row(row)?);
        }

        Ok(notifications)
    }

    fn get_notification(&self, id: NotificationId) -> RepoResult<Option<Notification>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTIFICATION_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_notification_row(row)?));
        }

        Ok(None)
    }

    fn count_unread(&self) -> RepoResult<u32> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM notifications WHERE is_archived = 0 AND is_read = 0;",
            [],
            |row| row.get::<_, u32>(0),
        )?;
        Ok(count)
    }

    fn mark_read(&self, id: NotificationId) -> RepoResult<()> {
        self.update_state(id, "is_read = 1")
    }

    fn archive(&self, id: NotificationId) -> RepoResult<()> {
        self.update_state(id, "is_archived = 1, is_read = 1")
    }

    fn delete_notification(&self, id: NotificationId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notifications WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotificationNotFound(id));
        }

        Ok(())
    }
}

fn parse_notification_row(row: &Row<'_>) -> RepoResult<Notification> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid `{id_text}` in notifications.id"))
    })?;

    let task_id_text: String = row.get("task_id")?;
    let task_id = TaskId::new(task_id_text).map_err(|_| {
        RepoError::InvalidData("blank task id in notifications.task_id".to_string())
    })?;

    let kind_text: String = row.get("type")?;
    let kind = parse_notification_kind(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid notification type `{kind_text}` in notifications.type"
        ))
    })?;

    Ok(Notification {
        id,
        task_id,
        title: row.get("title")?,
        message: row.get("message")?,
        kind,
        timestamp: parse_timestamp_column(
            &row.get::<_, String>("timestamp")?,
            "notifications.timestamp",
        )?,
        is_read: parse_flag(row.get("is_read")?, "notifications.is_read")?,
        is_archived: parse_flag(row.get("is_archived")?, "notifications.is_archived")?,
        importance: parse_importance(
            &row.get::<_, String>("importance")?,
            "notifications.importance",
        )?,
        task_type: parse_kind(&row.get::<_, String>("task_type")?, "notifications.task_type")?,
    })
}

fn parse_notification_kind(value: &str) -> Option<NotificationKind> {
    match value {
        "created" => Some(NotificationKind::Created),
        "updated" => Some(NotificationKind::Updated),
        "deleted" => Some(NotificationKind::Deleted),
        "reminder" => Some(NotificationKind::Reminder),
        _ => None,
    }
}
