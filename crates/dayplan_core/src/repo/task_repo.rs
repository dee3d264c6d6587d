//! Task template store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Hold task templates in insertion order.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Task::validate()` before SQL mutations.
//! - Upserting an existing template keeps its list position and
//!   `created_at`.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - `with_transaction` scopes every statement issued on the shared
//!   connection, including other stores built on it.

use crate::db::migrations::ensure_migrated;
use crate::db::DbError;
use crate::model::notification::NotificationId;
use crate::model::task::{Importance, Task, TaskId, TaskKind, TaskValidationError, TimeOfDay};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    type,
    date,
    start_time,
    end_time,
    importance,
    room,
    is_recurring,
    recurring_end_date,
    created_at
FROM tasks";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by the task and notification stores.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    Db(DbError),
    TaskNotFound(TaskId),
    NotificationNotFound(NotificationId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::NotificationNotFound(id) => write!(f, "notification not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::TaskNotFound(_) | Self::NotificationNotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Task template store.
pub trait TaskRepository {
    /// All templates in insertion order.
    fn list_tasks(&self) -> RepoResult<Vec<Task>>;
    fn get_task(&self, id: &TaskId) -> RepoResult<Option<Task>>;
    /// Inserts a new template or replaces the editable fields of an
    /// existing one with the same ID.
    fn upsert_task(&self, task: &Task) -> RepoResult<()>;
    /// Removes the template with exactly this ID.
    fn remove_task(&self, id: &TaskId) -> RepoResult<()>;
    /// Runs `work` as one unit: committed on `Ok`, rolled back on `Err`.
    fn with_transaction<R>(&self, work: impl FnOnce() -> RepoResult<R>) -> RepoResult<R>;
}

/// SQLite-backed task template store.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_migrated(conn)?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} ORDER BY seq ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn get_task(&self, id: &TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn upsert_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (
                id,
                title,
                description,
                type,
                date,
                start_time,
                end_time,
                importance,
                room,
                is_recurring,
                recurring_end_date,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                type = excluded.type,
                date = excluded.date,
                start_time = excluded.start_time,
                end_time = excluded.end_time,
                importance = excluded.importance,
                room = excluded.room,
                is_recurring = excluded.is_recurring,
                recurring_end_date = excluded.recurring_end_date,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                task.id.as_str(),
                task.title.as_str(),
                task.description.as_deref(),
                task.kind.as_str(),
                task.date.format(DATE_FORMAT).to_string(),
                task.start_time.as_str(),
                task.end_time.as_str(),
                task.importance.as_str(),
                task.room.as_deref(),
                bool_to_int(task.is_recurring),
                task.recurring_end_date
                    .map(|date| date.format(DATE_FORMAT).to_string()),
                task.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn remove_task(&self, id: &TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", [id.as_str()])?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(id.clone()));
        }

        Ok(())
    }

    fn with_transaction<R>(&self, work: impl FnOnce() -> RepoResult<R>) -> RepoResult<R> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        // Dropping `tx` on the error path rolls back.
        let value = work()?;
        tx.commit()?;
        Ok(value)
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let id = TaskId::new(id_text)
        .map_err(|_| RepoError::InvalidData("blank task id in tasks.id".to_string()))?;

    let task = Task {
        title: row.get("title")?,
        description: row.get("description")?,
        kind: parse_kind(&row.get::<_, String>("type")?, "tasks.type")?,
        date: parse_date_column(&row.get::<_, String>("date")?, "tasks.date")?,
        start_time: parse_time_column(&row.get::<_, String>("start_time")?, "tasks.start_time")?,
        end_time: parse_time_column(&row.get::<_, String>("end_time")?, "tasks.end_time")?,
        importance: parse_importance(&row.get::<_, String>("importance")?, "tasks.importance")?,
        room: row.get("room")?,
        is_recurring: parse_flag(row.get("is_recurring")?, "tasks.is_recurring")?,
        recurring_end_date: match row.get::<_, Option<String>>("recurring_end_date")? {
            Some(value) => Some(parse_date_column(&value, "tasks.recurring_end_date")?),
            None => None,
        },
        created_at: parse_timestamp_column(
            &row.get::<_, String>("created_at")?,
            "tasks.created_at",
        )?,
        id,
    };
    task.validate().map_err(|err| {
        RepoError::InvalidData(format!("task `{}` failed validation: {err}", task.id))
    })?;
    Ok(task)
}

pub(crate) fn parse_kind(value: &str, column: &str) -> RepoResult<TaskKind> {
    value
        .parse::<TaskKind>()
        .map_err(|_| RepoError::InvalidData(format!("invalid task kind `{value}` in {column}")))
}

pub(crate) fn parse_importance(value: &str, column: &str) -> RepoResult<Importance> {
    value
        .parse::<Importance>()
        .map_err(|_| RepoError::InvalidData(format!("invalid importance `{value}` in {column}")))
}

pub(crate) fn parse_timestamp_column(value: &str, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| RepoError::InvalidData(format!("invalid timestamp `{value}` in {column}")))
}

pub(crate) fn parse_flag(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn parse_date_column(value: &str, column: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid date `{value}` in {column}")))
}

fn parse_time_column(value: &str, column: &str) -> RepoResult<TimeOfDay> {
    TimeOfDay::parse(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid time `{value}` in {column}")))
}
