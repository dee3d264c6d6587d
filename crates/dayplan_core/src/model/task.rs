//! Task template domain model.
//!
//! # Responsibility
//! - Define the user-authored record for tasks, meetings and classes.
//! - Validate template invariants before persistence or expansion.
//!
//! # Invariants
//! - `id` and `created_at` never change after creation.
//! - `title` is non-blank.
//! - `recurring_end_date`, when set, is on or after `date`.
//! - Weekly recurrence applies only to `TaskKind::Class`; the flag is inert
//!   for other kinds.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

static TIME_OF_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)(?::[0-5]\d)?$").expect("valid time-of-day regex")
});

const DEFAULT_START_TIME: &str = "09:00";
const DEFAULT_END_TIME: &str = "10:00";

/// Opaque, stable identifier of a task template.
///
/// Generated identifiers have the shape `task-<uuid>`; imported records may
/// carry any non-blank string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a fresh unique identifier.
    pub fn generate() -> Self {
        Self(format!("task-{}", Uuid::new_v4()))
    }

    /// Wraps a caller-provided identifier.
    ///
    /// # Errors
    /// - Returns `TaskValidationError::BlankId` when `value` is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(TaskValidationError::BlankId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TaskId {
    type Err = TaskValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

/// Category of a task template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Plain to-do item.
    Task,
    /// One-off meeting.
    Meeting,
    /// Lecture/class; the only kind that supports weekly recurrence.
    Class,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Meeting => "meeting",
            Self::Class => "class",
        }
    }

    /// Capitalized label used in user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Task => "Task",
            Self::Meeting => "Meeting",
            Self::Class => "Class",
        }
    }
}

impl FromStr for TaskKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "task" => Ok(Self::Task),
            "meeting" => Ok(Self::Meeting),
            "class" => Ok(Self::Class),
            other => Err(format!(
                "unsupported task kind `{other}`; expected task|meeting|class"
            )),
        }
    }
}

/// Importance level shown on cards and copied into notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Critical,
    High,
    Medium,
    #[default]
    Low,
}

impl Importance {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl FromStr for Importance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(format!(
                "unsupported importance `{other}`; expected critical|high|medium|low"
            )),
        }
    }
}

/// Local time of day in 24-hour `HH:MM` form.
///
/// Inputs with a seconds component (`HH:MM:SS`) are truncated to `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(String);

impl TimeOfDay {
    /// Parses and normalizes a time-of-day string.
    ///
    /// # Errors
    /// - Returns `TaskValidationError::InvalidTime` for anything other than
    ///   `HH:MM` or `HH:MM:SS` within a 24-hour day.
    pub fn parse(value: &str) -> Result<Self, TaskValidationError> {
        let trimmed = value.trim();
        if !TIME_OF_DAY_RE.is_match(trimmed) {
            return Err(TaskValidationError::InvalidTime(value.to_string()));
        }
        Ok(Self(trimmed[..5].to_string()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Ordering key: the `HHMM` digits with the separator stripped.
    ///
    /// Lexicographic order on this key is chronological order for any valid
    /// zero-padded 24-hour time.
    pub fn sort_key(&self) -> String {
        self.0.replace(':', "")
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TimeOfDay {
    type Err = TaskValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TaskValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.0
    }
}

/// Validation errors for task template invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    BlankId,
    EmptyTitle,
    InvalidTime(String),
    RecurrenceEndsBeforeAnchor { anchor: NaiveDate, end: NaiveDate },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankId => write!(f, "task id must not be blank"),
            Self::EmptyTitle => write!(f, "task title must not be blank"),
            Self::InvalidTime(value) => {
                write!(f, "invalid time of day `{value}`; expected HH:MM")
            }
            Self::RecurrenceEndsBeforeAnchor { anchor, end } => write!(
                f,
                "recurring_end_date ({end}) must be >= date ({anchor})"
            ),
        }
    }
}

impl Error for TaskValidationError {}

/// User-entered fields of a template, without identity or creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub kind: TaskKind,
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub importance: Importance,
    pub room: Option<String>,
    pub is_recurring: bool,
    pub recurring_end_date: Option<NaiveDate>,
}

impl TaskDraft {
    /// Creates a draft with form defaults: 09:00-10:00, low importance,
    /// no recurrence.
    pub fn new(title: impl Into<String>, kind: TaskKind, date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: None,
            kind,
            date,
            start_time: TimeOfDay(DEFAULT_START_TIME.to_string()),
            end_time: TimeOfDay(DEFAULT_END_TIME.to_string()),
            importance: Importance::default(),
            room: None,
            is_recurring: false,
            recurring_end_date: None,
        }
    }

    /// Sets start/end times.
    pub fn with_times(mut self, start_time: TimeOfDay, end_time: TimeOfDay) -> Self {
        self.start_time = start_time;
        self.end_time = end_time;
        self
    }

    /// Marks the draft as repeating weekly until `end` (inclusive).
    pub fn recurring_until(mut self, end: NaiveDate) -> Self {
        self.is_recurring = true;
        self.recurring_end_date = Some(end);
        self
    }
}

impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            kind: task.kind,
            date: task.date,
            start_time: task.start_time.clone(),
            end_time: task.end_time.clone(),
            importance: task.importance,
            room: task.room.clone(),
            is_recurring: task.is_recurring,
            recurring_end_date: task.recurring_end_date,
        }
    }
}

/// Durable task template authored by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    /// Serialized as `type` to match the persisted record shape.
    #[serde(rename = "type")]
    pub kind: TaskKind,
    /// Anchor date: the first (or only) scheduled day.
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub importance: Importance,
    pub room: Option<String>,
    pub is_recurring: bool,
    /// Inclusive last day of weekly recurrence.
    pub recurring_end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Builds a new template with a generated ID and the current time.
    pub fn create(draft: TaskDraft) -> Result<Self, TaskValidationError> {
        Self::from_draft(TaskId::generate(), draft, Utc::now())
    }

    /// Builds a template from explicit identity fields.
    ///
    /// Used by import paths and tests where identity already exists.
    pub fn from_draft(
        id: TaskId,
        draft: TaskDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TaskValidationError> {
        let task = Self {
            id,
            title: draft.title,
            description: draft.description,
            kind: draft.kind,
            date: draft.date,
            start_time: draft.start_time,
            end_time: draft.end_time,
            importance: draft.importance,
            room: draft.room,
            is_recurring: draft.is_recurring,
            recurring_end_date: draft.recurring_end_date,
            created_at,
        };
        task.validate()?;
        Ok(task)
    }

    /// Replaces every user-editable field, keeping `id` and `created_at`.
    pub fn apply_draft(&mut self, draft: TaskDraft) -> Result<(), TaskValidationError> {
        let updated = Self::from_draft(self.id.clone(), draft, self.created_at)?;
        *self = updated;
        Ok(())
    }

    /// Checks template invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(TaskValidationError::BlankId);
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        if let Some(end) = self.recurring_end_date {
            if end < self.date {
                return Err(TaskValidationError::RecurrenceEndsBeforeAnchor {
                    anchor: self.date,
                    end,
                });
            }
        }
        Ok(())
    }

    /// Returns the inclusive recurrence end date when weekly recurrence
    /// applies to this template.
    ///
    /// A recurring flag without an end date, or on a non-class template,
    /// yields `None` (single occurrence).
    pub fn weekly_recurrence_end(&self) -> Option<NaiveDate> {
        if !self.is_recurring || self.kind != TaskKind::Class {
            return None;
        }
        self.recurring_end_date
    }
}

#[derive(Deserialize)]
struct TaskRecord {
    id: TaskId,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "type")]
    kind: TaskKind,
    date: NaiveDate,
    start_time: TimeOfDay,
    end_time: TimeOfDay,
    importance: Importance,
    #[serde(default)]
    room: Option<String>,
    #[serde(default)]
    is_recurring: bool,
    #[serde(default)]
    recurring_end_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskValidationError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let task = Self {
            id: record.id,
            title: record.title,
            description: record.description,
            kind: record.kind,
            date: record.date,
            start_time: record.start_time,
            end_time: record.end_time,
            importance: record.importance,
            room: record.room,
            is_recurring: record.is_recurring,
            recurring_end_date: record.recurring_end_date,
            created_at: record.created_at,
        };
        task.validate()?;
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::{Importance, TaskDraft, TaskId, TaskKind, TimeOfDay};
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn time_of_day_truncates_seconds() {
        let time = TimeOfDay::parse("07:45:30").unwrap();
        assert_eq!(time.as_str(), "07:45");
        assert_eq!(time.sort_key(), "0745");
    }

    #[test]
    fn time_of_day_rejects_out_of_range_values() {
        assert!(TimeOfDay::parse("24:00").is_err());
        assert!(TimeOfDay::parse("9:00").is_err());
        assert!(TimeOfDay::parse("12:60").is_err());
    }

    #[test]
    fn generated_ids_are_unique_and_prefixed() {
        let first = TaskId::generate();
        let second = TaskId::generate();
        assert_ne!(first, second);
        assert!(first.as_str().starts_with("task-"));
    }

    #[test]
    fn draft_defaults_match_form_defaults() {
        let draft = TaskDraft::new("standup", TaskKind::Meeting, day(2024, 3, 4));
        assert_eq!(draft.start_time.as_str(), "09:00");
        assert_eq!(draft.end_time.as_str(), "10:00");
        assert_eq!(draft.importance, Importance::Low);
        assert!(!draft.is_recurring);
    }

    #[test]
    fn kind_and_importance_parse_case_insensitively() {
        assert_eq!("Class".parse::<TaskKind>().unwrap(), TaskKind::Class);
        assert_eq!(" HIGH ".parse::<Importance>().unwrap(), Importance::High);
        assert!("lecture".parse::<TaskKind>().is_err());
    }
}
