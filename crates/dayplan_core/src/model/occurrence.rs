//! Occurrence projection of task templates onto concrete days.
//!
//! # Responsibility
//! - Represent one dated instance of a template without copying it.
//! - Map occurrence identity back to the owning template.
//!
//! # Invariants
//! - Occurrences are derived on every read and never persisted.
//! - Identity is the explicit `(template_id, date)` pair; the legacy
//!   `<template-id>-<YYYY-MM-DD>` string is a rendering format only.

use crate::model::task::{Importance, Task, TaskId, TaskKind, TimeOfDay};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt::{Display, Formatter};

static LEGACY_OCCURRENCE_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<id>.+)-(?P<date>\d{4}-\d{2}-\d{2})$").expect("valid occurrence id regex")
});

/// Explicit identity of one occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OccurrenceKey {
    pub template_id: TaskId,
    pub date: NaiveDate,
}

impl Display for OccurrenceKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.template_id, self.date.format("%Y-%m-%d"))
    }
}

/// One template projected onto one calendar day.
///
/// Borrows the template, so every template field is available through
/// [`Occurrence::template`] while only the date is specialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence<'a> {
    template: &'a Task,
    date: NaiveDate,
}

impl<'a> Occurrence<'a> {
    /// Occurrence on the template's own anchor date.
    pub fn anchor(template: &'a Task) -> Self {
        Self {
            template,
            date: template.date,
        }
    }

    /// Occurrence generated by weekly recurrence.
    pub(crate) fn generated(template: &'a Task, date: NaiveDate) -> Self {
        Self { template, date }
    }

    pub fn template(&self) -> &'a Task {
        self.template
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Whether this occurrence was produced by recurrence rather than being
    /// the anchor occurrence.
    pub fn is_generated(&self) -> bool {
        self.date != self.template.date
    }

    pub fn key(&self) -> OccurrenceKey {
        OccurrenceKey {
            template_id: self.template.id.clone(),
            date: self.date,
        }
    }

    /// Legacy display identifier: the template ID for the anchor
    /// occurrence, `<template-id>-<YYYY-MM-DD>` for generated ones.
    pub fn display_id(&self) -> String {
        if self.is_generated() {
            format!("{}-{}", self.template.id, self.date.format("%Y-%m-%d"))
        } else {
            self.template.id.to_string()
        }
    }

    pub fn title(&self) -> &'a str {
        self.template.title.as_str()
    }

    pub fn kind(&self) -> TaskKind {
        self.template.kind
    }

    pub fn importance(&self) -> Importance {
        self.template.importance
    }

    pub fn start_time(&self) -> &'a TimeOfDay {
        &self.template.start_time
    }

    pub fn end_time(&self) -> &'a TimeOfDay {
        &self.template.end_time
    }
}

/// Resolves a template ID or legacy occurrence ID to its owning template.
///
/// An exact template ID match wins. Otherwise a trailing `-YYYY-MM-DD`
/// suffix is stripped and the remainder is matched exactly.
pub fn resolve_template<'a>(templates: &'a [Task], raw_id: &str) -> Option<&'a Task> {
    let raw_id = raw_id.trim();
    if let Some(task) = templates.iter().find(|task| task.id.as_str() == raw_id) {
        return Some(task);
    }

    let (prefix, _) = split_legacy_occurrence_id(raw_id)?;
    templates.iter().find(|task| task.id.as_str() == prefix)
}

/// Splits `<template-id>-<YYYY-MM-DD>` into its parts.
///
/// Returns `None` when the suffix is missing or is not a real calendar date.
pub fn split_legacy_occurrence_id(raw_id: &str) -> Option<(&str, NaiveDate)> {
    let caps = LEGACY_OCCURRENCE_ID_RE.captures(raw_id)?;
    let prefix = caps.name("id")?.as_str();
    let date = NaiveDate::parse_from_str(caps.name("date")?.as_str(), "%Y-%m-%d").ok()?;
    Some((prefix, date))
}
