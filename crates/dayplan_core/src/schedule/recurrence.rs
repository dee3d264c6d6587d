//! Weekly recurrence expansion and occurrence materialization.
//!
//! # Invariants
//! - The anchor occurrence is always first.
//! - Generated dates share the anchor weekday, are strictly after the
//!   anchor, never exceed the recurrence end date, and step by 7 days.
//! - Output depends only on the input templates, never on the clock.

use crate::model::occurrence::Occurrence;
use crate::model::task::Task;
use crate::schedule::dates::next_occurrence_of_weekday;
use chrono::{Datelike, Days};

/// Expands one template into its ordered occurrences.
///
/// Non-class templates, non-recurring templates and recurring templates
/// without an end date yield only the anchor occurrence.
pub fn expand(template: &Task) -> Vec<Occurrence<'_>> {
    let mut occurrences = vec![Occurrence::anchor(template)];
    let Some(end) = template.weekly_recurrence_end() else {
        return occurrences;
    };

    let mut candidate = next_occurrence_of_weekday(template.date, template.date.weekday());
    while let Some(date) = candidate {
        if date > end {
            break;
        }
        occurrences.push(Occurrence::generated(template, date));
        candidate = date.checked_add_days(Days::new(7));
    }

    occurrences
}

/// Expands every template, keeping input order.
pub fn materialize(templates: &[Task]) -> Vec<Occurrence<'_>> {
    templates.iter().flat_map(expand).collect()
}
