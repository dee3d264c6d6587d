//! Day-scoped selection and ordering of occurrences.
//!
//! # Invariants
//! - Selection keeps only occurrences on the target calendar date.
//! - Ordering is by start time; equal start times keep materialization order.

use crate::model::occurrence::Occurrence;
use crate::model::task::Task;
use crate::schedule::dates::{day_heading, is_same_day};
use crate::schedule::recurrence::materialize;
use chrono::NaiveDate;

/// Occurrences on `target`, ordered by start time.
pub fn for_day<'a>(occurrences: &[Occurrence<'a>], target: NaiveDate) -> Vec<Occurrence<'a>> {
    let mut selected: Vec<Occurrence<'a>> = occurrences
        .iter()
        .filter(|occurrence| is_same_day(&occurrence.date(), &target))
        .copied()
        .collect();
    sort_by_start_time(&mut selected);
    selected
}

/// Stable sort by `HHMM` start-time key.
pub fn sort_by_start_time(occurrences: &mut [Occurrence<'_>]) {
    occurrences.sort_by_cached_key(|occurrence| occurrence.start_time().sort_key());
}

/// Snapshot of the template set used to render one day.
///
/// Occurrences are recomputed from the owned templates on every call.
#[derive(Debug, Clone)]
pub struct DayAgenda {
    date: NaiveDate,
    templates: Vec<Task>,
}

impl DayAgenda {
    pub fn new(date: NaiveDate, templates: Vec<Task>) -> Self {
        Self { date, templates }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// e.g. `Monday, January 15`.
    pub fn heading(&self) -> String {
        day_heading(&self.date)
    }

    pub fn occurrences(&self) -> Vec<Occurrence<'_>> {
        for_day(&materialize(&self.templates), self.date)
    }

    pub fn templates(&self) -> &[Task] {
        &self.templates
    }
}

#[cfg(test)]
mod tests {
    use super::{for_day, DayAgenda};
    use crate::model::task::{Task, TaskDraft, TaskId, TaskKind, TimeOfDay};
    use crate::schedule::recurrence::materialize;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(id: &str, date: NaiveDate, start: &str) -> Task {
        let draft = TaskDraft::new(format!("item {id}"), TaskKind::Task, date).with_times(
            TimeOfDay::parse(start).unwrap(),
            TimeOfDay::parse("23:59").unwrap(),
        );
        let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Task::from_draft(TaskId::new(id).unwrap(), draft, created_at).unwrap()
    }

    #[test]
    fn selects_generated_occurrence_on_target_day() {
        let class = Task::from_draft(
            TaskId::new("t1").unwrap(),
            TaskDraft::new("Physics", TaskKind::Class, day(2024, 1, 1))
                .recurring_until(day(2024, 1, 22)),
            Utc.with_ymd_and_hms(2023, 12, 1, 0, 0, 0).unwrap(),
        )
        .unwrap();
        let templates = vec![class];

        let selected = for_day(&materialize(&templates), day(2024, 1, 15));
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].display_id(), "t1-2024-01-15");
    }

    #[test]
    fn sorts_by_start_time_regardless_of_input_order() {
        let templates = vec![
            at("late", day(2024, 1, 15), "14:30"),
            at("early", day(2024, 1, 15), "09:00"),
        ];

        let selected = for_day(&materialize(&templates), day(2024, 1, 15));
        let starts: Vec<_> = selected.iter().map(|o| o.start_time().as_str()).collect();
        assert_eq!(starts, vec!["09:00", "14:30"]);
    }

    #[test]
    fn equal_start_times_keep_input_order() {
        let templates = vec![
            at("b", day(2024, 1, 15), "10:00"),
            at("a", day(2024, 1, 15), "10:00"),
            at("c", day(2024, 1, 15), "08:00"),
            at("other-day", day(2024, 1, 16), "07:00"),
        ];

        let selected = for_day(&materialize(&templates), day(2024, 1, 15));
        let ids: Vec<_> = selected.iter().map(|o| o.display_id()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn agenda_reports_heading_and_empty_days() {
        let agenda = DayAgenda::new(day(2024, 1, 20), vec![at("x", day(2024, 1, 15), "09:00")]);
        assert_eq!(agenda.heading(), "Saturday, January 20");
        assert!(agenda.occurrences().is_empty());
    }
}
