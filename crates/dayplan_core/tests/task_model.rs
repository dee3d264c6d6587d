use chrono::{NaiveDate, TimeZone, Utc};
use dayplan_core::{Importance, Task, TaskDraft, TaskId, TaskKind, TimeOfDay};
use serde_json::json;

fn sample_class() -> Task {
    let anchor = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let draft = TaskDraft::new("Algorithms", TaskKind::Class, anchor)
        .with_times(
            TimeOfDay::parse("08:30:00").unwrap(),
            TimeOfDay::parse("10:00").unwrap(),
        )
        .recurring_until(NaiveDate::from_ymd_opt(2024, 3, 25).unwrap());
    Task::from_draft(
        TaskId::new("t1").unwrap(),
        draft,
        Utc.with_ymd_and_hms(2023, 12, 30, 18, 0, 0).unwrap(),
    )
    .unwrap()
}

#[test]
fn task_serializes_to_record_shape() {
    let value = serde_json::to_value(sample_class()).unwrap();

    assert_eq!(value["id"], "t1");
    assert_eq!(value["type"], "class");
    assert_eq!(value["date"], "2024-01-01");
    assert_eq!(value["start_time"], "08:30");
    assert_eq!(value["end_time"], "10:00");
    assert_eq!(value["importance"], "low");
    assert_eq!(value["is_recurring"], true);
    assert_eq!(value["recurring_end_date"], "2024-03-25");
    assert!(value.get("kind").is_none());
}

#[test]
fn task_deserializes_with_optional_fields_defaulted() {
    let task: Task = serde_json::from_value(json!({
        "id": "m-7",
        "title": "1:1",
        "type": "meeting",
        "date": "2024-06-03",
        "start_time": "14:00",
        "end_time": "14:30",
        "importance": "high",
        "created_at": "2024-06-01T08:00:00Z"
    }))
    .unwrap();

    assert_eq!(task.kind, TaskKind::Meeting);
    assert_eq!(task.importance, Importance::High);
    assert!(task.description.is_none());
    assert!(task.room.is_none());
    assert!(!task.is_recurring);
    assert!(task.weekly_recurrence_end().is_none());
}

#[test]
fn deserialization_enforces_template_invariants() {
    let mut record = serde_json::to_value(sample_class()).unwrap();
    record["recurring_end_date"] = json!("2023-12-25");
    let err = serde_json::from_value::<Task>(record).unwrap_err();
    assert!(err.to_string().contains("recurring_end_date"));

    let mut record = serde_json::to_value(sample_class()).unwrap();
    record["title"] = json!("  ");
    assert!(serde_json::from_value::<Task>(record).is_err());

    let mut record = serde_json::to_value(sample_class()).unwrap();
    record["start_time"] = json!("25:00");
    assert!(serde_json::from_value::<Task>(record).is_err());
}

#[test]
fn recurrence_flag_only_applies_to_classes() {
    let mut meeting = sample_class();
    meeting.kind = TaskKind::Meeting;
    assert!(meeting.weekly_recurrence_end().is_none());

    let class = sample_class();
    assert_eq!(
        class.weekly_recurrence_end(),
        NaiveDate::from_ymd_opt(2024, 3, 25)
    );
}
