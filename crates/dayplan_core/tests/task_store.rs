use chrono::{NaiveDate, TimeZone, Utc};
use dayplan_core::db::open_db_in_memory;
use dayplan_core::{
    Importance, RepoError, SqliteTaskRepository, Task, TaskDraft, TaskId, TaskKind,
    TaskRepository, TimeOfDay,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn task(id: &str, title: &str, kind: TaskKind, date: NaiveDate) -> Task {
    let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap();
    Task::from_draft(
        TaskId::new(id).unwrap(),
        TaskDraft::new(title, kind, date),
        created_at,
    )
    .unwrap()
}

#[test]
fn upsert_and_get_roundtrip_preserves_all_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let mut class = task("c1", "Compilers", TaskKind::Class, day(2024, 1, 1));
    class.description = Some("Bring laptop".to_string());
    class.room = Some("B-204".to_string());
    class.importance = Importance::Critical;
    class.start_time = TimeOfDay::parse("13:15").unwrap();
    class.end_time = TimeOfDay::parse("14:45").unwrap();
    class.is_recurring = true;
    class.recurring_end_date = Some(day(2024, 4, 29));
    repo.upsert_task(&class).unwrap();

    let loaded = repo.get_task(&class.id).unwrap().unwrap();
    assert_eq!(loaded, class);
}

#[test]
fn list_keeps_insertion_order_across_updates() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let first = task("a", "first", TaskKind::Task, day(2024, 1, 2));
    let mut second = task("b", "second", TaskKind::Meeting, day(2024, 1, 3));
    let third = task("c", "third", TaskKind::Task, day(2024, 1, 4));
    repo.upsert_task(&first).unwrap();
    repo.upsert_task(&second).unwrap();
    repo.upsert_task(&third).unwrap();

    second.title = "second (moved)".to_string();
    second.date = day(2024, 2, 1);
    repo.upsert_task(&second).unwrap();

    let listed = repo.list_tasks().unwrap();
    let ids: Vec<_> = listed.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(listed[1].title, "second (moved)");
    assert_eq!(listed[1].date, day(2024, 2, 1));
}

#[test]
fn upsert_never_rewrites_created_at() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let original = task("keep", "draft", TaskKind::Task, day(2024, 1, 2));
    repo.upsert_task(&original).unwrap();

    let mut tampered = original.clone();
    tampered.created_at = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    repo.upsert_task(&tampered).unwrap();

    let loaded = repo.get_task(&original.id).unwrap().unwrap();
    assert_eq!(loaded.created_at, original.created_at);
}

#[test]
fn remove_deletes_exact_id_only() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let class = task("t1", "Physics", TaskKind::Class, day(2024, 1, 1));
    repo.upsert_task(&class).unwrap();

    let generated_id = TaskId::new("t1-2024-01-08").unwrap();
    let err = repo.remove_task(&generated_id).unwrap_err();
    assert!(matches!(err, RepoError::TaskNotFound(id) if id == generated_id));
    assert_eq!(repo.list_tasks().unwrap().len(), 1);

    repo.remove_task(&class.id).unwrap();
    assert!(repo.get_task(&class.id).unwrap().is_none());
}

#[test]
fn validation_failure_blocks_upsert() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let mut invalid = task("bad", "Seminar", TaskKind::Class, day(2024, 3, 10));
    invalid.recurring_end_date = Some(day(2024, 3, 1));

    let err = repo.upsert_task(&invalid).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert!(repo.list_tasks().unwrap().is_empty());
}

#[test]
fn invalid_persisted_rows_are_reported() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    repo.upsert_task(&task("t", "ok", TaskKind::Task, day(2024, 1, 1)))
        .unwrap();

    conn.execute("UPDATE tasks SET start_time = '9am' WHERE id = 't';", [])
        .unwrap();

    let err = repo.list_tasks().unwrap_err();
    assert!(
        matches!(&err, RepoError::InvalidData(message) if message.contains("tasks.start_time")),
        "unexpected error: {err}"
    );
}

#[test]
fn persisted_rows_breaking_invariants_are_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    repo.upsert_task(&task("c", "Statistics", TaskKind::Class, day(2024, 1, 8)))
        .unwrap();

    conn.execute(
        "UPDATE tasks SET recurring_end_date = '2024-01-01' WHERE id = 'c';",
        [],
    )
    .unwrap();

    let err = repo.get_task(&TaskId::new("c").unwrap()).unwrap_err();
    assert!(
        matches!(&err, RepoError::InvalidData(message) if message.contains("`c`")),
        "unexpected error: {err}"
    );
}

#[test]
fn with_transaction_rolls_back_on_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let draft_task = task("tx", "Lab report", TaskKind::Task, day(2024, 1, 9));

    let err = repo
        .with_transaction(|| {
            repo.upsert_task(&draft_task)?;
            Err::<(), _>(RepoError::InvalidData("abort".to_string()))
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
    assert!(repo.list_tasks().unwrap().is_empty());

    repo.with_transaction(|| repo.upsert_task(&draft_task)).unwrap();
    assert_eq!(repo.list_tasks().unwrap(), vec![draft_task]);
}
