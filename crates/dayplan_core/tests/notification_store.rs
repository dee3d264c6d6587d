use chrono::{NaiveDate, TimeZone, Utc};
use dayplan_core::db::open_db_in_memory;
use dayplan_core::{
    Importance, Notification, NotificationKind, NotificationListQuery, NotificationRepository,
    NotificationService, NotificationServiceError, NotificationView, RepoError,
    SqliteNotificationRepository, Task, TaskDraft, TaskId, TaskKind,
};
use uuid::Uuid;

fn sample_task() -> Task {
    let mut draft = TaskDraft::new(
        "Design review",
        TaskKind::Meeting,
        NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
    );
    draft.importance = Importance::High;
    Task::from_draft(
        TaskId::new("m-1").unwrap(),
        draft,
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
    )
    .unwrap()
}

fn ids(notifications: &[Notification]) -> Vec<Uuid> {
    notifications.iter().map(|n| n.id).collect()
}

#[test]
fn prepend_lists_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNotificationRepository::try_new(&conn).unwrap();
    let task = sample_task();

    let created = Notification::record(&task, NotificationKind::Created, "Meeting created successfully");
    let updated = Notification::record(&task, NotificationKind::Updated, "Meeting updated successfully");
    repo.prepend_notification(&created).unwrap();
    repo.prepend_notification(&updated).unwrap();

    let all = repo
        .list_notifications(&NotificationListQuery::default())
        .unwrap();
    assert_eq!(ids(&all), vec![updated.id, created.id]);
    assert_eq!(all[1], created);
}

#[test]
fn views_split_recent_unread_and_archived() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNotificationRepository::try_new(&conn).unwrap();
    let task = sample_task();

    let first = Notification::record(&task, NotificationKind::Created, "first");
    let second = Notification::record(&task, NotificationKind::Updated, "second");
    let third = Notification::record(&task, NotificationKind::Deleted, "third");
    for record in [&first, &second, &third] {
        repo.prepend_notification(record).unwrap();
    }

    repo.mark_read(first.id).unwrap();
    repo.archive(second.id).unwrap();

    let list = |view| {
        repo.list_notifications(&NotificationListQuery { view, limit: None })
            .unwrap()
    };
    assert_eq!(ids(&list(NotificationView::Recent)), vec![third.id, first.id]);
    assert_eq!(ids(&list(NotificationView::Unread)), vec![third.id]);
    assert_eq!(ids(&list(NotificationView::Archived)), vec![second.id]);
    assert_eq!(repo.count_unread().unwrap(), 1);

    let archived = repo.get_notification(second.id).unwrap().unwrap();
    assert!(archived.is_archived);
    assert!(archived.is_read, "archiving must force read");
}

#[test]
fn limit_caps_result_size() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNotificationRepository::try_new(&conn).unwrap();
    let task = sample_task();
    for _ in 0..5 {
        repo.prepend_notification(&Notification::record(&task, NotificationKind::Updated, "x"))
            .unwrap();
    }

    let limited = repo
        .list_notifications(&NotificationListQuery {
            view: NotificationView::All,
            limit: Some(2),
        })
        .unwrap();
    assert_eq!(limited.len(), 2);
}

#[test]
fn state_changes_on_missing_ids_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNotificationRepository::try_new(&conn).unwrap();
    let missing = Uuid::new_v4();

    assert!(matches!(
        repo.mark_read(missing).unwrap_err(),
        RepoError::NotificationNotFound(id) if id == missing
    ));
    assert!(matches!(
        repo.delete_notification(missing).unwrap_err(),
        RepoError::NotificationNotFound(_)
    ));
}

#[test]
fn service_deletes_and_reports_unread_count() {
    let conn = open_db_in_memory().unwrap();
    let service = NotificationService::new(SqliteNotificationRepository::try_new(&conn).unwrap());
    let writer = SqliteNotificationRepository::try_new(&conn).unwrap();
    let task = sample_task();

    let record = Notification::record(&task, NotificationKind::Created, "Meeting created successfully");
    writer.prepend_notification(&record).unwrap();
    assert_eq!(service.unread_count().unwrap(), 1);

    service.mark_read(record.id).unwrap();
    assert_eq!(service.unread_count().unwrap(), 0);

    service.delete(record.id).unwrap();
    assert!(service.list(NotificationView::All, None).unwrap().is_empty());

    let err = service.archive(record.id).unwrap_err();
    assert!(matches!(err, NotificationServiceError::NotificationNotFound(id) if id == record.id));
}
