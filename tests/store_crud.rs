//! Integration tests for the storage layer: bug lifecycle, imports with
//! upstream ids, and the notification trail a lifecycle leaves behind.

mod common;

use bughive::model::{Bug, Priority, Severity, Status};
use bughive::notify::NotificationFeed;
use bughive::store::{BugUpdate, SqliteStore};
use chrono::{TimeZone, Utc};
use common::{bug_draft, seed_directory, test_db, test_db_with_dir, test_log};

#[test]
fn bug_lifecycle_end_to_end() {
    let _guard = test_log("bug_lifecycle_end_to_end");
    let mut store = test_db();
    seed_directory(&mut store);

    let bug = store.create_bug(&bug_draft("Checkout button unresponsive")).unwrap();
    assert_eq!(bug.status, Status::Open);
    assert_eq!(bug.priority, Priority::Medium);

    // Triage: assign, bump priority, start work.
    let bug = store
        .update_bug(
            bug.id,
            &BugUpdate {
                status: Some(Status::InProgress),
                priority: Some(Priority::High),
                severity: Some(Severity::Major),
                assignee_id: Some(Some(2)),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(bug.status, Status::InProgress);
    assert_eq!(bug.priority, Priority::High);
    assert_eq!(bug.assignee_id, Some(2));

    // Resolve, then close.
    store
        .update_bug(
            bug.id,
            &BugUpdate {
                status: Some(Status::Resolved),
                ..Default::default()
            },
        )
        .unwrap();
    let bug = store
        .update_bug(
            bug.id,
            &BugUpdate {
                status: Some(Status::Closed),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(bug.status, Status::Closed);

    // Three transitions, three notifications, newest first.
    let feed_source = store.list_notifications().unwrap();
    assert_eq!(feed_source.len(), 3);
    assert_eq!(feed_source[0].old_status, Status::Resolved);
    assert_eq!(feed_source[0].new_status, Status::Closed);
    assert_eq!(feed_source[2].old_status, Status::Open);
    assert_eq!(feed_source[2].new_status, Status::InProgress);
}

#[test]
fn updated_at_moves_forward_on_update() {
    let _guard = test_log("updated_at_moves_forward_on_update");
    let mut store = test_db();
    seed_directory(&mut store);

    let bug = store.create_bug(&bug_draft("Slow search")).unwrap();
    let created = bug.updated_at.unwrap();

    let bug = store
        .update_bug(
            bug.id,
            &BugUpdate {
                priority: Some(Priority::Critical),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(bug.updated_at.unwrap() >= created);
    // created_at never moves.
    assert_eq!(bug.created_at, Some(created));
}

#[test]
fn non_status_update_leaves_no_notification() {
    let _guard = test_log("non_status_update_leaves_no_notification");
    let mut store = test_db();
    seed_directory(&mut store);

    let bug = store.create_bug(&bug_draft("Wrong totals")).unwrap();
    store
        .update_bug(
            bug.id,
            &BugUpdate {
                title: Some("Wrong order totals".to_string()),
                description: Some(Some("Off by the shipping cost".to_string())),
                ..Default::default()
            },
        )
        .unwrap();

    assert!(store.list_notifications().unwrap().is_empty());
    assert_eq!(store.unread_count().unwrap(), 0);
}

#[test]
fn import_preserves_upstream_ids() {
    let _guard = test_log("import_preserves_upstream_ids");
    let mut store = test_db();
    seed_directory(&mut store);

    let imported = Bug {
        id: 4711,
        title: "Legacy crash".to_string(),
        status: Status::Resolved,
        priority: Priority::Low,
        created_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()),
        updated_at: Some(Utc.with_ymd_and_hms(2024, 3, 5, 17, 30, 0).unwrap()),
        ..common::test_bug(0, "", Status::Open, Priority::Low, None)
    };
    store.import_bug(&imported).unwrap();

    let loaded = store.get_bug(4711).unwrap().unwrap();
    assert_eq!(loaded.title, "Legacy crash");
    assert_eq!(loaded.status, Status::Resolved);
    assert_eq!(loaded.created_at, imported.created_at);

    // Re-importing the same id replaces the row instead of failing.
    let mut newer = imported.clone();
    newer.title = "Legacy crash (amended)".to_string();
    store.import_bug(&newer).unwrap();
    let loaded = store.get_bug(4711).unwrap().unwrap();
    assert_eq!(loaded.title, "Legacy crash (amended)");
    assert_eq!(store.list_bugs().unwrap().len(), 1);
}

#[test]
fn feed_refresh_tracks_store_state() {
    let _guard = test_log("feed_refresh_tracks_store_state");
    let mut store = test_db();
    seed_directory(&mut store);

    let bug = store.create_bug(&bug_draft("Flaky upload")).unwrap();
    store
        .update_bug(
            bug.id,
            &BugUpdate {
                status: Some(Status::InProgress),
                ..Default::default()
            },
        )
        .unwrap();

    let mut feed = NotificationFeed::new();
    feed.refresh(&store).unwrap();
    assert_eq!(feed.notifications().len(), 1);
    assert_eq!(feed.unread(), 1);

    store.mark_all_read().unwrap();
    feed.refresh(&store).unwrap();
    assert_eq!(feed.notifications().len(), 1);
    assert_eq!(feed.unread(), 0);

    store.delete_all_notifications().unwrap();
    feed.refresh(&store).unwrap();
    assert!(feed.notifications().is_empty());
}

#[test]
fn deleting_bug_cascades_to_notifications() {
    let _guard = test_log("deleting_bug_cascades_to_notifications");
    let mut store = test_db();
    seed_directory(&mut store);

    let bug = store.create_bug(&bug_draft("Orphan maker")).unwrap();
    store
        .update_bug(
            bug.id,
            &BugUpdate {
                status: Some(Status::Closed),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(store.list_notifications().unwrap().len(), 1);

    store.delete_bug(bug.id).unwrap();
    assert!(store.list_notifications().unwrap().is_empty());
}

#[test]
fn file_backed_store_persists_across_reopen() {
    let _guard = test_log("file_backed_store_persists_across_reopen");
    let (mut store, dir) = test_db_with_dir();
    seed_directory(&mut store);
    let bug = store.create_bug(&bug_draft("Survives restart")).unwrap();
    drop(store);

    let reopened = SqliteStore::open(&dir.path().join(".bughive").join("bughive.db")).unwrap();
    let loaded = reopened.get_bug(bug.id).unwrap().unwrap();
    assert_eq!(loaded.title, "Survives restart");
    assert_eq!(reopened.list_users().unwrap().len(), 2);
    assert_eq!(reopened.list_projects().unwrap().len(), 1);
}
