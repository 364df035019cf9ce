use crate::{
    CollectorError, Gesture, Hand, SessionCatalog, tests::catalog::make_session,
};

use std::fs;

use tempfile::TempDir;

const DAY_1: &str = "2024_01_01_10_00_00_右手_单击[正]_轻";
const DAY_2: &str = "2024_01_02_10_00_00_左手_握拳[正]_重_note";
const DAY_3: &str = "2024_01_03_10_00_00_right_clap_light";

/// WHAT: Sessions are listed newest first
/// WHY: The timestamp prefix sorts chronologically; the UI shows recent first
#[test]
fn given_three_sessions_when_listing_then_sorted_descending() {
    // Given: Sessions from three consecutive days, created out of order
    let root = TempDir::new().unwrap();
    for name in [DAY_2, DAY_1, DAY_3] {
        make_session(root.path(), name);
    }

    // When: Listing
    let entries = SessionCatalog::new(root.path()).list().unwrap();

    // Then: 03, 02, 01
    let names: Vec<&str> = entries.iter().map(|e| e.name()).collect();
    assert_eq!(names, vec![DAY_3, DAY_2, DAY_1]);
}

/// WHAT: Only names carrying a hand marker are listed
/// WHY: The hand marker is the sole discovery mechanism
#[test]
fn given_foreign_entries_when_listing_then_only_marked_sessions_returned() {
    // Given: One session plus unrelated files and directories
    let root = TempDir::new().unwrap();
    make_session(root.path(), DAY_1);
    fs::create_dir(root.path().join("logs")).unwrap();
    fs::create_dir(root.path().join("2024_01_01_10_00_00_righthand")).unwrap();
    fs::write(root.path().join("config.toml"), b"").unwrap();

    // When: Listing
    let entries = SessionCatalog::new(root.path()).list().unwrap();

    // Then: Only the session is visible, with parsed metadata
    assert_eq!(entries.len(), 1);
    let session = entries[0].session().unwrap();
    assert_eq!(session.labels().hand, Hand::Right);
    assert_eq!(session.labels().gesture, Gesture::SingleTap);
}

/// WHAT: A missing data root lists as empty
/// WHY: Nothing has been recorded yet on first launch
#[test]
fn given_missing_data_root_when_listing_then_empty() {
    // Given: A data root that does not exist
    let root = TempDir::new().unwrap();
    let catalog = SessionCatalog::new(root.path().join("never-created"));

    // When/Then: Empty snapshot
    assert!(catalog.list().unwrap().is_empty());
}

/// WHAT: A data root that is a file cannot be listed
/// WHY: Unreadable storage is reported, not mistaken for emptiness
#[test]
fn given_data_root_is_file_when_listing_then_storage_unavailable() {
    // Given: A regular file where the data root should be
    let root = TempDir::new().unwrap();
    let file = root.path().join("sessions");
    fs::write(&file, b"").unwrap();

    // When: Listing
    let result = SessionCatalog::new(&file).list();

    // Then: StorageUnavailable
    assert!(matches!(
        result,
        Err(CollectorError::StorageUnavailable { .. })
    ));
}

/// WHAT: A failing entry does not stop deletion of the others
/// WHY: Partial-failure semantics; successes are never rolled back
#[test]
fn given_second_entry_already_removed_when_deleting_then_first_removed_and_second_reported() {
    // Given: Two listed sessions, the second removed behind the catalog's back
    let root = TempDir::new().unwrap();
    make_session(root.path(), DAY_1);
    make_session(root.path(), DAY_2);
    let catalog = SessionCatalog::new(root.path());
    let entries = catalog.list().unwrap();
    let (a, b) = (entries[0].clone(), entries[1].clone());
    fs::remove_dir_all(b.path()).unwrap();

    // When: Deleting [A, B]
    let report = catalog.delete(&[a.clone(), b.clone()]);

    // Then: A removed, B reported, and A no longer listed
    assert_eq!(report.removed, vec![a.name().to_string()]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].name, b.name());
    assert!(!report.is_complete());
    assert!(catalog.list().unwrap().iter().all(|e| e.name() != a.name()));
}

/// WHAT: delete_all removes every session and leaves foreign entries
/// WHY: delete_all is delete(list()), and list only sees sessions
#[test]
fn given_sessions_and_foreign_dir_when_deleting_all_then_only_sessions_removed() {
    // Given: Three sessions and an unrelated directory
    let root = TempDir::new().unwrap();
    for name in [DAY_1, DAY_2, DAY_3] {
        make_session(root.path(), name);
    }
    fs::create_dir(root.path().join("logs")).unwrap();
    let catalog = SessionCatalog::new(root.path());

    // When: Deleting everything
    let report = catalog.delete_all().unwrap();

    // Then: All sessions gone, foreign directory kept
    assert_eq!(report.removed.len(), 3);
    assert!(report.is_complete());
    assert!(catalog.list().unwrap().is_empty());
    assert!(root.path().join("logs").exists());
}
