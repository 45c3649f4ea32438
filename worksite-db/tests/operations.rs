use chrono::{NaiveDate, TimeZone, Utc};
use worksite_core::{ProjectDraft, ProjectPatch, ProjectStatus, Stage};
use worksite_db::*;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 9, 0, 0).unwrap()
}

fn draft(name: &str) -> ProjectDraft {
    ProjectDraft {
        name: name.to_string(),
        address: "1 Queen St, Auckland".to_string(),
        client_name: "Wiremu".to_string(),
        sales_person: "Amy".to_string(),
        installer: "Peter".to_string(),
        start_date: Some(d(2025, 10, 10)),
        end_date: Some(d(2025, 10, 12)),
        stages: [Stage::Install, Stage::Glass].into_iter().collect(),
        ..ProjectDraft::default()
    }
}

#[test]
fn insert_assigns_sequential_ids_and_codes() {
    let conn = open_memory().unwrap();
    let first = insert_project(&conn, &draft("First"), now()).unwrap();
    let second = insert_project(&conn, &draft("Second"), now()).unwrap();
    assert_eq!(first.id, 1);
    assert_eq!(first.project_code, "P-001");
    assert_eq!(second.id, 2);
    assert_eq!(second.project_code, "P-002");
    assert_eq!(second.status, ProjectStatus::NotStarted);
    assert!(!second.archived);
}

#[test]
fn codes_stay_unique_after_delete() {
    let conn = open_memory().unwrap();
    insert_project(&conn, &draft("A"), now()).unwrap();
    insert_project(&conn, &draft("B"), now()).unwrap();
    delete_project(&conn, 1).unwrap();
    let c = insert_project(&conn, &draft("C"), now()).unwrap();
    assert_eq!(c.project_code, "P-003");
}

#[test]
fn insert_rejects_invalid_draft() {
    let conn = open_memory().unwrap();
    let mut bad = draft("Bad");
    bad.address.clear();
    let err = insert_project(&conn, &bad, now()).unwrap_err();
    assert!(matches!(err, OperationError::Validation(_)));
    assert!(all_projects(&conn).unwrap().is_empty());
}

#[test]
fn inserted_project_round_trips_through_storage() {
    let conn = open_memory().unwrap();
    let inserted = insert_project(&conn, &draft("Stored"), now()).unwrap();
    let loaded = get_project(&conn, inserted.id).unwrap().unwrap();
    assert_eq!(loaded, inserted);
    assert!(loaded.stages.contains(Stage::Glass));
    assert_eq!(loaded.stages.primary(), Some(Stage::Install));
}

#[test]
fn update_merges_patch_and_touches_timestamp() {
    let conn = open_memory().unwrap();
    let project = insert_project(&conn, &draft("Job"), now()).unwrap();
    let later = Utc.with_ymd_and_hms(2025, 10, 2, 9, 0, 0).unwrap();
    let patch = ProjectPatch {
        status: Some(ProjectStatus::InProgress),
        progress_note: Some("Frames delivered".to_string()),
        ..ProjectPatch::default()
    };
    let updated = update_project(&conn, project.id, &patch, later).unwrap();
    assert_eq!(updated.status, ProjectStatus::InProgress);
    assert_eq!(updated.progress_note, "Frames delivered");
    assert_eq!(updated.name, "Job");
    assert_eq!(updated.updated_at, Some(later));
    assert_eq!(updated.created_at, Some(now()));

    let stored = get_project(&conn, project.id).unwrap().unwrap();
    assert_eq!(stored, updated);
}

#[test]
fn update_unknown_project_is_not_found() {
    let conn = open_memory().unwrap();
    let err = update_project(&conn, 99, &ProjectPatch::default(), now()).unwrap_err();
    assert!(matches!(err, OperationError::NotFound { .. }));
}

#[test]
fn update_rejects_inverted_range() {
    let conn = open_memory().unwrap();
    let project = insert_project(&conn, &draft("Job"), now()).unwrap();
    let patch = ProjectPatch {
        start_date: Some(d(2025, 11, 1)),
        ..ProjectPatch::default()
    };
    let err = update_project(&conn, project.id, &patch, now()).unwrap_err();
    assert!(matches!(err, OperationError::Validation(_)));
}

#[test]
fn archive_and_restore() {
    let conn = open_memory().unwrap();
    let project = insert_project(&conn, &draft("Job"), now()).unwrap();
    assert!(set_archived(&conn, project.id, true, now()).unwrap().archived);
    assert!(get_project(&conn, project.id).unwrap().unwrap().archived);
    assert!(!set_archived(&conn, project.id, false, now()).unwrap().archived);
}

#[test]
fn delete_unknown_project_is_not_found() {
    let conn = open_memory().unwrap();
    assert!(matches!(
        delete_project(&conn, 5),
        Err(OperationError::NotFound { .. })
    ));
}

#[test]
fn media_upload_sets_cover_photo() {
    let conn = open_memory().unwrap();
    let project = insert_project(&conn, &draft("Job"), now()).unwrap();
    let media = insert_media(&conn, project.id, "front.jpg", "image/jpeg", b"jpegdata", now()).unwrap();
    assert_eq!(media.size, Some(8));
    let stored = get_project(&conn, project.id).unwrap().unwrap();
    assert_eq!(stored.photo_url, media.url);

    let (bytes, content_type) = media_bytes(&conn, project.id, &media.id).unwrap();
    assert_eq!(bytes, b"jpegdata");
    assert_eq!(content_type, "image/jpeg");
}

#[test]
fn media_upload_to_unknown_project_is_not_found() {
    let conn = open_memory().unwrap();
    let err = insert_media(&conn, 3, "a.jpg", "image/jpeg", b"x", now()).unwrap_err();
    assert!(matches!(err, OperationError::NotFound { .. }));
}

#[test]
fn deleting_cover_falls_back_to_latest_remaining() {
    let conn = open_memory().unwrap();
    let project = insert_project(&conn, &draft("Job"), now()).unwrap();
    let first = insert_media(&conn, project.id, "a.jpg", "image/jpeg", b"a", now()).unwrap();
    let second = insert_media(&conn, project.id, "b.mp4", "video/mp4", b"b", now()).unwrap();

    delete_media(&conn, project.id, &second.id).unwrap();
    let stored = get_project(&conn, project.id).unwrap().unwrap();
    assert_eq!(stored.photo_url, first.url);

    delete_media(&conn, project.id, &first.id).unwrap();
    let stored = get_project(&conn, project.id).unwrap().unwrap();
    assert!(stored.photo_url.is_empty());
}

#[test]
fn delete_media_with_bad_ref_is_not_found() {
    let conn = open_memory().unwrap();
    let project = insert_project(&conn, &draft("Job"), now()).unwrap();
    assert!(delete_media(&conn, project.id, "abc").is_err());
    assert!(delete_media(&conn, project.id, "42").is_err());
}

#[test]
fn delete_all_media_clears_cover() {
    let conn = open_memory().unwrap();
    let project = insert_project(&conn, &draft("Job"), now()).unwrap();
    insert_media(&conn, project.id, "a.jpg", "image/jpeg", b"a", now()).unwrap();
    insert_media(&conn, project.id, "b.jpg", "image/jpeg", b"b", now()).unwrap();
    assert_eq!(delete_all_media(&conn, project.id).unwrap(), 2);
    assert!(list_media(&conn, project.id).unwrap().is_empty());
    assert!(get_project(&conn, project.id).unwrap().unwrap().photo_url.is_empty());
}

#[test]
fn delete_project_removes_media() {
    let conn = open_memory().unwrap();
    let project = insert_project(&conn, &draft("Job"), now()).unwrap();
    insert_media(&conn, project.id, "a.jpg", "image/jpeg", b"a", now()).unwrap();
    delete_project(&conn, project.id).unwrap();
    assert!(get_project(&conn, project.id).unwrap().is_none());
    assert_eq!(store_stats(&conn).unwrap().media, 0);
}
