use chrono::{NaiveDate, Utc};
use worksite_core::media::MediaKind;
use worksite_core::{ListQuery, ProjectDraft, ProjectStatus};
use worksite_db::*;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn draft(name: &str, start: NaiveDate, end: NaiveDate) -> ProjectDraft {
    ProjectDraft {
        name: name.to_string(),
        address: "Auckland".to_string(),
        client_name: "Client".to_string(),
        sales_person: "Tim".to_string(),
        installer: "Jack".to_string(),
        start_date: Some(start),
        end_date: Some(end),
        ..ProjectDraft::default()
    }
}

#[test]
fn get_missing_project_is_none() {
    let conn = open_memory().unwrap();
    assert!(get_project(&conn, 1).unwrap().is_none());
}

#[test]
fn all_projects_in_id_order_with_archived() {
    let conn = open_memory().unwrap();
    for name in ["A", "B", "C"] {
        insert_project(&conn, &draft(name, d(2025, 10, 1), d(2025, 10, 2)), Utc::now()).unwrap();
    }
    set_archived(&conn, 2, true, Utc::now()).unwrap();
    let names: Vec<String> = all_projects(&conn)
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, ["A", "B", "C"]);
}

#[test]
fn stored_projects_feed_list_query() {
    let conn = open_memory().unwrap();
    insert_project(&conn, &draft("October", d(2025, 10, 10), d(2025, 10, 12)), Utc::now()).unwrap();
    insert_project(&conn, &draft("November", d(2025, 11, 3), d(2025, 11, 4)), Utc::now()).unwrap();

    let query = ListQuery {
        start: Some(d(2025, 10, 12)),
        end: Some(d(2025, 10, 31)),
        ..ListQuery::default()
    };
    let page = query.apply(all_projects(&conn).unwrap());
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].name, "October");
}

#[test]
fn list_media_reports_kind_and_size() {
    let conn = open_memory().unwrap();
    let project =
        insert_project(&conn, &draft("Job", d(2025, 10, 1), d(2025, 10, 1)), Utc::now()).unwrap();
    insert_media(&conn, project.id, "site.png", "image/png", &[0u8; 16], Utc::now()).unwrap();
    insert_media(&conn, project.id, "tour.mov", "video/quicktime", &[0u8; 4], Utc::now()).unwrap();

    let media = list_media(&conn, project.id).unwrap();
    assert_eq!(media.len(), 2);
    assert_eq!(media[0].name, "site.png");
    assert_eq!(media[0].media_kind(), MediaKind::Photo);
    assert_eq!(media[1].media_kind(), MediaKind::Video);
    assert_eq!(media[1].size, Some(4));
}

#[test]
fn stats_count_projects_and_media() {
    let conn = open_memory().unwrap();
    let a = insert_project(&conn, &draft("A", d(2025, 10, 1), d(2025, 10, 1)), Utc::now()).unwrap();
    insert_project(&conn, &draft("B", d(2025, 10, 1), d(2025, 10, 1)), Utc::now()).unwrap();
    set_archived(&conn, a.id, true, Utc::now()).unwrap();
    insert_media(&conn, a.id, "a.jpg", "image/jpeg", &[1, 2, 3], Utc::now()).unwrap();

    let stats = store_stats(&conn).unwrap();
    assert_eq!(
        stats,
        StoreStats {
            projects: 2,
            archived: 1,
            media: 1,
            media_bytes: 3,
        }
    );
}

#[test]
fn seed_tops_up_to_target() {
    let conn = open_memory().unwrap();
    let today = d(2025, 10, 15);
    insert_project(&conn, &draft("Existing", today, today), Utc::now()).unwrap();

    assert_eq!(seed_demo_projects(&conn, 10, today).unwrap(), 9);
    assert_eq!(all_projects(&conn).unwrap().len(), 10);
    assert_eq!(seed_demo_projects(&conn, 10, today).unwrap(), 0);
    assert_eq!(seed_demo_projects(&conn, 5, today).unwrap(), 0);
}

#[test]
fn seeded_projects_are_valid_and_scheduled_around_today() {
    let conn = open_memory().unwrap();
    let today = d(2025, 10, 15);
    seed_demo_projects(&conn, 12, today).unwrap();
    let projects = all_projects(&conn).unwrap();
    assert_eq!(projects.len(), 12);
    for project in &projects {
        let (start, end) = (project.start_date.unwrap(), project.end_date.unwrap());
        assert!(start <= end);
        assert!(project.address.contains("Auckland"));
        assert!(!project.stages.is_empty());
        if end < today {
            assert_eq!(project.status, ProjectStatus::Completed);
        }
    }
    assert!(projects.iter().any(|p| p.status == ProjectStatus::InProgress));
    assert!(projects.iter().any(|p| p.status == ProjectStatus::NotStarted));
}
