use super::*;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn project(id: i64, name: &str, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Project {
    Project {
        id,
        project_code: format!("P-{id:03}"),
        name: name.to_string(),
        client_name: "Kiri".to_string(),
        address: "Queen St, Auckland".to_string(),
        start_date: start,
        end_date: end,
        ..Project::default()
    }
}

#[test]
fn page_defaults_and_clamping() {
    let query = ListQuery::default();
    assert_eq!(query.page(), 1);
    assert_eq!(query.page_size(), DEFAULT_PAGE_SIZE);

    let query = ListQuery {
        page: Some(0),
        page_size: Some(5000),
        ..ListQuery::default()
    };
    assert_eq!(query.page(), 1);
    assert_eq!(query.page_size(), MAX_PAGE_SIZE);

    let query = ListQuery {
        page_size: Some(0),
        ..ListQuery::default()
    };
    assert_eq!(query.page_size(), 1);
}

#[test]
fn text_search_is_case_insensitive_across_fields() {
    let p = project(7, "Harbour View", None, None);
    assert!(matches_query(&p, Some("harbour")));
    assert!(matches_query(&p, Some("p-007")));
    assert!(matches_query(&p, Some("KIRI")));
    assert!(matches_query(&p, Some("queen st")));
    assert!(matches_query(&p, Some("   ")));
    assert!(matches_query(&p, None));
    assert!(!matches_query(&p, Some("wellington")));
}

#[test]
fn text_search_ignores_surrounding_whitespace() {
    let p = project(7, "Harbour View", None, None);
    assert!(matches_query(&p, Some("  harbour view\n")));
    assert!(matches_query(&p, Some("\t")));
    assert!(!matches_query(&p, Some(" wellington ")));
}

#[test]
fn status_filter() {
    let mut p = project(1, "A", None, None);
    p.status = ProjectStatus::Completed;
    assert!(matches_status(&p, None));
    assert!(matches_status(&p, Some(ProjectStatus::Completed)));
    assert!(!matches_status(&p, Some(ProjectStatus::InProgress)));
}

#[test]
fn range_overlap_is_inclusive() {
    let p = project(1, "A", Some(d(2025, 10, 10)), Some(d(2025, 10, 12)));
    assert!(overlaps_range(&p, Some(d(2025, 10, 12)), Some(d(2025, 10, 20))));
    assert!(overlaps_range(&p, Some(d(2025, 10, 1)), Some(d(2025, 10, 10))));
    assert!(!overlaps_range(&p, Some(d(2025, 10, 13)), Some(d(2025, 10, 20))));
    assert!(!overlaps_range(&p, Some(d(2025, 10, 1)), Some(d(2025, 10, 9))));
}

#[test]
fn range_overlap_with_one_bound() {
    let p = project(1, "A", Some(d(2025, 10, 10)), Some(d(2025, 10, 12)));
    assert!(overlaps_range(&p, Some(d(2025, 10, 12)), None));
    assert!(!overlaps_range(&p, Some(d(2025, 10, 13)), None));
    assert!(overlaps_range(&p, None, Some(d(2025, 10, 10))));
    assert!(!overlaps_range(&p, None, Some(d(2025, 10, 9))));
    assert!(overlaps_range(&p, None, None));
}

#[test]
fn undated_projects_pass_range_filters() {
    let p = project(1, "A", Some(d(2025, 10, 10)), None);
    assert!(overlaps_range(&p, Some(d(2026, 1, 1)), Some(d(2026, 1, 31))));
}

#[test]
fn archived_projects_hidden_unless_requested() {
    let mut archived = project(2, "Old job", None, None);
    archived.archived = true;
    let projects = vec![project(1, "New job", None, None), archived];

    let page = ListQuery::default().apply(projects.clone());
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, 1);

    let page = ListQuery {
        include_archived: true,
        ..ListQuery::default()
    }
    .apply(projects);
    assert_eq!(page.total, 2);
}

#[test]
fn total_counts_filtered_items_before_slicing() {
    let projects: Vec<Project> = (1..=23)
        .map(|i| project(i, if i % 2 == 0 { "Even" } else { "Odd" }, None, None))
        .collect();
    let query = ListQuery {
        q: Some("odd".to_string()),
        page: Some(2),
        page_size: Some(5),
        ..ListQuery::default()
    };
    let page = query.apply(projects);
    assert_eq!(page.total, 12);
    assert_eq!(page.total_pages(), 3);
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.items[0].id, 11);
    assert!(page.has_next());
}

#[test]
fn page_past_end_is_empty() {
    let page = paginate(vec![1, 2, 3], 4, 2);
    assert!(page.items.is_empty());
    assert_eq!(page.total, 3);
    assert_eq!(page.total_pages(), 2);
    assert!(!page.has_next());
}

#[test]
fn empty_result_has_one_page() {
    let page: Page<i32> = paginate(Vec::new(), 1, 10);
    assert_eq!(page.total_pages(), 1);
}

#[test]
fn query_pairs_omit_unset_filters() {
    let query = ListQuery {
        q: Some(" villa ".to_string()),
        status: Some(ProjectStatus::InProgress),
        start: Some(d(2025, 10, 1)),
        include_archived: true,
        ..ListQuery::default()
    };
    assert_eq!(
        query.to_query_pairs(),
        vec![
            ("q", "villa".to_string()),
            ("status", "in_progress".to_string()),
            ("start", "2025-10-01".to_string()),
            ("includeArchived", "true".to_string()),
            ("page", "1".to_string()),
            ("pageSize", "10".to_string()),
        ]
    );
}
