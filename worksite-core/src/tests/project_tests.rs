use super::*;
use crate::status::Stage;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn complete_draft() -> ProjectDraft {
    ProjectDraft {
        name: "Ponsonby villa".to_string(),
        address: "12 Jervois Rd, Ponsonby".to_string(),
        client_name: "Aroha Ngata".to_string(),
        client_phone: "021-555-0101".to_string(),
        sales_person: "Tim".to_string(),
        installer: "Peter".to_string(),
        team_members: "Peter, Jack".to_string(),
        start_date: Some(d(2025, 10, 10)),
        end_date: Some(d(2025, 10, 12)),
        ..ProjectDraft::default()
    }
}

#[test]
fn complete_draft_validates() {
    assert_eq!(complete_draft().validate(), Ok(()));
}

#[test]
fn validate_reports_every_missing_field() {
    let draft = ProjectDraft {
        name: "  ".to_string(),
        installer: String::new(),
        start_date: None,
        ..complete_draft()
    };
    assert_eq!(
        draft.validate(),
        Err(ValidationError::MissingFields(vec![
            "name",
            "installer",
            "start_date"
        ]))
    );
}

#[test]
fn validate_rejects_inverted_range() {
    let draft = ProjectDraft {
        start_date: Some(d(2025, 10, 12)),
        end_date: Some(d(2025, 10, 10)),
        ..complete_draft()
    };
    assert!(matches!(
        draft.validate(),
        Err(ValidationError::InvertedRange { .. })
    ));
}

#[test]
fn into_project_applies_defaults() {
    let now = Utc::now();
    let project = complete_draft().into_project(4, "P-004".to_string(), now);
    assert_eq!(project.id, 4);
    assert_eq!(project.project_code, "P-004");
    assert_eq!(project.status, ProjectStatus::NotStarted);
    assert!(!project.archived);
    assert!(project.photo_url.is_empty());
    assert_eq!(project.created_at, Some(now));
    assert_eq!(project.duration_days(), Some(3));
}

#[test]
fn apply_merges_only_present_fields() {
    let mut project = complete_draft().into_project(1, "P-001".to_string(), Utc::now());
    let patch = ProjectPatch {
        today_task: Some("Install windows".to_string()),
        status: Some(ProjectStatus::InProgress),
        end_date: Some(d(2025, 10, 20)),
        ..ProjectPatch::default()
    };
    project.apply(&patch).unwrap();
    assert_eq!(project.today_task, "Install windows");
    assert_eq!(project.status, ProjectStatus::InProgress);
    assert_eq!(project.end_date, Some(d(2025, 10, 20)));
    assert_eq!(project.name, "Ponsonby villa");
    assert_eq!(project.start_date, Some(d(2025, 10, 10)));
}

#[test]
fn apply_rejects_range_inverted_by_patch_and_leaves_project_untouched() {
    let mut project = complete_draft().into_project(1, "P-001".to_string(), Utc::now());
    let before = project.clone();
    let patch = ProjectPatch {
        name: Some("Renamed".to_string()),
        end_date: Some(d(2025, 10, 1)),
        ..ProjectPatch::default()
    };
    assert!(project.apply(&patch).is_err());
    assert_eq!(project, before);
}

#[test]
fn archive_patch_serializes_only_flag() {
    let value = serde_json::to_value(ProjectPatch::archive(true)).unwrap();
    assert_eq!(value, serde_json::json!({ "archived": true }));
    assert!(ProjectPatch::default().is_empty());
    assert!(!ProjectPatch::archive(false).is_empty());
}

#[test]
fn project_decodes_legacy_snake_case_record() {
    let json = r#"{
        "id": 101, "project_code": "P-101", "name": "Archive/Delete A",
        "client_name": "王五", "address": "南京市",
        "sales_person": "Tim", "installer": "Peter", "team_members": "Peter, Jack",
        "start_date": "2025-10-10", "end_date": "2025-10-12", "status": "施工中",
        "today_task": "", "progress_note": "", "photo_url": "", "archived": false,
        "created_at": "2025-10-01T09:00:00.000Z"
    }"#;
    let project: Project = serde_json::from_str(json).unwrap();
    assert_eq!(project.id, 101);
    assert_eq!(project.status, ProjectStatus::InProgress);
    assert_eq!(project.start_date, Some(d(2025, 10, 10)));
    assert!(project.created_at.is_some());
    assert!(project.stages.is_empty());
}

#[test]
fn project_decodes_current_camel_case_record() {
    let json = r#"{
        "id": "301", "projectCode": "P-301", "name": "Edit Test Project",
        "clientName": "李四", "clientPhone": 21222222, "address": "Auckland CBD",
        "salesPerson": "Amy", "installer": "Peter", "teamMembers": ["Peter", "Jack"],
        "startDate": "2025-10-10T00:00:00Z", "endDate": "2025-10-12",
        "status": "final_payment_received", "isArchived": 1,
        "stages": {"glass": true}, "photoUrl": null
    }"#;
    let project: Project = serde_json::from_str(json).unwrap();
    assert_eq!(project.id, 301);
    assert_eq!(project.project_code, "P-301");
    assert_eq!(project.client_phone, "21222222");
    assert_eq!(project.team_members, "Peter, Jack");
    assert_eq!(project.start_date, Some(d(2025, 10, 10)));
    assert_eq!(project.status, ProjectStatus::FinalPaymentReceived);
    assert!(project.archived);
    assert!(project.stages.contains(Stage::Glass));
    assert!(project.photo_url.is_empty());
}

#[test]
fn project_with_unknown_status_fails_to_decode() {
    let json = r#"{"id": 1, "status": "paused"}"#;
    assert!(serde_json::from_str::<Project>(json).is_err());
}
