use worksite_db::open_memory;
use worksite_db::schema::{create_schema, get_schema_version, migrate, CURRENT_VERSION, SCHEMA_V1_SQL};

#[test]
fn create_schema_in_memory() {
    let conn = open_memory().unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
}

#[test]
fn schema_is_idempotent() {
    let conn = open_memory().unwrap();
    create_schema(&conn).unwrap();
}

#[test]
fn foreign_keys_enabled() {
    let conn = open_memory().unwrap();
    let fk: i32 = conn
        .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
        .unwrap();
    assert_eq!(fk, 1);
}

#[test]
fn all_tables_exist() {
    let conn = open_memory().unwrap();
    for table in ["schema_version", "projects", "media"] {
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        assert!(exists, "table {table} should exist");
    }
}

#[test]
fn migrates_v1_database() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.execute_batch(SCHEMA_V1_SQL).unwrap();
    conn.execute("INSERT INTO schema_version (version) VALUES (1)", [])
        .unwrap();
    conn.execute(
        "INSERT INTO projects (id, project_code, name, address, client_name, sales_person, installer)
         VALUES (1, 'P-001', 'Old job', 'Addr', 'Client', 'Tim', 'Peter')",
        [],
    )
    .unwrap();

    migrate(&conn, 1).unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);

    let project = worksite_db::get_project(&conn, 1).unwrap().unwrap();
    assert_eq!(project.name, "Old job");
    assert!(project.change_note.is_empty());
    assert!(project.stages.is_empty());
}

#[test]
fn open_database_on_disk_reopens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("worksite.db");
    {
        let conn = worksite_db::open_database(&path).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
    }
    let conn = worksite_db::open_database(&path).unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
}

#[test]
fn newer_schema_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    {
        let conn = worksite_db::open_database(&path).unwrap();
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [CURRENT_VERSION + 1],
        )
        .unwrap();
    }
    assert!(worksite_db::open_database(&path).is_err());
}
