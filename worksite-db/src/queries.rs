//! Read queries for the project store.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use worksite_core::media::MediaKind;
use worksite_core::util::parse_date;
use worksite_core::{MediaRef, Project, ProjectStatus, Stages};

use crate::operations::{local_media_url, OperationError};

const PROJECT_COLUMNS: &str = "id, project_code, name, address, client_name, client_phone,
     sales_person, installer, team_members, start_date, end_date, status, archived,
     today_task, progress_note, change_note, photo_url, stages, created_at, updated_at";

// ── Project Lookups ─────────────────────────────────────────────────────────

/// Find a project by id.
pub fn get_project(conn: &Connection, id: i64) -> Result<Option<Project>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"
    ))?;
    let result = stmt.query_row(params![id], row_to_project);
    match result {
        Ok(project) => Ok(Some(project)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All projects in id order, archived included.
///
/// Filtering and pagination happen in `worksite_core::query` so that local
/// and remote listings share one implementation.
pub fn all_projects(conn: &Connection) -> Result<Vec<Project>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY id"
    ))?;
    let rows = stmt.query_map([], row_to_project)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Media Lookups ───────────────────────────────────────────────────────────

/// Attachments of a project, oldest first.
pub fn list_media(conn: &Connection, project_id: i64) -> Result<Vec<MediaRef>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT id, project_id, name, content_type, size, uploaded_at
         FROM media WHERE project_id = ?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![project_id], row_to_media)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Stored bytes and content type of one attachment.
pub fn media_bytes(
    conn: &Connection,
    project_id: i64,
    media_id: &str,
) -> Result<(Vec<u8>, String), OperationError> {
    let not_found = || OperationError::media_not_found(project_id, media_id);
    let id: i64 = media_id.parse().map_err(|_| not_found())?;
    let result = conn.query_row(
        "SELECT data, content_type FROM media WHERE id = ?1 AND project_id = ?2",
        params![id, project_id],
        |row| Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, String>(1)?)),
    );
    match result {
        Ok(found) => Ok(found),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(not_found()),
        Err(e) => Err(e.into()),
    }
}

// ── Stats ───────────────────────────────────────────────────────────────────

/// Summary counts for the local store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub projects: usize,
    pub archived: usize,
    pub media: usize,
    pub media_bytes: u64,
}

/// Count projects and attachments.
pub fn store_stats(conn: &Connection) -> Result<StoreStats, OperationError> {
    let (projects, archived): (i64, i64) = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(archived), 0) FROM projects",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    let (media, media_bytes): (i64, i64) = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(size), 0) FROM media",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    Ok(StoreStats {
        projects: projects as usize,
        archived: archived as usize,
        media: media as usize,
        media_bytes: media_bytes as u64,
    })
}

// ── Row Mapping ─────────────────────────────────────────────────────────────

fn row_to_project(row: &Row) -> rusqlite::Result<Project> {
    let status_raw: String = row.get(11)?;
    let status: ProjectStatus = status_raw
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(11, Type::Text, Box::new(e)))?;
    let stages_raw: String = row.get(17)?;
    let stages: Stages = stages_raw
        .split(',')
        .filter_map(|key| key.trim().parse().ok())
        .collect();

    Ok(Project {
        id: row.get(0)?,
        project_code: row.get(1)?,
        name: row.get(2)?,
        address: row.get(3)?,
        client_name: row.get(4)?,
        client_phone: row.get(5)?,
        sales_person: row.get(6)?,
        installer: row.get(7)?,
        team_members: row.get(8)?,
        start_date: opt_date(row.get(9)?),
        end_date: opt_date(row.get(10)?),
        status,
        archived: row.get(12)?,
        today_task: row.get(13)?,
        progress_note: row.get(14)?,
        change_note: row.get(15)?,
        photo_url: row.get(16)?,
        stages,
        created_at: opt_timestamp(row.get(18)?),
        updated_at: opt_timestamp(row.get(19)?),
    })
}

fn row_to_media(row: &Row) -> rusqlite::Result<MediaRef> {
    let id: i64 = row.get(0)?;
    let project_id: i64 = row.get(1)?;
    let name: String = row.get(2)?;
    let content_type: String = row.get(3)?;
    let size: i64 = row.get(4)?;
    let uploaded_at: Option<String> = row.get(5)?;
    Ok(MediaRef {
        id: id.to_string(),
        url: local_media_url(project_id, id, &name),
        kind: MediaKind::from_content_type(&content_type),
        name,
        content_type,
        size: Some(size as u64),
        uploaded_at: opt_timestamp(uploaded_at),
    })
}

fn opt_date(raw: Option<String>) -> Option<chrono::NaiveDate> {
    raw.and_then(|s| parse_date(&s).ok())
}

fn opt_timestamp(raw: Option<String>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
