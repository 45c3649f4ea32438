//! Write operations for projects and their media.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use thiserror::Error;
use worksite_core::media::MediaKind;
use worksite_core::{MediaRef, Project, ProjectDraft, ProjectPatch, Stages, ValidationError};

use crate::queries::{get_project, list_media};

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Entity not found: {entity_type} with id '{id}'")]
    NotFound { entity_type: String, id: String },
    #[error("Invalid project: {0}")]
    Validation(#[from] ValidationError),
}

impl OperationError {
    pub fn project_not_found(id: i64) -> Self {
        Self::NotFound {
            entity_type: "project".to_string(),
            id: id.to_string(),
        }
    }

    pub fn media_not_found(project_id: i64, media_id: &str) -> Self {
        Self::NotFound {
            entity_type: "media".to_string(),
            id: format!("{project_id}/{media_id}"),
        }
    }
}

/// Code shown to users for a project id.
pub fn project_code_for(id: i64) -> String {
    format!("P-{id:03}")
}

/// URL recorded for locally stored media.
pub fn local_media_url(project_id: i64, media_id: i64, name: &str) -> String {
    format!("local://projects/{project_id}/media/{media_id}/{name}")
}

pub(crate) fn stages_to_column(stages: &Stages) -> String {
    stages.iter().map(|s| s.key()).collect::<Vec<_>>().join(",")
}

// ── Project Operations ──────────────────────────────────────────────────────

/// Validate and insert a new project.
///
/// The id is one past the highest existing id and the code is derived from
/// it, so codes stay unique after deletions.
pub fn insert_project(
    conn: &Connection,
    draft: &ProjectDraft,
    now: DateTime<Utc>,
) -> Result<Project, OperationError> {
    draft.validate()?;

    let id: i64 = conn.query_row("SELECT COALESCE(MAX(id), 0) + 1 FROM projects", [], |row| {
        row.get(0)
    })?;
    let project = draft.clone().into_project(id, project_code_for(id), now);

    conn.execute(
        "INSERT INTO projects (id, project_code, name, address, client_name, client_phone,
                               sales_person, installer, team_members, start_date, end_date,
                               status, archived, today_task, progress_note, change_note,
                               photo_url, stages, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
        params![
            project.id,
            project.project_code,
            project.name,
            project.address,
            project.client_name,
            project.client_phone,
            project.sales_person,
            project.installer,
            project.team_members,
            project.start_date.map(|d| d.to_string()),
            project.end_date.map(|d| d.to_string()),
            project.status.code(),
            project.archived,
            project.today_task,
            project.progress_note,
            project.change_note,
            project.photo_url,
            stages_to_column(&project.stages),
            project.created_at.map(|t| t.to_rfc3339()),
            project.updated_at.map(|t| t.to_rfc3339()),
        ],
    )?;

    log::debug!("Inserted project {} ({})", project.project_code, project.name);
    Ok(project)
}

/// Merge a patch into a stored project and write it back.
pub fn update_project(
    conn: &Connection,
    id: i64,
    patch: &ProjectPatch,
    now: DateTime<Utc>,
) -> Result<Project, OperationError> {
    let mut project = get_project(conn, id)?.ok_or_else(|| OperationError::project_not_found(id))?;
    project.apply(patch)?;
    project.updated_at = Some(now);
    write_project(conn, &project)?;
    Ok(project)
}

/// Archive or restore a project.
pub fn set_archived(
    conn: &Connection,
    id: i64,
    archived: bool,
    now: DateTime<Utc>,
) -> Result<Project, OperationError> {
    update_project(conn, id, &ProjectPatch::archive(archived), now)
}

/// Delete a project and everything attached to it.
pub fn delete_project(conn: &Connection, id: i64) -> Result<(), OperationError> {
    conn.execute("DELETE FROM media WHERE project_id = ?1", params![id])?;
    let rows = conn.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
    if rows == 0 {
        return Err(OperationError::project_not_found(id));
    }
    log::debug!("Deleted project {}", id);
    Ok(())
}

fn write_project(conn: &Connection, project: &Project) -> Result<(), OperationError> {
    let rows = conn.execute(
        "UPDATE projects SET
             name = ?2, address = ?3, client_name = ?4, client_phone = ?5,
             sales_person = ?6, installer = ?7, team_members = ?8,
             start_date = ?9, end_date = ?10, status = ?11, archived = ?12,
             today_task = ?13, progress_note = ?14, change_note = ?15,
             photo_url = ?16, stages = ?17, updated_at = ?18
         WHERE id = ?1",
        params![
            project.id,
            project.name,
            project.address,
            project.client_name,
            project.client_phone,
            project.sales_person,
            project.installer,
            project.team_members,
            project.start_date.map(|d| d.to_string()),
            project.end_date.map(|d| d.to_string()),
            project.status.code(),
            project.archived,
            project.today_task,
            project.progress_note,
            project.change_note,
            project.photo_url,
            stages_to_column(&project.stages),
            project.updated_at.map(|t| t.to_rfc3339()),
        ],
    )?;
    if rows == 0 {
        return Err(OperationError::project_not_found(project.id));
    }
    Ok(())
}

fn set_photo_url(conn: &Connection, project_id: i64, url: &str) -> Result<(), OperationError> {
    conn.execute(
        "UPDATE projects SET photo_url = ?2 WHERE id = ?1",
        params![project_id, url],
    )?;
    Ok(())
}

// ── Media Operations ────────────────────────────────────────────────────────

/// Store an uploaded file and make it the project's cover photo.
pub fn insert_media(
    conn: &Connection,
    project_id: i64,
    name: &str,
    content_type: &str,
    bytes: &[u8],
    now: DateTime<Utc>,
) -> Result<MediaRef, OperationError> {
    if get_project(conn, project_id)?.is_none() {
        return Err(OperationError::project_not_found(project_id));
    }

    conn.execute(
        "INSERT INTO media (project_id, name, content_type, size, data, uploaded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            project_id,
            name,
            content_type,
            bytes.len() as i64,
            bytes,
            now.to_rfc3339(),
        ],
    )?;
    let media_id = conn.last_insert_rowid();
    let url = local_media_url(project_id, media_id, name);
    set_photo_url(conn, project_id, &url)?;

    Ok(MediaRef {
        id: media_id.to_string(),
        url,
        name: name.to_string(),
        kind: MediaKind::from_content_type(content_type),
        content_type: content_type.to_string(),
        size: Some(bytes.len() as u64),
        uploaded_at: Some(now),
    })
}

/// Remove one attachment. If it was the cover photo, the most recent
/// remaining attachment takes its place.
pub fn delete_media(conn: &Connection, project_id: i64, media_id: &str) -> Result<(), OperationError> {
    let id: i64 = media_id
        .parse()
        .map_err(|_| OperationError::media_not_found(project_id, media_id))?;
    let rows = conn.execute(
        "DELETE FROM media WHERE id = ?1 AND project_id = ?2",
        params![id, project_id],
    )?;
    if rows == 0 {
        return Err(OperationError::media_not_found(project_id, media_id));
    }

    if let Some(project) = get_project(conn, project_id)? {
        let remaining = list_media(conn, project_id)?;
        let still_present = remaining.iter().any(|m| m.url == project.photo_url);
        if !still_present {
            let cover = remaining.last().map(|m| m.url.as_str()).unwrap_or("");
            set_photo_url(conn, project_id, cover)?;
        }
    }
    Ok(())
}

/// Remove every attachment of a project. Returns how many were removed.
pub fn delete_all_media(conn: &Connection, project_id: i64) -> Result<usize, OperationError> {
    if get_project(conn, project_id)?.is_none() {
        return Err(OperationError::project_not_found(project_id));
    }
    let rows = conn.execute("DELETE FROM media WHERE project_id = ?1", params![project_id])?;
    set_photo_url(conn, project_id, "")?;
    Ok(rows)
}
