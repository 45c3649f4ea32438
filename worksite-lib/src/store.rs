//! The project store seen by frontends, backed by SQLite in local mode or
//! by the backend API otherwise.

use std::collections::HashSet;
use std::path::Path;

use chrono::Utc;
use rusqlite::Connection;
use worksite_core::query::MAX_PAGE_SIZE;
use worksite_core::{
    ExportFile, ExportFormat, ExportRange, ListQuery, MediaRef, Page, Project, ProjectDraft,
    ProjectPatch, ValidationError,
};
use worksite_db::StoreStats;
use worksite_remote::BackendClient;

use crate::error::WorksiteError;
use crate::export;
use crate::mode::ApiMode;
use crate::settings::Settings;

/// CRUD, media and export operations common to every data source.
#[allow(async_fn_in_trait)]
pub trait ProjectStore {
    async fn list(&self, query: &ListQuery) -> Result<Page<Project>, WorksiteError>;

    async fn get(&self, id: i64) -> Result<Project, WorksiteError>;

    async fn create(&self, draft: &ProjectDraft) -> Result<Project, WorksiteError>;

    async fn update(&self, id: i64, patch: &ProjectPatch) -> Result<Project, WorksiteError>;

    async fn archive(&self, id: i64, archived: bool) -> Result<Project, WorksiteError>;

    async fn delete(&self, id: i64) -> Result<(), WorksiteError>;

    async fn upload_media(
        &self,
        id: i64,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<MediaRef, WorksiteError>;

    async fn list_media(&self, id: i64) -> Result<Vec<MediaRef>, WorksiteError>;

    async fn delete_media(&self, id: i64, media_ref: &str) -> Result<(), WorksiteError>;

    async fn delete_all_media(&self, id: i64) -> Result<(), WorksiteError>;

    async fn export(
        &self,
        format: ExportFormat,
        range: &ExportRange,
    ) -> Result<ExportFile, WorksiteError>;
}

/// Every project matching `query`, following pages until the last one.
///
/// Stops once `total` projects are collected or a page brings nothing new,
/// so backends that ignore paging and resend the full list are read once.
pub async fn list_all<S: ProjectStore>(
    store: &S,
    query: &ListQuery,
) -> Result<Vec<Project>, WorksiteError> {
    let mut query = ListQuery {
        page: Some(1),
        page_size: Some(MAX_PAGE_SIZE),
        ..query.clone()
    };
    let mut seen = HashSet::new();
    let mut items = Vec::new();
    loop {
        let page = store.list(&query).await?;
        let more = page.has_next();
        let total = page.total;
        let before = items.len();
        for project in page.items {
            if seen.insert(project.id) {
                items.push(project);
            }
        }
        if !more || items.len() == before || items.len() >= total {
            return Ok(items);
        }
        query.page = Some(query.page() + 1);
    }
}

// ── Local ───────────────────────────────────────────────────────────────────

/// SQLite-backed store.
pub struct LocalStore {
    conn: Connection,
}

impl LocalStore {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: &Path) -> Result<Self, WorksiteError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = worksite_db::open_database(path)?;
        log::debug!("Opened local store at {}", path.display());
        Ok(Self { conn })
    }

    pub fn in_memory() -> Result<Self, WorksiteError> {
        Ok(Self {
            conn: worksite_db::open_memory()?,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Top the store up to `target` demo projects.
    pub fn seed(&self, target: usize, today: chrono::NaiveDate) -> Result<usize, WorksiteError> {
        Ok(worksite_db::seed_demo_projects(&self.conn, target, today)?)
    }

    pub fn stats(&self) -> Result<StoreStats, WorksiteError> {
        Ok(worksite_db::store_stats(&self.conn)?)
    }

    /// Raw bytes and content type of a stored attachment.
    pub fn media_bytes(&self, id: i64, media_ref: &str) -> Result<(Vec<u8>, String), WorksiteError> {
        Ok(worksite_db::media_bytes(&self.conn, id, media_ref)?)
    }
}

impl ProjectStore for LocalStore {
    async fn list(&self, query: &ListQuery) -> Result<Page<Project>, WorksiteError> {
        let all = worksite_db::all_projects(&self.conn)?;
        Ok(query.apply(all))
    }

    async fn get(&self, id: i64) -> Result<Project, WorksiteError> {
        worksite_db::get_project(&self.conn, id)?
            .ok_or_else(|| worksite_db::OperationError::project_not_found(id).into())
    }

    async fn create(&self, draft: &ProjectDraft) -> Result<Project, WorksiteError> {
        Ok(worksite_db::insert_project(&self.conn, draft, Utc::now())?)
    }

    async fn update(&self, id: i64, patch: &ProjectPatch) -> Result<Project, WorksiteError> {
        Ok(worksite_db::update_project(&self.conn, id, patch, Utc::now())?)
    }

    async fn archive(&self, id: i64, archived: bool) -> Result<Project, WorksiteError> {
        Ok(worksite_db::set_archived(&self.conn, id, archived, Utc::now())?)
    }

    async fn delete(&self, id: i64) -> Result<(), WorksiteError> {
        Ok(worksite_db::delete_project(&self.conn, id)?)
    }

    async fn upload_media(
        &self,
        id: i64,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<MediaRef, WorksiteError> {
        Ok(worksite_db::insert_media(
            &self.conn,
            id,
            file_name,
            content_type,
            &bytes,
            Utc::now(),
        )?)
    }

    async fn list_media(&self, id: i64) -> Result<Vec<MediaRef>, WorksiteError> {
        if worksite_db::get_project(&self.conn, id)?.is_none() {
            return Err(worksite_db::OperationError::project_not_found(id).into());
        }
        Ok(worksite_db::list_media(&self.conn, id)?)
    }

    async fn delete_media(&self, id: i64, media_ref: &str) -> Result<(), WorksiteError> {
        Ok(worksite_db::delete_media(&self.conn, id, media_ref)?)
    }

    async fn delete_all_media(&self, id: i64) -> Result<(), WorksiteError> {
        let removed = worksite_db::delete_all_media(&self.conn, id)?;
        log::debug!("Removed {} attachment(s) from project {}", removed, id);
        Ok(())
    }

    async fn export(
        &self,
        format: ExportFormat,
        range: &ExportRange,
    ) -> Result<ExportFile, WorksiteError> {
        let rows = export::export_rows(worksite_db::all_projects(&self.conn)?, range);
        log::debug!("Rendering {} row(s) as {}", rows.len(), format);
        export::render(format, &rows, range)
    }
}

// ── Remote ──────────────────────────────────────────────────────────────────

/// Backend-API store.
pub struct RemoteStore {
    client: BackendClient,
}

impl RemoteStore {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }
}

impl ProjectStore for RemoteStore {
    async fn list(&self, query: &ListQuery) -> Result<Page<Project>, WorksiteError> {
        Ok(self.client.list_projects(query).await?)
    }

    async fn get(&self, id: i64) -> Result<Project, WorksiteError> {
        Ok(self.client.get_project(id).await?)
    }

    async fn create(&self, draft: &ProjectDraft) -> Result<Project, WorksiteError> {
        // Reject incomplete drafts before making a request.
        draft.validate()?;
        Ok(self.client.create_project(draft).await?)
    }

    async fn update(&self, id: i64, patch: &ProjectPatch) -> Result<Project, WorksiteError> {
        if let (Some(start), Some(end)) = (patch.start_date, patch.end_date) {
            if end < start {
                return Err(ValidationError::InvertedRange { start, end }.into());
            }
        }
        Ok(self.client.update_project(id, patch).await?)
    }

    async fn archive(&self, id: i64, archived: bool) -> Result<Project, WorksiteError> {
        Ok(self.client.set_archived(id, archived).await?)
    }

    async fn delete(&self, id: i64) -> Result<(), WorksiteError> {
        Ok(self.client.delete_project(id).await?)
    }

    async fn upload_media(
        &self,
        id: i64,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<MediaRef, WorksiteError> {
        Ok(self
            .client
            .upload_media(id, file_name, content_type, bytes)
            .await?)
    }

    async fn list_media(&self, id: i64) -> Result<Vec<MediaRef>, WorksiteError> {
        Ok(self.client.list_media(id).await?)
    }

    async fn delete_media(&self, id: i64, media_ref: &str) -> Result<(), WorksiteError> {
        Ok(self.client.delete_media(id, media_ref).await?)
    }

    async fn delete_all_media(&self, id: i64) -> Result<(), WorksiteError> {
        Ok(self.client.delete_all_media(id).await?)
    }

    async fn export(
        &self,
        format: ExportFormat,
        range: &ExportRange,
    ) -> Result<ExportFile, WorksiteError> {
        Ok(self.client.export(format, range).await?)
    }
}

// ── Dispatch ────────────────────────────────────────────────────────────────

/// The store selected by the API mode.
pub enum DataSource {
    Local(LocalStore),
    Remote(RemoteStore),
}

impl DataSource {
    /// Open the store for `mode` using `settings`.
    pub fn open(settings: &Settings, mode: ApiMode) -> Result<Self, WorksiteError> {
        if !mode.is_remote() {
            return Ok(Self::Local(LocalStore::open(&settings.database_path())?));
        }
        let base = settings.base_url_for(mode).ok_or_else(|| {
            WorksiteError::Settings(format!(
                "no backend URL configured for {mode} (set api.base_prod or {})",
                crate::settings::ENV_API_BASE_PROD
            ))
        })?;
        let client = BackendClient::new(&base, settings.api.field_style, settings.timeout())?;
        log::debug!("Using backend at {} ({})", client.base_url(), mode);
        Ok(Self::Remote(RemoteStore::new(client)))
    }

    pub fn mode_label(&self) -> &'static str {
        match self {
            Self::Local(_) => "local",
            Self::Remote(_) => "backend",
        }
    }

    pub fn as_local(&self, operation: &'static str) -> Result<&LocalStore, WorksiteError> {
        match self {
            Self::Local(store) => Ok(store),
            Self::Remote(_) => Err(WorksiteError::LocalOnly(operation)),
        }
    }

    pub fn as_remote(&self, operation: &'static str) -> Result<&RemoteStore, WorksiteError> {
        match self {
            Self::Remote(store) => Ok(store),
            Self::Local(_) => Err(WorksiteError::RemoteOnly(operation)),
        }
    }

    /// Seed demo projects. Only the local store can be seeded.
    pub fn seed(&self, target: usize, today: chrono::NaiveDate) -> Result<usize, WorksiteError> {
        self.as_local("Seeding")?.seed(target, today)
    }
}

macro_rules! dispatch {
    ($self:ident, $store:ident => $call:expr) => {
        match $self {
            DataSource::Local($store) => $call,
            DataSource::Remote($store) => $call,
        }
    };
}

impl ProjectStore for DataSource {
    async fn list(&self, query: &ListQuery) -> Result<Page<Project>, WorksiteError> {
        dispatch!(self, s => s.list(query).await)
    }

    async fn get(&self, id: i64) -> Result<Project, WorksiteError> {
        dispatch!(self, s => s.get(id).await)
    }

    async fn create(&self, draft: &ProjectDraft) -> Result<Project, WorksiteError> {
        dispatch!(self, s => s.create(draft).await)
    }

    async fn update(&self, id: i64, patch: &ProjectPatch) -> Result<Project, WorksiteError> {
        dispatch!(self, s => s.update(id, patch).await)
    }

    async fn archive(&self, id: i64, archived: bool) -> Result<Project, WorksiteError> {
        dispatch!(self, s => s.archive(id, archived).await)
    }

    async fn delete(&self, id: i64) -> Result<(), WorksiteError> {
        dispatch!(self, s => s.delete(id).await)
    }

    async fn upload_media(
        &self,
        id: i64,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<MediaRef, WorksiteError> {
        dispatch!(self, s => s.upload_media(id, file_name, content_type, bytes).await)
    }

    async fn list_media(&self, id: i64) -> Result<Vec<MediaRef>, WorksiteError> {
        dispatch!(self, s => s.list_media(id).await)
    }

    async fn delete_media(&self, id: i64, media_ref: &str) -> Result<(), WorksiteError> {
        dispatch!(self, s => s.delete_media(id, media_ref).await)
    }

    async fn delete_all_media(&self, id: i64) -> Result<(), WorksiteError> {
        dispatch!(self, s => s.delete_all_media(id).await)
    }

    async fn export(
        &self,
        format: ExportFormat,
        range: &ExportRange,
    ) -> Result<ExportFile, WorksiteError> {
        dispatch!(self, s => s.export(format, range).await)
    }
}
