use std::time::Duration;

use percent_encoding::percent_decode_str;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use worksite_core::wire::encode_body;
use worksite_core::{
    ExportFile, ExportFormat, ExportRange, FieldStyle, ListQuery, ListResponse, MediaRef, Page,
    Project, ProjectDraft, ProjectPatch,
};

use crate::error::RemoteError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest error body excerpt carried in a [`RemoteError::Status`].
const MAX_ERROR_BODY: usize = 200;

/// HTTP client for the project backend.
///
/// Works against both backend generations: list responses may be a bare
/// array or a pagination envelope, and request bodies are encoded in the
/// configured [`FieldStyle`].
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base: Url,
    style: FieldStyle,
}

impl BackendClient {
    /// Create a client for `base` (for example `http://localhost:9005`).
    pub fn new(base: &str, style: FieldStyle, timeout: Duration) -> Result<Self, RemoteError> {
        let trimmed = base.trim();
        let parsed = Url::parse(trimmed).map_err(|_| RemoteError::InvalidBaseUrl(base.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(RemoteError::InvalidBaseUrl(base.to_string()));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base: parsed,
            style,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    pub fn field_style(&self) -> FieldStyle {
        self.style
    }

    // ── Projects ────────────────────────────────────────────────────────────

    /// List projects matching `query`.
    pub async fn list_projects(&self, query: &ListQuery) -> Result<Page<Project>, RemoteError> {
        let resp = self
            .http
            .get(self.endpoint(&["api", "projects"])?)
            .query(&query.to_query_pairs())
            .send()
            .await?;
        let text = check_status(resp, "project list").await?.text().await?;
        let body: ListResponse<Project> = parse_json(&text, "project list")?;
        let page = body.into_page(query);
        log::debug!(
            "Listed {} of {} project(s) from {}",
            page.items.len(),
            page.total,
            self.base_url()
        );
        Ok(page)
    }

    pub async fn get_project(&self, id: i64) -> Result<Project, RemoteError> {
        let resp = self
            .http
            .get(self.project_endpoint(id, &[])?)
            .send()
            .await?;
        let what = format!("project {id}");
        let text = check_status(resp, &what).await?.text().await?;
        parse_json(&text, &what)
    }

    /// Create a project; the backend assigns id and code.
    pub async fn create_project(&self, draft: &ProjectDraft) -> Result<Project, RemoteError> {
        let body = encode_body(draft, self.style)?;
        let resp = self
            .http
            .post(self.endpoint(&["api", "projects"])?)
            .json(&body)
            .send()
            .await?;
        let text = check_status(resp, "new project").await?.text().await?;
        parse_json(&text, "created project")
    }

    /// Send a partial update. Only fields set in `patch` are transmitted.
    pub async fn update_project(&self, id: i64, patch: &ProjectPatch) -> Result<Project, RemoteError> {
        let body = encode_body(patch, self.style)?;
        let resp = self
            .http
            .patch(self.project_endpoint(id, &[])?)
            .json(&body)
            .send()
            .await?;
        let what = format!("project {id}");
        let text = check_status(resp, &what).await?.text().await?;
        parse_json(&text, &what)
    }

    pub async fn set_archived(&self, id: i64, archived: bool) -> Result<Project, RemoteError> {
        self.update_project(id, &ProjectPatch::archive(archived)).await
    }

    pub async fn delete_project(&self, id: i64) -> Result<(), RemoteError> {
        let resp = self
            .http
            .delete(self.project_endpoint(id, &[])?)
            .send()
            .await?;
        check_status(resp, &format!("project {id}")).await?;
        Ok(())
    }

    // ── Media ───────────────────────────────────────────────────────────────

    /// Upload a photo or video as multipart field `file`.
    ///
    /// Backends answer with the stored media record, the updated project, or
    /// a bare acknowledgement. The reference is built from the upload itself
    /// when the reply carries no media record.
    pub async fn upload_media(
        &self,
        id: i64,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<MediaRef, RemoteError> {
        let size = bytes.len() as u64;
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = Form::new().part("file", part);
        let resp = self
            .http
            .post(self.project_endpoint(id, &["photo"])?)
            .multipart(form)
            .send()
            .await?;
        let text = check_status(resp, &format!("project {id}")).await?.text().await?;

        let uploaded = MediaRef {
            id: String::new(),
            url: String::new(),
            name: file_name.to_string(),
            kind: worksite_core::MediaKind::from_content_type(content_type),
            content_type: content_type.to_string(),
            size: Some(size),
            uploaded_at: None,
        };
        if text.trim().is_empty() {
            return Ok(uploaded);
        }

        let value: serde_json::Value = parse_json(&text, "upload response")?;
        let has_key = |keys: &[&str]| keys.iter().any(|key| value.get(key).is_some());
        let is_project = has_key(&["photo_url", "photoUrl", "project_code", "projectCode"]);
        let is_media = has_key(&["id", "ref", "key"]);
        if is_project {
            let project: Project = serde_json::from_value(value)?;
            return Ok(MediaRef {
                url: project.photo_url,
                uploaded_at: project.updated_at,
                ..uploaded
            });
        }
        if is_media {
            return serde_json::from_value(value).map_err(|e| {
                RemoteError::Api(format!("Failed to parse upload response: {e}"))
            });
        }

        // A bare acknowledgement such as `{"ok": true}`.
        log::debug!("Upload to project {id} acknowledged without a media record");
        Ok(uploaded)
    }

    pub async fn list_media(&self, id: i64) -> Result<Vec<MediaRef>, RemoteError> {
        let resp = self
            .http
            .get(self.project_endpoint(id, &["photos"])?)
            .send()
            .await?;
        let what = format!("media of project {id}");
        let text = check_status(resp, &what).await?.text().await?;
        let body: ListResponse<MediaRef> = parse_json(&text, &what)?;
        Ok(body.into_items())
    }

    pub async fn delete_media(&self, id: i64, media_ref: &str) -> Result<(), RemoteError> {
        let resp = self
            .http
            .delete(self.project_endpoint(id, &["photos", media_ref])?)
            .send()
            .await?;
        check_status(resp, &format!("media {media_ref} of project {id}")).await?;
        Ok(())
    }

    pub async fn delete_all_media(&self, id: i64) -> Result<(), RemoteError> {
        let resp = self
            .http
            .delete(self.project_endpoint(id, &["photos"])?)
            .send()
            .await?;
        check_status(resp, &format!("media of project {id}")).await?;
        Ok(())
    }

    /// Absolute form of a media URL. Relative URLs resolve against the base URL.
    pub fn resolve_url(&self, url: &str) -> Result<Url, RemoteError> {
        self.base
            .join(url)
            .map_err(|e| RemoteError::Api(format!("invalid media URL '{url}': {e}")))
    }

    /// Download a media file.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, RemoteError> {
        let target = self.resolve_url(url)?;
        let resp = self.http.get(target).send().await?;
        let bytes = check_status(resp, url).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    // ── Export ──────────────────────────────────────────────────────────────

    /// Fetch a rendered schedule export.
    pub async fn export(
        &self,
        format: ExportFormat,
        range: &ExportRange,
    ) -> Result<ExportFile, RemoteError> {
        let resp = self
            .http
            .get(self.endpoint(&["api", "export", format.endpoint()])?)
            .query(&range.to_query_pairs())
            .send()
            .await?;
        let resp = check_status(resp, &format!("{format} export")).await?;

        let headers = resp.headers();
        let file_name = headers
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| range.file_name(format.extension()));
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(format.content_type())
            .to_string();
        let bytes = resp.bytes().await?.to_vec();

        Ok(ExportFile {
            file_name,
            content_type,
            bytes,
        })
    }

    // ── Helpers ─────────────────────────────────────────────────────────────

    fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn project_endpoint(&self, id: i64, rest: &[&str]) -> Result<Url, RemoteError> {
        let id = id.to_string();
        let mut segments = vec!["api", "projects", id.as_str()];
        segments.extend_from_slice(rest);
        self.endpoint(&segments)
    }
}

/// Map non-success responses to errors.
async fn check_status(resp: reqwest::Response, what: &str) -> Result<reqwest::Response, RemoteError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(RemoteError::NotFound(what.to_string()));
    }
    let body = resp.text().await.unwrap_or_default();
    Err(RemoteError::Status {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// The `message` (or `error`) field of a JSON error body, else the body
/// itself cut to a readable length.
pub fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error", "detail"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                return msg.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "(empty response)".to_string();
    }
    truncate(trimmed, MAX_ERROR_BODY)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

fn parse_json<T: DeserializeOwned>(text: &str, what: &str) -> Result<T, RemoteError> {
    serde_json::from_str(text).map_err(|e| {
        RemoteError::Api(format!(
            "Failed to parse {what}: {e}. Response: {}",
            truncate(text, MAX_ERROR_BODY)
        ))
    })
}

/// File name from a `Content-Disposition` header. `filename*` (RFC 5987)
/// wins over `filename`.
pub fn filename_from_disposition(header: &str) -> Option<String> {
    let mut plain = None;
    for param in header.split(';').map(str::trim) {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                let encoded = value.trim().trim_matches('"');
                let encoded = encoded
                    .split_once("''")
                    .map_or(encoded, |(_, rest)| rest);
                let decoded = percent_decode_str(encoded).decode_utf8().ok();
                if let Some(decoded) = decoded.filter(|s| !s.is_empty()) {
                    return Some(decoded.into_owned());
                }
            }
            "filename" => {
                let name = value.trim().trim_matches('"');
                if !name.is_empty() {
                    plain = Some(name.to_string());
                }
            }
            _ => {}
        }
    }
    plain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposition_prefers_extended_filename() {
        let header = "attachment; filename=\"schedule.xlsx\"; filename*=UTF-8''%E6%96%BD%E5%B7%A5.xlsx";
        assert_eq!(
            filename_from_disposition(header).as_deref(),
            Some("施工.xlsx")
        );
        assert_eq!(
            filename_from_disposition("attachment; filename=\"a b.pdf\"").as_deref(),
            Some("a b.pdf")
        );
        assert_eq!(filename_from_disposition("inline"), None);
    }

    #[test]
    fn disposition_decodes_trailing_and_invalid_escapes() {
        assert_eq!(
            filename_from_disposition("attachment; filename*=UTF-8''%E6%96%BD").as_deref(),
            Some("施")
        );
        assert_eq!(
            filename_from_disposition("attachment; filename*=UTF-8''100%25").as_deref(),
            Some("100%")
        );
        assert_eq!(
            filename_from_disposition("attachment; filename*=UTF-8''a%ZZ.pdf").as_deref(),
            Some("a%ZZ.pdf")
        );
        // Invalid UTF-8 falls back to the plain name.
        assert_eq!(
            filename_from_disposition("attachment; filename=\"x.pdf\"; filename*=UTF-8''%FF")
                .as_deref(),
            Some("x.pdf")
        );
    }

    #[test]
    fn error_message_prefers_json_message() {
        assert_eq!(error_message(r#"{"message": "end before start"}"#), "end before start");
        assert_eq!(error_message(r#"{"error": "bad"}"#), "bad");
        assert_eq!(error_message("  "), "(empty response)");
        let long = "x".repeat(500);
        assert_eq!(error_message(&long).len(), MAX_ERROR_BODY + 3);
    }

    #[test]
    fn rejects_non_http_base() {
        assert!(BackendClient::new("", FieldStyle::Snake, DEFAULT_TIMEOUT).is_err());
        assert!(BackendClient::new("ftp://host", FieldStyle::Snake, DEFAULT_TIMEOUT).is_err());
        let client =
            BackendClient::new("http://localhost:9005/", FieldStyle::Camel, DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9005");
    }

    #[test]
    fn endpoints_escape_segments_and_keep_prefix() {
        let client =
            BackendClient::new("https://example.com/crm/", FieldStyle::Snake, DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            client.project_endpoint(7, &["photos", "a b/c"]).unwrap().as_str(),
            "https://example.com/crm/api/projects/7/photos/a%20b%2Fc"
        );
    }
}
