//! On-disk cache for project media fetched from the backend.
//!
//! Entries are keyed by the SHA-256 of the absolute media URL with `pid` and
//! `tok` query parameters set, so a new token never serves a stale file. The
//! download itself goes to the plain media URL.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use worksite_remote::{BackendClient, Url};

use crate::error::WorksiteError;

/// Where a piece of media can be read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// A cached copy on disk.
    Cached(PathBuf),
    /// The remote URL, used as-is.
    Remote(String),
}

#[derive(Debug, Clone)]
pub struct MediaCache {
    dir: PathBuf,
}

/// `url` with its `pid` and `tok` query parameters set, form-encoded.
pub fn request_url(mut url: Url, project_id: i64, token: &str) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .into_owned()
        .filter(|(key, _)| key != "pid" && key != "tok")
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("pid", &project_id.to_string())
        .append_pair("tok", token);
    url
}

/// Lowercase hex SHA-256 of `request`.
pub fn cache_key(request: &str) -> String {
    let hash = Sha256::digest(request.as_bytes());
    hash.iter().map(|b| format!("{:02x}", b)).collect()
}

/// File extension of the URL's last path segment, ignoring any query.
fn url_extension(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty() && !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            ext
        }
        _ => "bin",
    }
}

impl MediaCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Cache file for a request URL, whether or not it exists yet.
    pub fn path_for(&self, request: &str) -> PathBuf {
        let ext = url_extension(request).to_ascii_lowercase();
        self.dir.join(format!("{}.{}", cache_key(request), ext))
    }

    /// Resolve media for display.
    ///
    /// Without a project id, token or URL the remote URL is returned
    /// unchanged. Otherwise a cached copy is returned if present, and
    /// fetched and stored first if not.
    pub async fn resolve(
        &self,
        client: &BackendClient,
        project_id: Option<i64>,
        token: Option<&str>,
        url: &str,
    ) -> Result<MediaSource, WorksiteError> {
        let (Some(project_id), Some(token)) = (project_id, token.filter(|t| !t.is_empty())) else {
            return Ok(MediaSource::Remote(url.to_string()));
        };
        if url.trim().is_empty() {
            return Ok(MediaSource::Remote(url.to_string()));
        }

        let request = request_url(client.resolve_url(url)?, project_id, token);
        let path = self.path_for(request.as_str());
        if path.is_file() {
            log::debug!("Media cache hit: {}", path.display());
            return Ok(MediaSource::Cached(path));
        }

        log::debug!("Media cache miss, fetching {}", url);
        let bytes = client.download(url).await?;
        self.store(&path, &bytes)?;
        Ok(MediaSource::Cached(path))
    }

    fn store(&self, path: &Path, bytes: &[u8]) -> Result<(), WorksiteError> {
        std::fs::create_dir_all(&self.dir)?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Drop the cached copy for a media URL. Returns whether one existed.
    pub fn remove(
        &self,
        client: &BackendClient,
        project_id: i64,
        token: &str,
        url: &str,
    ) -> Result<bool, WorksiteError> {
        let request = request_url(client.resolve_url(url)?, project_id, token);
        let path = self.path_for(request.as_str());
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove every cached file. Returns how many were removed.
    pub fn clear(&self) -> Result<usize, WorksiteError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let mut removed = 0;
        for entry in entries {
            let path = entry?.path();
            if path.is_file() {
                std::fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
#[path = "tests/media_cache_tests.rs"]
mod tests;
