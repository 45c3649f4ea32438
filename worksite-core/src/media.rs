//! Attached media references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::wire::{de_opt_timestamp, de_ref, de_text};

/// Whether an attachment is a still image or a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    /// Infer from a MIME type such as `image/jpeg` or `video/mp4`.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let lower = content_type.trim().to_lowercase();
        if lower.starts_with("image/") {
            Some(Self::Photo)
        } else if lower.starts_with("video/") {
            Some(Self::Video)
        } else {
            None
        }
    }

    /// Infer from a file name or URL path extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::from_content_type(content_type_for(name))
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Photo => write!(f, "photo"),
            Self::Video => write!(f, "video"),
        }
    }
}

/// Guess a MIME type from a file name's extension.
pub fn content_type_for(name: &str) -> &'static str {
    let path = name.split(['?', '#']).next().unwrap_or(name);
    let ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}

/// A photo or video attached to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRef {
    #[serde(alias = "ref", alias = "key", deserialize_with = "de_ref")]
    pub id: String,
    #[serde(default, alias = "src", deserialize_with = "de_text")]
    pub url: String,
    #[serde(
        default,
        alias = "fileName",
        alias = "filename",
        deserialize_with = "de_text"
    )]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MediaKind>,
    #[serde(
        default,
        alias = "contentType",
        alias = "mimeType",
        deserialize_with = "de_text"
    )]
    pub content_type: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(
        default,
        alias = "uploadedAt",
        alias = "createdAt",
        deserialize_with = "de_opt_timestamp"
    )]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl MediaRef {
    /// The declared kind, or one inferred from content type, name, or URL.
    /// Unknown types count as photos.
    pub fn media_kind(&self) -> MediaKind {
        self.kind
            .or_else(|| MediaKind::from_content_type(&self.content_type))
            .or_else(|| MediaKind::from_file_name(&self.name))
            .or_else(|| MediaKind::from_file_name(&self.url))
            .unwrap_or(MediaKind::Photo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(content_type_for("site.JPG"), "image/jpeg");
        assert_eq!(content_type_for("walkthrough.mov"), "video/quicktime");
        assert_eq!(
            content_type_for("https://cdn.example.com/a/b.webm?sig=1"),
            "video/webm"
        );
        assert_eq!(content_type_for("notes"), "application/octet-stream");
    }

    #[test]
    fn media_kind_prefers_declared_then_infers() {
        let media: MediaRef = serde_json::from_str(
            r#"{"ref": 7, "src": "/media/7/clip.mp4", "fileName": "clip.mp4"}"#,
        )
        .unwrap();
        assert_eq!(media.id, "7");
        assert_eq!(media.media_kind(), MediaKind::Video);

        let declared: MediaRef =
            serde_json::from_str(r#"{"id": "a1", "url": "/x.mp4", "kind": "photo"}"#).unwrap();
        assert_eq!(declared.media_kind(), MediaKind::Photo);
    }
}
