//! Core types for the upload pipeline.
//!
//! Defines the tracked upload record, the caller-facing file and folder
//! types, and the server's file descriptor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;
use uuid::Uuid;

/// Fallback display name when neither the caller nor the file supplies one.
pub const UNTITLED_NAME: &str = "untitled";

/// A locally selected file handed to the uploader.
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub path: PathBuf,
    /// MIME type of the content, e.g. "image/png".
    pub media_type: String,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>, media_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            media_type: media_type.into(),
        }
    }

    /// Name component of the path, if it has one.
    pub fn file_name(&self) -> Option<String> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }

    /// Display name for the upload: the caller's override, else the
    /// file's own name, else "untitled".
    pub fn display_name(&self, overriding: Option<String>) -> String {
        overriding
            .or_else(|| self.file_name())
            .unwrap_or_else(|| UNTITLED_NAME.to_string())
    }
}

/// File content moving through the pipeline, raw or transcoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBody {
    pub bytes: Vec<u8>,
    pub media_type: String,
}

impl FileBody {
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
        }
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A drive folder as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveFolder {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Folder reference accepted at the API boundary.
///
/// Callers may pass a bare folder id or a full folder record; both
/// normalize to the folder's id before transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderRef {
    Id(String),
    Record(DriveFolder),
}

impl FolderRef {
    pub fn folder_id(&self) -> &str {
        match self {
            FolderRef::Id(id) => id,
            FolderRef::Record(folder) => &folder.id,
        }
    }
}

impl From<DriveFolder> for FolderRef {
    fn from(folder: DriveFolder) -> Self {
        FolderRef::Record(folder)
    }
}

impl From<String> for FolderRef {
    fn from(id: String) -> Self {
        FolderRef::Id(id)
    }
}

impl From<&str> for FolderRef {
    fn from(id: &str) -> Self {
        FolderRef::Id(id.to_string())
    }
}

/// Server-assigned descriptor for a stored file.
///
/// Beyond the id the shape belongs to the server; unknown fields are
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveFile {
    pub id: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Per-upload tracking state, observed by the UI while the transfer is
/// in flight.
#[derive(Debug, Clone, Serialize)]
pub struct UploadRecord {
    pub id: Uuid,
    /// Display name; rewritten once if transcoding changes the container.
    pub name: String,
    /// Total byte count, unset until a length-computable progress event.
    pub progress_total: Option<u64>,
    /// Bytes transferred so far; never decreases once set.
    pub progress_loaded: Option<u64>,
    /// Locally resolvable URL of the original bytes for previews.
    /// Valid at least as long as the record stays registered.
    pub preview_url: Url,
    pub queued_at: DateTime<Utc>,
}
