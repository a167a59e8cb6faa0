//! Upload orchestration.
//!
//! [`Uploader`] drives one file upload end to end: read the bytes,
//! register a tracking record, optionally re-encode client-side, POST
//! the multipart payload with live progress relayed into the shared
//! registry, and settle exactly once. Concurrent uploads interleave
//! freely; each owns its own record and outcome.

pub mod compression;
pub mod registry;
pub mod types;

pub use registry::UploadRegistry;
pub use types::{DriveFile, DriveFolder, FileBody, FolderRef, LocalFile, UploadRecord};

use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::account::IdentityProvider;
use crate::config::DriveConfig;
use crate::error::UploadError;
use crate::notify::Notifier;
use crate::transcode::Transcoder;
use crate::transport::{ProgressCallback, ProgressEvent, Transport, UploadPayload};
use compression::{decide, extension_for};

/// Upload pipeline front end. Cheap to clone; clones share the registry.
#[derive(Clone)]
pub struct Uploader {
    registry: UploadRegistry,
    identity: Arc<dyn IdentityProvider>,
    transcoder: Arc<dyn Transcoder>,
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
    keep_original_default: bool,
}

impl Uploader {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        transcoder: Arc<dyn Transcoder>,
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
        config: &DriveConfig,
    ) -> Self {
        Self {
            registry: UploadRegistry::new(),
            identity,
            transcoder,
            transport,
            notifier,
            keep_original_default: config.keep_original_uploading,
        }
    }

    /// Read handle to the shared record store, for UI observers.
    pub fn registry(&self) -> &UploadRegistry {
        &self.registry
    }

    /// Upload one file, resolving with the server's file descriptor.
    ///
    /// `name` overrides the display name, `folder` the destination, and
    /// `keep_original` the configured compression default. The upload
    /// runs to a single terminal event; there is no cancellation and no
    /// retry.
    pub async fn upload(
        &self,
        file: LocalFile,
        folder: Option<FolderRef>,
        name: Option<String>,
        keep_original: Option<bool>,
    ) -> Result<DriveFile, UploadError> {
        let keep_original = keep_original.unwrap_or(self.keep_original_default);
        let folder_id = folder.map(|folder| folder.folder_id().to_string());

        // Reading: nothing is registered until the bytes are local.
        let bytes = tokio::fs::read(&file.path).await?;
        let preview_url = preview_url_for(&file.path).await?;

        let id = Uuid::new_v4();
        let mut display_name = file.display_name(name);

        self.registry.insert(UploadRecord {
            id,
            name: display_name.clone(),
            progress_total: None,
            progress_loaded: None,
            preview_url,
            queued_at: Utc::now(),
        });
        debug!(upload_id = %id, name = %display_name, "upload registered");

        let mut body = FileBody::new(bytes, file.media_type.clone());

        if let Some(decision) = decide(&file.media_type, keep_original) {
            body = match self.transcoder.transcode(body, &decision.config).await {
                Ok(transcoded) => transcoded,
                Err(err) => {
                    self.registry.remove(id);
                    warn!(upload_id = %id, error = %err, "transcoding failed");
                    return Err(err);
                }
            };

            if decision.changes_container {
                let Some(extension) = extension_for(&decision.config.media_type) else {
                    self.registry.remove(id);
                    return Err(UploadError::UnknownExtension(
                        decision.config.media_type.clone(),
                    ));
                };
                display_name = format!("{display_name}.{extension}");
                self.registry.rename(id, display_name.clone());
            }
        }

        let payload = UploadPayload {
            token: self.identity.token(),
            force: true,
            body,
            name: display_name.clone(),
            folder_id,
        };

        let registry = self.registry.clone();
        let on_progress: ProgressCallback = Arc::new(move |event: ProgressEvent| {
            // Events without a known total carry nothing the UI can show
            if let Some(total) = event.total {
                registry.update_progress(id, event.loaded, total);
            }
        });

        let outcome = self.transfer(payload, on_progress).await;

        // The single terminal transition: the record leaves the registry
        // here, on success and failure alike.
        self.registry.remove(id);

        match outcome {
            Ok(drive_file) => {
                info!(upload_id = %id, file_id = %drive_file.id, "upload complete");
                Ok(drive_file)
            }
            Err(err) => {
                self.notifier.upload_failed(&display_name);
                warn!(upload_id = %id, error = %err, "upload failed");
                Err(err)
            }
        }
    }

    async fn transfer(
        &self,
        payload: UploadPayload,
        on_progress: ProgressCallback,
    ) -> Result<DriveFile, UploadError> {
        let response = self.transport.send(payload, on_progress).await?;

        if !response.is_success() {
            return Err(UploadError::Rejected {
                status: response.status,
            });
        }

        let body = response.body.ok_or(UploadError::EmptyResponse)?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Locally resolvable URL of the source file for UI previews.
async fn preview_url_for(path: &Path) -> Result<Url, UploadError> {
    let absolute = tokio::fs::canonicalize(path).await?;
    Url::from_file_path(&absolute).map_err(|_| {
        UploadError::LocalRead(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path is not representable as a file URL",
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_preview_url_points_at_source_file() {
        let mut temp_file = tempfile::NamedTempFile::new().unwrap();
        temp_file.write_all(b"preview bytes").unwrap();
        temp_file.flush().unwrap();

        let url = preview_url_for(temp_file.path()).await.unwrap();
        assert_eq!(url.scheme(), "file");
        assert!(url.to_file_path().unwrap().exists());
    }

    #[tokio::test]
    async fn test_preview_url_fails_for_missing_file() {
        let result = preview_url_for(Path::new("/nonexistent/preview.png")).await;
        assert!(matches!(result, Err(UploadError::LocalRead(_))));
    }
}
