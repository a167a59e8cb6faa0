//! Network transfer of the multipart upload payload.
//!
//! [`Transport`] abstracts the sending primitive: submit one multipart
//! POST and surface byte-level progress while it runs. [`HttpTransport`]
//! is the reqwest-backed implementation used in production wiring.

use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use url::Url;

use crate::error::UploadError;
use crate::uploader::types::FileBody;

/// Path of the create-file endpoint, relative to the API base.
pub const CREATE_FILE_PATH: &str = "/drive/files/create";

/// Chunk size for the streamed file part; one progress event per chunk.
const PROGRESS_CHUNK_SIZE: usize = 64 * 1024;

/// Multipart form content for one upload.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    /// Authorization token, sent as the `i` field.
    pub token: String,
    /// Instructs the server to bypass its duplicate check.
    pub force: bool,
    /// File bytes and their declared MIME type.
    pub body: FileBody,
    /// Display name, possibly rewritten by transcoding.
    pub name: String,
    /// Normalized destination folder id; the field is omitted entirely
    /// when no folder was given.
    pub folder_id: Option<String>,
}

/// One byte-level progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub loaded: u64,
    /// Total payload size; `None` when the transport cannot compute it.
    pub total: Option<u64>,
}

pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Raw transport outcome. The orchestrator decides what a non-success
/// status or an absent body means.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Option<String>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Submit the payload, invoking `on_progress` as bytes go out.
    ///
    /// Returns `Ok` for any response the server produced, success or
    /// not; `Err` is reserved for failures to transfer at all.
    async fn send(
        &self,
        payload: UploadPayload,
        on_progress: ProgressCallback,
    ) -> Result<TransportResponse, UploadError>;
}

/// reqwest-backed multipart POST. The file part is streamed in fixed
/// chunks so the progress callback observes byte counts as they are
/// handed to the connection.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(api_url: &Url) -> Self {
        let base = api_url.as_str().trim_end_matches('/');
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}{}", base, CREATE_FILE_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        payload: UploadPayload,
        on_progress: ProgressCallback,
    ) -> Result<TransportResponse, UploadError> {
        let total = payload.body.len();
        let media_type = payload.body.media_type.clone();

        let mut sent: u64 = 0;
        let reader = std::io::Cursor::new(payload.body.bytes);
        let counted =
            ReaderStream::with_capacity(reader, PROGRESS_CHUNK_SIZE).map(move |chunk| {
                if let Ok(bytes) = &chunk {
                    sent += bytes.len() as u64;
                    on_progress(ProgressEvent {
                        loaded: sent,
                        total: Some(total),
                    });
                }
                chunk
            });

        let file_part =
            reqwest::multipart::Part::stream_with_length(reqwest::Body::wrap_stream(counted), total)
                .file_name(payload.name.clone())
                .mime_str(&media_type)?;

        let mut form = reqwest::multipart::Form::new()
            .text("i", payload.token)
            .text("force", if payload.force { "true" } else { "false" })
            .text("name", payload.name)
            .part("file", file_part);
        if let Some(folder_id) = payload.folder_id {
            form = form.text("folderId", folder_id);
        }

        let response = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await.ok().filter(|text| !text.is_empty());

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_api_base() {
        let api_url = Url::parse("https://drive.example.com/api").unwrap();
        let transport = HttpTransport::new(&api_url);
        assert_eq!(
            transport.endpoint(),
            "https://drive.example.com/api/drive/files/create"
        );
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let api_url = Url::parse("https://drive.example.com/api/").unwrap();
        let transport = HttpTransport::new(&api_url);
        assert_eq!(
            transport.endpoint(),
            "https://drive.example.com/api/drive/files/create"
        );
    }

    #[test]
    fn test_success_status_range() {
        let ok = TransportResponse {
            status: 204,
            body: None,
        };
        assert!(ok.is_success());

        let redirect = TransportResponse {
            status: 302,
            body: None,
        };
        assert!(!redirect.is_success());

        let server_error = TransportResponse {
            status: 500,
            body: Some("boom".to_string()),
        };
        assert!(!server_error.is_success());
    }
}
