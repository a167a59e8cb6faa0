//! Transcoding seam.
//!
//! The actual downsample/re-encode primitive lives outside this crate;
//! the pipeline only needs an async function from bytes plus settings to
//! new bytes.

use async_trait::async_trait;

use crate::error::UploadError;
use crate::uploader::compression::CompressionConfig;
use crate::uploader::types::FileBody;

#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Re-encode `file` according to `config`.
    ///
    /// The returned body's media type must match `config.media_type`.
    /// Failures are reported as [`UploadError::Transcode`] and are fatal
    /// to the one upload that requested the transcode.
    async fn transcode(
        &self,
        file: FileBody,
        config: &CompressionConfig,
    ) -> Result<FileBody, UploadError>;
}
