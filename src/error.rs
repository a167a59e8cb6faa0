use thiserror::Error;

/// Upload pipeline errors.
///
/// Every variant is scoped to the single upload that raised it; a failed
/// upload never disturbs other in-flight uploads or shared state beyond
/// the removal of its own registry record.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The source file could not be read from disk.
    #[error("failed to read source file: {0}")]
    LocalRead(#[from] std::io::Error),

    /// The client-side transcoder failed on or rejected the file.
    #[error("transcoding failed: {0}")]
    Transcode(String),

    /// No filename extension is registered for the transcoder's output
    /// media type.
    #[error("no file extension registered for media type {0}")]
    UnknownExtension(String),

    /// The server answered with a non-success status.
    #[error("upload rejected with status {status}")]
    Rejected { status: u16 },

    /// HTTP-level failure before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Transport failure outside the HTTP client itself.
    #[error("transfer failed: {0}")]
    Transfer(String),

    /// The server reported success but returned no response body.
    #[error("upload response was empty")]
    EmptyResponse,

    /// The response body was not a valid file descriptor.
    #[error("malformed upload response: {0}")]
    Response(#[from] serde_json::Error),
}

impl UploadError {
    /// True for failures raised during the network transfer, the class
    /// that triggers a user-visible notification.
    pub fn is_transfer(&self) -> bool {
        matches!(
            self,
            UploadError::Rejected { .. }
                | UploadError::Http(_)
                | UploadError::Transfer(_)
                | UploadError::EmptyResponse
                | UploadError::Response(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = UploadError::Rejected { status: 500 };
        assert_eq!(err.to_string(), "upload rejected with status 500");

        let err = UploadError::UnknownExtension("image/avif".to_string());
        assert_eq!(
            err.to_string(),
            "no file extension registered for media type image/avif"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: UploadError = io.into();
        assert!(err.to_string().contains("failed to read source file"));
        assert!(!err.is_transfer());
    }

    #[test]
    fn test_transfer_classification() {
        assert!(UploadError::Rejected { status: 404 }.is_transfer());
        assert!(UploadError::EmptyResponse.is_transfer());
        assert!(UploadError::Transfer("connection reset".to_string()).is_transfer());
        assert!(!UploadError::Transcode("encoder".to_string()).is_transfer());
    }
}
