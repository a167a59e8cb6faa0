//! Client-side compression policy.
//!
//! Decides, per MIME type, whether a file is re-encoded before upload
//! and with which settings. Pure decisions only; the actual re-encoding
//! is the transcoder seam's job.

/// Longest edge allowed for re-encoded images, in pixels.
const MAX_DIMENSION: u32 = 2048;

/// Declarative settings handed to the transcoder.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionConfig {
    pub max_width: u32,
    pub max_height: u32,
    pub auto_rotate: bool,
    /// Encoder quality in 0.0..=1.0.
    pub quality: f32,
    /// MIME type the transcoder must produce.
    pub media_type: String,
    pub debug: bool,
}

impl CompressionConfig {
    fn for_output(media_type: &str, quality: f32) -> Self {
        Self {
            max_width: MAX_DIMENSION,
            max_height: MAX_DIMENSION,
            auto_rotate: true,
            quality,
            media_type: media_type.to_string(),
            debug: true,
        }
    }
}

/// Policy outcome for one file.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionDecision {
    pub config: CompressionConfig,
    /// True when the output MIME type differs from the input, which
    /// requires rewriting the display name's extension.
    pub changes_container: bool,
}

/// Decide whether and how a file should be re-encoded before transfer.
///
/// `keep_original` short-circuits to "send unmodified", as does any MIME
/// type outside the known compressible set.
pub fn decide(media_type: &str, keep_original: bool) -> Option<CompressionDecision> {
    if keep_original {
        return None;
    }

    let (quality, output_type) = match media_type {
        "image/jpeg" => (0.85, None),
        "image/webp" => (0.85, Some("image/jpeg")),
        "image/png" => (1.0, None),
        "image/svg+xml" => (1.0, Some("image/png")),
        _ => return None,
    };

    let changes_container = output_type.is_some();
    let output = output_type.unwrap_or(media_type);

    Some(CompressionDecision {
        config: CompressionConfig::for_output(output, quality),
        changes_container,
    })
}

/// Canonical filename extension for a MIME type the policy can emit.
pub fn extension_for(media_type: &str) -> Option<&'static str> {
    match media_type {
        "image/webp" => Some("webp"),
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jpeg_recompressed_in_place() {
        let decision = decide("image/jpeg", false).unwrap();
        assert!(!decision.changes_container);
        assert_eq!(decision.config.media_type, "image/jpeg");
        assert_eq!(decision.config.quality, 0.85);
        assert_eq!(decision.config.max_width, 2048);
        assert_eq!(decision.config.max_height, 2048);
        assert!(decision.config.auto_rotate);
    }

    #[test]
    fn test_webp_converts_to_jpeg() {
        let decision = decide("image/webp", false).unwrap();
        assert!(decision.changes_container);
        assert_eq!(decision.config.media_type, "image/jpeg");
        assert_eq!(decision.config.quality, 0.85);
    }

    #[test]
    fn test_png_kept_lossless() {
        let decision = decide("image/png", false).unwrap();
        assert!(!decision.changes_container);
        assert_eq!(decision.config.media_type, "image/png");
        assert_eq!(decision.config.quality, 1.0);
    }

    #[test]
    fn test_svg_converts_to_png() {
        let decision = decide("image/svg+xml", false).unwrap();
        assert!(decision.changes_container);
        assert_eq!(decision.config.media_type, "image/png");
    }

    #[test]
    fn test_unknown_type_passes_through() {
        assert!(decide("application/pdf", false).is_none());
        assert!(decide("video/mp4", false).is_none());
    }

    #[test]
    fn test_keep_original_passes_through() {
        assert!(decide("image/webp", true).is_none());
        assert!(decide("image/jpeg", true).is_none());
    }

    #[test]
    fn test_extension_lookup() {
        assert_eq!(extension_for("image/jpeg"), Some("jpg"));
        assert_eq!(extension_for("image/png"), Some("png"));
        assert_eq!(extension_for("image/webp"), Some("webp"));
        assert_eq!(extension_for("image/avif"), None);
    }
}
