//! User-facing failure notifications.

use tracing::error;

pub trait Notifier: Send + Sync {
    /// Raise a generic transfer-failed notification for `name`.
    ///
    /// No transport detail reaches the user through this path; the
    /// caller's error value carries the specifics.
    fn upload_failed(&self, name: &str);
}

/// Notifier that writes to the application log.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn upload_failed(&self, name: &str) {
        error!(file = name, "upload failed");
    }
}
