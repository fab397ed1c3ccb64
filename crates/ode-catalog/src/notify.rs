use tracing::warn;

/// Seam for user-visible notifications (the toast role in a UI). The catalog
/// client reports recoverable integration failures here instead of
/// propagating them.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, description: &str);
}

/// Default notifier: surfaces notifications as warnings in the log.
#[derive(Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, description: &str) {
        warn!("{}: {}", title, description);
    }
}
