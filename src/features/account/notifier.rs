/// Blocking, user-facing notification (an alert dialog in a browser UI)
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Writes alerts to the log; for headless use
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, message: &str) {
        tracing::warn!("alert: {}", message);
    }
}
