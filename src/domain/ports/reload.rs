//! Reload port - notifies live-reload clients after a successful rebuild

/// Receives the changed logical names of each successful build.
pub trait ReloadNotifier: Send + Sync {
    fn notify(&self, seq: u64, changed: &[String]);
}

/// Notifier used when live reload is disabled
pub struct NoopNotifier;

impl ReloadNotifier for NoopNotifier {
    fn notify(&self, _seq: u64, _changed: &[String]) {}
}
