//! Watch Use Case implementation

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{sync_channel, RecvTimeoutError, TrySendError};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, trace};

use crate::application::build::Pipeline;
use crate::domain::ports::ReloadNotifier;
use crate::error::SheafResult;
use crate::infrastructure::fs::BuildLock;

use super::controller::WatchController;
use super::event::{Debouncer, WatchEvent};

const POLL: Duration = Duration::from_millis(50);

/// Watch Use Case
///
/// Builds once, then rebuilds on every debounced batch of file changes
/// under the project root until `running` is cleared.
/// This is the main entry point for the `sheaf watch` command.
pub struct WatchUseCase {
    pipeline: Pipeline,
    notifier: Arc<dyn ReloadNotifier>,
    livereload_url: Option<String>,
}

impl WatchUseCase {
    pub fn new(pipeline: Pipeline, notifier: Arc<dyn ReloadNotifier>) -> Self {
        Self {
            pipeline,
            notifier,
            livereload_url: None,
        }
    }

    /// URL of the live-reload client script, reported in `watch_started`
    pub fn with_livereload_url(mut self, url: impl Into<String>) -> Self {
        self.livereload_url = Some(url.into());
        self
    }

    /// Start watching (blocking)
    ///
    /// This method blocks until the running flag is set to false.
    /// Use the callback to receive events.
    pub fn start<F>(&self, running: Arc<AtomicBool>, on_event: F) -> SheafResult<()>
    where
        F: Fn(WatchEvent),
    {
        let options = self.pipeline.options();
        let root = options.root.clone();
        let out_dir = options.out_dir.clone();
        let _lock = BuildLock::acquire(&out_dir)?;

        on_event(WatchEvent::WatchStarted {
            root: root.display().to_string(),
            out_dir: out_dir.display().to_string(),
            livereload: self.livereload_url.clone(),
        });

        let mut controller = WatchController::new(&self.pipeline, self.notifier.clone());
        controller.start(&on_event)?;

        // Bounded queue; a full queue means events were lost
        let (tx, rx) = sync_channel::<PathBuf>(options.watch.queue_capacity);
        let overflow = Arc::new(AtomicBool::new(false));
        let overflow_flag = overflow.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                let Ok(event) = res else {
                    return;
                };
                if matches!(event.kind, EventKind::Access(_)) {
                    return;
                }
                for path in event.paths {
                    match tx.try_send(path) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => overflow_flag.store(true, Ordering::SeqCst),
                        Err(TrySendError::Disconnected(_)) => return,
                    }
                }
            },
            Config::default(),
        )?;
        watcher.watch(&root, RecursiveMode::Recursive)?;
        info!(root = %root.display(), "watching for changes");

        let mut debouncer = Debouncer::new(options.watch.debounce);
        while running.load(Ordering::SeqCst) {
            match rx.recv_timeout(POLL) {
                Ok(path) => {
                    if is_ignored(&path, &out_dir) {
                        trace!(path = %path.display(), "ignoring output change");
                        continue;
                    }
                    let content = std::fs::read(&path).ok();
                    if path.is_dir() || !controller.filter_mut().admit(&path, content.as_deref()) {
                        continue;
                    }
                    debug!(path = %path.display(), "change queued");
                    debouncer.add_change(path);
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if overflow.swap(false, Ordering::SeqCst) {
                debug!("event queue overflowed, scheduling full rebuild");
                debouncer.mark_overflow();
            }

            if debouncer.is_ready() {
                let batch = debouncer.take();
                for path in &batch.paths {
                    on_event(WatchEvent::FileChanged {
                        path: display_relative(path, &root),
                    });
                }
                controller.on_batch(batch, &on_event);
            }
        }

        controller.stop(&on_event);
        Ok(())
    }
}

fn is_ignored(path: &Path, out_dir: &Path) -> bool {
    path.starts_with(out_dir)
        || path
            .components()
            .any(|c| c.as_os_str() == "node_modules" || c.as_os_str() == ".git")
}

fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
