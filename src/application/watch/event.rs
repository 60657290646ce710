//! Watch events and change debouncing

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::application::build::BuildReport;

/// Default quiet window in milliseconds
pub const DEBOUNCE_MS: u64 = 100;

/// Watch event types for NDJSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    /// Watching began
    WatchStarted {
        root: String,
        out_dir: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        livereload: Option<String>,
    },
    /// First build of the session started
    BuildStarted,
    /// First build of the session (or a full rebuild) finished
    BuildComplete {
        modules: usize,
        assets: usize,
        written: usize,
        changed: Vec<String>,
        warnings: Vec<String>,
        duration_ms: u64,
    },
    /// A build or rebuild failed; previous output is kept
    BuildFailed { errors: Vec<String> },
    /// A change survived debouncing and the content filter
    FileChanged { path: String },
    /// Rebuild of a change batch started
    RebuildStarted { files: usize, full: bool },
    /// Incremental rebuild finished
    RebuildComplete {
        modules: usize,
        assets: usize,
        written: usize,
        changed: Vec<String>,
        warnings: Vec<String>,
        duration_ms: u64,
    },
    /// Error outside a build (watcher, live reload)
    Error { message: String },
    /// Watch stopped
    Shutdown,
}

impl WatchEvent {
    /// `BuildComplete` or `RebuildComplete` from a report.
    pub fn completed(report: &BuildReport, incremental: bool) -> Self {
        let modules = report.modules;
        let assets = report.assets.len();
        let written = report.written.len();
        let changed = report.changed.clone();
        let warnings = report
            .warnings
            .iter()
            .map(|w| w.to_string())
            .chain(report.diagnostics.iter().map(|d| d.to_string()))
            .collect();
        let duration_ms = report.duration_ms;
        if incremental {
            WatchEvent::RebuildComplete {
                modules,
                assets,
                written,
                changed,
                warnings,
                duration_ms,
            }
        } else {
            WatchEvent::BuildComplete {
                modules,
                assets,
                written,
                changed,
                warnings,
                duration_ms,
            }
        }
    }

    /// Convert to JSON string with "command": "watch" field included
    pub fn to_json(&self) -> String {
        let mut value =
            serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({"event": "error"}));
        if let Some(obj) = value.as_object_mut() {
            obj.insert("command".to_string(), serde_json::json!("watch"));
        }
        serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
    }
}

/// A coalesced set of changes ready to rebuild
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeBatch {
    /// Sorted, deduplicated
    pub paths: Vec<PathBuf>,
    /// The event queue overflowed; changes may be missing from `paths`
    pub full: bool,
}

/// Collects changes until no new one arrived for the quiet window.
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    pending: BTreeSet<PathBuf>,
    overflowed: bool,
    last_change: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEBOUNCE_MS))
    }
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: BTreeSet::new(),
            overflowed: false,
            last_change: None,
        }
    }

    pub fn add_change(&mut self, path: PathBuf) {
        self.add_change_at(path, Instant::now());
    }

    pub fn add_change_at(&mut self, path: PathBuf, now: Instant) {
        self.pending.insert(path);
        self.last_change = Some(now);
    }

    /// Events were dropped; the next batch must rebuild everything.
    pub fn mark_overflow(&mut self) {
        self.mark_overflow_at(Instant::now());
    }

    pub fn mark_overflow_at(&mut self, now: Instant) {
        self.overflowed = true;
        self.last_change = Some(now);
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty() || self.overflowed
    }

    pub fn is_ready(&self) -> bool {
        self.is_ready_at(Instant::now())
    }

    pub fn is_ready_at(&self, now: Instant) -> bool {
        match self.last_change {
            Some(last) => self.has_pending() && now.duration_since(last) >= self.quiet,
            None => false,
        }
    }

    /// Take the pending batch, resetting state
    pub fn take(&mut self) -> ChangeBatch {
        let batch = ChangeBatch {
            paths: std::mem::take(&mut self.pending).into_iter().collect(),
            full: self.overflowed,
        };
        self.overflowed = false;
        self.last_change = None;
        batch
    }
}
