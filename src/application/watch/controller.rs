//! Rebuild controller
//!
//! Drives the pipeline through the watch lifecycle, independent of where
//! change batches come from. Rebuilds run one at a time on the caller's
//! thread. After a failure the last good state is kept and the failed batch
//! is retried together with the next one, so fixing any file of it recovers.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::build::{BuildReport, BuildState, Pipeline};
use crate::domain::ports::ReloadNotifier;
use crate::error::SheafResult;

use super::cache::ContentFilter;
use super::event::{ChangeBatch, WatchEvent};
use super::state::{Phase, Trigger};

pub struct WatchController<'a> {
    pipeline: &'a Pipeline,
    notifier: Arc<dyn ReloadNotifier>,
    phase: Phase,
    state: Option<BuildState>,
    retry: Vec<PathBuf>,
    filter: ContentFilter,
    seq: u64,
}

impl<'a> WatchController<'a> {
    pub fn new(pipeline: &'a Pipeline, notifier: Arc<dyn ReloadNotifier>) -> Self {
        Self {
            pipeline,
            notifier,
            phase: Phase::Idle,
            state: None,
            retry: Vec::new(),
            filter: ContentFilter::new(),
            seq: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Last successful build, if any
    pub fn state(&self) -> Option<&BuildState> {
        self.state.as_ref()
    }

    /// Sequence number of the last published reload notice
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn filter_mut(&mut self) -> &mut ContentFilter {
        &mut self.filter
    }

    /// Clean the output if configured and run the first build.
    ///
    /// Returns whether it succeeded; on failure the controller still moves
    /// to `Watching` and the next batch triggers a full build.
    pub fn start(&mut self, on_event: &impl Fn(WatchEvent)) -> SheafResult<bool> {
        self.transition(Trigger::Start);
        self.pipeline.prepare_output()?;
        on_event(WatchEvent::BuildStarted);
        let result = self.pipeline.build();
        Ok(self.finish(result, false, on_event))
    }

    /// Rebuild for a debounced batch.
    pub fn on_batch(&mut self, batch: ChangeBatch, on_event: &impl Fn(WatchEvent)) -> bool {
        self.transition(Trigger::Changes);

        let mut paths = std::mem::take(&mut self.retry);
        paths.extend(batch.paths);
        paths.sort();
        paths.dedup();

        let full = batch.full || self.state.is_none();
        on_event(WatchEvent::RebuildStarted {
            files: paths.len(),
            full,
        });

        let result = match (&self.state, full) {
            (Some(previous), false) => self.pipeline.rebuild(previous, &paths),
            _ => self.pipeline.build(),
        };
        if result.is_err() && !full {
            self.retry = paths;
        }
        self.finish(result, !full, on_event)
    }

    pub fn stop(&mut self, on_event: &impl Fn(WatchEvent)) {
        self.transition(Trigger::Stop);
        on_event(WatchEvent::Shutdown);
    }

    fn finish(
        &mut self,
        result: SheafResult<(BuildReport, BuildState)>,
        incremental: bool,
        on_event: &impl Fn(WatchEvent),
    ) -> bool {
        self.transition(Trigger::BuildFinished);
        match result {
            Ok((report, state)) => {
                self.filter.seed(&state.graph);
                self.state = Some(state);
                self.retry.clear();
                on_event(WatchEvent::completed(&report, incremental));
                if !report.changed.is_empty() {
                    self.seq += 1;
                    self.notifier.notify(self.seq, &report.changed);
                }
                true
            }
            Err(e) => {
                warn!(error = %e, "build failed, keeping previous output");
                on_event(WatchEvent::BuildFailed { errors: e.flatten() });
                false
            }
        }
    }

    fn transition(&mut self, trigger: Trigger) {
        match self.phase.next(trigger) {
            Some(next) => {
                debug!(from = %self.phase, to = %next, ?trigger, "watch phase");
                self.phase = next;
            }
            None => debug!(phase = %self.phase, ?trigger, "trigger ignored"),
        }
    }
}
