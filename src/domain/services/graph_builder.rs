//! Module graph construction
//!
//! Walks from the entries on a rayon pool. Each discovered identity is claimed
//! exactly once under a lock; the claimer reads, transforms and resolves it,
//! then spawns tasks for the children it was first to claim. Errors are
//! collected rather than returned early, so one pass reports every broken
//! import at once.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tracing::{debug, instrument, trace};

use crate::domain::entities::{Dependency, ModuleContent, ModuleGraph, ModuleRecord};
use crate::domain::ports::transform::AssetMode;
use crate::domain::ports::{FileSystem, TransformContext};
use crate::domain::services::resolver::Resolver;
use crate::domain::services::transform_chain::TransformChain;
use crate::domain::value_objects::{ContentHash, Mode, ModuleId, ModuleType};
use crate::error::{BuildFailure, ResolutionError, SheafError, SheafResult, TransformError};

/// Build-wide inputs to every module task.
#[derive(Debug, Clone)]
pub struct GraphSettings {
    pub root: PathBuf,
    pub mode: Mode,
    pub define: BTreeMap<String, String>,
    pub asset_mode: AssetMode,
    pub inline_limit: usize,
    /// Worker threads; 0 lets rayon decide
    pub jobs: usize,
}

/// Outcome of an incremental pass.
#[derive(Debug)]
pub struct Rebuild {
    pub graph: ModuleGraph,
    /// Modules whose records were recomputed (changed or newly discovered)
    pub rebuilt: Vec<ModuleId>,
    /// Modules no longer reachable from any entry
    pub removed: Vec<ModuleId>,
}

struct Failure {
    module: String,
    specifier: String,
    error: SheafError,
}

#[derive(Default)]
struct WalkState {
    claims: Mutex<HashSet<ModuleId>>,
    records: Mutex<Vec<ModuleRecord>>,
    failures: Mutex<Vec<Failure>>,
    cancelled: AtomicBool,
}

pub struct GraphBuilder<'a> {
    fs: &'a dyn FileSystem,
    resolver: &'a Resolver,
    chain: &'a TransformChain,
    settings: &'a GraphSettings,
    cancel: &'a AtomicBool,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        resolver: &'a Resolver,
        chain: &'a TransformChain,
        settings: &'a GraphSettings,
        cancel: &'a AtomicBool,
    ) -> Self {
        Self {
            fs,
            resolver,
            chain,
            settings,
            cancel,
        }
    }

    /// Full build from `(logical name, specifier)` entries.
    #[instrument(skip_all, fields(entries = entries.len()))]
    pub fn build(&self, entries: &[(String, String)]) -> SheafResult<ModuleGraph> {
        let mut resolved = Vec::new();
        let mut missing = Vec::new();
        for (name, specifier) in entries {
            match self.resolver.resolve_entry(specifier, &self.settings.root) {
                Some(id) => resolved.push((name.clone(), id)),
                None => missing.push(SheafError::MissingEntry {
                    name: name.clone(),
                    path: self.settings.root.join(specifier),
                }),
            }
        }
        if !missing.is_empty() {
            return Err(BuildFailure::new(missing).into());
        }

        let mut seeds: Vec<ModuleId> = Vec::new();
        for (_, id) in &resolved {
            if !seeds.contains(id) {
                seeds.push(id.clone());
            }
        }

        let mut graph = ModuleGraph::new(self.settings.root.clone(), resolved);
        let records = self.walk(seeds, HashSet::new())?;
        for record in records {
            graph.insert(record);
        }
        graph.finalize();
        debug!(modules = graph.len(), "module graph complete");
        Ok(graph)
    }

    /// Recompute the records of `changed` on a copy of `previous`, building
    /// any newly imported modules and pruning ones no longer reachable.
    ///
    /// On error `previous` is untouched.
    #[instrument(skip_all, fields(changed = changed.len()))]
    pub fn rebuild(&self, previous: &ModuleGraph, changed: &[ModuleId]) -> SheafResult<Rebuild> {
        let mut graph = previous.clone();
        let mut seeds = Vec::new();
        let mut deleted = Vec::new();
        for id in changed {
            if !graph.contains(id) {
                continue;
            }
            if self.fs.is_file(id.path()) {
                seeds.push(id.clone());
            } else {
                // deleted; any importer still naming it becomes dangling
                graph.remove(id);
                deleted.push(id.clone());
            }
        }

        let claimed: HashSet<ModuleId> = previous.modules().map(|r| r.id().clone()).collect();
        let records = self.walk(seeds, claimed)?;
        let rebuilt: Vec<ModuleId> = records.iter().map(|r| r.id().clone()).collect();
        for record in records {
            graph.insert(record);
        }
        let mut removed = graph.finalize();
        removed.extend(deleted);
        removed.sort();

        let dangling = graph.dangling_edges();
        if !dangling.is_empty() {
            let errors = dangling
                .into_iter()
                .map(|edge| ResolutionError::new(edge.specifier, &edge.from).into())
                .collect();
            return Err(BuildFailure::new(errors).into());
        }

        let mut rebuilt = rebuilt;
        rebuilt.sort();
        debug!(
            rebuilt = rebuilt.len(),
            removed = removed.len(),
            "module graph updated"
        );
        Ok(Rebuild {
            graph,
            rebuilt,
            removed,
        })
    }

    /// Process `seeds` and everything they newly reach, skipping identities
    /// in `claimed`. Returns the new records once the pool is quiescent.
    fn walk(&self, seeds: Vec<ModuleId>, claimed: HashSet<ModuleId>) -> SheafResult<Vec<ModuleRecord>> {
        let state = WalkState::default();
        {
            let mut claims = state.claims.lock();
            claims.extend(claimed);
            claims.extend(seeds.iter().cloned());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.settings.jobs)
            .build()
            .map_err(|e| SheafError::Io(std::io::Error::other(e.to_string())))?;

        pool.scope(|scope| {
            for id in seeds {
                let state = &state;
                scope.spawn(move |s| self.visit(s, id, state));
            }
        });

        if state.cancelled.load(Ordering::SeqCst) {
            return Err(SheafError::Cancelled);
        }

        let mut failures = state.failures.into_inner();
        if !failures.is_empty() {
            failures.sort_by(|a, b| (&a.module, &a.specifier).cmp(&(&b.module, &b.specifier)));
            return Err(BuildFailure::new(failures.into_iter().map(|f| f.error).collect()).into());
        }
        Ok(state.records.into_inner())
    }

    fn visit<'s>(&'s self, scope: &rayon::Scope<'s>, id: ModuleId, state: &'s WalkState) {
        if self.cancel.load(Ordering::SeqCst) {
            state.cancelled.store(true, Ordering::SeqCst);
            return;
        }

        let (record, failures) = match self.process(&id) {
            Ok(done) => done,
            Err(failure) => {
                state.failures.lock().push(failure);
                return;
            }
        };

        for child in record.resolved() {
            let fresh = state.claims.lock().insert(child.clone());
            if fresh {
                let child = child.clone();
                scope.spawn(move |s| self.visit(s, child, state));
            }
        }
        state.failures.lock().extend(failures);
        state.records.lock().push(record);
    }

    /// Read, transform and resolve one module.
    fn process(&self, id: &ModuleId) -> Result<(ModuleRecord, Vec<Failure>), Failure> {
        let display = id.display_name(&self.settings.root);
        let fail = |error: SheafError| Failure {
            module: display.clone(),
            specifier: String::new(),
            error,
        };

        let bytes = self.fs.read(id.path()).map_err(|e| fail(e.into()))?;
        let module_type = ModuleType::infer(id.path());
        let source_hash = ContentHash::from_bytes(&bytes);
        let raw = if module_type.is_binary() {
            ModuleContent::Binary(bytes)
        } else {
            match String::from_utf8(bytes) {
                Ok(text) => ModuleContent::Text(text),
                Err(e) => ModuleContent::Binary(e.into_bytes()),
            }
        };

        let ctx = TransformContext {
            module: id,
            module_type,
            root: &self.settings.root,
            mode: self.settings.mode,
            asset_mode: self.settings.asset_mode,
            asset_filename: None,
            inline_limit: self.settings.inline_limit,
            define: &self.settings.define,
        };
        let output = self.chain.run(raw, &ctx).map_err(|e| fail(e.into()))?;
        let text = output.content.into_text().map_err(|_| {
            fail(
                TransformError {
                    unit: "chain".to_string(),
                    module: display.clone(),
                    cause: "chain produced binary output; add a unit that emits script text"
                        .to_string(),
                }
                .into(),
            )
        })?;

        let mut failures = Vec::new();
        let mut dependencies: Vec<Dependency> = Vec::new();
        let mut resolved = Vec::new();
        for dep in output.dependencies {
            if dependencies.contains(&dep) {
                continue;
            }
            match self.resolver.resolve(&dep.specifier, id) {
                Ok(target) => {
                    let module_name = &display;
                    trace!(module = %module_name, specifier = %dep.specifier, "dependency");
                    dependencies.push(dep);
                    resolved.push(target);
                }
                Err(e) => failures.push(Failure {
                    module: display.clone(),
                    specifier: dep.specifier.clone(),
                    error: e.into(),
                }),
            }
        }

        let record = ModuleRecord::new(id.clone(), module_type, source_hash)
            .with_output(text, output.side_artifacts, output.inline_url)
            .with_dependencies(dependencies, resolved);
        Ok((record, failures))
    }
}
