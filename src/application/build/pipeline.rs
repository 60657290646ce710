//! Build pipeline
//!
//! Wires the domain stages together for one project:
//! resolve → transform → graph → split → emit.
//!
//! The pipeline is parameterized by its collaborators (file system, transform
//! registry, optimizer set) so tests can run it entirely in memory. A
//! successful pass yields a [`BuildState`] that the next incremental pass
//! starts from; a failed pass leaves the previous state untouched.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument};

use crate::config::BuildOptions;
use crate::domain::entities::{Chunk, Manifest, ModuleGraph};
use crate::domain::ports::FileSystem;
use crate::domain::services::{
    split, EmitCache, EmitResult, Emitter, GraphBuilder, OptimizerSet, Resolver, TransformChain,
    TransformRegistry,
};
use crate::domain::value_objects::{ContentHash, ModuleId};
use crate::error::{ResolutionError, SheafResult};
use crate::infrastructure::fs::OutputRoot;
use crate::infrastructure::{builtin_registry, standard_optimizers};

use super::copy::collect_copies;
use super::report::{AssetSummary, BuildReport, ChunkSummary};

/// Everything a later incremental pass needs from the last good one.
#[derive(Debug, Clone)]
pub struct BuildState {
    pub graph: ModuleGraph,
    pub chunks: Vec<Chunk>,
    pub manifest: Manifest,
    cache: EmitCache,
    asset_hashes: BTreeMap<String, ContentHash>,
}

impl BuildState {
    /// Scripts whose rendered output is cached for the next pass
    pub fn cached_chunks(&self) -> usize {
        self.cache.cached_chunks()
    }
}

pub struct Pipeline {
    options: BuildOptions,
    fs: Arc<dyn FileSystem>,
    resolver: Resolver,
    chain: TransformChain,
    optimizers: OptimizerSet,
    output: OutputRoot,
    cancel: Arc<AtomicBool>,
}

impl Pipeline {
    pub fn new(
        options: BuildOptions,
        registry: TransformRegistry,
        optimizers: OptimizerSet,
        fs: Arc<dyn FileSystem>,
    ) -> SheafResult<Self> {
        let chain = TransformChain::new(registry, options.rules.clone())?;
        let resolver = Resolver::new(fs.clone(), options.resolve.clone());
        let output = OutputRoot::new(fs.clone(), options.out_dir.clone());
        Ok(Self {
            options,
            fs,
            resolver,
            chain,
            optimizers,
            output,
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Pipeline with the built-in transform units and the optimizers the
    /// mode profile enables.
    pub fn standard(options: BuildOptions, fs: Arc<dyn FileSystem>) -> SheafResult<Self> {
        let registry = builtin_registry()?;
        let optimizers = standard_optimizers(&options.profile)?;
        Self::new(options, registry, optimizers, fs)
    }

    /// Share a cancellation flag; setting it stops the next module task.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn output(&self) -> &OutputRoot {
        &self.output
    }

    /// Resolve one specifier the way the graph builder would.
    pub fn resolve(&self, specifier: &str, from: &ModuleId) -> Result<ModuleId, ResolutionError> {
        self.resolver.resolve(specifier, from)
    }

    /// Empty the output directory if the config asks for it.
    pub fn prepare_output(&self) -> SheafResult<usize> {
        if !self.options.clean {
            return Ok(0);
        }
        self.output.clean()
    }

    /// Module graph and chunks, without emitting anything.
    #[instrument(skip_all)]
    pub fn plan(&self) -> SheafResult<(ModuleGraph, Vec<Chunk>)> {
        let graph = self.builder().build(&self.options.entries)?;
        let chunks = split(&graph, &self.options.split);
        Ok((graph, chunks))
    }

    /// Full build from scratch.
    #[instrument(skip_all, fields(mode = %self.options.mode))]
    pub fn build(&self) -> SheafResult<(BuildReport, BuildState)> {
        let started = Instant::now();
        let (graph, chunks) = self.plan()?;
        let mut cache = EmitCache::new();
        let result = self.emit(&graph, &chunks, &mut cache)?;
        let state = self.state(graph, chunks, cache, &result);
        let changed = state.asset_hashes.keys().cloned().collect();
        let report = self.report(&state, result, changed, started);
        info!(
            modules = report.modules,
            assets = report.assets.len(),
            "build complete"
        );
        Ok((report, state))
    }

    /// Incremental build after `changed` files were modified, created or
    /// deleted. Files the graph does not know are ignored, except sources of
    /// copy patterns, which are re-collected on every pass.
    #[instrument(skip_all, fields(changed = changed.len()))]
    pub fn rebuild(
        &self,
        previous: &BuildState,
        changed: &[PathBuf],
    ) -> SheafResult<(BuildReport, BuildState)> {
        let started = Instant::now();
        let ids: Vec<ModuleId> = changed
            .iter()
            .flat_map(|path| previous.graph.ids_for_path(path))
            .collect();
        debug!(known = ids.len(), "mapped changed files to modules");

        let rebuild = self.builder().rebuild(&previous.graph, &ids)?;
        let chunks = split(&rebuild.graph, &self.options.split);

        let mut cache = previous.cache.clone();
        let result = self.emit(&rebuild.graph, &chunks, &mut cache)?;

        let mut state = self.state(rebuild.graph, chunks, cache, &result);
        let changed_names = changed_names(&previous.asset_hashes, &state.asset_hashes);
        let removed: Vec<String> = previous
            .manifest
            .names()
            .filter(|name| result.manifest.get(name).is_none())
            .map(str::to_string)
            .collect();
        let mut manifest = previous.manifest.clone();
        manifest.patch(&result.manifest, &removed);
        state.manifest = manifest;

        let report = self.report(&state, result, changed_names, started);
        info!(
            rebuilt = rebuild.rebuilt.len(),
            pruned = rebuild.removed.len(),
            changed = report.changed.len(),
            "rebuild complete"
        );
        Ok((report, state))
    }

    fn builder(&self) -> GraphBuilder<'_> {
        GraphBuilder::new(
            self.fs.as_ref(),
            &self.resolver,
            &self.chain,
            &self.options.graph,
            &self.cancel,
        )
    }

    fn emit(&self, graph: &ModuleGraph, chunks: &[Chunk], cache: &mut EmitCache) -> SheafResult<EmitResult> {
        let copies = collect_copies(self.fs.as_ref(), &self.options.copy)?;
        Emitter::new(&self.options.emit, &self.optimizers, &self.output).emit(graph, chunks, copies, cache)
    }

    fn state(&self, graph: ModuleGraph, chunks: Vec<Chunk>, cache: EmitCache, result: &EmitResult) -> BuildState {
        let asset_hashes = result
            .assets
            .iter()
            .map(|a| (a.logical_name().to_string(), a.hash().clone()))
            .collect();
        BuildState {
            graph,
            chunks,
            manifest: result.manifest.clone(),
            cache,
            asset_hashes,
        }
    }

    fn report(&self, state: &BuildState, result: EmitResult, changed: Vec<String>, started: Instant) -> BuildReport {
        BuildReport {
            mode: self.options.mode,
            modules: state.graph.len(),
            chunks: state.chunks.iter().map(ChunkSummary::from).collect(),
            assets: result.assets.iter().map(AssetSummary::from).collect(),
            written: result.written,
            changed,
            warnings: result.warnings,
            diagnostics: state.graph.diagnostics(),
            duration_ms: started.elapsed().as_millis() as u64,
        }
    }
}

/// Logical names added, removed, or with different bytes.
fn changed_names(
    previous: &BTreeMap<String, ContentHash>,
    next: &BTreeMap<String, ContentHash>,
) -> Vec<String> {
    let mut changed: Vec<String> = next
        .iter()
        .filter(|(name, hash)| previous.get(*name) != Some(hash))
        .map(|(name, _)| name.clone())
        .collect();
    changed.extend(previous.keys().filter(|name| !next.contains_key(*name)).cloned());
    changed.sort();
    changed
}
