//! Asset emission
//!
//! Turns the split graph into named output files and a manifest:
//!
//! 1. resource artifacts (images, fonts) are optimized and named first, since
//!    scripts and stylesheets embed their URLs
//! 2. chunk scripts are rendered in reverse topological order of the chunk
//!    reference graph, so a split point can embed the final path of the chunk
//!    it loads; a cycle of chunks shares one combined hash
//! 3. each chunk's extracted stylesheets are concatenated into one file
//!
//! Names are derived from the optimized bytes. Files are written resources
//! first and the manifest last, so a manifest never points at a file that is
//! not on disk yet.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::domain::entities::{
    AssetKind, Chunk, ChunkKind, DependencyKind, EmittedAsset, Manifest, ModuleGraph, ModuleRecord,
    SideArtifact,
};
use crate::domain::ports::transform::{substitute_markers, Marker};
use crate::domain::ports::{ContentType, OutputSink};
use crate::domain::services::naming::{render_filename, NameParts};
use crate::domain::services::optimization::{OptimizationWarning, OptimizeItem, OptimizerSet};
use crate::domain::services::render::{render_script, RenderOptions, RenderedScript};
use crate::domain::services::scc::strongly_connected;
use crate::domain::services::source_map::SourceMap;
use crate::domain::value_objects::{ContentHash, ModuleId};
use crate::error::{EmissionError, SheafError, SheafResult};

/// Naming and rendering options for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Template for entry chunk scripts
    pub filename: String,
    /// Template for shared and async chunk scripts
    pub chunk_filename: String,
    pub css_filename: String,
    pub asset_filename: String,
    /// Manifest path relative to the output root
    pub manifest: String,
    /// Prefix of every manifest value and runtime chunk URL
    pub public_path: String,
    pub content_hash: bool,
    pub module_comments: bool,
    /// Write a `.map` sibling of every chunk script
    pub source_maps: bool,
    /// Fail instead of warn on a cycle between chunks
    pub require_dag: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            filename: "js/[name].[hash].js".to_string(),
            chunk_filename: "js/[name].[hash].js".to_string(),
            css_filename: "css/[name].[hash].css".to_string(),
            asset_filename: "assets/[name].[hash][ext]".to_string(),
            manifest: "manifest.json".to_string(),
            public_path: String::new(),
            content_hash: true,
            module_comments: false,
            source_maps: false,
            require_dag: false,
        }
    }
}

/// Non-fatal emission findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmitWarning {
    Optimization(OptimizationWarning),
    /// Chunks that load each other through split points
    ChunkCycle { chunks: Vec<String> },
}

impl fmt::Display for EmitWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmitWarning::Optimization(w) => write!(f, "{}", w),
            EmitWarning::ChunkCycle { chunks } => {
                write!(f, "async chunk cycle: {}", chunks.join(" -> "))
            }
        }
    }
}

#[derive(Debug)]
pub struct EmitResult {
    /// Every asset of the build: resources, scripts, stylesheets, extras
    pub assets: Vec<EmittedAsset>,
    pub manifest: Manifest,
    pub warnings: Vec<EmitWarning>,
    /// Paths actually written this pass (unchanged files are skipped)
    pub written: Vec<String>,
}

/// State carried between passes of one watch session.
#[derive(Debug, Default, Clone)]
pub struct EmitCache {
    scripts: HashMap<String, CachedScript>,
    written: HashMap<String, ContentHash>,
}

#[derive(Debug, Clone)]
struct CachedScript {
    fingerprint: ContentHash,
    asset: EmittedAsset,
    map: Option<EmittedAsset>,
}

impl EmitCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cached_chunks(&self) -> usize {
        self.scripts.len()
    }
}

pub struct Emitter<'a> {
    options: &'a EmitOptions,
    optimizers: &'a OptimizerSet,
    sink: &'a dyn OutputSink,
}

/// Script work for one chunk, in chunk order.
struct ChunkSlot {
    path: Option<String>,
    asset: Option<EmittedAsset>,
    map: Option<EmittedAsset>,
}

impl<'a> Emitter<'a> {
    pub fn new(options: &'a EmitOptions, optimizers: &'a OptimizerSet, sink: &'a dyn OutputSink) -> Self {
        Self {
            options,
            optimizers,
            sink,
        }
    }

    /// Name, optimize and write every asset of the build. `extra` assets
    /// (copied files) are collision-checked, written and listed as given.
    #[instrument(skip_all, fields(chunks = chunks.len()))]
    pub fn emit(
        &self,
        graph: &ModuleGraph,
        chunks: &[Chunk],
        extra: Vec<EmittedAsset>,
        cache: &mut EmitCache,
    ) -> SheafResult<EmitResult> {
        let mut warnings = Vec::new();

        let resources = self.emit_resources(graph, &mut warnings)?;
        let resource_paths: HashMap<&ModuleId, &str> = resources
            .iter()
            .map(|(id, asset)| (id, asset.path()))
            .collect();

        let scripts = self.emit_scripts(graph, chunks, &resource_paths, cache, &mut warnings)?;
        let stylesheets = self.emit_stylesheets(graph, chunks, &resource_paths, &mut warnings)?;

        let mut assets: Vec<EmittedAsset> = Vec::new();
        let mut seen_logical: HashSet<String> = HashSet::new();
        for (_, asset) in resources {
            if seen_logical.insert(asset.logical_name().to_string()) {
                assets.push(asset);
            }
        }
        assets.extend(scripts);
        assets.extend(stylesheets);
        assets.extend(extra);
        check_collisions(&assets)?;

        let compressed = self.compress(&assets, &mut warnings);

        let mut written = Vec::new();
        for (path, bytes, hash) in assets
            .iter()
            .map(|a| (a.path(), a.bytes(), a.hash().clone()))
            .chain(compressed.iter().map(|(p, b)| (p.as_str(), b.as_slice(), ContentHash::from_bytes(b))))
        {
            if cache.written.get(path) == Some(&hash) {
                trace!(path, "unchanged, not rewritten");
                continue;
            }
            self.sink.write(path, bytes)?;
            cache.written.insert(path.to_string(), hash);
            written.push(path.to_string());
        }

        let mut manifest = Manifest::new();
        for asset in &assets {
            manifest.insert(
                asset.logical_name(),
                format!("{}{}", self.options.public_path, asset.path()),
            );
        }
        self.sink.write(&self.options.manifest, manifest.to_json()?.as_bytes())?;

        debug!(
            assets = assets.len(),
            written = written.len(),
            warnings = warnings.len(),
            "emitted"
        );
        Ok(EmitResult {
            assets,
            manifest,
            warnings,
            written,
        })
    }

    fn emit_resources(
        &self,
        graph: &ModuleGraph,
        warnings: &mut Vec<EmitWarning>,
    ) -> SheafResult<Vec<(ModuleId, EmittedAsset)>> {
        let mut pending = Vec::new();
        let mut items = Vec::new();
        for record in graph.modules() {
            for artifact in record.side_artifacts() {
                if let SideArtifact::Resource {
                    file_name,
                    bytes,
                    filename,
                } = artifact
                {
                    pending.push((record, file_name.as_str(), filename.as_deref()));
                    items.push(OptimizeItem {
                        name: graph.display_name(record.id()),
                        content_type: ContentType::of_path(file_name),
                        bytes: bytes.clone(),
                    });
                }
            }
        }

        let optimized = self.optimizers.optimize_all(items);
        let mut out = Vec::with_capacity(pending.len());
        for ((record, file_name, template), (bytes, warning)) in pending.into_iter().zip(optimized) {
            warnings.extend(warning.map(EmitWarning::Optimization));
            let file = Path::new(file_name);
            let stem = file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let ext = file
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();
            let path = self.name(
                template.unwrap_or(&self.options.asset_filename),
                &stem,
                &ext,
                record.id().query(),
                &bytes,
            )?;
            let logical = graph.display_name(record.id());
            out.push((
                record.id().clone(),
                EmittedAsset::new(logical, path, AssetKind::Resource, bytes),
            ));
        }
        Ok(out)
    }

    fn emit_scripts(
        &self,
        graph: &ModuleGraph,
        chunks: &[Chunk],
        resource_paths: &HashMap<&ModuleId, &str>,
        cache: &mut EmitCache,
        warnings: &mut Vec<EmitWarning>,
    ) -> SheafResult<Vec<EmittedAsset>> {
        let owner: HashMap<&ModuleId, usize> = chunks
            .iter()
            .enumerate()
            .flat_map(|(i, c)| c.modules().iter().map(move |m| (m, i)))
            .collect();

        // chunks a split point to each target must load, in chunk order; the
        // chunk holding the split point is already loaded and is left out
        let mut load_lists: HashMap<ModuleId, Vec<usize>> = HashMap::new();
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); chunks.len()];
        for (i, chunk) in chunks.iter().enumerate() {
            for id in chunk.modules() {
                let Some(record) = graph.get(id) else { continue };
                for (dep, target) in record.resolved_dependencies() {
                    if dep.kind != DependencyKind::Async {
                        continue;
                    }
                    let list = load_lists
                        .entry(target.clone())
                        .or_insert_with(|| load_list(graph, chunks, &owner, target));
                    for &j in list.iter() {
                        if j != i && !adjacency[i].contains(&j) {
                            adjacency[i].push(j);
                        }
                    }
                }
            }
        }

        let mut slots: Vec<ChunkSlot> = chunks
            .iter()
            .map(|_| ChunkSlot {
                path: None,
                asset: None,
                map: None,
            })
            .collect();
        let render_options = RenderOptions {
            module_comments: self.options.module_comments,
            public_path: &self.options.public_path,
        };
        let mut live: HashSet<String> = HashSet::new();

        for component in strongly_connected(&adjacency) {
            let cyclic = component.len() > 1 || adjacency[component[0]].contains(&component[0]);
            if !cyclic {
                let i = component[0];
                let chunk = &chunks[i];
                let (asset, map) = self.emit_acyclic_chunk(
                    graph,
                    chunk,
                    &render_options,
                    &load_lists,
                    &slots,
                    resource_paths,
                    cache,
                    warnings,
                )?;
                live.insert(chunk.name().to_string());
                slots[i].path = Some(asset.path().to_string());
                slots[i].asset = Some(asset);
                slots[i].map = map;
                continue;
            }

            let names: Vec<String> = component.iter().map(|&i| chunks[i].name().to_string()).collect();
            if self.options.require_dag {
                return Err(SheafError::ChunkCycle { chunks: names });
            }
            warnings.push(EmitWarning::ChunkCycle {
                chunks: names.clone(),
            });

            let placeholder = |i: usize| format!("\u{1}chunk:{}\u{1}", chunks[i].name());
            let members: HashSet<usize> = component.iter().copied().collect();
            let mut items = Vec::new();
            let mut rendered = Vec::new();
            for &i in &component {
                let script = render_script(
                    graph,
                    &chunks[i],
                    &render_options,
                    |target| {
                        load_lists
                            .get(target)
                            .map(|list| {
                                list.iter()
                                    .map(|&j| {
                                        if members.contains(&j) {
                                            placeholder(j)
                                        } else {
                                            slots[j].path.clone().unwrap_or_default()
                                        }
                                    })
                                    .collect()
                            })
                            .unwrap_or_default()
                    },
                    |record, marker| self.script_marker(record, marker, graph, resource_paths),
                );
                items.push(OptimizeItem {
                    name: format!("{}.js", chunks[i].name()),
                    content_type: Some(ContentType::Script),
                    bytes: script.text.as_bytes().to_vec(),
                });
                rendered.push(script);
            }
            let optimized = self.optimizers.optimize_all(items);
            let combined = ContentHash::from_parts(optimized.iter().map(|(b, _)| b.as_slice()));

            let mut paths = Vec::new();
            for &i in &component {
                let path = render_filename(
                    self.template_for(&chunks[i]),
                    NameParts {
                        name: chunks[i].name(),
                        ext: ".js",
                        hash: self.options.content_hash.then_some(&combined),
                        query: None,
                    },
                )?;
                paths.push((placeholder(i), path));
            }
            for (((&i, (bytes, warning)), (_, path)), script) in
                component.iter().zip(optimized).zip(&paths).zip(&rendered)
            {
                warnings.extend(warning.map(EmitWarning::Optimization));
                let layout_intact = bytes == script.text.as_bytes();
                let mut text = String::from_utf8_lossy(&bytes).into_owned();
                for (marker, final_path) in &paths {
                    text = text.replace(marker, final_path);
                }
                let mut bytes = text.into_bytes();
                slots[i].map = self.source_map(&chunks[i], path, &mut bytes, script, layout_intact)?;
                slots[i].path = Some(path.clone());
                slots[i].asset = Some(EmittedAsset::new(
                    format!("{}.js", chunks[i].name()),
                    path.clone(),
                    AssetKind::Script,
                    bytes,
                ));
                cache.scripts.remove(chunks[i].name());
            }
        }

        cache.scripts.retain(|name, _| live.contains(name));
        Ok(slots
            .into_iter()
            .flat_map(|s| s.asset.into_iter().chain(s.map))
            .collect())
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_acyclic_chunk(
        &self,
        graph: &ModuleGraph,
        chunk: &Chunk,
        render_options: &RenderOptions<'_>,
        load_lists: &HashMap<ModuleId, Vec<usize>>,
        slots: &[ChunkSlot],
        resource_paths: &HashMap<&ModuleId, &str>,
        cache: &mut EmitCache,
        warnings: &mut Vec<EmitWarning>,
    ) -> SheafResult<(EmittedAsset, Option<EmittedAsset>)> {
        let async_paths = |target: &ModuleId| -> Vec<String> {
            load_lists
                .get(target)
                .map(|list| {
                    list.iter()
                        .filter_map(|&j| slots[j].path.clone())
                        .collect()
                })
                .unwrap_or_default()
        };

        let fingerprint = self.fingerprint(graph, chunk, &async_paths, resource_paths);
        if let Some(cached) = cache.scripts.get(chunk.name()) {
            if cached.fingerprint == fingerprint {
                trace!(chunk = chunk.name(), "chunk unchanged, reusing render");
                return Ok((cached.asset.clone(), cached.map.clone()));
            }
        }

        let script = render_script(graph, chunk, render_options, async_paths, |record, marker| {
            self.script_marker(record, marker, graph, resource_paths)
        });
        let (mut bytes, warning) = self.optimizers.optimize(OptimizeItem {
            name: format!("{}.js", chunk.name()),
            content_type: Some(ContentType::Script),
            bytes: script.text.as_bytes().to_vec(),
        });
        warnings.extend(warning.map(EmitWarning::Optimization));

        // named before the mapping comment is appended; the comment follows from the name
        let path = self.name(self.template_for(chunk), chunk.name(), ".js", None, &bytes)?;
        let layout_intact = bytes == script.text.as_bytes();
        let map = self.source_map(chunk, &path, &mut bytes, &script, layout_intact)?;
        let asset = EmittedAsset::new(format!("{}.js", chunk.name()), path, AssetKind::Script, bytes);
        cache.scripts.insert(
            chunk.name().to_string(),
            CachedScript {
                fingerprint,
                asset: asset.clone(),
                map: map.clone(),
            },
        );
        Ok((asset, map))
    }

    /// Build the `.map` sibling of the script at `path` and point the script
    /// at it. Nothing is mapped once an optimizer has rewritten the rendered
    /// text, since its line layout no longer holds.
    fn source_map(
        &self,
        chunk: &Chunk,
        path: &str,
        bytes: &mut Vec<u8>,
        script: &RenderedScript,
        layout_intact: bool,
    ) -> SheafResult<Option<EmittedAsset>> {
        if !self.options.source_maps {
            return Ok(None);
        }
        if !layout_intact {
            debug!(chunk = chunk.name(), "script rewritten by an optimizer, not mapped");
            return Ok(None);
        }
        let file = path.rsplit_once('/').map(|(_, f)| f).unwrap_or(path);
        let map = SourceMap::for_script(file, &script.modules);
        if bytes.last().is_some_and(|&b| b != b'\n') {
            bytes.push(b'\n');
        }
        bytes.extend_from_slice(format!("//# sourceMappingURL={}.map\n", file).as_bytes());
        Ok(Some(EmittedAsset::new(
            format!("{}.js.map", chunk.name()),
            format!("{}.map", path),
            AssetKind::SourceMap,
            map.to_json()?.into_bytes(),
        )))
    }

    /// Everything a chunk's rendered script depends on.
    fn fingerprint(
        &self,
        graph: &ModuleGraph,
        chunk: &Chunk,
        async_paths: &impl Fn(&ModuleId) -> Vec<String>,
        resource_paths: &HashMap<&ModuleId, &str>,
    ) -> ContentHash {
        let mut parts: Vec<Vec<u8>> = vec![
            chunk.name().as_bytes().to_vec(),
            format!("{:?}", chunk.kind()).into_bytes(),
            chunk
                .root()
                .map(|r| graph.display_name(r))
                .unwrap_or_default()
                .into_bytes(),
        ];
        for id in chunk.modules() {
            let Some(record) = graph.get(id) else { continue };
            parts.push(graph.display_name(id).into_bytes());
            parts.push(record.output_hash().as_str().as_bytes().to_vec());
            if let Some(path) = resource_paths.get(id) {
                parts.push(path.as_bytes().to_vec());
            }
            for (dep, target) in record.resolved_dependencies() {
                parts.push(graph.display_name(target).into_bytes());
                if dep.kind == DependencyKind::Async {
                    parts.push(async_paths(target).join(",").into_bytes());
                }
                if let Some(path) = resource_paths.get(target) {
                    parts.push(path.as_bytes().to_vec());
                }
            }
        }
        ContentHash::from_parts(parts.iter().map(Vec::as_slice))
    }

    fn emit_stylesheets(
        &self,
        graph: &ModuleGraph,
        chunks: &[Chunk],
        resource_paths: &HashMap<&ModuleId, &str>,
        warnings: &mut Vec<EmitWarning>,
    ) -> SheafResult<Vec<EmittedAsset>> {
        let mut pending = Vec::new();
        let mut items = Vec::new();
        for chunk in chunks {
            // chunk order is dependencies first, so `@import`ed sheets precede their importer
            let records: Vec<&ModuleRecord> =
                chunk.modules().iter().filter_map(|id| graph.get(id)).collect();

            // directory only; [hash] never appears in it
            let sample_name = render_filename(
                &self.options.css_filename,
                NameParts {
                    name: chunk.name(),
                    ext: ".css",
                    ..NameParts::default()
                },
            )?;
            let css_dir = sample_name.rsplit_once('/').map(|(d, _)| d).unwrap_or("");

            let mut parts: Vec<String> = Vec::new();
            for record in records {
                for artifact in record.side_artifacts() {
                    if let SideArtifact::Stylesheet { text } = artifact {
                        parts.push(substitute_markers(text, |marker| {
                            self.style_marker(record, marker, graph, resource_paths, css_dir)
                        }));
                    }
                }
            }
            if parts.is_empty() {
                continue;
            }
            let mut text = parts.join("\n");
            if !text.ends_with('\n') {
                text.push('\n');
            }
            pending.push(chunk);
            items.push(OptimizeItem {
                name: format!("{}.css", chunk.name()),
                content_type: Some(ContentType::Stylesheet),
                bytes: text.into_bytes(),
            });
        }

        let optimized = self.optimizers.optimize_all(items);
        let mut out = Vec::with_capacity(pending.len());
        for (chunk, (bytes, warning)) in pending.into_iter().zip(optimized) {
            warnings.extend(warning.map(EmitWarning::Optimization));
            let path = self.name(&self.options.css_filename, chunk.name(), ".css", None, &bytes)?;
            out.push(EmittedAsset::new(
                format!("{}.css", chunk.name()),
                path,
                AssetKind::Stylesheet,
                bytes,
            ));
        }
        Ok(out)
    }

    fn compress(&self, assets: &[EmittedAsset], warnings: &mut Vec<EmitWarning>) -> Vec<(String, Vec<u8>)> {
        use rayon::prelude::*;

        let Some(compressor) = self.optimizers.compressor() else {
            return Vec::new();
        };
        let results: Vec<(String, Result<Vec<u8>, String>)> = assets
            .par_iter()
            .filter(|a| matches!(a.kind(), AssetKind::Script | AssetKind::Stylesheet))
            .map(|a| (a.path().to_string(), compressor.compress(a.bytes())))
            .collect();

        let mut out = Vec::new();
        for (path, result) in results {
            match result {
                Ok(bytes) => out.push((format!("{}{}", path, compressor.suffix()), bytes)),
                Err(message) => warnings.push(EmitWarning::Optimization(OptimizationWarning {
                    asset: path,
                    optimizer: "compress".to_string(),
                    message,
                })),
            }
        }
        out
    }

    fn template_for(&self, chunk: &Chunk) -> &str {
        match chunk.kind() {
            ChunkKind::Entry => &self.options.filename,
            ChunkKind::Shared | ChunkKind::Async => &self.options.chunk_filename,
        }
    }

    fn name(
        &self,
        template: &str,
        name: &str,
        ext: &str,
        query: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, EmissionError> {
        let hash = self.options.content_hash.then(|| ContentHash::from_bytes(bytes));
        render_filename(
            template,
            NameParts {
                name,
                ext,
                hash: hash.as_ref(),
                query,
            },
        )
    }

    /// URLs in scripts are absolute (public path + output path).
    fn script_marker(
        &self,
        record: &ModuleRecord,
        marker: Marker<'_>,
        graph: &ModuleGraph,
        resource_paths: &HashMap<&ModuleId, &str>,
    ) -> String {
        let target = match marker {
            Marker::SelfUrl => Some(record),
            Marker::Reference(spec) => record.resolve_specifier(spec).and_then(|id| graph.get(id)),
        };
        match target {
            Some(t) => match (t.inline_url(), resource_paths.get(t.id())) {
                (Some(url), _) => url.to_string(),
                (None, Some(path)) => format!("{}{}", self.options.public_path, path),
                (None, None) => String::new(),
            },
            None => match marker {
                Marker::Reference(spec) => spec.to_string(),
                Marker::SelfUrl => String::new(),
            },
        }
    }

    /// URLs in stylesheets are relative to the stylesheet itself.
    fn style_marker(
        &self,
        record: &ModuleRecord,
        marker: Marker<'_>,
        graph: &ModuleGraph,
        resource_paths: &HashMap<&ModuleId, &str>,
        css_dir: &str,
    ) -> String {
        let target = match marker {
            Marker::SelfUrl => Some(record),
            Marker::Reference(spec) => record.resolve_specifier(spec).and_then(|id| graph.get(id)),
        };
        let fallback = match marker {
            Marker::Reference(spec) => spec.to_string(),
            Marker::SelfUrl => String::new(),
        };
        match target {
            Some(t) => match (t.inline_url(), resource_paths.get(t.id())) {
                (Some(url), _) => url.to_string(),
                (None, Some(path)) => relative_url(css_dir, path),
                (None, None) => fallback,
            },
            None => fallback,
        }
    }
}

/// Async and shared chunks holding any module statically reachable from
/// `target`. Entry chunks are never loaded by a split point.
fn load_list(
    graph: &ModuleGraph,
    chunks: &[Chunk],
    owner: &HashMap<&ModuleId, usize>,
    target: &ModuleId,
) -> Vec<usize> {
    let mut seen: HashSet<&ModuleId> = HashSet::new();
    let mut stack = vec![target];
    let mut list: Vec<usize> = Vec::new();
    while let Some(id) = stack.pop() {
        let Some(record) = graph.get(id) else { continue };
        if !seen.insert(record.id()) {
            continue;
        }
        if let Some(&i) = owner.get(record.id()) {
            if chunks[i].kind() != ChunkKind::Entry && !list.contains(&i) {
                list.push(i);
            }
        }
        for (dep, to) in record.resolved_dependencies() {
            if dep.kind == DependencyKind::Static {
                stack.push(to);
            }
        }
    }
    list.sort_unstable();
    list
}

fn check_collisions(assets: &[EmittedAsset]) -> Result<(), EmissionError> {
    let mut claimed: HashMap<&str, &str> = HashMap::new();
    for asset in assets {
        if let Some(first) = claimed.insert(asset.path(), asset.logical_name()) {
            return Err(EmissionError::Collision {
                path: asset.path().to_string(),
                first: first.to_string(),
                second: asset.logical_name().to_string(),
            });
        }
    }
    Ok(())
}

/// Relative URL from directory `from_dir` to `to`, both output-root relative.
pub fn relative_url(from_dir: &str, to: &str) -> String {
    let from: Vec<&str> = from_dir.split('/').filter(|s| !s.is_empty()).collect();
    let to_parts: Vec<&str> = to.split('/').collect();
    let common = from
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count()
        .min(to_parts.len().saturating_sub(1));
    let mut out: Vec<&str> = vec![".."; from.len() - common];
    out.extend(&to_parts[common..]);
    out.join("/")
}
