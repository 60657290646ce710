//! `asset` unit: binary resources
//!
//! Small files become `data:` URIs, everything else is emitted as a separate
//! resource whose final URL is filled in by the emitter.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::domain::entities::{ModuleContent, SideArtifact};
use crate::domain::ports::transform::{self_url_marker, AssetMode};
use crate::domain::ports::{TransformContext, TransformUnit, UnitOutput, UnitResult};
use crate::domain::value_objects::ModuleType;

/// Whether an asset of `len` bytes is inlined.
///
/// In [`AssetMode::Auto`] a file is inlined when it is strictly smaller than
/// `limit`; a limit of 0 never inlines.
pub fn inline_decision(mode: AssetMode, len: usize, limit: usize) -> bool {
    match mode {
        AssetMode::Inline => true,
        AssetMode::Resource => false,
        AssetMode::Auto => len < limit,
    }
}

/// MIME type by extension (with leading dot).
pub fn mime_type(ext: &str) -> &'static str {
    match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "eot" => "application/vnd.ms-fontobject",
        "json" => "application/json",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

pub fn data_uri(ext: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type(ext), STANDARD.encode(bytes))
}

pub struct AssetUnit;

impl AssetUnit {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AssetUnit {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformUnit for AssetUnit {
    fn name(&self) -> &str {
        "asset"
    }

    fn accepts(&self, module_type: ModuleType) -> bool {
        matches!(
            module_type,
            ModuleType::Image | ModuleType::Font | ModuleType::Raw
        )
    }

    fn run(&self, input: ModuleContent, ctx: &TransformContext<'_>) -> UnitResult {
        let bytes = match input {
            ModuleContent::Binary(b) => b,
            ModuleContent::Text(t) => t.into_bytes(),
        };

        if inline_decision(ctx.asset_mode, bytes.len(), ctx.inline_limit) {
            let url = data_uri(&ctx.module.extension(), &bytes);
            let body = format!("module.exports = {};", serde_json::to_string(&url)?);
            let mut output = UnitOutput::text(body);
            output.inline_url = Some(url);
            return Ok(output);
        }

        let file_name = ctx
            .module
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| ctx.module.stem());
        let body = format!("module.exports = \"{}\";", self_url_marker());
        Ok(UnitOutput::text(body).with_artifact(SideArtifact::Resource {
            file_name,
            bytes,
            filename: ctx.asset_filename.map(str::to_string),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Mode, ModuleId};
    use std::collections::BTreeMap;
    use std::path::Path;

    fn run(mode: AssetMode, limit: usize, bytes: &[u8]) -> UnitOutput {
        let id = ModuleId::new("/p/src/img/logo.png");
        let define = BTreeMap::new();
        let ctx = TransformContext {
            module: &id,
            module_type: ModuleType::Image,
            root: Path::new("/p"),
            mode: Mode::Development,
            asset_mode: mode,
            asset_filename: Some("img/[name][ext]"),
            inline_limit: limit,
            define: &define,
        };
        AssetUnit::new()
            .run(ModuleContent::Binary(bytes.to_vec()), &ctx)
            .unwrap()
    }

    #[test]
    fn inline_threshold_is_strict() {
        assert!(inline_decision(AssetMode::Auto, 99, 100));
        assert!(!inline_decision(AssetMode::Auto, 100, 100));
        assert!(!inline_decision(AssetMode::Auto, 0, 0));
        assert!(inline_decision(AssetMode::Inline, 1 << 20, 0));
        assert!(!inline_decision(AssetMode::Resource, 1, 100));
    }

    #[test]
    fn small_asset_is_inlined() {
        let out = run(AssetMode::Auto, 100, b"png");
        assert_eq!(out.inline_url.as_deref(), Some("data:image/png;base64,cG5n"));
        assert!(out.side_artifacts.is_empty());
        assert_eq!(
            out.content,
            ModuleContent::Text("module.exports = \"data:image/png;base64,cG5n\";".to_string())
        );
    }

    #[test]
    fn large_asset_becomes_resource_with_self_marker() {
        let out = run(AssetMode::Auto, 2, b"png");
        assert_eq!(out.inline_url, None);
        assert_eq!(
            out.side_artifacts,
            vec![SideArtifact::Resource {
                file_name: "logo.png".to_string(),
                bytes: b"png".to_vec(),
                filename: Some("img/[name][ext]".to_string()),
            }]
        );
        assert_eq!(
            out.content.as_text(),
            Some(format!("module.exports = \"{}\";", self_url_marker()).as_str())
        );
    }

    #[test]
    fn unknown_extension_falls_back_to_octet_stream() {
        assert_eq!(mime_type(".bin"), "application/octet-stream");
        assert_eq!(mime_type("SVG"), "image/svg+xml");
    }
}
