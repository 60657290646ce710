//! Module type tag

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Coarse content type of a module; selects the default transform chain and
/// which units accept it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    Script,
    Template,
    Style,
    Image,
    Font,
    Raw,
}

impl ModuleType {
    /// Infer the type from a file extension.
    pub fn infer(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "js" | "mjs" | "cjs" | "jsx" | "ts" | "tsx" => ModuleType::Script,
            "vue" | "svelte" => ModuleType::Template,
            "css" | "less" | "scss" | "sass" => ModuleType::Style,
            "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" | "avif" | "ico" => ModuleType::Image,
            "woff" | "woff2" | "eot" | "ttf" | "otf" => ModuleType::Font,
            _ => ModuleType::Raw,
        }
    }

    /// Binary types are read as bytes; everything else must be UTF-8.
    pub fn is_binary(&self) -> bool {
        matches!(self, ModuleType::Image | ModuleType::Font)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleType::Script => "script",
            ModuleType::Template => "template",
            ModuleType::Style => "style",
            ModuleType::Image => "image",
            ModuleType::Font => "font",
            ModuleType::Raw => "raw",
        }
    }
}

impl std::fmt::Display for ModuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
