//! Optimizer port - content-type specific post-processing of output bytes

use serde::Serialize;

/// Output content types an optimizer can claim. At most one optimizer per
/// type is registered for a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Script,
    Stylesheet,
    Image,
}

impl ContentType {
    /// Content type of an output path, by extension
    pub fn of_path(path: &str) -> Option<Self> {
        let ext = path.rsplit('.').next()?.to_ascii_lowercase();
        match ext.as_str() {
            "js" | "mjs" => Some(ContentType::Script),
            "css" => Some(ContentType::Stylesheet),
            "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" => Some(ContentType::Image),
            _ => None,
        }
    }
}

/// An optimizer rewrites bytes of one content type.
///
/// Implementations must be idempotent: `optimize(optimize(x)) == optimize(x)`.
/// A returned error keeps the original bytes and is reported as a warning.
pub trait Optimizer: Send + Sync {
    fn name(&self) -> &str;

    fn content_type(&self) -> ContentType;

    fn optimize(&self, bytes: &[u8]) -> Result<Vec<u8>, String>;
}

/// Produces a compressed sibling (`app.js` -> `app.js.gz`) of text assets.
///
/// Output must be deterministic for identical input.
pub trait Compressor: Send + Sync {
    /// Suffix appended to the asset path, with leading dot
    fn suffix(&self) -> &str;

    fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, String>;
}
