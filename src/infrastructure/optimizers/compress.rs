//! Gzip sibling files for text assets

use std::io::Write;

use flate2::write::GzEncoder;
use flate2::{Compression, GzBuilder};

use crate::domain::ports::Compressor;

/// Gzip with a zeroed header timestamp and no file name, so identical input
/// always produces identical bytes.
pub struct GzipCompressor {
    level: Compression,
}

impl GzipCompressor {
    pub fn new() -> Self {
        Self {
            level: Compression::best(),
        }
    }
}

impl Default for GzipCompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compressor for GzipCompressor {
    fn suffix(&self) -> &str {
        ".gz"
    }

    fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, String> {
        let mut encoder: GzEncoder<Vec<u8>> = GzBuilder::new()
            .mtime(0)
            .write(Vec::with_capacity(bytes.len() / 2), self.level);
        encoder.write_all(bytes).map_err(|e| e.to_string())?;
        encoder.finish().map_err(|e| e.to_string())
    }
}
