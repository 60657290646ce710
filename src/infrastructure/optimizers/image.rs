//! Lossless image optimizer
//!
//! PNG: drops metadata chunks (text, timestamps) that browsers ignore; the
//! remaining chunks are copied byte for byte, CRCs included.
//! SVG: drops XML comments and whitespace between tags.
//! Other formats pass through unchanged.

use regex::Regex;

use crate::domain::ports::{ContentType, Optimizer};
use crate::error::SheafResult;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const PNG_METADATA: [&[u8; 4]; 4] = [b"tEXt", b"zTXt", b"iTXt", b"tIME"];

pub struct ImageOptimizer {
    svg_comment: Regex,
    svg_gap: Regex,
}

impl ImageOptimizer {
    pub fn new() -> SheafResult<Self> {
        Ok(Self {
            svg_comment: Regex::new(r"(?s)<!--.*?-->")?,
            svg_gap: Regex::new(r">\s+<")?,
        })
    }

    fn optimize_svg(&self, text: &str) -> String {
        let text = self.svg_comment.replace_all(text, "");
        self.svg_gap.replace_all(&text, "><").trim().to_string()
    }
}

fn is_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(256)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start();
    head.starts_with("<svg") || head.starts_with("<?xml") || head.starts_with("<!--")
}

fn strip_png(bytes: &[u8]) -> Result<Vec<u8>, String> {
    let mut out = Vec::with_capacity(bytes.len());
    out.extend_from_slice(PNG_SIGNATURE);
    let mut pos = PNG_SIGNATURE.len();
    while pos < bytes.len() {
        if pos + 8 > bytes.len() {
            return Err("truncated PNG chunk header".to_string());
        }
        let len = u32::from_be_bytes([bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]])
            as usize;
        let kind = &bytes[pos + 4..pos + 8];
        let end = pos
            .checked_add(12)
            .and_then(|n| n.checked_add(len))
            .filter(|&end| end <= bytes.len())
            .ok_or("truncated PNG chunk")?;
        if !PNG_METADATA.iter().any(|m| m.as_slice() == kind) {
            out.extend_from_slice(&bytes[pos..end]);
        }
        pos = end;
        if kind == b"IEND" {
            break;
        }
    }
    Ok(out)
}

impl Optimizer for ImageOptimizer {
    fn name(&self) -> &str {
        "image-lossless"
    }

    fn content_type(&self) -> ContentType {
        ContentType::Image
    }

    fn optimize(&self, bytes: &[u8]) -> Result<Vec<u8>, String> {
        if bytes.starts_with(PNG_SIGNATURE) {
            return strip_png(bytes);
        }
        if is_svg(bytes) {
            let text = std::str::from_utf8(bytes).map_err(|e| e.to_string())?;
            return Ok(self.optimize_svg(text).into_bytes());
        }
        Ok(bytes.to_vec())
    }
}
