//! Line-level source maps for chunk scripts
//!
//! Each body line of a module maps to the same line of that module, column
//! zero. Transform units rewrite line by line, so this is accurate to the
//! line for scripts and good enough to land a debugger in the right file for
//! everything else.

use serde::Serialize;

use crate::domain::services::render::ModuleLines;

/// Prefix devtools show in front of every source name.
pub const SOURCE_ROOT: &str = "sheaf:///";

/// A version 3 source map document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    pub version: u8,
    pub file: String,
    pub source_root: String,
    pub sources: Vec<String>,
    pub names: Vec<String>,
    pub mappings: String,
}

impl SourceMap {
    /// Map the module bodies of a script written to `file`.
    pub fn for_script(file: &str, modules: &[ModuleLines]) -> Self {
        let mut sources = Vec::new();
        let mut mappings = String::new();
        let mut line = 0usize;
        let mut previous_source = 0i64;
        let mut previous_line = 0i64;

        for module in modules.iter().filter(|m| m.line_count > 0) {
            let source = sources.len() as i64;
            sources.push(module.name.clone());
            for offset in 0..module.line_count {
                while line < module.first_line + offset {
                    mappings.push(';');
                    line += 1;
                }
                // generated column, source, source line, source column
                encode_vlq(&mut mappings, 0);
                encode_vlq(&mut mappings, source - previous_source);
                encode_vlq(&mut mappings, offset as i64 - previous_line);
                encode_vlq(&mut mappings, 0);
                previous_source = source;
                previous_line = offset as i64;
            }
        }

        Self {
            version: 3,
            file: file.to_string(),
            source_root: SOURCE_ROOT.to_string(),
            sources,
            names: Vec::new(),
            mappings,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Base64 VLQ: sign in the lowest bit, five data bits per digit, bit six
/// set on every digit but the last.
fn encode_vlq(out: &mut String, value: i64) {
    let digits = base64::alphabet::STANDARD.as_str().as_bytes();
    let mut rest = if value < 0 {
        ((-value) << 1) | 1
    } else {
        value << 1
    } as u64;
    loop {
        let mut digit = (rest & 0b1_1111) as usize;
        rest >>= 5;
        if rest > 0 {
            digit |= 0b10_0000;
        }
        out.push(digits[digit] as char);
        if rest == 0 {
            break;
        }
    }
}
