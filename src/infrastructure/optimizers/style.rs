//! Stylesheet minifier

use crate::domain::ports::{ContentType, Optimizer};

/// Removes comments, collapses whitespace and drops it around `{`, `}`, `;`,
/// `,` and `>`, plus the last `;` of each block. Strings are copied verbatim.
pub struct StyleMinifier;

impl StyleMinifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StyleMinifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer for StyleMinifier {
    fn name(&self) -> &str {
        "style-minify"
    }

    fn content_type(&self) -> ContentType {
        ContentType::Stylesheet
    }

    fn optimize(&self, bytes: &[u8]) -> Result<Vec<u8>, String> {
        let source = std::str::from_utf8(bytes).map_err(|e| e.to_string())?;
        minify(source).map(String::into_bytes)
    }
}

const TIGHT: &str = "{};,>";

pub fn minify(source: &str) -> Result<String, String> {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut space = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            space = true;
            i += 1;
            continue;
        }
        if c == '/' && chars.get(i + 1) == Some(&'*') {
            let end = (i + 2..chars.len().saturating_sub(1))
                .find(|&j| chars[j] == '*' && chars[j + 1] == '/')
                .ok_or("unterminated comment")?;
            i = end + 2;
            space = true;
            continue;
        }

        let last = out.chars().last();
        if space && !TIGHT.contains(c) && last.is_some_and(|l| !TIGHT.contains(l)) {
            out.push(' ');
        }
        space = false;

        if c == '}' && out.ends_with(';') {
            out.pop();
        }

        if c == '"' || c == '\'' {
            out.push(c);
            i += 1;
            loop {
                let Some(&s) = chars.get(i) else {
                    return Err("unterminated string".to_string());
                };
                out.push(s);
                i += 1;
                if s == '\\' {
                    if let Some(&escaped) = chars.get(i) {
                        out.push(escaped);
                        i += 1;
                    }
                } else if s == c {
                    break;
                }
            }
            continue;
        }

        out.push(c);
        i += 1;
    }
    Ok(out)
}
