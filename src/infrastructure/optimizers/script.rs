//! Whitespace and comment minifier for scripts
//!
//! Strips comments and collapses whitespace runs outside string, template and
//! regex literals. A run that contained a line break collapses to `\n` so
//! automatic semicolon insertion still sees the same statements.

use crate::domain::ports::{ContentType, Optimizer};

pub struct ScriptMinifier;

impl ScriptMinifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ScriptMinifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer for ScriptMinifier {
    fn name(&self) -> &str {
        "script-minify"
    }

    fn content_type(&self) -> ContentType {
        ContentType::Script
    }

    fn optimize(&self, bytes: &[u8]) -> Result<Vec<u8>, String> {
        let source = std::str::from_utf8(bytes).map_err(|e| e.to_string())?;
        minify(source).map(String::into_bytes)
    }
}

/// Whitespace pending between two tokens
#[derive(Clone, Copy, PartialEq, Eq)]
enum Gap {
    None,
    Space,
    Newline,
}

pub fn minify(source: &str) -> Result<String, String> {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut gap = Gap::None;
    let mut i = 0;

    let flush = |out: &mut String, gap: &mut Gap| {
        if !out.is_empty() {
            match *gap {
                Gap::Newline => out.push('\n'),
                Gap::Space => out.push(' '),
                Gap::None => {}
            }
        }
        *gap = Gap::None;
    };

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match c {
            c if c.is_whitespace() => {
                gap = if c == '\n' || c == '\r' || gap == Gap::Newline {
                    Gap::Newline
                } else {
                    Gap::Space
                };
                i += 1;
            }
            '/' if next == Some('/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if next == Some('*') => {
                let start = i;
                i += 2;
                while i + 1 < chars.len() && !(chars[i] == '*' && chars[i + 1] == '/') {
                    i += 1;
                }
                if i + 1 >= chars.len() {
                    return Err("unterminated block comment".to_string());
                }
                let had_newline = chars[start..i].contains(&'\n');
                i += 2;
                if had_newline {
                    gap = Gap::Newline;
                } else if gap == Gap::None {
                    gap = Gap::Space;
                }
            }
            '"' | '\'' | '`' => {
                flush(&mut out, &mut gap);
                i = copy_quoted(&chars, i, c, &mut out)?;
            }
            '/' if regex_allowed(&out) => {
                flush(&mut out, &mut gap);
                i = copy_regex(&chars, i, &mut out)?;
            }
            c => {
                flush(&mut out, &mut gap);
                out.push(c);
                i += 1;
            }
        }
    }
    Ok(out)
}

/// Copy a quoted literal starting at `start`; returns the index after it.
fn copy_quoted(chars: &[char], start: usize, quote: char, out: &mut String) -> Result<usize, String> {
    out.push(quote);
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i];
        out.push(c);
        i += 1;
        if c == '\\' {
            if let Some(&escaped) = chars.get(i) {
                out.push(escaped);
                i += 1;
            }
        } else if c == quote {
            return Ok(i);
        } else if c == '\n' && quote != '`' {
            return Err("unterminated string literal".to_string());
        }
    }
    Err("unterminated string literal".to_string())
}

fn copy_regex(chars: &[char], start: usize, out: &mut String) -> Result<usize, String> {
    out.push('/');
    let mut i = start + 1;
    let mut in_class = false;
    while i < chars.len() {
        let c = chars[i];
        out.push(c);
        i += 1;
        match c {
            '\\' => {
                if let Some(&escaped) = chars.get(i) {
                    out.push(escaped);
                    i += 1;
                }
            }
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => return Ok(i),
            '\n' => return Err("unterminated regex literal".to_string()),
            _ => {}
        }
    }
    Err("unterminated regex literal".to_string())
}

/// A `/` starts a regex literal after an operator or at the start of input.
fn regex_allowed(out: &str) -> bool {
    let trimmed = out.trim_end();
    match trimmed.chars().last() {
        None => true,
        Some(c) if "(,=:[!&|?{};+-*%<>~^".contains(c) => true,
        Some(_) => trimmed.ends_with("return") || trimmed.ends_with("typeof"),
    }
}
