//! Output file naming
//!
//! Templates use `[name]`, `[ext]`, `[hash]` and `[query]` slots. Without a
//! hash the `[hash]` slot disappears together with one adjacent `.` or `-`,
//! so `js/[name].[hash].js` becomes `js/[name].js`.

use crate::domain::value_objects::ContentHash;
use crate::error::EmissionError;

/// Values substituted into a filename template.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameParts<'a> {
    pub name: &'a str,
    /// Extension with leading dot
    pub ext: &'a str,
    pub hash: Option<&'a ContentHash>,
    /// Query without the leading `?`
    pub query: Option<&'a str>,
}

/// Render `template` into a relative output path.
pub fn render_filename(template: &str, parts: NameParts<'_>) -> Result<String, EmissionError> {
    let collapsed;
    let template = match parts.hash {
        Some(_) => template,
        None => {
            collapsed = collapse_hash(template);
            collapsed.as_str()
        }
    };

    let hash = parts.hash.map(ContentHash::short).unwrap_or_default();
    let query = parts.query.map(|q| format!("?{}", q)).unwrap_or_default();
    let path = template
        .replace("[name]", parts.name)
        .replace("[ext]", parts.ext)
        .replace("[hash]", hash)
        .replace("[query]", &query);

    validate(template, &path)?;
    Ok(path)
}

/// Remove every `[hash]` slot and one adjacent separator, preferring the
/// one before it.
fn collapse_hash(template: &str) -> String {
    const SLOT: &str = "[hash]";
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find(SLOT) {
        let before = &rest[..pos];
        let after = &rest[pos + SLOT.len()..];
        if before.ends_with(['.', '-']) {
            out.push_str(&before[..before.len() - 1]);
            rest = after;
        } else {
            out.push_str(before);
            rest = after.strip_prefix(['.', '-']).unwrap_or(after);
        }
    }
    out.push_str(rest);
    out
}

fn validate(template: &str, path: &str) -> Result<(), EmissionError> {
    let invalid = path.is_empty()
        || path.starts_with('/')
        || path.ends_with('/')
        || path.split('/').any(|seg| seg.is_empty() || seg == "..")
        || path.contains('\\');
    if invalid {
        return Err(EmissionError::InvalidTemplate {
            template: template.to_string(),
            path: path.to_string(),
        });
    }
    Ok(())
}
