//! Ignored `sheaf.toml` keys

use std::fmt;
use std::path::PathBuf;

/// A key the config loader skipped. The build goes ahead without it; the
/// CLI lists these before the build output so typos do not pass silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// Last segment of the ignored path: `minfy` for `modes.production.minfy`
    pub key: String,
    pub file: PathBuf,
    /// 1-based line of the key's first occurrence
    pub line: Option<usize>,
    /// Nearest known key, when one is close enough to be a typo
    pub suggestion: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown config key '{}' at {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}
