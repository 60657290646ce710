//! NDJSON output for `--json`.
//!
//! Every line is one object with an `event` name and the `command` that
//! produced it. Watch events serialize themselves (`WatchEvent::to_json`).

use std::io::{self, Write};

use serde::Serialize;

/// Write a typed event as one NDJSON line.
pub fn write_typed_event<T: Serialize, W: Write>(out: &mut W, event: &T) -> io::Result<()> {
    let json =
        serde_json::to_string(event).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    out.write_all(json.as_bytes())?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Emit a typed event to stdout.
pub fn emit_event<T: Serialize>(event: &T) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write_typed_event(&mut out, event)?;
    out.flush()
}

/// Event emitted when a command starts.
#[derive(Debug, Clone, Serialize)]
pub struct StartEvent<'a> {
    pub event: &'static str,
    pub command: &'a str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'a str>,
}

impl<'a> StartEvent<'a> {
    pub fn build(mode: &'a str) -> Self {
        Self {
            event: "build_started",
            command: "build",
            version: env!("CARGO_PKG_VERSION"),
            mode: Some(mode),
        }
    }
}

/// Wrapper that adds `event` and `command` to a serializable payload.
#[derive(Debug, Clone, Serialize)]
pub struct DataEvent<'a, T: Serialize> {
    pub event: &'static str,
    pub command: &'a str,
    #[serde(flatten)]
    pub data: T,
}

impl<'a, T: Serialize> DataEvent<'a, T> {
    pub fn new(event: &'static str, command: &'a str, data: T) -> Self {
        Self {
            event,
            command,
            data,
        }
    }
}

/// Event emitted when a build fails with a batch of errors.
#[derive(Debug, Clone, Serialize)]
pub struct FailedEvent<'a> {
    pub event: &'static str,
    pub command: &'a str,
    pub errors: Vec<String>,
}

impl<'a> FailedEvent<'a> {
    pub fn new(command: &'a str, errors: Vec<String>) -> Self {
        Self {
            event: "build_failed",
            command,
            errors,
        }
    }
}

/// Event emitted for an error outside a build pass (config, lock, I/O).
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEvent<'a> {
    pub event: &'static str,
    pub command: &'a str,
    pub message: String,
}

impl<'a> ErrorEvent<'a> {
    pub fn new(command: &'a str, message: impl Into<String>) -> Self {
        Self {
            event: "error",
            command,
            message: message.into(),
        }
    }
}

/// Non-fatal config problem, such as an unknown key.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigWarningEvent<'a> {
    pub event: &'static str,
    pub command: &'a str,
    pub key: String,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl<'a> ConfigWarningEvent<'a> {
    pub fn new(command: &'a str, warning: &sheaf::config::ConfigWarning) -> Self {
        Self {
            event: "config_warning",
            command,
            key: warning.key.clone(),
            file: warning.file.display().to_string(),
            line: warning.line,
            suggestion: warning.suggestion.clone(),
        }
    }
}
