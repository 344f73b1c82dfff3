// Structured diagnostics
//
// Non-fatal findings (unknown table shapes, skipped rows, permissive config
// outcomes) and classified failures are described by a `Diagnostic` value
// instead of being printed. `emit()` turns one into a tracing event; the
// presentation layer decides whether and how to show it.

use std::fmt;

use serde::Serialize;
use strum::{Display, EnumString, IntoStaticStr};

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Stable machine-readable classification of a diagnostic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DiagnosticCode {
    /// Connect, DNS, TLS or timeout failure.
    NetworkError,
    /// Non-200 HTTP status.
    HttpError,
    /// Reply body could not be decoded.
    DecodeError,
    /// Well-formed reply carrying a non-success command code.
    DeviceError,
    /// Reply decoded, but no known table layout was found.
    ShapeError,
    /// A single table row could not be resolved and was skipped.
    MalformedRow,
    /// Config batch accepted over HTTP without a verifiable per-command result.
    UnverifiedOutcome,
    /// Request refused locally before anything was sent.
    InvalidRequest,
}

/// A single structured diagnostic: severity, code, message and key/value context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    pub context: Vec<(String, String)>,
}

impl Diagnostic {
    pub fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            context: Vec::new(),
        }
    }

    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Attach a context entry.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.push((key.into(), value.to_string()));
        self
    }

    /// Look up a context value by key.
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Write this diagnostic as a tracing event at the matching level.
    pub fn emit(&self) {
        let code: &'static str = self.code.into();
        let context = ContextFields(&self.context);
        match self.severity {
            Severity::Info => tracing::info!(code, %context, "{}", self.message),
            Severity::Warning => tracing::warn!(code, %context, "{}", self.message),
            Severity::Error => tracing::error!(code, %context, "{}", self.message),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if !self.context.is_empty() {
            write!(f, " ({})", ContextFields(&self.context))?;
        }
        Ok(())
    }
}

struct ContextFields<'a>(&'a [(String, String)]);

impl fmt::Display for ContextFields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}={v}")?;
        }
        Ok(())
    }
}
