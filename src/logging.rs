//! Diagnostic sink for merge progress, skips and isolated failures.
//!
//! The engine never logs through a global handle; it reports to a
//! [`DiagnosticSink`] handed to it by the caller. [`Logger`] is the default
//! sink: it forwards every notice to `tracing` and can additionally capture
//! notices in memory so callers can inspect what happened during a merge.

use serde::Serialize;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU8, Ordering},
};
use tracing::Level;

/// Severity of a diagnostic notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Debug = 0,
    Info = 1,
    Warning = 2,
    Error = 3,
}

/// Convert a diagnostic level to the tracing level it is emitted at.
pub fn diagnostic_level_to_tracing(level: DiagnosticLevel) -> Level {
    match level {
        DiagnosticLevel::Debug => Level::DEBUG,
        DiagnosticLevel::Info => Level::INFO,
        DiagnosticLevel::Warning => Level::WARN,
        DiagnosticLevel::Error => Level::ERROR,
    }
}

/// A captured notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
}

/// Receiver of human-readable progress, skip and error notices.
///
/// Purely observational: implementations must not influence control flow.
pub trait DiagnosticSink {
    fn report(&self, level: DiagnosticLevel, message: &str);

    fn debug(&self, msg: &str) {
        self.report(DiagnosticLevel::Debug, msg);
    }

    fn info(&self, msg: &str) {
        self.report(DiagnosticLevel::Info, msg);
    }

    fn warning(&self, msg: &str) {
        self.report(DiagnosticLevel::Warning, msg);
    }

    fn error(&self, msg: &str) {
        self.report(DiagnosticLevel::Error, msg);
    }
}

/// Atomic minimum-level filter.
pub struct LogLevelFilter(AtomicU8);

impl LogLevelFilter {
    pub fn new(level: DiagnosticLevel) -> Self {
        Self(AtomicU8::new(level as u8))
    }

    pub fn should_log(&self, level: DiagnosticLevel) -> bool {
        level as u8 >= self.0.load(Ordering::Relaxed)
    }
}

impl Default for LogLevelFilter {
    fn default() -> Self {
        Self::new(DiagnosticLevel::Debug)
    }
}

/// Tracing-backed diagnostic sink with optional in-memory capture.
#[derive(Clone)]
pub struct Logger {
    level_filter: Arc<LogLevelFilter>,
    /// Logger name, emitted as the `logger` field (typically the hook name).
    name: Option<String>,
    captured: Option<Arc<Mutex<Vec<Diagnostic>>>>,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            level_filter: Arc::new(LogLevelFilter::default()),
            name: None,
            captured: None,
        }
    }

    pub fn with_level_filter(mut self, filter: Arc<LogLevelFilter>) -> Self {
        self.level_filter = filter;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Keep a copy of every notice that passes the level filter.
    pub fn capturing(mut self) -> Self {
        self.captured = Some(Arc::new(Mutex::new(Vec::new())));
        self
    }

    /// Notices captured so far (empty unless built with [`Logger::capturing`]).
    pub fn captured(&self) -> Vec<Diagnostic> {
        match self.captured {
            Some(ref buf) => match buf.lock() {
                Ok(buf) => buf.clone(),
                Err(poisoned) => poisoned.into_inner().clone(),
            },
            None => Vec::new(),
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink for Logger {
    fn report(&self, level: DiagnosticLevel, message: &str) {
        if !self.level_filter.should_log(level) {
            return;
        }

        let name = self.name.as_deref().unwrap_or("hook-config-merge");
        match diagnostic_level_to_tracing(level) {
            Level::ERROR => tracing::error!(logger = %name, "{}", message),
            Level::WARN => tracing::warn!(logger = %name, "{}", message),
            Level::INFO => tracing::info!(logger = %name, "{}", message),
            Level::DEBUG => tracing::debug!(logger = %name, "{}", message),
            Level::TRACE => tracing::trace!(logger = %name, "{}", message),
        }

        if let Some(ref buf) = self.captured {
            let diagnostic = Diagnostic {
                level,
                message: message.to_string(),
            };
            match buf.lock() {
                Ok(mut buf) => buf.push(diagnostic),
                Err(poisoned) => poisoned.into_inner().push(diagnostic),
            }
        }
    }
}
