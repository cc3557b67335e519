//! Logger capability
//!
//! Fire-and-forget: a logger call never fails the enclosing effect. The
//! production implementation forwards to `tracing`; the test implementation
//! captures entries for assertions.

use std::fmt;
use std::sync::Mutex;

/// Severity of a captured log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Informational
    Info,
    /// Something unusual but recoverable
    Warn,
    /// A failure worth attention
    Error,
}

/// Structured logging capability
pub trait Logger: Send + Sync {
    /// Log at info level
    fn info(&self, msg: &str);

    /// Log at warn level
    fn warn(&self, msg: &str);

    /// Log at error level, optionally with the underlying cause
    fn error(&self, msg: &str, cause: Option<&dyn fmt::Display>);
}

/// Production logger backed by the `tracing` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    /// Create the tracing-backed logger
    pub fn new() -> Self {
        TracingLogger
    }
}

impl Logger for TracingLogger {
    fn info(&self, msg: &str) {
        tracing::info!("{}", msg);
    }

    fn warn(&self, msg: &str) {
        tracing::warn!("{}", msg);
    }

    fn error(&self, msg: &str, cause: Option<&dyn fmt::Display>) {
        match cause {
            Some(cause) => tracing::error!("{}: {}", msg, cause),
            None => tracing::error!("{}", msg),
        }
    }
}

/// Test logger that records every entry
#[derive(Debug, Default)]
pub struct CapturedLogger {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl CapturedLogger {
    /// Create an empty captured logger
    pub fn new() -> Self {
        CapturedLogger::default()
    }

    /// All captured entries, in order
    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.lock().clone()
    }

    /// Captured messages only, in order
    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|(_, msg)| msg.clone()).collect()
    }

    /// Whether any captured message contains the needle
    pub fn contains(&self, needle: &str) -> bool {
        self.lock().iter().any(|(_, msg)| msg.contains(needle))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(LogLevel, String)>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => panic!("captured logger mutex poisoned: {}", poisoned),
        }
    }

    fn push(&self, level: LogLevel, msg: String) {
        self.lock().push((level, msg));
    }
}

impl Logger for CapturedLogger {
    fn info(&self, msg: &str) {
        self.push(LogLevel::Info, msg.to_string());
    }

    fn warn(&self, msg: &str) {
        self.push(LogLevel::Warn, msg.to_string());
    }

    fn error(&self, msg: &str, cause: Option<&dyn fmt::Display>) {
        let entry = match cause {
            Some(cause) => format!("{}: {}", msg, cause),
            None => msg.to_string(),
        };
        self.push(LogLevel::Error, entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_in_order() {
        let logger = CapturedLogger::new();
        logger.info("first");
        logger.warn("second");
        logger.error("third", None);

        assert_eq!(
            logger.entries(),
            vec![
                (LogLevel::Info, "first".to_string()),
                (LogLevel::Warn, "second".to_string()),
                (LogLevel::Error, "third".to_string()),
            ]
        );
    }

    #[test]
    fn error_appends_cause() {
        let logger = CapturedLogger::new();
        logger.error("insert failed", Some(&"connection refused"));
        assert!(logger.contains("insert failed: connection refused"));
    }
}
