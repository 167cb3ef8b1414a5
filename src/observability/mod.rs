//! Observability module for the Mailosaur client.
//!
//! Provides tracing-subscriber setup, secret redaction for log output and a
//! small timer used to report keyword durations.

mod logging;

pub use logging::{redact_secrets, LogFormat, LogLevel, LoggingConfig};

use std::time::{Duration, Instant};

/// Request timer for measuring operation duration.
#[derive(Debug)]
pub struct RequestTimer {
    start: Instant,
    operation: &'static str,
}

impl RequestTimer {
    /// Starts a new timer.
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    /// Returns the elapsed time.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Returns the operation name.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Logs the outcome of the operation at debug level.
    pub fn finish(self, success: bool) {
        tracing::debug!(
            operation = self.operation,
            success,
            elapsed_ms = self.elapsed().as_millis() as u64,
            "Keyword finished"
        );
    }
}
