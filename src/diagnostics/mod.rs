//! Usage-error reporting
//!
//! Instrumentation misuse (out-of-order lifecycle calls, submitting a timer
//! that never ended) must never destabilize the host application, so these
//! conditions are *reported* through a sink instead of returned as errors
//! or thrown. The sink is injectable so tests can assert on the exact
//! errors reported rather than parsing log output.

mod error;

pub use error::UsageError;

use std::sync::{Arc, Mutex, OnceLock};

/// Receives every reported usage error.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, error: &UsageError);
}

/// Default sink: structured warnings through `tracing`.
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, error: &UsageError) {
        tracing::warn!(error = %error, "instrumentation usage error");
    }
}

/// Sink that retains reported errors for later inspection.
///
/// Useful in tests (both this crate's and host applications') to assert
/// deterministically on reported conditions.
#[derive(Debug, Default)]
pub struct CapturingSink {
    reported: Mutex<Vec<UsageError>>,
}

impl CapturingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All errors reported so far.
    pub fn reported(&self) -> Vec<UsageError> {
        self.reported
            .lock()
            .map(|errors| errors.clone())
            .unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.reported.lock().map(|errors| errors.len()).unwrap_or(0)
    }
}

impl DiagnosticSink for CapturingSink {
    fn report(&self, error: &UsageError) {
        if let Ok(mut errors) = self.reported.lock() {
            errors.push(error.clone());
        }
    }
}

static DEFAULT_SINK: OnceLock<Arc<dyn DiagnosticSink>> = OnceLock::new();

/// The process-wide default sink (initializes to `TracingSink` on first use).
pub fn default_sink() -> Arc<dyn DiagnosticSink> {
    DEFAULT_SINK
        .get_or_init(|| Arc::new(TracingSink) as Arc<dyn DiagnosticSink>)
        .clone()
}
