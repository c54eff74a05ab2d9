//! Submission payload and the transport boundary

use serde::Serialize;

use crate::fields::{FieldMap, well_known};

/// One completed measurement, ready for the transport layer.
///
/// Carries the timer's timestamps plus the merged field view (globals
/// overlaid with timer-local fields, identity keys attached). The wire
/// encoding is the sink's concern.
#[derive(Debug, Clone, Serialize)]
pub struct TimerPayload {
    pub start_ms: Option<i64>,
    pub interactive_ms: Option<i64>,
    pub end_ms: Option<i64>,
    pub fields: FieldMap,
}

/// Accepts completed payloads for delivery.
///
/// Fire-and-forget: delivery may fail asynchronously and the core never
/// observes it. Implementations must not block the caller on network I/O.
pub trait SubmissionSink: Send + Sync {
    fn submit(&self, payload: TimerPayload);
}

/// Default sink that logs payloads instead of transmitting them.
///
/// Stands in for the real transport until one is wired up.
#[derive(Debug, Default)]
pub struct LoggingSink;

impl SubmissionSink for LoggingSink {
    fn submit(&self, payload: TimerPayload) {
        let page = payload
            .fields
            .get_display(well_known::PAGE_NAME)
            .unwrap_or_default();
        tracing::debug!(
            page = %page,
            field_count = payload.fields.len(),
            end_ms = payload.end_ms,
            "discarding timer payload (no transport configured)"
        );
    }
}
