//! Timer lifecycle state machine and field accessors

use std::fmt;
use std::sync::Arc;

use chrono::Utc;

use crate::diagnostics::{self, DiagnosticSink, UsageError};
use crate::fields::{FieldMap, FieldValue, well_known};

/// Current epoch time in milliseconds.
pub(crate) fn epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Lifecycle state of a timer.
///
/// `Interactive` is an optional sub-state of a started timer; `Ended` is
/// terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimerState {
    #[default]
    Created,
    Started,
    Interactive,
    Ended,
}

/// One measured interval and its metadata fields.
///
/// Each timer owns its field map exclusively; the tracker only reads it
/// during submission. A timer is not meant to be mutated from multiple
/// threads at once (single logical flow per timer is the caller's
/// contract).
#[derive(Clone)]
pub struct Timer {
    state: TimerState,
    start_ms: Option<i64>,
    interactive_ms: Option<i64>,
    end_ms: Option<i64>,
    fields: FieldMap,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl Timer {
    /// Timer with no page identity. Page name and traffic segment need to
    /// be set before submission is meaningful.
    pub fn new() -> Self {
        Self {
            state: TimerState::Created,
            start_ms: None,
            interactive_ms: None,
            end_ms: None,
            fields: FieldMap::new(),
            diagnostics: diagnostics::default_sink(),
        }
    }

    /// Timer for the given page name and traffic segment.
    pub fn with_page_name(page_name: &str, traffic_segment: &str) -> Self {
        let mut timer = Self::new();
        timer.set_page_name(page_name);
        timer.set_traffic_segment_name(traffic_segment);
        timer
    }

    /// Timer with full page identity, including the optional AB test id
    /// and content group name.
    pub fn with_page_details(
        page_name: &str,
        traffic_segment: &str,
        ab_test_identifier: Option<&str>,
        content_group_name: Option<&str>,
    ) -> Self {
        let mut timer = Self::with_page_name(page_name, traffic_segment);
        if let Some(ab_test) = ab_test_identifier {
            timer.set_ab_test_identifier(ab_test);
        }
        if let Some(content_group) = content_group_name {
            timer.set_content_group_name(content_group);
        }
        timer
    }

    /// Replace the diagnostic sink (tests inject a capturing sink here).
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    // ─── Lifecycle ──────────────────────────────────────────────────────────

    /// Record the start timestamp. Valid only once, before `end`; re-entry
    /// is reported and leaves the timer untouched.
    pub fn start(&mut self) {
        if self.state != TimerState::Created {
            self.report_invalid("start");
            return;
        }
        self.start_ms = Some(epoch_ms());
        self.state = TimerState::Started;
    }

    /// Record when the page became interactive. Valid only between `start`
    /// and `end`, at most once.
    pub fn interactive(&mut self) {
        if self.state != TimerState::Started {
            self.report_invalid("interactive");
            return;
        }
        self.interactive_ms = Some(epoch_ms());
        self.state = TimerState::Interactive;
    }

    /// Record the end timestamp and seal the measurement. A second call is
    /// reported and the first end timestamp is kept.
    pub fn end(&mut self) {
        if !matches!(self.state, TimerState::Started | TimerState::Interactive) {
            self.report_invalid("end");
            return;
        }
        self.end_ms = Some(epoch_ms());
        self.state = TimerState::Ended;
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// True while the timer has started but not yet ended.
    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Started | TimerState::Interactive)
    }

    pub fn has_ended(&self) -> bool {
        self.state == TimerState::Ended
    }

    pub fn start_time_ms(&self) -> Option<i64> {
        self.start_ms
    }

    pub fn interactive_time_ms(&self) -> Option<i64> {
        self.interactive_ms
    }

    pub fn end_time_ms(&self) -> Option<i64> {
        self.end_ms
    }

    // ─── Generic field API ──────────────────────────────────────────────────

    /// Insert or overwrite a field; arbitrary custom keys are permitted.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.set(name, value);
    }

    /// Set multiple fields at once.
    pub fn set_fields<K, V>(&mut self, entries: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.set_many(entries);
    }

    /// Reset a well-known field to its default, or remove it entirely.
    pub fn clear_field(&mut self, name: &str) {
        self.fields.clear(name);
    }

    /// String representation of a field's current value.
    pub fn get_field(&self, name: &str) -> Option<String> {
        self.fields.get_display(name)
    }

    /// Snapshot of every currently set field. Mutating the returned map
    /// does not affect this timer.
    pub fn all_fields(&self) -> FieldMap {
        self.fields.snapshot()
    }

    pub(crate) fn fields(&self) -> &FieldMap {
        &self.fields
    }

    // ─── Typed setters for well-known fields ────────────────────────────────

    pub fn set_page_name(&mut self, page_name: &str) {
        self.set_field(well_known::PAGE_NAME, page_name);
    }

    pub fn set_page_value(&mut self, page_value: f64) {
        self.set_field(well_known::PAGE_VALUE, page_value);
    }

    pub fn set_traffic_segment_name(&mut self, traffic_segment_name: &str) {
        self.set_field(well_known::TRAFFIC_SEGMENT_NAME, traffic_segment_name);
    }

    pub fn set_ab_test_identifier(&mut self, ab_test_identifier: &str) {
        self.set_field(well_known::AB_TEST_ID, ab_test_identifier);
    }

    pub fn set_content_group_name(&mut self, content_group_name: &str) {
        self.set_field(well_known::CONTENT_GROUP_NAME, content_group_name);
    }

    pub fn set_brand_value(&mut self, brand_value: f64) {
        self.set_field(well_known::BRAND_VALUE, brand_value);
    }

    pub fn set_cart_value(&mut self, cart_value: f64) {
        self.set_field(well_known::CART_VALUE, cart_value);
    }

    pub fn set_order_number(&mut self, order_number: &str) {
        self.set_field(well_known::ORDER_NUMBER, order_number);
    }

    /// Epoch time of the order in milliseconds.
    pub fn set_order_time(&mut self, order_time: i64) {
        self.set_field(well_known::ORDER_TIME, order_time);
    }

    pub fn set_campaign_name(&mut self, campaign_name: &str) {
        self.set_field(well_known::CAMPAIGN_NAME, campaign_name);
    }

    pub fn set_campaign_source(&mut self, campaign_source: &str) {
        self.set_field(well_known::CAMPAIGN_SOURCE, campaign_source);
    }

    pub fn set_campaign_medium(&mut self, campaign_medium: &str) {
        self.set_field(well_known::CAMPAIGN_MEDIUM, campaign_medium);
    }

    /// Time on page in milliseconds.
    pub fn set_time_on_page(&mut self, time_on_page: i64) {
        self.set_field(well_known::TIME_ON_PAGE, time_on_page);
    }

    pub fn set_url(&mut self, url: &str) {
        self.set_field(well_known::URL, url);
    }

    pub fn set_referrer(&mut self, referrer: &str) {
        self.set_field(well_known::REFERRER_URL, referrer);
    }

    fn report_invalid(&self, operation: &'static str) {
        self.diagnostics.report(&UsageError::InvalidStateTransition {
            operation,
            state: self.state,
        });
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("state", &self.state)
            .field("start_ms", &self.start_ms)
            .field("interactive_ms", &self.interactive_ms)
            .field("end_ms", &self.end_ms)
            .field("fields", &self.fields)
            .finish()
    }
}
