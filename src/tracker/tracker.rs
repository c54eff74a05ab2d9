//! Process-wide tracker: global identity, global fields, and submission

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use crate::config::TrackerConfig;
use crate::diagnostics::{self, DiagnosticSink, UsageError};
use crate::fields::{FieldMap, FieldValue, well_known};
use crate::timer::Timer;

use super::crash::{CrashHookSource, CrashInfo, CrashObserver};
use super::device::{DeviceInfoProvider, HostDeviceInfo};
use super::payload::{LoggingSink, SubmissionSink, TimerPayload};

/// Shared state guarded by the tracker's mutex.
///
/// Cloned whole at submission time so each submission observes one
/// consistent point-in-time view.
#[derive(Debug, Clone, Default)]
struct GlobalState {
    site_id: Option<String>,
    session_id: Option<String>,
    global_user_id: Option<String>,
    device_name: Option<String>,
    fields: FieldMap,
}

static GLOBAL: OnceLock<Arc<Tracker>> = OnceLock::new();

/// Merges global identity and fields into submitted timers and hands the
/// result to the submission sink.
///
/// All mutation goes through `&self`; the global state sits behind one
/// mutex so configuration writes and submission reads never tear.
pub struct Tracker {
    globals: Mutex<GlobalState>,
    sink: Arc<dyn SubmissionSink>,
    diagnostics: Arc<dyn DiagnosticSink>,
    device: Arc<dyn DeviceInfoProvider>,
    device_model: OnceLock<String>,
}

impl Tracker {
    /// The process-wide tracker (initializes with defaults on first
    /// access, lives until process exit).
    pub fn global() -> Arc<Tracker> {
        GLOBAL.get_or_init(|| Arc::new(Tracker::new())).clone()
    }

    /// Tracker with the default sink, diagnostics, and device provider.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> TrackerBuilder {
        TrackerBuilder::default()
    }

    /// Apply persisted configuration (identity slots and global fields).
    pub fn apply_config(&self, config: &TrackerConfig) {
        if let Some(site_id) = &config.site_id {
            self.set_site_id(site_id.clone());
        }
        if let Some(session_id) = &config.session_id {
            self.set_session_id(session_id.clone());
        }
        if let Some(global_user_id) = &config.global_user_id {
            self.set_global_user_id(global_user_id.clone());
        }
        let mut globals = self.lock_globals("apply_config");
        for (name, value) in &config.global_fields {
            globals.fields.set(name.clone(), value.clone());
        }
    }

    // ─── Global identity ────────────────────────────────────────────────────

    pub fn set_site_id(&self, site_id: impl Into<String>) {
        self.lock_globals("set_site_id").site_id = Some(site_id.into());
    }

    pub fn set_session_id(&self, session_id: impl Into<String>) {
        self.lock_globals("set_session_id").session_id = Some(session_id.into());
    }

    pub fn set_global_user_id(&self, global_user_id: impl Into<String>) {
        self.lock_globals("set_global_user_id").global_user_id = Some(global_user_id.into());
    }

    /// Override the device name reported on submissions (otherwise the
    /// cached introspection value is used).
    pub fn set_device_name(&self, device_name: impl Into<String>) {
        self.lock_globals("set_device_name").device_name = Some(device_name.into());
    }

    /// The device model/platform string attached to submissions.
    pub fn device_name(&self) -> String {
        let configured = self.lock_globals("device_name").device_name.clone();
        configured.unwrap_or_else(|| self.cached_device_model().to_string())
    }

    // ─── Global fields ──────────────────────────────────────────────────────

    /// Set a field applied to every timer submitted through this tracker.
    /// Timer-local fields win on key collision.
    pub fn set_global_field(&self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.lock_globals("set_global_field").fields.set(name, value);
    }

    /// Set multiple global fields at once.
    pub fn set_global_fields<K, V>(&self, entries: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.lock_globals("set_global_fields").fields.set_many(entries);
    }

    /// Reset a well-known global field to its default, or remove it.
    pub fn clear_global_field(&self, name: &str) {
        self.lock_globals("clear_global_field").fields.clear(name);
    }

    /// Snapshot of the current global fields.
    pub fn all_global_fields(&self) -> FieldMap {
        self.lock_globals("all_global_fields").fields.snapshot()
    }

    // ─── Submission ─────────────────────────────────────────────────────────

    /// Merge global state into the timer's fields and hand the result to
    /// the submission sink. The timer itself is never mutated.
    ///
    /// Submitting a timer that has not ended is reported and the payload
    /// still goes out best-effort.
    pub fn submit_timer(&self, timer: &Timer) {
        if !timer.has_ended() {
            self.diagnostics.report(&UsageError::InvalidStateTransition {
                operation: "submit_timer",
                state: timer.state(),
            });
        }
        for key in [well_known::PAGE_NAME, well_known::TRAFFIC_SEGMENT_NAME] {
            if !timer.fields().contains(key) {
                self.diagnostics.report(&UsageError::MissingIdentity { missing: key });
            }
        }

        let mut fields = self.merged_globals("submit_timer");
        fields.merge_from(timer.fields());

        self.sink.submit(TimerPayload {
            start_ms: timer.start_time_ms(),
            interactive_ms: timer.interactive_time_ms(),
            end_ms: timer.end_time_ms(),
            fields,
        });
    }

    // ─── Crash tracking ─────────────────────────────────────────────────────

    /// Register this tracker for unhandled-fault notifications so it can
    /// flush a final payload before the process terminates.
    pub fn track_crashes(self: &Arc<Self>, source: &dyn CrashHookSource) {
        source.install(self.clone());
    }

    /// Deliberately raise a fault to exercise the crash path end to end.
    ///
    /// The sole intentionally fatal operation; the message prefix keeps
    /// test faults distinguishable from real ones downstream.
    pub fn raise_test_exception(&self, message: &str) -> ! {
        panic!("test exception: {message}");
    }

    // ─── Internals ──────────────────────────────────────────────────────────

    /// Lock the global state, recovering and reporting a poisoned lock.
    fn lock_globals(&self, operation: &'static str) -> MutexGuard<'_, GlobalState> {
        match self.globals.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                self.diagnostics
                    .report(&UsageError::ConcurrentGlobalMutation { operation });
                poisoned.into_inner()
            }
        }
    }

    fn cached_device_model(&self) -> &str {
        self.device_model.get_or_init(|| self.device.device_model())
    }

    /// Point-in-time view of the global fields with identity keys attached.
    /// One lock acquisition per submission.
    fn merged_globals(&self, operation: &'static str) -> FieldMap {
        let snapshot = self.lock_globals(operation).clone();

        let mut fields = snapshot.fields;
        if let Some(site_id) = snapshot.site_id {
            fields.set(well_known::SITE_ID, site_id);
        }
        if let Some(session_id) = snapshot.session_id {
            fields.set(well_known::SESSION_ID, session_id);
        }
        if let Some(global_user_id) = snapshot.global_user_id {
            fields.set(well_known::GLOBAL_USER_ID, global_user_id);
        }
        let device_name = snapshot
            .device_name
            .unwrap_or_else(|| self.cached_device_model().to_string());
        fields.set(well_known::DEVICE_NAME, device_name);
        fields.set(well_known::OS, self.device.os());
        fields
    }
}

impl CrashObserver for Tracker {
    /// Best-effort flush: globals plus the crash message, stamped with the
    /// crash time, straight to the sink.
    fn on_crash(&self, info: &CrashInfo) {
        let mut fields = self.merged_globals("on_crash");
        fields.set("crashMessage", info.message.clone());

        self.sink.submit(TimerPayload {
            start_ms: Some(info.timestamp_ms),
            interactive_ms: None,
            end_ms: Some(info.timestamp_ms),
            fields,
        });
    }
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("globals", &self.globals)
            .finish_non_exhaustive()
    }
}

/// Builder for trackers with custom sink, diagnostics, or device provider.
#[derive(Default)]
pub struct TrackerBuilder {
    sink: Option<Arc<dyn SubmissionSink>>,
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
    device: Option<Arc<dyn DeviceInfoProvider>>,
}

impl TrackerBuilder {
    pub fn sink(mut self, sink: Arc<dyn SubmissionSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    pub fn device_info(mut self, device: Arc<dyn DeviceInfoProvider>) -> Self {
        self.device = Some(device);
        self
    }

    pub fn build(self) -> Tracker {
        Tracker {
            globals: Mutex::new(GlobalState::default()),
            sink: self.sink.unwrap_or_else(|| Arc::new(LoggingSink)),
            diagnostics: self.diagnostics.unwrap_or_else(diagnostics::default_sink),
            device: self.device.unwrap_or_else(|| Arc::new(HostDeviceInfo)),
            device_model: OnceLock::new(),
        }
    }
}
