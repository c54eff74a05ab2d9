//! Tests for tracker merging, submission, and crash flushing

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use crate::config::TrackerConfig;
use crate::diagnostics::{CapturingSink, UsageError};
use crate::fields::well_known;
use crate::timer::{Timer, TimerState};

use super::crash::{CrashHookSource, CrashInfo, CrashObserver};
use super::device::DeviceInfoProvider;
use super::payload::{SubmissionSink, TimerPayload};
use super::Tracker;

/// Sink that retains submitted payloads for inspection.
#[derive(Default)]
struct CollectingSink {
    payloads: Mutex<Vec<TimerPayload>>,
}

impl CollectingSink {
    fn payloads(&self) -> Vec<TimerPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

impl SubmissionSink for CollectingSink {
    fn submit(&self, payload: TimerPayload) {
        self.payloads.lock().unwrap().push(payload);
    }
}

fn tracker_with_sinks() -> (Arc<Tracker>, Arc<CollectingSink>, Arc<CapturingSink>) {
    let sink = Arc::new(CollectingSink::default());
    let diagnostics = Arc::new(CapturingSink::new());
    let tracker = Arc::new(
        Tracker::builder()
            .sink(sink.clone())
            .diagnostics(diagnostics.clone())
            .build(),
    );
    (tracker, sink, diagnostics)
}

fn ended_timer(page: &str, segment: &str) -> Timer {
    let mut timer = Timer::with_page_name(page, segment);
    timer.start();
    timer.end();
    timer
}

#[test]
fn test_merge_precedence_timer_wins() {
    let (tracker, sink, _diag) = tracker_with_sinks();
    tracker.set_global_field("a", "g");

    let mut timer = ended_timer("Home", "Organic");
    timer.set_field("a", "t");
    timer.set_field("b", "t2");
    tracker.submit_timer(&timer);

    let payloads = sink.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].fields.get_display("a").as_deref(), Some("t"));
    assert_eq!(payloads[0].fields.get_display("b").as_deref(), Some("t2"));
}

#[test]
fn test_identity_fields_attached_when_set() {
    let (tracker, sink, _diag) = tracker_with_sinks();
    tracker.set_site_id("shop");
    tracker.set_session_id("sess-42");
    tracker.set_global_user_id("user-9");
    tracker.set_device_name("test-device");

    tracker.submit_timer(&ended_timer("Home", "Organic"));

    let payload = &sink.payloads()[0];
    assert_eq!(payload.fields.get_display(well_known::SITE_ID).as_deref(), Some("shop"));
    assert_eq!(
        payload.fields.get_display(well_known::SESSION_ID).as_deref(),
        Some("sess-42")
    );
    assert_eq!(
        payload.fields.get_display(well_known::GLOBAL_USER_ID).as_deref(),
        Some("user-9")
    );
    assert_eq!(
        payload.fields.get_display(well_known::DEVICE_NAME).as_deref(),
        Some("test-device")
    );
    assert!(payload.fields.contains(well_known::OS));
}

#[test]
fn test_unset_identity_slots_stay_absent() {
    let (tracker, sink, _diag) = tracker_with_sinks();
    tracker.submit_timer(&ended_timer("Home", "Organic"));

    let payload = &sink.payloads()[0];
    assert!(!payload.fields.contains(well_known::SITE_ID));
    assert!(!payload.fields.contains(well_known::SESSION_ID));
    assert!(!payload.fields.contains(well_known::GLOBAL_USER_ID));
    // Device name always resolves through introspection
    assert!(payload.fields.contains(well_known::DEVICE_NAME));
}

#[test]
fn test_submit_unended_timer_flagged_but_delivered() {
    let (tracker, sink, diagnostics) = tracker_with_sinks();

    let mut timer = Timer::with_page_name("Home", "Organic");
    timer.start();
    tracker.submit_timer(&timer);

    assert_eq!(
        diagnostics.reported(),
        vec![UsageError::InvalidStateTransition {
            operation: "submit_timer",
            state: TimerState::Started,
        }]
    );
    // Best-effort: the payload still goes out, without an end timestamp
    let payloads = sink.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].end_ms, None);
}

#[test]
fn test_missing_page_identity_reported() {
    let (tracker, sink, diagnostics) = tracker_with_sinks();

    let mut timer = Timer::new();
    timer.start();
    timer.end();
    tracker.submit_timer(&timer);

    let reported = diagnostics.reported();
    assert!(reported.contains(&UsageError::MissingIdentity {
        missing: well_known::PAGE_NAME
    }));
    assert!(reported.contains(&UsageError::MissingIdentity {
        missing: well_known::TRAFFIC_SEGMENT_NAME
    }));
    assert_eq!(sink.payloads().len(), 1, "submission proceeds with absent keys");
}

#[test]
fn test_submission_does_not_mutate_timer() {
    let (tracker, _sink, _diag) = tracker_with_sinks();
    tracker.set_site_id("shop");
    tracker.set_global_field("globalOnly", true);

    let timer = ended_timer("Home", "Organic");
    let before = timer.all_fields();
    tracker.submit_timer(&timer);

    assert_eq!(timer.all_fields(), before);
    assert!(!timer.all_fields().contains(well_known::SITE_ID));
    assert!(!timer.all_fields().contains("globalOnly"));
}

#[test]
fn test_each_submission_observes_current_globals() {
    let (tracker, sink, _diag) = tracker_with_sinks();

    tracker.set_global_field("release", "1.0");
    tracker.submit_timer(&ended_timer("Home", "Organic"));

    tracker.set_global_field("release", "2.0");
    tracker.submit_timer(&ended_timer("Cart", "Organic"));

    let payloads = sink.payloads();
    assert_eq!(payloads[0].fields.get_display("release").as_deref(), Some("1.0"));
    assert_eq!(payloads[1].fields.get_display("release").as_deref(), Some("2.0"));
}

#[test]
fn test_clear_global_field_restores_default() {
    let (tracker, _sink, _diag) = tracker_with_sinks();
    tracker.set_global_field(well_known::CART_VALUE, 12.5f64);
    tracker.clear_global_field(well_known::CART_VALUE);

    let globals = tracker.all_global_fields();
    assert_eq!(globals.get_display(well_known::CART_VALUE).as_deref(), Some("0"));

    tracker.set_global_field("adhoc", "x");
    tracker.clear_global_field("adhoc");
    assert!(!tracker.all_global_fields().contains("adhoc"));
}

#[test]
fn test_concurrent_submissions_never_tear_globals() {
    let (tracker, sink, diagnostics) = tracker_with_sinks();
    tracker.set_global_field("flip", 0i64);

    let submitters: Vec<_> = (0..4)
        .map(|worker| {
            let tracker = tracker.clone();
            thread::spawn(move || {
                for n in 0..25 {
                    let mut timer = ended_timer("Home", "Organic");
                    timer.set_field("worker", worker as i64);
                    timer.set_field("n", n as i64);
                    tracker.submit_timer(&timer);
                }
            })
        })
        .collect();

    // Mutate the shared global while submissions race
    for n in 0..100i64 {
        tracker.set_global_field("flip", n % 2);
    }
    for handle in submitters {
        handle.join().unwrap();
    }

    let payloads = sink.payloads();
    assert_eq!(payloads.len(), 100);
    for payload in &payloads {
        let flip = payload.fields.get_display("flip");
        assert!(
            flip.as_deref() == Some("0") || flip.as_deref() == Some("1"),
            "torn global read: {flip:?}"
        );
        assert!(payload.fields.contains("worker"));
    }
    assert_eq!(diagnostics.count(), 0, "no poisoned-lock reports expected");
}

struct CountingDevice {
    model_calls: AtomicUsize,
}

impl DeviceInfoProvider for CountingDevice {
    fn device_model(&self) -> String {
        self.model_calls.fetch_add(1, Ordering::SeqCst);
        "unit-test-device".to_string()
    }

    fn os(&self) -> String {
        "testos".to_string()
    }
}

#[test]
fn test_device_name_cached_after_first_lookup() {
    let device = Arc::new(CountingDevice {
        model_calls: AtomicUsize::new(0),
    });
    let sink = Arc::new(CollectingSink::default());
    let tracker = Tracker::builder()
        .sink(sink.clone())
        .device_info(device.clone())
        .build();

    assert_eq!(tracker.device_name(), "unit-test-device");
    assert_eq!(tracker.device_name(), "unit-test-device");
    tracker.submit_timer(&ended_timer("Home", "Organic"));

    assert_eq!(device.model_calls.load(Ordering::SeqCst), 1);
    let payload = &sink.payloads()[0];
    assert_eq!(payload.fields.get_display(well_known::OS).as_deref(), Some("testos"));
}

/// Hook source that hands the observer back to the test instead of
/// touching the process-wide panic hook.
#[derive(Default)]
struct FakeHookSource {
    observer: Mutex<Option<Arc<dyn CrashObserver>>>,
}

impl CrashHookSource for FakeHookSource {
    fn install(&self, observer: Arc<dyn CrashObserver>) {
        *self.observer.lock().unwrap() = Some(observer);
    }
}

#[test]
fn test_crash_flushes_globals_through_sink() {
    let (tracker, sink, _diag) = tracker_with_sinks();
    tracker.set_site_id("shop");
    tracker.set_global_field("release", "2.0");

    let source = FakeHookSource::default();
    tracker.track_crashes(&source);

    let observer = source.observer.lock().unwrap().clone().expect("observer installed");
    observer.on_crash(&CrashInfo {
        message: "test exception: boom".to_string(),
        timestamp_ms: 1_700_000_000_000,
    });

    let payloads = sink.payloads();
    assert_eq!(payloads.len(), 1);
    let payload = &payloads[0];
    assert_eq!(
        payload.fields.get_display("crashMessage").as_deref(),
        Some("test exception: boom")
    );
    assert_eq!(payload.fields.get_display(well_known::SITE_ID).as_deref(), Some("shop"));
    assert_eq!(payload.fields.get_display("release").as_deref(), Some("2.0"));
    assert_eq!(payload.start_ms, Some(1_700_000_000_000));
    assert_eq!(payload.end_ms, Some(1_700_000_000_000));
}

#[test]
#[should_panic(expected = "test exception: boom")]
fn test_raise_test_exception_panics_with_prefix() {
    let (tracker, _sink, _diag) = tracker_with_sinks();
    tracker.raise_test_exception("boom");
}

#[test]
fn test_apply_config_sets_identity_and_globals() {
    let (tracker, sink, _diag) = tracker_with_sinks();

    let mut config = TrackerConfig {
        site_id: Some("shop".to_string()),
        session_id: Some("sess-1".to_string()),
        ..TrackerConfig::default()
    };
    config
        .global_fields
        .insert("release".to_string(), "3.1".into());
    tracker.apply_config(&config);

    tracker.submit_timer(&ended_timer("Home", "Organic"));
    let payload = &sink.payloads()[0];
    assert_eq!(payload.fields.get_display(well_known::SITE_ID).as_deref(), Some("shop"));
    assert_eq!(
        payload.fields.get_display(well_known::SESSION_ID).as_deref(),
        Some("sess-1")
    );
    assert_eq!(payload.fields.get_display("release").as_deref(), Some("3.1"));
}
