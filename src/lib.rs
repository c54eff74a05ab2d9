pub mod config;
pub mod diagnostics;
pub mod fields;
pub mod timer;
pub mod tracker;

// Re-exports for convenience
pub use config::{ConfigError, TrackerConfig};
pub use diagnostics::{CapturingSink, DiagnosticSink, TracingSink, UsageError};
pub use fields::{FieldMap, FieldValue, well_known};
pub use timer::{Timer, TimerState};
pub use tracker::{
    CrashHookSource, CrashInfo, CrashObserver, DeviceInfoProvider, HostDeviceInfo, LoggingSink,
    PanicHookSource, SubmissionSink, TimerPayload, Tracker, TrackerBuilder,
};
