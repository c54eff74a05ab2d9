//! Timer submission
//!
//! This module provides:
//! - **Tracker**: Process-wide identity and global fields, merged into
//!   every submitted timer
//! - **Payload/sink**: The boundary handed to the transport layer
//! - **Crash hooks**: Best-effort flush on unhandled faults
//! - **Device introspection**: Cached platform/model string
//!
//! The tracker is usable either as an explicit context object passed by
//! reference, or through `Tracker::global()` as the conventional
//! process-wide singleton.

mod crash;
mod device;
mod payload;
mod tracker;

#[cfg(test)]
mod tracker_tests;

pub use crash::{CrashHookSource, CrashInfo, CrashObserver, PanicHookSource};
pub use device::{DeviceInfoProvider, HostDeviceInfo};
pub use payload::{LoggingSink, SubmissionSink, TimerPayload};
pub use tracker::{Tracker, TrackerBuilder};
