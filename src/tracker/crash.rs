//! Crash-hook boundary
//!
//! The tracker registers itself as an observer for unhandled faults so it
//! can flush a final payload before the process dies. The hook mechanism
//! itself lives behind `CrashHookSource`; `PanicHookSource` is the
//! host-runtime implementation for Rust panics.

use std::panic::{self, PanicHookInfo};
use std::sync::Arc;

use crate::timer::epoch_ms;

/// Context handed to observers when the host hits an unhandled fault.
#[derive(Debug, Clone)]
pub struct CrashInfo {
    pub message: String,
    pub timestamp_ms: i64,
}

/// Notified on unhandled faults; must do its work quickly and without
/// panicking (the process is already going down).
pub trait CrashObserver: Send + Sync {
    fn on_crash(&self, info: &CrashInfo);
}

/// Source of unhandled-fault notifications from the host runtime.
pub trait CrashHookSource {
    fn install(&self, observer: Arc<dyn CrashObserver>);
}

/// Hook source backed by `std::panic::set_hook`.
///
/// Chains to the previously installed hook so the host application keeps
/// its own panic reporting.
#[derive(Debug, Default)]
pub struct PanicHookSource;

impl CrashHookSource for PanicHookSource {
    fn install(&self, observer: Arc<dyn CrashObserver>) {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            observer.on_crash(&CrashInfo {
                message: payload_message(panic_info),
                timestamp_ms: epoch_ms(),
            });
            previous(panic_info);
        }));
    }
}

fn payload_message(panic_info: &PanicHookInfo<'_>) -> String {
    if let Some(message) = panic_info.payload().downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic_info.payload().downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
