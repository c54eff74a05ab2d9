//! Error types for reported usage conditions

use thiserror::Error;

use crate::timer::TimerState;

/// Misuse conditions surfaced through the diagnostic sink.
///
/// None of these abort the host application or fail the offending call;
/// the operation is reported and execution continues with state unchanged
/// (or best-effort, for submission).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UsageError {
    /// A lifecycle operation was called out of order, or a timer was
    /// submitted before it ended.
    #[error("{operation} called while timer is {state:?}")]
    InvalidStateTransition {
        operation: &'static str,
        state: TimerState,
    },

    /// Submission attempted while a required identity field was unset.
    /// Submission proceeds with the key absent.
    #[error("timer submitted without {missing}")]
    MissingIdentity { missing: &'static str },

    /// The global-state lock was observed poisoned. Internal-consistency
    /// bug, not a caller error; the state is recovered as-is.
    #[error("global tracker state lock poisoned during {operation}")]
    ConcurrentGlobalMutation { operation: &'static str },
}
