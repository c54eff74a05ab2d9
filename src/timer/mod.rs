//! Page-load timers
//!
//! A `Timer` measures one user-visible interval (page load, screen
//! transition, checkout flow) and carries the metadata fields describing
//! it. Application code starts the timer, optionally marks it interactive,
//! ends it, and hands it to the tracker for submission.
//!
//! # Lifecycle
//!
//! 1. Created via a constructor (with or without page identity)
//! 2. `start()` records the start timestamp
//! 3. `interactive()` optionally records when the page became usable
//! 4. `end()` records the end timestamp (terminal)

mod lifecycle;


pub use lifecycle::{Timer, TimerState};

pub(crate) use lifecycle::epoch_ms;
