//! Shared primitives for the downtimer workspace.
//!
//! Everything here is deliberately free of I/O: wall-clock parsing and
//! formatting helpers, and the cooperative one-shot task scheduler that
//! policy modules run their deferred work on.

pub mod tasks;
pub mod timeutil;

pub use tasks::TaskScheduler;
pub use timeutil::{humanize_secs, TimeOfDay, TimeParseError};
