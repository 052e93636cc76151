//! Validation of raw settings into a recurrence policy.

use chrono::NaiveTime;
use downtimer_core::TimeOfDay;
use thiserror::Error;

/// Which days the firing recurs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurrence {
    /// Every `n` days.
    EveryDays(u32),
    /// Weekly, `0` = Sunday through `6` = Saturday.
    OnWeekday(u32),
}

/// A validated recurrence: the mode plus the firing time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurrencePolicy {
    pub recurrence: Recurrence,
    pub at: NaiveTime,
}

impl RecurrencePolicy {
    /// Length of one recurrence period in days.
    pub fn period_days(&self) -> u32 {
        match self.recurrence {
            Recurrence::EveryDays(n) => n,
            Recurrence::OnWeekday(_) => 7,
        }
    }
}

/// One rejected field of a candidate policy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyFault {
    #[error("every_days {0} is outside 1..=365")]
    EveryDays(u32),
    #[error("hour {0} is outside 0..=23")]
    Hour(u8),
    #[error("minute {0} is outside 0..=59")]
    Minute(u8),
    #[error("second {0} is outside 0..=59")]
    Second(u8),
}

/// Check every candidate field independently, so a bad configuration
/// reports all of its violations at once rather than only the first.
///
/// A weekday outside `0..=6` is not a fault: it deselects the weekly mode.
/// `every_days` is range-checked in both modes, so a weekly policy with a
/// nonsense interval still fails loudly instead of arming half-checked.
pub fn validate(
    time: TimeOfDay,
    weekday: i32,
    every_days: u32,
) -> Result<RecurrencePolicy, Vec<PolicyFault>> {
    let mut faults = Vec::new();

    if !(1..=365).contains(&every_days) {
        faults.push(PolicyFault::EveryDays(every_days));
    }
    if time.hour > 23 {
        faults.push(PolicyFault::Hour(time.hour));
    }
    if time.minute > 59 {
        faults.push(PolicyFault::Minute(time.minute));
    }
    if time.second > 59 {
        faults.push(PolicyFault::Second(time.second));
    }

    match time.as_naive() {
        Some(at) if faults.is_empty() => {
            let recurrence = if (0..=6).contains(&weekday) {
                Recurrence::OnWeekday(weekday as u32)
            } else {
                Recurrence::EveryDays(every_days)
            };
            Ok(RecurrencePolicy { recurrence, at })
        }
        _ => Err(faults),
    }
}
