//! Wall-clock helpers: `HH:MM:SS` parsing and human-readable durations.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveTime, TimeZone};
use thiserror::Error;

pub const SECS_PER_MINUTE: u64 = 60;
pub const SECS_PER_HOUR: u64 = 3_600;
pub const SECS_PER_DAY: u64 = 86_400;
pub const SECS_PER_WEEK: u64 = 7 * SECS_PER_DAY;

/// Errors produced while parsing a clock string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeParseError {
    /// The string does not break into exactly three `:`-separated fields.
    #[error("expected HH:MM:SS, got '{0}'")]
    Malformed(String),
    /// A field is not an unsigned integer that fits in a byte.
    #[error("time component '{0}' is not an unsigned number")]
    Component(String),
}

/// A wall-clock time of day with second precision.
///
/// Parsing only checks the token shape; components outside the usual clock
/// ranges (hour 24, minute 77) still parse and are rejected later by policy
/// validation, so every out-of-range field can be reported individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl TimeOfDay {
    /// The time as a [`NaiveTime`], or `None` when a component is out of
    /// clock range.
    pub fn as_naive(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(
            u32::from(self.hour),
            u32::from(self.minute),
            u32::from(self.second),
        )
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Empty fields are dropped, so "4:0:0" and "04::00:00" both yield
        // three tokens while "04:00" does not.
        let tokens: Vec<&str> = s.split(':').filter(|t| !t.is_empty()).collect();
        if tokens.len() != 3 {
            return Err(TimeParseError::Malformed(s.to_string()));
        }

        let mut parts = [0u8; 3];
        for (slot, token) in parts.iter_mut().zip(&tokens) {
            if !token.bytes().all(|b| b.is_ascii_digit()) {
                return Err(TimeParseError::Component(token.to_string()));
            }
            *slot = token
                .parse::<u8>()
                .map_err(|_| TimeParseError::Component(token.to_string()))?;
        }

        Ok(TimeOfDay {
            hour: parts[0],
            minute: parts[1],
            second: parts[2],
        })
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

/// Render a second count as a full-text duration, e.g. `1 Day 2 Hours
/// 30 Minutes`. Zero-valued units are skipped; zero itself renders as
/// `0 Seconds`.
pub fn humanize_secs(total_secs: u64) -> String {
    let days = total_secs / SECS_PER_DAY;
    let hours = (total_secs % SECS_PER_DAY) / SECS_PER_HOUR;
    let minutes = (total_secs % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = total_secs % SECS_PER_MINUTE;

    let mut out = String::new();
    push_unit(&mut out, days, "Day");
    push_unit(&mut out, hours, "Hour");
    push_unit(&mut out, minutes, "Minute");
    push_unit(&mut out, seconds, "Second");

    if out.is_empty() {
        out.push_str("0 Seconds");
    }
    out
}

fn push_unit(out: &mut String, amount: u64, unit: &str) {
    if amount == 0 {
        return;
    }
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(&amount.to_string());
    out.push(' ');
    out.push_str(unit);
    if amount != 1 {
        out.push('s');
    }
}

/// Format a unix epoch in the host's local zone for log output.
pub fn format_epoch_local(epoch: i64) -> String {
    Local
        .timestamp_opt(epoch, 0)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| format!("epoch {epoch}"))
}
