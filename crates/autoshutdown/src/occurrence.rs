//! Next-occurrence arithmetic.
//!
//! Everything here is generic over the time zone and takes `now` as an
//! argument; nothing reads the wall clock, which keeps the math testable
//! at fixed instants.

use chrono::{DateTime, Datelike, Days, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone};

use crate::policy::{Recurrence, RecurrencePolicy};

/// The next due instant for `policy` as seen from `now`.
pub fn next_occurrence<Tz: TimeZone>(now: &DateTime<Tz>, policy: &RecurrencePolicy) -> DateTime<Tz> {
    match policy.recurrence {
        Recurrence::EveryDays(every_days) => next_interval(now, every_days, policy.at),
        Recurrence::OnWeekday(weekday) => next_weekday(now, weekday, policy.at),
    }
}

/// Every-N-days mode.
///
/// With a one-day interval the candidate at today's target time only
/// advances once that time has been reached; any longer interval advances
/// unconditionally, so the first firing is always a full interval out.
/// The advance adds whole 24-hour steps on the timeline, not civil days.
pub fn next_interval<Tz: TimeZone>(
    now: &DateTime<Tz>,
    every_days: u32,
    at: NaiveTime,
) -> DateTime<Tz> {
    let today = resolve_civil(&now.timezone(), now.date_naive(), at);
    if every_days > 1 || today <= *now {
        today + Duration::days(i64::from(every_days))
    } else {
        today
    }
}

/// Weekly mode: days until the target weekday on the civil calendar. When
/// that lands today, a target time at or before `now` pushes a full week.
pub fn next_weekday<Tz: TimeZone>(now: &DateTime<Tz>, weekday: u32, at: NaiveTime) -> DateTime<Tz> {
    let today = now.weekday().num_days_from_sunday();
    let mut days_until = (weekday + 7 - today) % 7;
    if days_until == 0 && now.time() >= at {
        days_until = 7;
    }
    let date = now.date_naive() + Days::new(u64::from(days_until));
    resolve_civil(&now.timezone(), date, at)
}

/// Resolve a civil date and time in `tz`.
///
/// Around zone transitions a civil time can map to two instants or none.
/// The earlier reading wins when doubled; a time inside a forward gap
/// rolls an hour later.
fn resolve_civil<Tz: TimeZone>(tz: &Tz, date: NaiveDate, at: NaiveTime) -> DateTime<Tz> {
    let naive = date.and_time(at);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(t) => t,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let shifted = naive + Duration::hours(1);
            tz.from_local_datetime(&shifted)
                .earliest()
                .unwrap_or_else(|| tz.from_utc_datetime(&naive))
        }
    }
}
