//! Calendar math: ISO-Monday week starts, the cutover start date, and
//! week/day headings.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

/// The service-transition instant. Until this moment passed, the first
/// displayed week was the first week of the new schedule and so was
/// headed "Next Week"; ever since, it is headed "Current Week". The
/// same instant floors the filter cutover so pre-transition collections
/// never show.
#[must_use]
pub fn service_baseline() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 4, 0, 0, 0).unwrap()
}

/// The Monday starting the ISO week containing `date`. Monday maps to
/// itself; Sunday goes back six days.
#[must_use]
pub fn week_start_monday(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// The inclusive filter cutover for upcoming collections: the baseline
/// while `now` has not reached it, `now` afterwards.
#[must_use]
pub fn cutover_start(now: DateTime<Utc>, baseline: DateTime<Utc>) -> DateTime<Utc> {
    if now < baseline { baseline } else { now }
}

/// Heading for the week at `index` (0 = earliest displayed week).
///
/// Index 0 is "Current Week" once `now` has reached the baseline and
/// "Next Week" before that; later weeks are numbered 1-based, so index
/// 1 renders as "Week 2".
#[must_use]
pub fn week_label(index: usize, now: DateTime<Utc>, baseline: DateTime<Utc>) -> String {
    if index == 0 {
        if now < baseline {
            "Next Week".to_string()
        } else {
            "Current Week".to_string()
        }
    } else {
        format!("Week {}", index + 1)
    }
}

/// Long-form day heading, e.g. "Tuesday 5 August".
#[must_use]
pub fn day_label(date: NaiveDate) -> String {
    date.format("%A %-d %B").to_string()
}
