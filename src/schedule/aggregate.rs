//! Filtering and bucketing of collection events into weeks and days.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use super::types::{DayBucket, WeekBucket};
use super::week::{week_label, week_start_monday};
use crate::normalize::CollectionEvent;

/// Never display more than this many weeks ahead.
pub const MAX_WEEKS: usize = 6;

/// Buckets `events` into at most [`MAX_WEEKS`] ISO-Monday weeks.
///
/// Events before `start` are dropped (the comparison is inclusive: an
/// event exactly at `start` stays). Week and day order is re-derived
/// from the dates, so input order never changes the grouping; the one
/// place input order survives is between events with the same instant,
/// which keep their arrival order. Every returned bucket holds at
/// least one event; zero upcoming events yield an empty list, which is
/// not an error.
///
/// `now` and `baseline` only feed the week headings; nothing in here
/// reads the wall clock.
#[must_use]
pub fn aggregate(
    start: DateTime<Utc>,
    now: DateTime<Utc>,
    baseline: DateTime<Utc>,
    events: &[CollectionEvent],
) -> Vec<WeekBucket> {
    let mut weeks: BTreeMap<NaiveDate, Vec<CollectionEvent>> = BTreeMap::new();

    for event in events {
        if event.collection_date < start {
            continue;
        }
        let week_start = week_start_monday(event.collection_date.date_naive());
        weeks.entry(week_start).or_default().push(event.clone());
    }

    weeks
        .into_iter()
        .take(MAX_WEEKS)
        .enumerate()
        .map(|(index, (week_start, week_events))| {
            let mut days: BTreeMap<NaiveDate, Vec<CollectionEvent>> = BTreeMap::new();
            for event in week_events {
                days.entry(event.collection_date.date_naive())
                    .or_default()
                    .push(event);
            }

            let days = days
                .into_iter()
                .map(|(date, mut events)| {
                    // Stable sort: same-instant ties keep arrival order.
                    events.sort_by_key(|event| event.collection_date);
                    DayBucket { date, events }
                })
                .collect();

            WeekBucket {
                week_start_monday: week_start,
                label: week_label(index, now, baseline),
                days,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::BinType;
    use chrono::{Duration, TimeZone};

    fn instant(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn event(bin_type: BinType, collection_date: DateTime<Utc>) -> CollectionEvent {
        CollectionEvent {
            bin_type,
            collection_date,
            service_name: format!("{} service", bin_type.as_str()),
            uprn: "100081143111".to_string(),
        }
    }

    fn baseline() -> DateTime<Utc> {
        instant(2025, 8, 4, 0)
    }

    #[test]
    fn test_filter_boundary_is_inclusive_at_start() {
        let start = baseline();
        let events = vec![
            event(BinType::Purple, start - Duration::milliseconds(1)),
            event(BinType::Brown, start),
        ];

        let weeks = aggregate(start, start, baseline(), &events);

        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].days.len(), 1);
        assert_eq!(weeks[0].days[0].events.len(), 1);
        assert_eq!(weeks[0].days[0].events[0].bin_type, BinType::Brown);
    }

    #[test]
    fn test_no_upcoming_events_yields_empty_list() {
        let start = baseline();
        let events = vec![event(BinType::Purple, start - Duration::days(7))];

        assert!(aggregate(start, start, baseline(), &events).is_empty());
    }

    #[test]
    fn test_caps_at_six_weeks_and_every_bucket_is_non_empty() {
        let start = baseline();
        // One collection per week for nine weeks.
        let events: Vec<_> = (0..9)
            .map(|week| event(BinType::Purple, start + Duration::weeks(week) + Duration::hours(7)))
            .collect();

        let weeks = aggregate(start, start, baseline(), &events);

        assert_eq!(weeks.len(), MAX_WEEKS);
        assert!(weeks.iter().all(|week| !week.days.is_empty()));
        assert!(
            weeks
                .iter()
                .flat_map(|week| &week.days)
                .all(|day| !day.events.is_empty())
        );
        // The earliest six weeks survive, in ascending order.
        assert_eq!(weeks[0].week_start_monday, start.date_naive());
        assert_eq!(
            weeks[5].week_start_monday,
            (start + Duration::weeks(5)).date_naive()
        );
    }

    #[test]
    fn test_sunday_and_monday_fall_in_different_weeks() {
        let start = baseline();
        let sunday = instant(2025, 8, 10, 7);
        let monday = instant(2025, 8, 11, 7);
        let events = vec![event(BinType::Black, sunday), event(BinType::Blue, monday)];

        let weeks = aggregate(start, start, baseline(), &events);

        assert_eq!(weeks.len(), 2);
        assert_eq!(
            weeks[0].week_start_monday,
            NaiveDate::from_ymd_opt(2025, 8, 4).unwrap()
        );
        assert_eq!(
            weeks[1].week_start_monday,
            NaiveDate::from_ymd_opt(2025, 8, 11).unwrap()
        );
    }

    #[test]
    fn test_grouping_is_stable_under_input_reordering() {
        let start = baseline();
        let events = vec![
            event(BinType::Purple, instant(2025, 8, 5, 7)),
            event(BinType::Black, instant(2025, 8, 12, 7)),
            event(BinType::Brown, instant(2025, 8, 5, 9)),
            event(BinType::Food, instant(2025, 8, 7, 7)),
        ];

        let forward = aggregate(start, start, baseline(), &events);

        let mut reversed = events.clone();
        reversed.reverse();
        let backward = aggregate(start, start, baseline(), &reversed);

        // All instants differ, so the bucketing is identical.
        assert_eq!(forward, backward);

        // Within 2025-08-05, the 07:00 purple precedes the 09:00 brown
        // regardless of arrival order.
        assert_eq!(forward[0].days[0].events[0].bin_type, BinType::Purple);
        assert_eq!(forward[0].days[0].events[1].bin_type, BinType::Brown);
    }

    #[test]
    fn test_same_instant_ties_keep_arrival_order() {
        let start = baseline();
        let when = instant(2025, 8, 5, 7);
        let events = vec![event(BinType::Purple, when), event(BinType::Brown, when)];

        let forward = aggregate(start, start, baseline(), &events);
        assert_eq!(forward[0].days[0].events[0].bin_type, BinType::Purple);
        assert_eq!(forward[0].days[0].events[1].bin_type, BinType::Brown);

        let swapped = vec![event(BinType::Brown, when), event(BinType::Purple, when)];
        let backward = aggregate(start, start, baseline(), &swapped);
        assert_eq!(backward[0].days[0].events[0].bin_type, BinType::Brown);
        assert_eq!(backward[0].days[0].events[1].bin_type, BinType::Purple);
    }

    #[test]
    fn test_days_sorted_ascending_within_week() {
        let start = baseline();
        let events = vec![
            event(BinType::Food, instant(2025, 8, 7, 7)),
            event(BinType::Purple, instant(2025, 8, 5, 7)),
        ];

        let weeks = aggregate(start, start, baseline(), &events);

        assert_eq!(weeks.len(), 1);
        let dates: Vec<_> = weeks[0].days.iter().map(|day| day.date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2025, 8, 5).unwrap(),
                NaiveDate::from_ymd_opt(2025, 8, 7).unwrap(),
            ]
        );
    }

    #[test]
    fn test_labels_follow_bucket_index() {
        let start = baseline();
        let events = vec![
            event(BinType::Purple, instant(2025, 8, 5, 7)),
            event(BinType::Black, instant(2025, 8, 12, 7)),
            event(BinType::Blue, instant(2025, 8, 19, 7)),
        ];

        let after = aggregate(start, baseline(), baseline(), &events);
        assert_eq!(after[0].label, "Current Week");
        assert_eq!(after[1].label, "Week 2");
        assert_eq!(after[2].label, "Week 3");

        let before = aggregate(
            start,
            baseline() - Duration::hours(1),
            baseline(),
            &events,
        );
        assert_eq!(before[0].label, "Next Week");
        assert_eq!(before[1].label, "Week 2");
    }
}
