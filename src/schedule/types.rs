//! Data types produced by the weekly aggregation.

use chrono::NaiveDate;
use serde::Serialize;

use crate::normalize::CollectionEvent;

/// Collections for one calendar day. Events are ordered by instant
/// ascending; same-instant ties keep upstream arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub events: Vec<CollectionEvent>,
}

/// One ISO-Monday week of collections. Days are ordered ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekBucket {
    pub week_start_monday: NaiveDate,
    /// Heading: "Current Week", "Next Week", or "Week N".
    pub label: String,
    pub days: Vec<DayBucket>,
}
