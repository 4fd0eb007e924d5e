//! Weekly schedule aggregation.
//!
//! Filters out past collections, groups the rest into ISO-Monday week
//! buckets (at most six), sub-groups each week by calendar day, and
//! attaches week headings and per-bin display lines.

pub mod aggregate;
pub mod display;
pub mod types;
pub mod week;
