//! Output formatting and persistence for collection schedules.
//!
//! Supports the resident-facing text view, JSON serialization, and
//! CSV append.

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::normalize::{CollectionEvent, NormalizedProperty};
use crate::schedule::display::{bin_name, display_line, material};
use crate::schedule::types::WeekBucket;
use crate::schedule::week::day_label;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// A property's schedule bundled with its week buckets, as one
/// serializable value for `--json` output.
#[derive(Debug, Serialize)]
pub struct ScheduleView<'a> {
    pub property: &'a NormalizedProperty,
    pub weeks: &'a [WeekBucket],
}

/// Renders the weekly view as indented text, one line per collection.
#[must_use]
pub fn render_schedule(property: &NormalizedProperty, weeks: &[WeekBucket]) -> String {
    let mut out = String::new();
    out.push_str(&property.address);
    out.push('\n');
    if property.subscriptions.garden_waste_active {
        out.push_str("Garden waste subscription: active\n");
    }

    if weeks.is_empty() {
        out.push_str("\nNo upcoming collections.\n");
        return out;
    }

    for week in weeks {
        out.push_str(&format!(
            "\n{} (w/c {})\n",
            week.label,
            week.week_start_monday.format("%-d %B")
        ));
        for day in &week.days {
            out.push_str(&format!("  {}\n", day_label(day.date)));
            for event in &day.events {
                out.push_str(&format!("    {}\n", display_line(event)));
            }
        }
    }

    out
}

/// Prints a schedule view as pretty-printed JSON on stdout.
pub fn print_json(view: &ScheduleView<'_>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(view)?);
    Ok(())
}

#[derive(Serialize)]
struct EventRow<'a> {
    collection_date: String,
    bin_type: &'a str,
    bin_name: String,
    material: String,
    service_name: &'a str,
    uprn: &'a str,
}

/// Appends one CSV row per collection event to a file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_events(path: &str, events: &[CollectionEvent]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, count = events.len(), "Appending CSV rows");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for event in events {
        writer.serialize(EventRow {
            collection_date: event.collection_date.to_rfc3339(),
            bin_type: event.bin_type.as_str(),
            bin_name: bin_name(event.bin_type),
            material: material(event),
            service_name: &event.service_name,
            uprn: &event.uprn,
        })?;
    }
    writer.flush()?;

    Ok(())
}
