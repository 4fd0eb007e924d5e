//! Resident-facing labels for bins and collection events.

use crate::normalize::{BinType, CollectionEvent};

/// The material a bin collects, in resident-facing terms.
///
/// Blue-box and unknown bins have no fixed material; those fall back
/// to the upstream service label, or to the bin type itself when the
/// label is empty.
#[must_use]
pub fn material(event: &CollectionEvent) -> String {
    match event.bin_type {
        BinType::Black => "Mixed Recycling".to_string(),
        BinType::Blue => "Paper/Cardboard".to_string(),
        BinType::Purple => "Refuse/Non-Recycling".to_string(),
        BinType::Brown => "Garden Waste".to_string(),
        BinType::Food => "Food/Compost".to_string(),
        BinType::BlueBox | BinType::Unknown => {
            if event.service_name.is_empty() {
                event.bin_type.as_str().to_string()
            } else {
                event.service_name.clone()
            }
        }
    }
}

/// Display name for a bin. Food caddies are marketed as the "small
/// brown" bin locally; everything else is the capitalized type.
#[must_use]
pub fn bin_name(bin_type: BinType) -> String {
    match bin_type {
        BinType::Food => "Small Brown".to_string(),
        other => capitalize(other.as_str()),
    }
}

/// One rendered schedule line: `"Purple (Refuse/Non-Recycling)"`.
#[must_use]
pub fn display_line(event: &CollectionEvent) -> String {
    format!("{} ({})", bin_name(event.bin_type), material(event))
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
