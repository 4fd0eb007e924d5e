//! Canonical collection events and bin-type normalization.
//!
//! Both upstream shapes reduce to the same [`CollectionEvent`] list.
//! Legacy records carry free-text bin descriptions ("Purple Lidded
//! Bin", "Blue Box") that are classified by keyword; new-shape records
//! carry near-canonical values that only need lowercasing. Either way
//! the invariant holds: `bin_type` is always one of the enumerated
//! values, and anything unrecognized becomes [`BinType::Unknown`]
//! rather than leaking through as a raw string.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;

use crate::error::Error;
use crate::parser::{CanonicalPayload, LegacyPayload, RawPayload};

/// Canonical bin category, lowercase (kebab-case) on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BinType {
    Black,
    Blue,
    BlueBox,
    Purple,
    Brown,
    Food,
    Unknown,
}

impl BinType {
    /// Classifies a free-text legacy bin description by keyword.
    ///
    /// Checks run in fixed priority order and the first match wins, so
    /// overlapping descriptions are deterministic: purple beats black,
    /// black beats the blue rules, and "lid" beats "box" for blue bins.
    /// Case-insensitive. Anything unmatched is [`BinType::Unknown`].
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        let lower = raw.to_lowercase();

        if lower.contains("purple") {
            return BinType::Purple;
        }
        if lower.contains("black") {
            return BinType::Black;
        }
        if lower.contains("blue") && lower.contains("lid") {
            return BinType::Blue;
        }
        if lower.contains("blue") && lower.contains("box") {
            return BinType::BlueBox;
        }
        if lower.contains("brown") {
            return BinType::Brown;
        }
        if lower.contains("food") {
            return BinType::Food;
        }

        BinType::Unknown
    }

    /// Maps a new-shape value onto the enum: lowercase, exact names
    /// only. Unrecognized values also map to [`BinType::Unknown`].
    #[must_use]
    pub fn from_canonical(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "black" => BinType::Black,
            "blue" => BinType::Blue,
            "blue-box" => BinType::BlueBox,
            "purple" => BinType::Purple,
            "brown" => BinType::Brown,
            "food" => BinType::Food,
            _ => BinType::Unknown,
        }
    }

    /// The canonical lowercase string for this bin type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BinType::Black => "black",
            BinType::Blue => "blue",
            BinType::BlueBox => "blue-box",
            BinType::Purple => "purple",
            BinType::Brown => "brown",
            BinType::Food => "food",
            BinType::Unknown => "unknown",
        }
    }
}

/// One normalized collection: a bin type on a date for a property.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionEvent {
    pub bin_type: BinType,
    pub collection_date: DateTime<Utc>,
    /// Free-text service label; the display fallback when `bin_type`
    /// is unknown.
    pub service_name: String,
    /// Property identifier, carried for traceability only.
    pub uprn: String,
}

// `uprn` is excluded from equality on purpose: two events describing
// the same bin on the same date are the same event regardless of which
// property record they arrived through.
impl PartialEq for CollectionEvent {
    fn eq(&self, other: &Self) -> bool {
        self.bin_type == other.bin_type
            && self.collection_date == other.collection_date
            && self.service_name == other.service_name
    }
}

impl Eq for CollectionEvent {}

/// Garden-waste subscription state for a property.
///
/// `garden_waste_subscription_count` is a presence flag (0 or 1), not
/// a tally: upstream never reports how many subscriptions exist, only
/// whether a garden-waste service appears at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Subscriptions {
    pub garden_waste_active: bool,
    pub garden_waste_subscription_count: u32,
}

/// A property's full normalized schedule.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedProperty {
    pub uprn: String,
    pub address: String,
    pub postcode: String,
    pub collections: Vec<CollectionEvent>,
    pub subscriptions: Subscriptions,
}

/// Reduces a decoded payload to a [`NormalizedProperty`] for the
/// property resolved as `uprn`/`address`/`postcode`. Top-level fields
/// present in the payload win over the resolved ones.
///
/// # Errors
///
/// [`Error::DateParse`] if any record's date fails to parse (the whole
/// normalization aborts; a partial schedule would be misleading), and
/// [`Error::EmptySchedule`] if the payload yields zero events.
pub fn normalize_payload(
    uprn: &str,
    address: &str,
    postcode: &str,
    payload: RawPayload,
) -> Result<NormalizedProperty, Error> {
    let property = match payload {
        RawPayload::Canonical(canonical) => normalize_canonical(uprn, address, postcode, canonical),
        RawPayload::Legacy(legacy) => normalize_legacy(uprn, address, postcode, legacy),
    }?;

    if property.collections.is_empty() {
        return Err(Error::EmptySchedule);
    }

    Ok(property)
}

fn normalize_canonical(
    uprn: &str,
    address: &str,
    postcode: &str,
    payload: CanonicalPayload,
) -> Result<NormalizedProperty, Error> {
    let uprn = payload.uprn.unwrap_or_else(|| uprn.to_string());

    let mut collections = Vec::with_capacity(payload.collections.len());
    for record in payload.collections {
        collections.push(CollectionEvent {
            bin_type: BinType::from_canonical(&record.bin_type),
            collection_date: parse_instant(&record.collection_date)?,
            service_name: record.service_name.unwrap_or_default(),
            uprn: uprn.clone(),
        });
    }

    let subscriptions = payload
        .subscriptions
        .map(|s| Subscriptions {
            garden_waste_active: s.garden_waste_active,
            garden_waste_subscription_count: s.garden_waste_subscription_count,
        })
        .unwrap_or_default();

    Ok(NormalizedProperty {
        uprn,
        address: payload.address.unwrap_or_else(|| address.to_string()),
        postcode: payload.postcode.unwrap_or_else(|| postcode.to_string()),
        collections,
        subscriptions,
    })
}

fn normalize_legacy(
    uprn: &str,
    address: &str,
    postcode: &str,
    payload: LegacyPayload,
) -> Result<NormalizedProperty, Error> {
    let uprn = payload.uprn.unwrap_or_else(|| uprn.to_string());

    let mut garden_waste = false;
    let mut collections = Vec::with_capacity(payload.services.len());

    for service in payload.services {
        if service.service_type.to_lowercase().contains("garden waste") {
            garden_waste = true;
        }

        collections.push(CollectionEvent {
            bin_type: BinType::from_raw(service.bin_type.as_deref().unwrap_or("")),
            collection_date: parse_instant(&service.collection_date)?,
            service_name: service.service_type,
            uprn: uprn.clone(),
        });
    }

    Ok(NormalizedProperty {
        uprn,
        address: payload.address.unwrap_or_else(|| address.to_string()),
        postcode: payload.postcode.unwrap_or_else(|| postcode.to_string()),
        collections,
        subscriptions: Subscriptions {
            garden_waste_active: garden_waste,
            garden_waste_subscription_count: u32::from(garden_waste),
        },
    })
}

/// Parses an upstream collection date into an instant.
///
/// RFC 3339 is what both shapes emit; the two fallback forms cover the
/// offset-less and date-only strings the legacy shape has been seen to
/// produce. Date-only values land at midnight UTC. Anything else is
/// [`Error::DateParse`], never silently coerced to "now".
fn parse_instant(raw: &str) -> Result<DateTime<Utc>, Error> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(Error::DateParse(raw.to_string()))
}
