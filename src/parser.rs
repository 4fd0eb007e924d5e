//! Decoder for the two property-details payload shapes.
//!
//! The council API answers a property-details request with one of two
//! JSON shapes: the new canonical shape (records under `collections`)
//! or the legacy shape (records under `services`). Shape detection is
//! explicit and happens exactly once per payload: a payload is one
//! shape or the other, never a mix.

use serde::Deserialize;
use serde_json::Value;

use crate::error::Error;

/// A property-details payload after shape detection.
#[derive(Debug)]
pub enum RawPayload {
    /// New shape: canonical-ish records, subscriptions already present.
    Canonical(CanonicalPayload),
    /// Legacy shape: records under `services[]`, free-text bin types,
    /// property fields hoisted to the top level.
    Legacy(LegacyPayload),
}

/// New-shape payload. Extra upstream fields (`serviceStatus`, `roundId`
/// and friends) are ignored by the decoder.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalPayload {
    #[serde(default)]
    pub uprn: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub collections: Vec<CanonicalRecord>,
    #[serde(default)]
    pub subscriptions: Option<RawSubscriptions>,
}

/// One record from a new-shape `collections` array.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRecord {
    pub bin_type: String,
    pub collection_date: String,
    #[serde(default)]
    pub service_name: Option<String>,
}

/// Subscription block as the new shape reports it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSubscriptions {
    #[serde(default)]
    pub garden_waste_active: bool,
    #[serde(default)]
    pub garden_waste_subscription_count: u32,
}

/// Legacy-shape payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPayload {
    #[serde(default)]
    pub uprn: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    pub services: Vec<LegacyService>,
}

/// One record from a legacy `services` array. `serviceType` doubles as
/// the display name; `binType` is free text that still needs
/// classification.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyService {
    pub service_type: String,
    #[serde(default)]
    pub bin_type: Option<String>,
    pub collection_date: String,
}

/// Returns `true` when the payload is the legacy shape: a top-level
/// `services` array with at least one entry. An empty `services` array
/// does not count; such payloads fall through to the canonical decoder.
#[must_use]
pub fn is_legacy_shape(value: &Value) -> bool {
    value
        .get("services")
        .and_then(Value::as_array)
        .is_some_and(|services| !services.is_empty())
}

/// Decodes a property-details payload into its detected shape.
///
/// # Errors
///
/// Returns [`Error::Upstream`] when the payload does not deserialize as
/// the detected shape; a structurally malformed response is an upstream
/// fault, not a date problem.
pub fn parse_payload(value: Value) -> Result<RawPayload, Error> {
    if is_legacy_shape(&value) {
        let payload: LegacyPayload = serde_json::from_value(value)
            .map_err(|e| Error::Upstream(format!("malformed legacy payload: {e}")))?;
        Ok(RawPayload::Legacy(payload))
    } else {
        let payload: CanonicalPayload = serde_json::from_value(value)
            .map_err(|e| Error::Upstream(format!("malformed property payload: {e}")))?;
        Ok(RawPayload::Canonical(payload))
    }
}
