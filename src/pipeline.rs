//! The full lookup pipeline: postcode in, normalized schedule out.
//!
//! Stages run strictly in order (resolve, select, fetch details,
//! parse, normalize) with the cache consulted first. Two concurrent
//! lookups for the same key may both miss and fetch; neither result is
//! wrong, the later insert just wins.

use tracing::{debug, info};

use crate::cache::ScheduleCache;
use crate::error::Error;
use crate::normalize::{NormalizedProperty, normalize_payload};
use crate::parser::parse_payload;
use crate::resolver::{normalize_postcode, resolve, select_by_fragment};
use crate::services::council_api::CouncilApi;

/// Resolves `postcode`/`house` to a property and returns its
/// normalized schedule, via the cache when possible.
///
/// # Errors
///
/// Any [`Error`] from the underlying stages: `NotFound` from
/// resolution, `Upstream` from the API calls, `DateParse` or
/// `EmptySchedule` from normalization.
pub async fn lookup<C: CouncilApi>(
    api: &C,
    cache: &ScheduleCache,
    postcode: &str,
    house: &str,
) -> Result<NormalizedProperty, Error> {
    let postcode = normalize_postcode(postcode);

    if let Some(property) = cache.get(&postcode, house) {
        debug!(postcode, house, "serving schedule from cache");
        return Ok(property);
    }

    let candidates = resolve(api, &postcode).await?;
    let candidate = select_by_fragment(&candidates, house)?;
    info!(uprn = %candidate.uprn, address = %candidate.address, "property resolved");

    let payload = api
        .property_details(&candidate.uprn, &candidate.address)
        .await?;
    let raw = parse_payload(payload)?;
    let property = normalize_payload(&candidate.uprn, &candidate.address, &postcode, raw)?;

    info!(
        uprn = %property.uprn,
        events = property.collections.len(),
        garden_waste = property.subscriptions.garden_waste_active,
        "schedule normalized"
    );

    cache.insert(postcode, house.to_string(), property.clone());
    Ok(property)
}
