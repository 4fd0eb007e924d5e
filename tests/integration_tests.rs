use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use serde_json::{Value, json};

use bin_day::cache::ScheduleCache;
use bin_day::error::Error;
use bin_day::normalize::BinType;
use bin_day::pipeline;
use bin_day::schedule::aggregate::aggregate;
use bin_day::schedule::week::{cutover_start, service_baseline};
use bin_day::services::council_api::{AddressCandidate, CouncilApi};

/// In-process stand-in for the council API, with call counters so
/// tests can assert what the cache absorbed.
struct FakeCouncilApi {
    candidates: Vec<AddressCandidate>,
    payload: Value,
    searches: AtomicUsize,
    details: AtomicUsize,
}

impl FakeCouncilApi {
    fn new(payload: Value) -> Self {
        Self {
            candidates: vec![
                AddressCandidate {
                    uprn: "100081143111".to_string(),
                    address: "1 High Street, Bishop's Stortford, CM23 1AB".to_string(),
                },
                AddressCandidate {
                    uprn: "100081143112".to_string(),
                    address: "12 High Street, Bishop's Stortford, CM23 1AB".to_string(),
                },
            ],
            payload,
            searches: AtomicUsize::new(0),
            details: AtomicUsize::new(0),
        }
    }

    fn without_candidates(payload: Value) -> Self {
        Self {
            candidates: Vec::new(),
            ..Self::new(payload)
        }
    }
}

#[async_trait]
impl CouncilApi for FakeCouncilApi {
    async fn search_addresses(&self, _postcode: &str) -> Result<Vec<AddressCandidate>, Error> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        Ok(self.candidates.clone())
    }

    async fn property_details(&self, _uprn: &str, _address: &str) -> Result<Value, Error> {
        self.details.fetch_add(1, Ordering::SeqCst);
        Ok(self.payload.clone())
    }
}

fn legacy_payload() -> Value {
    serde_json::from_str(include_str!("fixtures/variant_b.json")).expect("fixture is valid JSON")
}

fn canonical_payload() -> Value {
    serde_json::from_str(include_str!("fixtures/variant_a.json")).expect("fixture is valid JSON")
}

#[tokio::test]
async fn test_lookup_resolves_and_normalizes_legacy_payload() {
    let api = FakeCouncilApi::new(legacy_payload());
    let cache = ScheduleCache::new();

    let property = pipeline::lookup(&api, &cache, "cm231ab", "12")
        .await
        .expect("lookup should succeed");

    assert_eq!(property.uprn, "100081143112");
    assert_eq!(property.postcode, "CM23 1AB");
    assert_eq!(property.collections.len(), 2);
    assert_eq!(property.collections[0].bin_type, BinType::Purple);
    assert_eq!(property.collections[1].bin_type, BinType::Brown);
    assert_eq!(
        property.collections[0].collection_date,
        Utc.with_ymd_and_hms(2025, 8, 5, 7, 0, 0).unwrap()
    );
    assert!(property.subscriptions.garden_waste_active);
    assert_eq!(property.subscriptions.garden_waste_subscription_count, 1);
}

#[tokio::test]
async fn test_lookup_schedule_lands_in_week_of_monday_4_august() {
    let api = FakeCouncilApi::new(legacy_payload());
    let cache = ScheduleCache::new();

    let property = pipeline::lookup(&api, &cache, "CM23 1AB", "12")
        .await
        .expect("lookup should succeed");

    let baseline = service_baseline();
    let weeks = aggregate(
        cutover_start(baseline, baseline),
        baseline,
        baseline,
        &property.collections,
    );

    assert_eq!(weeks.len(), 1);
    assert_eq!(
        weeks[0].week_start_monday,
        NaiveDate::from_ymd_opt(2025, 8, 4).unwrap()
    );
    assert_eq!(weeks[0].label, "Current Week");
    assert_eq!(weeks[0].days.len(), 1);
    assert_eq!(
        weeks[0].days[0].date,
        NaiveDate::from_ymd_opt(2025, 8, 5).unwrap()
    );
    assert_eq!(weeks[0].days[0].events.len(), 2);
}

#[tokio::test]
async fn test_first_week_is_next_week_before_the_service_baseline() {
    let api = FakeCouncilApi::new(legacy_payload());
    let cache = ScheduleCache::new();

    let property = pipeline::lookup(&api, &cache, "CM23 1AB", "12")
        .await
        .expect("lookup should succeed");

    let baseline = service_baseline();
    let now = baseline - Duration::hours(1);
    let weeks = aggregate(
        cutover_start(now, baseline),
        now,
        baseline,
        &property.collections,
    );

    assert_eq!(weeks[0].label, "Next Week");
}

#[tokio::test]
async fn test_second_lookup_is_served_from_cache() {
    let api = FakeCouncilApi::new(legacy_payload());
    let cache = ScheduleCache::new();

    let first = pipeline::lookup(&api, &cache, "cm231ab", "12")
        .await
        .expect("first lookup should succeed");
    // Different postcode spelling, same normalized key.
    let second = pipeline::lookup(&api, &cache, "CM23 1AB", "12")
        .await
        .expect("second lookup should succeed");

    assert_eq!(api.searches.load(Ordering::SeqCst), 1);
    assert_eq!(api.details.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len(), 1);
    assert_eq!(first.collections, second.collections);
}

#[tokio::test]
async fn test_distinct_houses_are_distinct_cache_entries() {
    let api = FakeCouncilApi::new(legacy_payload());
    let cache = ScheduleCache::new();

    pipeline::lookup(&api, &cache, "CM23 1AB", "12")
        .await
        .expect("lookup for house 12 should succeed");
    pipeline::lookup(&api, &cache, "CM23 1AB", "1")
        .await
        .expect("lookup for house 1 should succeed");

    assert_eq!(api.searches.load(Ordering::SeqCst), 2);
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn test_lookup_decodes_canonical_payload() {
    let api = FakeCouncilApi::new(canonical_payload());
    let cache = ScheduleCache::new();

    let property = pipeline::lookup(&api, &cache, "CM23 1AB", "12")
        .await
        .expect("lookup should succeed");

    // Extra record fields (serviceStatus, roundId) are tolerated.
    assert_eq!(property.collections.len(), 2);
    assert_eq!(property.collections[0].bin_type, BinType::Black);
    assert_eq!(property.collections[1].bin_type, BinType::Food);
    assert_eq!(
        property.collections[1].service_name,
        "Food Waste Collection Service"
    );
    assert!(!property.subscriptions.garden_waste_active);
}

#[tokio::test]
async fn test_unknown_postcode_is_not_found() {
    let api = FakeCouncilApi::without_candidates(legacy_payload());
    let cache = ScheduleCache::new();

    let result = pipeline::lookup(&api, &cache, "SG14 9ZZ", "12").await;

    match result {
        Err(Error::NotFound(message)) => {
            assert_eq!(message, "No addresses found for that postcode.");
        }
        other => panic!("expected not-found, got {other:?}"),
    }
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_unmatched_house_is_not_found() {
    let api = FakeCouncilApi::new(legacy_payload());
    let cache = ScheduleCache::new();

    let result = pipeline::lookup(&api, &cache, "CM23 1AB", "99").await;

    match result {
        Err(Error::NotFound(message)) => {
            assert_eq!(message, "House number not found for that postcode.");
        }
        other => panic!("expected not-found, got {other:?}"),
    }
}

#[tokio::test]
async fn test_payload_without_collections_is_empty_schedule() {
    let api = FakeCouncilApi::new(json!({"collections": []}));
    let cache = ScheduleCache::new();

    let result = pipeline::lookup(&api, &cache, "CM23 1AB", "12").await;

    assert!(matches!(result, Err(Error::EmptySchedule)));
    // Failures are never cached.
    assert!(cache.is_empty());
}
