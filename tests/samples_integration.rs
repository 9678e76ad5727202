//! Integration tests for raw sample retrieval and sample writes
//!
//! Covers the pass-through query path (filter, sort, limit, unit
//! conversion), the write path with its round-trip behavior, limit boundary
//! semantics, and error propagation.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use vitalstore::error::StoreError;
use vitalstore::query::SamplePredicate;
use vitalstore::store::{MemoryStore, NativeQuantity, NativeSample};
use vitalstore::{Error, HealthClient, InsertRequest, RawQuery, SampleTypeId, Unit};

// ============================================================================
// Helper Functions
// ============================================================================

fn at(d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap()
}

fn heart_rate(start: DateTime<Utc>, bpm: f64) -> NativeSample {
    NativeSample::new(
        SampleTypeId::new("heartRate"),
        NativeQuantity::new(bpm, Unit::new("count/min")),
        start,
        start,
    )
}

fn seeded_client(samples: Vec<NativeSample>) -> (HealthClient, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    for sample in samples {
        store.insert(sample);
    }
    let client = vitalstore::ClientBuilder::from_arc(store.clone()).build();
    (client, store)
}

fn all_heart_rates() -> RawQuery {
    RawQuery::new(SamplePredicate::default(), Unit::new("count/min"))
}

// ============================================================================
// Raw retrieval
// ============================================================================

#[tokio::test]
async fn test_raw_results_sorted_ascending_by_start() {
    let (client, _) = seeded_client(vec![
        heart_rate(at(3, 0), 80.0),
        heart_rate(at(1, 0), 60.0),
        heart_rate(at(2, 0), 70.0),
    ]);

    let samples = client
        .raw_samples(SampleTypeId::new("heartRate"), all_heart_rates())
        .await
        .unwrap();

    assert_eq!(samples.len(), 3);
    for pair in samples.windows(2) {
        assert!(pair[0].start <= pair[1].start);
    }
    assert_eq!(samples[0].value, 60.0);
    assert_eq!(samples[2].value, 80.0);
}

#[tokio::test]
async fn test_raw_limit_bounds_result_count() {
    let samples: Vec<NativeSample> = (1..=10).map(|d| heart_rate(at(d, 0), 60.0)).collect();
    let (client, _) = seeded_client(samples);

    let result = client
        .raw_samples(
            SampleTypeId::new("heartRate"),
            all_heart_rates().with_limit(4),
        )
        .await
        .unwrap();

    assert_eq!(result.len(), 4);
}

#[tokio::test]
async fn test_raw_limit_zero_returns_empty_not_error() {
    let (client, _) = seeded_client(vec![heart_rate(at(1, 0), 60.0)]);

    // Explicit zero means "nothing", not "unbounded"
    let result = client
        .raw_samples(
            SampleTypeId::new("heartRate"),
            all_heart_rates().with_limit(0),
        )
        .await
        .unwrap();

    assert!(result.is_empty());
}

#[tokio::test]
async fn test_client_cap_clamps_raw_limits() {
    let samples: Vec<NativeSample> = (1..=10).map(|d| heart_rate(at(d, 0), 60.0)).collect();
    let store = Arc::new(MemoryStore::new());
    for sample in samples {
        store.insert(sample);
    }
    let client = vitalstore::ClientBuilder::from_arc(store)
        .max_raw_results(3)
        .build();

    // Unbounded request gets the cap
    let result = client
        .raw_samples(SampleTypeId::new("heartRate"), all_heart_rates())
        .await
        .unwrap();
    assert_eq!(result.len(), 3);

    // Tighter per-query limits still win
    let result = client
        .raw_samples(
            SampleTypeId::new("heartRate"),
            all_heart_rates().with_limit(2),
        )
        .await
        .unwrap();
    assert_eq!(result.len(), 2);
}

#[tokio::test]
async fn test_raw_time_window_filter() {
    let (client, _) = seeded_client(vec![
        heart_rate(at(1, 0), 60.0),
        heart_rate(at(2, 0), 70.0),
        heart_rate(at(3, 0), 80.0),
    ]);

    let query = RawQuery::new(
        SamplePredicate {
            start: Some(at(2, 0)),
            end: Some(at(2, 23)),
            is_user_entered: None,
        },
        Unit::new("count/min"),
    );

    let samples = client
        .raw_samples(SampleTypeId::new("heartRate"), query)
        .await
        .unwrap();
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].value, 70.0);
}

#[tokio::test]
async fn test_raw_incompatible_unit_fails() {
    let (client, _) = seeded_client(vec![heart_rate(at(1, 0), 60.0)]);

    let err = client
        .raw_samples(
            SampleTypeId::new("heartRate"),
            RawQuery::new(SamplePredicate::default(), Unit::new("kcal")),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Unit(_)));
}

// ============================================================================
// Writes
// ============================================================================

#[tokio::test]
async fn test_insert_then_raw_query_round_trip() {
    let (client, _) = seeded_client(vec![]);

    let request = InsertRequest::new(
        SampleTypeId::new("stepCount"),
        100.0,
        Unit::new("count"),
        at(1, 10),
        at(1, 11),
    )
    .unwrap();
    client.save_sample(request).await.unwrap();

    let samples = client
        .raw_samples(
            SampleTypeId::new("stepCount"),
            RawQuery::new(SamplePredicate::default(), Unit::new("count")),
        )
        .await
        .unwrap();

    assert_eq!(samples.len(), 1);
    assert!((samples[0].value - 100.0).abs() < 1e-9);
    assert_eq!(samples[0].start, at(1, 10));
    assert_eq!(samples[0].end, at(1, 11));
}

#[tokio::test]
async fn test_insert_metadata_persisted() {
    let (client, store) = seeded_client(vec![]);

    let mut metadata = HashMap::new();
    metadata.insert("source".to_string(), "chest strap".to_string());

    let request = InsertRequest::new(
        SampleTypeId::new("heartRate"),
        62.0,
        Unit::new("count/min"),
        at(1, 8),
        at(1, 8),
    )
    .unwrap()
    .with_metadata(metadata);
    client.save_sample(request).await.unwrap();

    assert_eq!(store.count(&SampleTypeId::new("heartRate")), 1);
}

#[tokio::test]
async fn test_persist_failure_surfaces() {
    let (client, store) = seeded_client(vec![]);
    store.inject_failure(StoreError::PermissionDenied("write not granted".into()));

    let request = InsertRequest::new(
        SampleTypeId::new("stepCount"),
        1.0,
        Unit::new("count"),
        at(1, 0),
        at(1, 0),
    )
    .unwrap();

    let err = client.save_sample(request).await.unwrap_err();
    assert!(matches!(err, Error::Store(StoreError::PermissionDenied(_))));
}

// ============================================================================
// Wire representability
// ============================================================================

#[tokio::test]
async fn test_results_serialize_to_json() {
    let (client, _) = seeded_client(vec![heart_rate(at(1, 0), 61.5)]);

    let samples = client
        .raw_samples(SampleTypeId::new("heartRate"), all_heart_rates())
        .await
        .unwrap();

    let json = serde_json::to_string(&samples).unwrap();
    assert!(json.contains("61.5"));
    assert!(json.contains("count/min"));
    // Instants serialize in RFC 3339 form
    assert!(json.contains("2024-01-01T00:00:00Z"));
}
