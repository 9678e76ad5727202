//! Core trait and native record types for the store collaborator

use crate::query::{BucketInterval, SamplePredicate};
use crate::store::completion::Completion;
use crate::types::SampleTypeId;
use crate::unit::Unit;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// =============================================================================
// Native record types
// =============================================================================

/// A scalar value in the unit the store recorded it in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeQuantity {
    /// Measurement value
    pub value: f64,
    /// Unit the store holds the value in
    pub unit: Unit,
}

impl NativeQuantity {
    /// Create a native quantity
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }
}

/// A raw sample record as the store holds it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeSample {
    /// Store-assigned record identifier
    pub id: Uuid,
    /// Sample type the record belongs to
    pub sample_type: SampleTypeId,
    /// Recorded value and native unit
    pub quantity: NativeQuantity,
    /// Start of the span the measurement covers
    pub start: DateTime<Utc>,
    /// End of the span the measurement covers
    pub end: DateTime<Utc>,
    /// Whether the sample was entered manually by the user
    pub user_entered: bool,
    /// Key-value metadata persisted with the record
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl NativeSample {
    /// Create a device-recorded sample with a fresh identifier and no metadata
    pub fn new(
        sample_type: SampleTypeId,
        quantity: NativeQuantity,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sample_type,
            quantity,
            start,
            end,
            user_entered: false,
            metadata: HashMap::new(),
        }
    }

    /// Mark the sample as entered manually by the user
    pub fn user_entered(mut self) -> Self {
        self.user_entered = true;
        self
    }

    /// Attach metadata
    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Which statistics the store should precompute per bucket
///
/// The store only materializes what the query asks for; fields left `false`
/// come back as `None` in every [`BucketStatistics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsOptions {
    /// Precompute the per-bucket sum
    pub sum: bool,
    /// Precompute the per-bucket arithmetic mean
    pub average: bool,
    /// Precompute the per-bucket minimum
    pub min: bool,
    /// Precompute the per-bucket maximum
    pub max: bool,
    /// Precompute the value of the latest-starting sample per bucket
    pub most_recent: bool,
}

/// Statistics the store precomputed for one bucket
///
/// The bucket spans `[start, end)`. A bucket with no contributing samples has
/// every statistic set to `None`, never zero. The sum in particular is
/// undefined for an empty bucket, not `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketStatistics {
    /// Bucket start (inclusive)
    pub start: DateTime<Utc>,
    /// Bucket end (exclusive)
    pub end: DateTime<Utc>,
    /// Sum of contributing values, if requested and the bucket is non-empty
    pub sum: Option<NativeQuantity>,
    /// Arithmetic mean of contributing values
    pub average: Option<NativeQuantity>,
    /// Minimum contributing value
    pub min: Option<NativeQuantity>,
    /// Maximum contributing value
    pub max: Option<NativeQuantity>,
    /// Value of the contributing sample with the latest start time
    pub most_recent: Option<NativeQuantity>,
}

impl BucketStatistics {
    /// Create a bucket with no statistics populated
    pub fn empty(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            sum: None,
            average: None,
            min: None,
            max: None,
            most_recent: None,
        }
    }
}

/// Pre-bucketed statistics for one query, in ascending bucket order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsCollection {
    /// Buckets in ascending start-time order, tiling the queried span
    pub buckets: Vec<BucketStatistics>,
}

// =============================================================================
// Store requests
// =============================================================================

/// Request for a pre-bucketed statistics query
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsRequest {
    /// Sample type to aggregate
    pub sample_type: SampleTypeId,
    /// Filter restricting which samples contribute
    pub predicate: SamplePredicate,
    /// Which statistics to materialize per bucket
    pub options: StatisticsOptions,
    /// Reference instant the bucket grid is anchored at
    pub anchor: DateTime<Utc>,
    /// Bucket step size
    pub interval: BucketInterval,
}

/// Request for a raw sample fetch
#[derive(Debug, Clone, PartialEq)]
pub struct SampleQueryRequest {
    /// Sample type to fetch
    pub sample_type: SampleTypeId,
    /// Filter restricting which samples are returned
    pub predicate: SamplePredicate,
    /// Maximum number of records; `None` is unbounded
    pub limit: Option<usize>,
    /// Sort ascending by sample start time
    pub ascending: bool,
}

// =============================================================================
// HealthStore trait
// =============================================================================

/// Core trait for the external health-data store
///
/// The store API is completion-handler style: each operation receives a
/// [`Completion`] it must resolve exactly once: success with a result or
/// failure with an error, never both, never neither. All asynchrony
/// originates here; the core itself never spawns background work.
///
/// # Cancellation
///
/// Not supported. Once an operation is submitted there is no contract for
/// aborting it early; the core awaits the completion or the caller drops the
/// future, in which case the store's work runs to completion unobserved.
/// This mirrors the underlying platform API.
pub trait HealthStore: Send + Sync + 'static {
    /// Execute a bucketed statistics query
    ///
    /// The store partitions matching samples into buckets anchored at
    /// `request.anchor` with `request.interval` steps, precomputes the
    /// requested statistics, and resolves the completion with the buckets in
    /// ascending order.
    fn execute_statistics_query(
        &self,
        request: StatisticsRequest,
        completion: Completion<StatisticsCollection>,
    );

    /// Execute a filtered, sorted, limited raw sample fetch
    fn execute_sample_query(
        &self,
        request: SampleQueryRequest,
        completion: Completion<Vec<NativeSample>>,
    );

    /// Persist one native sample
    ///
    /// No read-after-write guarantee: a subsequent query may or may not
    /// observe the record immediately.
    fn persist_sample(&self, sample: NativeSample, completion: Completion<()>);
}
