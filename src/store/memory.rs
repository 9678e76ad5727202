//! In-memory store implementation
//!
//! A lightweight [`HealthStore`] for unit and integration testing without the
//! platform store, and for prototyping against the client API. All operations
//! resolve their completion synchronously from the calling thread.
//!
//! # Warning
//!
//! **Not suitable for production use.** Data lives in process memory and is
//! lost on drop; there is no persistence, no access control, and no attempt
//! at the platform store's performance characteristics.
//!
//! # Example
//!
//! ```rust,ignore
//! use vitalstore::store::{MemoryStore, NativeQuantity, NativeSample};
//!
//! let store = MemoryStore::new();
//! store.insert(NativeSample::new(
//!     "stepCount".into(),
//!     NativeQuantity::new(512.0, "count".into()),
//!     start,
//!     end,
//! ));
//! ```

use crate::error::StoreError;
use crate::query::SamplePredicate;
use crate::store::completion::Completion;
use crate::store::traits::{
    BucketStatistics, HealthStore, NativeQuantity, NativeSample, SampleQueryRequest,
    StatisticsCollection, StatisticsOptions, StatisticsRequest,
};
use crate::types::SampleTypeId;
use crate::unit::Unit;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use tracing::debug;

/// In-memory health-data store
#[derive(Default)]
pub struct MemoryStore {
    samples: RwLock<HashMap<SampleTypeId, Vec<NativeSample>>>,
    injected_failure: Mutex<Option<StoreError>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a sample directly, bypassing the persist path
    pub fn insert(&self, sample: NativeSample) {
        self.samples
            .write()
            .entry(sample.sample_type.clone())
            .or_default()
            .push(sample);
    }

    /// Number of stored samples for a type
    pub fn count(&self, sample_type: &SampleTypeId) -> usize {
        self.samples
            .read()
            .get(sample_type)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Make the next operation fail with `error` instead of executing
    pub fn inject_failure(&self, error: StoreError) {
        *self.injected_failure.lock() = Some(error);
    }

    fn take_injected_failure(&self) -> Option<StoreError> {
        self.injected_failure.lock().take()
    }

    /// Samples of one type matching a predicate, in insertion order
    fn matching(
        &self,
        sample_type: &SampleTypeId,
        predicate: &SamplePredicate,
    ) -> Vec<NativeSample> {
        self.samples
            .read()
            .get(sample_type)
            .map(|all| {
                all.iter()
                    .filter(|s| predicate.matches(s.start, s.user_entered))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Compute the bucket grid and per-bucket statistics for a request
    fn bucketed_statistics(
        &self,
        request: &StatisticsRequest,
    ) -> Result<StatisticsCollection, StoreError> {
        let samples = self.matching(&request.sample_type, &request.predicate);

        // The grid must cover the predicate window when given, otherwise the
        // span of the data itself
        let lo = request
            .predicate
            .start
            .or_else(|| samples.iter().map(|s| s.start).min());
        let hi = request
            .predicate
            .end
            .or_else(|| samples.iter().map(|s| s.start).max());

        let (lo, hi) = match (lo, hi) {
            (Some(lo), Some(hi)) if lo <= hi => (lo, hi),
            _ => return Ok(StatisticsCollection::default()),
        };

        // Every boundary is computed directly from the anchor by bucket
        // index, so month-interval end-of-month clamping never accumulates
        // across buckets and the grid stays on `anchor + k * interval`
        let grid = |k: i32| request.interval.boundary(request.anchor, k);

        // Index of the grid bucket containing `lo`
        let mut k: i32 = 0;
        while grid(k) > lo {
            k -= 1;
        }
        while grid(k + 1) <= lo {
            k += 1;
        }

        // The statistics unit is the native unit of the first contributing
        // sample; mixed units convert into it or the query fails
        let stat_unit = samples.first().map(|s| s.quantity.unit.clone());

        let mut buckets = Vec::new();
        while grid(k) <= hi {
            let bucket = self.compute_bucket(
                grid(k),
                grid(k + 1),
                &samples,
                stat_unit.as_ref(),
                &request.options,
            )?;
            buckets.push(bucket);
            k += 1;
        }

        debug!(
            sample_type = %request.sample_type,
            buckets = buckets.len(),
            "computed bucketed statistics"
        );
        Ok(StatisticsCollection { buckets })
    }

    fn compute_bucket(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        samples: &[NativeSample],
        stat_unit: Option<&Unit>,
        options: &StatisticsOptions,
    ) -> Result<BucketStatistics, StoreError> {
        let mut bucket = BucketStatistics::empty(start, end);

        // Contributing values converted into the statistics unit, paired with
        // the sample start time for most-recent selection
        let mut values: Vec<(DateTime<Utc>, f64)> = Vec::new();
        for sample in samples {
            if sample.start < start || sample.start >= end {
                continue;
            }
            let unit = match stat_unit {
                Some(unit) => unit,
                None => break,
            };
            let value = sample
                .quantity
                .unit
                .convert(sample.quantity.value, unit)
                .map_err(|e| StoreError::Execution(format!("mixed sample units: {}", e)))?;
            values.push((sample.start, value));
        }

        if values.is_empty() {
            return Ok(bucket);
        }
        let unit = stat_unit.cloned().unwrap_or_else(|| Unit::new("count"));

        if options.sum {
            let sum = values.iter().map(|(_, v)| v).sum();
            bucket.sum = Some(NativeQuantity::new(sum, unit.clone()));
        }
        if options.average {
            let sum: f64 = values.iter().map(|(_, v)| v).sum();
            bucket.average = Some(NativeQuantity::new(sum / values.len() as f64, unit.clone()));
        }
        if options.min {
            let min = values.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
            bucket.min = Some(NativeQuantity::new(min, unit.clone()));
        }
        if options.max {
            let max = values
                .iter()
                .map(|(_, v)| *v)
                .fold(f64::NEG_INFINITY, f64::max);
            bucket.max = Some(NativeQuantity::new(max, unit.clone()));
        }
        if options.most_recent {
            let latest = values
                .iter()
                .max_by_key(|(start, _)| *start)
                .map(|(_, v)| *v);
            bucket.most_recent = latest.map(|v| NativeQuantity::new(v, unit));
        }

        Ok(bucket)
    }
}

impl HealthStore for MemoryStore {
    fn execute_statistics_query(
        &self,
        request: StatisticsRequest,
        completion: Completion<StatisticsCollection>,
    ) {
        if let Some(error) = self.take_injected_failure() {
            completion.resolve(Err(error));
            return;
        }
        completion.resolve(self.bucketed_statistics(&request));
    }

    fn execute_sample_query(
        &self,
        request: SampleQueryRequest,
        completion: Completion<Vec<NativeSample>>,
    ) {
        if let Some(error) = self.take_injected_failure() {
            completion.resolve(Err(error));
            return;
        }

        let mut samples = self.matching(&request.sample_type, &request.predicate);
        if request.ascending {
            samples.sort_by_key(|s| s.start);
        } else {
            samples.sort_by_key(|s| std::cmp::Reverse(s.start));
        }
        if let Some(limit) = request.limit {
            samples.truncate(limit);
        }
        completion.resolve(Ok(samples));
    }

    fn persist_sample(&self, sample: NativeSample, completion: Completion<()>) {
        if let Some(error) = self.take_injected_failure() {
            completion.resolve(Err(error));
            return;
        }
        self.insert(sample);
        completion.resolve(Ok(()));
    }
}
