//! Bucket walker
//!
//! Turns a store-produced [`StatisticsCollection`] into the ordered sequence
//! of output samples for an [`AggregationQuery`]: iterate buckets ascending
//! within the closed walk range, reduce each through the mode registry,
//! convert into the requested unit, and stamp each output with its bucket's
//! own boundaries. Buckets that reduce to nothing are skipped, never emitted
//! as zero.

use crate::error::{Error, Result};
use crate::query::AggregationQuery;
use crate::store::StatisticsCollection;
use crate::types::QuantitySample;
use tracing::trace;

/// Walk the collection and produce the query's output samples
///
/// The store contract guarantees ascending bucket order; a collection that
/// violates it is a programming error in the store adapter and fails with
/// [`Error::Precondition`] rather than being silently re-sorted.
pub fn enumerate_statistics(
    collection: &StatisticsCollection,
    query: &AggregationQuery,
) -> Result<Vec<QuantitySample>> {
    let mut samples = Vec::new();
    let mut previous_start = None;

    for bucket in &collection.buckets {
        if let Some(prev) = previous_start {
            if bucket.start <= prev {
                return Err(Error::Precondition(format!(
                    "statistics buckets out of order: {} after {}",
                    bucket.start.to_rfc3339(),
                    prev,
                )));
            }
        }
        previous_start = Some(bucket.start);

        // Restrict to buckets intersecting the closed walk range. A
        // degenerate range (start == end) still admits the one bucket whose
        // half-open span contains that instant.
        if !query.range.overlaps_interval(bucket.start, bucket.end) {
            continue;
        }

        let Some(quantity) = query.mode.reduce(bucket) else {
            trace!(start = %bucket.start, "skipping empty bucket");
            continue;
        };

        let value = quantity.unit.convert(quantity.value, &query.unit)?;
        samples.push(QuantitySample::new(
            value,
            query.unit.clone(),
            bucket.start,
            bucket.end,
        )?);
    }

    Ok(samples)
}
