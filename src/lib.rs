//! Vitalstore - typed client and aggregation engine for an external
//! health-data store
//!
//! This library wraps an opaque health-data store behind a typed API:
//! - Aggregated statistics over anchored, calendar-relative time buckets
//!   (daily totals, hourly averages, per-bucket min/max/most-recent)
//! - Raw sample retrieval: filtered, time-sorted, limited
//! - Sample writes with unit-carrying values and optional metadata
//!
//! The store collaborator owns all persistence and query execution; it
//! delivers results through single-shot completions that this crate bridges
//! onto awaitable futures with exactly-once guarantees.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregate;
pub mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod store;
pub mod types;
pub mod unit;

// Re-export main types
pub use aggregate::AggregationMode;
pub use client::{ClientBuilder, HealthClient};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use query::{AggregationQuery, BucketInterval, InsertRequest, RawQuery, SamplePredicate};
pub use types::{QuantitySample, SampleTypeId, TimeRange};
pub use unit::Unit;

#[cfg(test)]
mod tests {
    #[test]
    fn test_basic_sanity() {
        assert_eq!(2 + 2, 4);
    }
}
