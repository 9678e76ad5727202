//! Core data types
//!
//! # Key Types
//!
//! - **`QuantitySample`**: a single timestamped scalar health measurement
//! - **`TimeRange`**: closed time window for queries (start, end)
//! - **`SampleTypeId`**: string identifier for a sample type
//! - **`SampleCategory`**: native category a sample type resolves to
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use vitalstore::types::{QuantitySample, SampleTypeId, TimeRange};
//! use vitalstore::unit::Unit;
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let end = Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap();
//!
//! let range = TimeRange::new(start, end).unwrap();
//! assert!(range.contains(start));
//!
//! let sample = QuantitySample::new(512.0, Unit::new("count"), start, end).unwrap();
//! assert_eq!(sample.value, 512.0);
//!
//! let step_count = SampleTypeId::new("stepCount");
//! assert!(step_count.require_quantity().is_ok());
//! ```

use crate::error::{Error, QueryError};
use crate::unit::Unit;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed time range for queries (inclusive on both ends)
///
/// Represents the window `[start, end]`. Both bounds are inclusive; a
/// degenerate range with `start == end` is valid and covers exactly one
/// instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start instant (inclusive)
    pub start: DateTime<Utc>,

    /// End instant (inclusive)
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Create a new time range with validation
    ///
    /// Returns [`QueryError::InvalidTimeRange`] if `start > end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, QueryError> {
        if start > end {
            return Err(QueryError::InvalidTimeRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self { start, end })
    }

    /// Create a time range without validation
    ///
    /// Only use when the bounds are already known to be ordered. Range
    /// operations behave unexpectedly if `start > end`.
    pub fn new_unchecked(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Check whether an instant falls within this range (inclusive)
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// Check whether a half-open interval `[start, end)` overlaps this range
    pub fn overlaps_interval(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start <= self.end && end > self.start
    }
}

/// A single quantity sample: value, unit, and the time span it covers
///
/// Immutable once constructed. Produced either by converting a native store
/// record, or by the aggregation engine from a bucket. Invariant:
/// `start <= end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantitySample {
    /// Measurement value in `unit`
    pub value: f64,

    /// Unit the value is expressed in
    pub unit: Unit,

    /// Start of the span the measurement covers
    pub start: DateTime<Utc>,

    /// End of the span the measurement covers
    pub end: DateTime<Utc>,
}

impl QuantitySample {
    /// Create a new sample with validation
    ///
    /// Returns an error if `start > end`.
    pub fn new(
        value: f64,
        unit: Unit,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, QueryError> {
        if start > end {
            return Err(QueryError::InvalidTimeRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self {
            value,
            unit,
            start,
            end,
        })
    }
}

/// Native category a sample type resolves to in the external store
///
/// Only quantity-valued types can flow through this crate's operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleCategory {
    /// Scalar numeric measurement with a unit
    Quantity,
    /// Enumerated state over a time span (e.g. sleep stages)
    Category,
    /// Composite workout record
    Workout,
}

/// String identifier for a sample type
///
/// Known identifiers resolve to a [`SampleCategory`] through the catalog;
/// unknown identifiers are treated as quantity-valued and passed to the
/// store, which remains the authority on whether they exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleTypeId(String);

impl SampleTypeId {
    /// Create a sample type identifier
    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }

    /// The identifier string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve this identifier to its native category
    ///
    /// Returns `None` for identifiers not in the catalog.
    pub fn category(&self) -> Option<SampleCategory> {
        catalog_category(&self.0)
    }

    /// Assert that this type is quantity-valued
    ///
    /// The external store API hands back a generic sample-type handle that
    /// only quantity operations can use. The check happens up front: a type
    /// known to resolve to a non-quantity category fails with
    /// [`Error::Precondition`] at query construction instead of crashing in
    /// the store adapter.
    pub fn require_quantity(&self) -> Result<(), Error> {
        match self.category() {
            Some(SampleCategory::Quantity) | None => Ok(()),
            Some(other) => Err(Error::Precondition(format!(
                "sample type '{}' resolves to {:?}, not a quantity type",
                self.0, other
            ))),
        }
    }
}

impl fmt::Display for SampleTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SampleTypeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Catalog of known sample-type identifiers
fn catalog_category(identifier: &str) -> Option<SampleCategory> {
    let category = match identifier {
        "stepCount"
        | "flightsClimbed"
        | "heartRate"
        | "restingHeartRate"
        | "respiratoryRate"
        | "activeEnergyBurned"
        | "basalEnergyBurned"
        | "distanceWalkingRunning"
        | "distanceCycling"
        | "distanceSwimming"
        | "bodyMass"
        | "height"
        | "bodyFatPercentage"
        | "oxygenSaturation"
        | "bloodGlucose"
        | "dietaryWater"
        | "dietaryEnergyConsumed" => SampleCategory::Quantity,

        "sleepAnalysis" | "mindfulSession" | "menstrualFlow" => SampleCategory::Category,

        "workout" => SampleCategory::Workout,

        _ => return None,
    };
    Some(category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, 0, 0).unwrap()
    }

    #[test]
    fn test_time_range() {
        let range = TimeRange::new(at(1), at(3)).unwrap();
        assert!(range.contains(at(1)));
        assert!(range.contains(at(2)));
        assert!(range.contains(at(3)));
        assert!(!range.contains(at(4)));

        assert!(TimeRange::new(at(3), at(1)).is_err());

        // Degenerate range covers exactly its own instant
        let point = TimeRange::new(at(2), at(2)).unwrap();
        assert!(point.contains(at(2)));
        assert!(!point.contains(at(1)));
    }

    #[test]
    fn test_range_interval_overlap() {
        let range = TimeRange::new(at(2), at(4)).unwrap();
        assert!(range.overlaps_interval(at(1), at(3)));
        assert!(range.overlaps_interval(at(4), at(5)));
        assert!(!range.overlaps_interval(at(5), at(6)));
        // Interval ending exactly at range start does not overlap (half-open)
        assert!(!range.overlaps_interval(at(0), at(2)));
    }

    #[test]
    fn test_sample_rejects_inverted_span() {
        assert!(QuantitySample::new(1.0, Unit::new("count"), at(2), at(1)).is_err());
    }

    #[test]
    fn test_sample_serialization() {
        let sample = QuantitySample::new(72.5, Unit::new("count/min"), at(1), at(1)).unwrap();
        let json = serde_json::to_string(&sample).unwrap();
        assert!(json.contains("\"count/min\""));
        assert!(json.contains("72.5"));

        let back: QuantitySample = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample);
    }

    #[test]
    fn test_catalog_quantity_check() {
        assert!(SampleTypeId::new("stepCount").require_quantity().is_ok());
        assert!(SampleTypeId::new("bloodGlucose").require_quantity().is_ok());

        // Unknown types pass through; the store decides whether they exist
        assert!(SampleTypeId::new("vo2Max").require_quantity().is_ok());

        let err = SampleTypeId::new("sleepAnalysis")
            .require_quantity()
            .unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));

        let err = SampleTypeId::new("workout").require_quantity().unwrap_err();
        assert!(err.to_string().contains("workout"));
    }
}
