//! Aggregation modes and the mode registry
//!
//! [`AggregationMode`] is a data-only enum: the variants carry no behavior.
//! The registry (the exhaustive `match` blocks in this module) maps each
//! mode to the statistic the store must precompute and to the reduction over
//! one bucket's precomputed data. Adding a mode is a compiler-enforced
//! exhaustiveness change in both places.

use crate::error::QueryError;
use crate::store::{BucketStatistics, NativeQuantity, StatisticsOptions};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Statistical reduction applied to each time bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AggregationMode {
    /// Sum of all values in the bucket
    CumulativeSum,
    /// Arithmetic mean of values in the bucket
    DiscreteAverage,
    /// Minimum value in the bucket
    DiscreteMin,
    /// Maximum value in the bucket
    DiscreteMax,
    /// Value of the sample with the latest start time in the bucket
    DiscreteMostRecent,
}

impl AggregationMode {
    /// The statistics the store must precompute for this mode
    pub fn statistics_options(&self) -> StatisticsOptions {
        match self {
            AggregationMode::CumulativeSum => StatisticsOptions {
                sum: true,
                ..Default::default()
            },
            AggregationMode::DiscreteAverage => StatisticsOptions {
                average: true,
                ..Default::default()
            },
            AggregationMode::DiscreteMin => StatisticsOptions {
                min: true,
                ..Default::default()
            },
            AggregationMode::DiscreteMax => StatisticsOptions {
                max: true,
                ..Default::default()
            },
            AggregationMode::DiscreteMostRecent => StatisticsOptions {
                most_recent: true,
                ..Default::default()
            },
        }
    }

    /// Number of output values this mode yields per non-empty bucket
    ///
    /// Currently 1 for every mode. Arity 2 is reserved for modes reporting
    /// both a magnitude and a count.
    pub fn output_arity(&self) -> usize {
        match self {
            AggregationMode::CumulativeSum
            | AggregationMode::DiscreteAverage
            | AggregationMode::DiscreteMin
            | AggregationMode::DiscreteMax
            | AggregationMode::DiscreteMostRecent => 1,
        }
    }

    /// Apply this mode's reduction to one bucket's precomputed statistics
    ///
    /// Returns `None` for a bucket with no contributing samples: an empty
    /// bucket has no defined value and is skipped entirely, never emitted as
    /// zero.
    pub fn reduce<'a>(&self, bucket: &'a BucketStatistics) -> Option<&'a NativeQuantity> {
        match self {
            AggregationMode::CumulativeSum => bucket.sum.as_ref(),
            AggregationMode::DiscreteAverage => bucket.average.as_ref(),
            AggregationMode::DiscreteMin => bucket.min.as_ref(),
            AggregationMode::DiscreteMax => bucket.max.as_ref(),
            AggregationMode::DiscreteMostRecent => bucket.most_recent.as_ref(),
        }
    }
}

impl FromStr for AggregationMode {
    type Err = QueryError;

    /// Parse the wire form used by callers
    ///
    /// An unrecognized mode fails here, at query-construction time and never
    /// during bucket iteration.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cumulativeSum" => Ok(AggregationMode::CumulativeSum),
            "discreteAverage" => Ok(AggregationMode::DiscreteAverage),
            "discreteMin" => Ok(AggregationMode::DiscreteMin),
            "discreteMax" => Ok(AggregationMode::DiscreteMax),
            "discreteMostRecent" => Ok(AggregationMode::DiscreteMostRecent),
            other => Err(QueryError::UnsupportedAggregation(other.to_string())),
        }
    }
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggregationMode::CumulativeSum => "cumulativeSum",
            AggregationMode::DiscreteAverage => "discreteAverage",
            AggregationMode::DiscreteMin => "discreteMin",
            AggregationMode::DiscreteMax => "discreteMax",
            AggregationMode::DiscreteMostRecent => "discreteMostRecent",
        };
        write!(f, "{}", name)
    }
}
