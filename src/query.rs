//! Typed query parameter model
//!
//! The bridge layer (out of scope here) parses untyped parameter maps into
//! these types; everything past this module only ever sees validated queries.
//! Structural problems are rejected at construction time so the aggregation
//! engine never has to handle them mid-walk.

use crate::aggregate::AggregationMode;
use crate::error::{Error, QueryError};
use crate::types::{SampleTypeId, TimeRange};
use crate::unit::Unit;
use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Filter predicate passed to the store collaborator
///
/// Mirrors what the store can filter on natively: an optional time window
/// (each bound independently optional) and whether the sample was entered
/// manually by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplePredicate {
    /// Earliest sample start time to include (inclusive)
    pub start: Option<DateTime<Utc>>,

    /// Latest sample start time to include (inclusive)
    pub end: Option<DateTime<Utc>>,

    /// Restrict to user-entered (`Some(true)`) or device-recorded
    /// (`Some(false)`) samples; `None` includes both
    pub is_user_entered: Option<bool>,
}

impl SamplePredicate {
    /// Check whether a sample starting at `start` with the given provenance
    /// matches this predicate
    pub fn matches(&self, start: DateTime<Utc>, user_entered: bool) -> bool {
        if let Some(lo) = self.start {
            if start < lo {
                return false;
            }
        }
        if let Some(hi) = self.end {
            if start > hi {
                return false;
            }
        }
        match self.is_user_entered {
            Some(expected) => user_entered == expected,
            None => true,
        }
    }
}

/// Calendar-relative bucket step
///
/// Combined with an anchor instant, defines the bucket grid: bucket *k* spans
/// `[anchor + k*interval, anchor + (k+1)*interval)`. `Month` steps follow the
/// calendar (a January bucket is 31 days, February 28 or 29), the rest are
/// fixed durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketInterval {
    /// One hour
    Hour,
    /// One day
    Day,
    /// Seven days
    Week,
    /// One calendar month
    Month,
}

impl BucketInterval {
    /// The instant one interval step after `instant`
    pub fn advance(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        self.boundary(instant, 1)
    }

    /// The instant one interval step before `instant`
    pub fn retreat(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        self.boundary(instant, -1)
    }

    /// The bucket-grid boundary `k` steps from `anchor`
    ///
    /// Month boundaries are computed in one calendar jump from the anchor,
    /// never by repeated single-month steps, so chrono's end-of-month
    /// clamping applies to each boundary independently instead of
    /// accumulating: anchored at Jan 31 the grid runs Jan 31, Feb 29,
    /// Mar 31, not Feb 29 then Mar 29. Saturation at chrono's date limits
    /// yields the representable extreme, so grid walks still terminate.
    pub fn boundary(&self, anchor: DateTime<Utc>, k: i32) -> DateTime<Utc> {
        match self {
            BucketInterval::Hour => anchor + Duration::hours(i64::from(k)),
            BucketInterval::Day => anchor + Duration::days(i64::from(k)),
            BucketInterval::Week => anchor + Duration::days(7 * i64::from(k)),
            BucketInterval::Month => {
                let months = Months::new(k.unsigned_abs());
                if k >= 0 {
                    anchor
                        .checked_add_months(months)
                        .unwrap_or(DateTime::<Utc>::MAX_UTC)
                } else {
                    anchor
                        .checked_sub_months(months)
                        .unwrap_or(DateTime::<Utc>::MIN_UTC)
                }
            }
        }
    }
}

impl FromStr for BucketInterval {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hour" => Ok(BucketInterval::Hour),
            "day" => Ok(BucketInterval::Day),
            "week" => Ok(BucketInterval::Week),
            "month" => Ok(BucketInterval::Month),
            other => Err(QueryError::InvalidParameter {
                field: "interval".to_string(),
                message: format!("unknown interval '{}'", other),
            }),
        }
    }
}

/// Raw sample query: filtered, ascending-by-start, limited fetch
///
/// # Limit semantics
///
/// `limit: None` means unbounded. An explicit `limit: Some(0)` returns an
/// empty sequence, not an error and not "unbounded"; zero is taken at face
/// value rather than treated as a sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuery {
    /// Filter passed to the store
    pub predicate: SamplePredicate,

    /// Unit the returned samples are converted into
    pub unit: Unit,

    /// Maximum number of samples to return; `None` is unbounded
    pub limit: Option<usize>,
}

impl RawQuery {
    /// Create a raw query with an unbounded limit
    pub fn new(predicate: SamplePredicate, unit: Unit) -> Self {
        Self {
            predicate,
            unit,
            limit: None,
        }
    }

    /// Cap the number of returned samples
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Aggregation query over anchored time buckets
///
/// Constructed through [`AggregationQueryBuilder`], which enforces the
/// structural invariants: both time bounds present and `start <= end`. The
/// bucket grid is anchored at `anchor`, which need not align with `start`;
/// a partial leading bucket is allowed.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationQuery {
    /// Closed walk range for the bucket enumeration
    pub range: TimeRange,

    /// Reference instant defining where the bucket grid begins
    pub anchor: DateTime<Utc>,

    /// Bucket step size
    pub interval: BucketInterval,

    /// Statistical reduction applied per bucket
    pub mode: AggregationMode,

    /// Unit the output samples are converted into
    pub unit: Unit,

    /// Optional user-entered filter forwarded to the store
    pub is_user_entered: Option<bool>,
}

impl AggregationQuery {
    /// Start building an aggregation query
    pub fn builder(mode: AggregationMode, unit: Unit) -> AggregationQueryBuilder {
        AggregationQueryBuilder {
            start: None,
            end: None,
            anchor: None,
            interval: BucketInterval::Day,
            mode,
            unit,
            is_user_entered: None,
        }
    }

    /// The store predicate corresponding to this query's range and filter
    pub fn predicate(&self) -> SamplePredicate {
        SamplePredicate {
            start: Some(self.range.start),
            end: Some(self.range.end),
            is_user_entered: self.is_user_entered,
        }
    }
}

/// Builder for [`AggregationQuery`]
#[derive(Debug, Clone)]
pub struct AggregationQueryBuilder {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    anchor: Option<DateTime<Utc>>,
    interval: BucketInterval,
    mode: AggregationMode,
    unit: Unit,
    is_user_entered: Option<bool>,
}

impl AggregationQueryBuilder {
    /// Set the start of the walk range (required)
    pub fn start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the end of the walk range (required)
    pub fn end(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    /// Set the grid anchor; defaults to the start of the walk range
    pub fn anchor(mut self, anchor: DateTime<Utc>) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Set the bucket step; defaults to [`BucketInterval::Day`]
    pub fn interval(mut self, interval: BucketInterval) -> Self {
        self.interval = interval;
        self
    }

    /// Restrict to user-entered or device-recorded samples
    pub fn is_user_entered(mut self, flag: bool) -> Self {
        self.is_user_entered = Some(flag);
        self
    }

    /// Validate and build the query
    ///
    /// Fails with [`QueryError::MissingTimeRange`] if either bound is absent,
    /// or [`QueryError::InvalidTimeRange`] if they are inverted.
    pub fn build(self) -> Result<AggregationQuery, QueryError> {
        let (start, end) = match (self.start, self.end) {
            (Some(start), Some(end)) => (start, end),
            _ => return Err(QueryError::MissingTimeRange),
        };

        let range = TimeRange::new(start, end)?;

        Ok(AggregationQuery {
            range,
            anchor: self.anchor.unwrap_or(start),
            interval: self.interval,
            mode: self.mode,
            unit: self.unit,
            is_user_entered: self.is_user_entered,
        })
    }
}

/// Request to persist one quantity sample
#[derive(Debug, Clone, PartialEq)]
pub struct InsertRequest {
    /// Sample type to write under
    pub sample_type: SampleTypeId,

    /// Measurement value in `unit`
    pub value: f64,

    /// Unit the value is expressed in
    pub unit: Unit,

    /// Start of the span the measurement covers
    pub start: DateTime<Utc>,

    /// End of the span the measurement covers
    pub end: DateTime<Utc>,

    /// Optional key-value metadata persisted alongside the sample
    pub metadata: Option<HashMap<String, String>>,
}

impl InsertRequest {
    /// Create an insert request with validation
    ///
    /// Fails if the span is inverted or the sample type is not
    /// quantity-valued.
    pub fn new(
        sample_type: SampleTypeId,
        value: f64,
        unit: Unit,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, Error> {
        sample_type.require_quantity()?;
        if start > end {
            return Err(QueryError::InvalidTimeRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            }
            .into());
        }
        Ok(Self {
            sample_type,
            value,
            unit,
            start,
            end,
            metadata: None,
        })
    }

    /// Attach metadata to persist with the sample
    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
