//! Client front door
//!
//! [`HealthClient`] exposes the public operations (aggregated
//! statistics, raw samples, and sample writes) over a pluggable
//! [`HealthStore`](crate::store::HealthStore) collaborator. The client holds
//! no mutable state of its own; any number of operations may run concurrently
//! against the same instance.

mod builder;

pub use builder::ClientBuilder;

use crate::aggregate::enumerate_statistics;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::query::{AggregationQuery, InsertRequest, RawQuery};
use crate::store::{
    Completion, HealthStore, NativeQuantity, NativeSample, SampleQueryRequest, StatisticsRequest,
};
use crate::types::{QuantitySample, SampleTypeId};
use std::sync::Arc;
use tracing::{debug, warn};

/// Typed client for the external health-data store
pub struct HealthClient {
    store: Arc<dyn HealthStore>,
    config: ClientConfig,
}

impl HealthClient {
    /// Create a client over a store with default configuration
    pub fn new<S: HealthStore>(store: S) -> Self {
        ClientBuilder::new(store).build()
    }

    /// Start building a client with custom configuration
    pub fn builder<S: HealthStore>(store: S) -> ClientBuilder {
        ClientBuilder::new(store)
    }

    pub(crate) fn from_parts(store: Arc<dyn HealthStore>, config: ClientConfig) -> Self {
        Self { store, config }
    }

    /// Get client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Compute aggregated statistics over anchored time buckets
    ///
    /// Submits a bucketed statistics query to the store, awaits its single
    /// completion, and walks the resulting buckets: one output sample per
    /// non-empty bucket, converted into the query's unit and stamped with the
    /// bucket's own boundaries, in ascending bucket order.
    ///
    /// Either a complete result sequence or an error, never partial output.
    pub async fn aggregated_samples(
        &self,
        sample_type: SampleTypeId,
        query: AggregationQuery,
    ) -> Result<Vec<QuantitySample>> {
        sample_type.require_quantity()?;

        debug!(
            %sample_type,
            mode = %query.mode,
            start = %query.range.start,
            end = %query.range.end,
            "executing aggregation query"
        );

        let request = StatisticsRequest {
            sample_type,
            predicate: query.predicate(),
            options: query.mode.statistics_options(),
            anchor: query.anchor,
            interval: query.interval,
        };

        let (completion, pending) = Completion::new();
        self.store.execute_statistics_query(request, completion);
        let collection = pending.wait().await?;

        enumerate_statistics(&collection, &query)
    }

    /// Fetch raw samples: filtered, sorted ascending by start time, limited
    ///
    /// Each native record converts 1:1 into a [`QuantitySample`] in the
    /// query's unit. An explicit limit of zero returns an empty sequence
    /// without touching the store; `None` is unbounded.
    pub async fn raw_samples(
        &self,
        sample_type: SampleTypeId,
        query: RawQuery,
    ) -> Result<Vec<QuantitySample>> {
        sample_type.require_quantity()?;

        let limit = self.config.effective_limit(query.limit);
        if limit == Some(0) {
            debug!(%sample_type, "raw query with zero limit, returning empty");
            return Ok(Vec::new());
        }
        if limit != query.limit {
            warn!(
                %sample_type,
                requested = ?query.limit,
                effective = ?limit,
                "raw query limit clamped by client configuration"
            );
        }

        let request = SampleQueryRequest {
            sample_type,
            predicate: query.predicate.clone(),
            limit,
            ascending: true,
        };

        let (completion, pending) = Completion::new();
        self.store.execute_sample_query(request, completion);
        let natives = pending.wait().await?;

        let mut samples = Vec::with_capacity(natives.len());
        for native in natives {
            let value = native
                .quantity
                .unit
                .convert(native.quantity.value, &query.unit)?;
            samples.push(QuantitySample::new(
                value,
                query.unit.clone(),
                native.start,
                native.end,
            )?);
        }
        Ok(samples)
    }

    /// Persist one quantity sample
    ///
    /// Builds the store-native value object from the request and awaits the
    /// store's confirmation. No read-after-write guarantee: immediate
    /// visibility to subsequent queries is not assumed.
    pub async fn save_sample(&self, request: InsertRequest) -> Result<()> {
        debug!(sample_type = %request.sample_type, "persisting sample");

        let mut native = NativeSample::new(
            request.sample_type,
            NativeQuantity::new(request.value, request.unit),
            request.start,
            request.end,
        );
        if let Some(metadata) = request.metadata {
            native = native.with_metadata(metadata);
        }

        let (completion, pending) = Completion::new();
        self.store.persist_sample(native, completion);
        pending.wait().await?;
        Ok(())
    }
}
