//! Store collaborator boundary
//!
//! The external health-data store is an opaque service: it holds the raw
//! records, executes queries, and owns all persistence and concurrency
//! concerns. This module defines the trait the core consumes, the native
//! record types crossing that boundary, the checked single-shot completion
//! used to deliver results, and an in-memory implementation for tests.

pub mod completion;
pub mod memory;
pub mod traits;

pub use completion::Completion;
pub use memory::MemoryStore;
pub use traits::{
    BucketStatistics, HealthStore, NativeQuantity, NativeSample, SampleQueryRequest,
    StatisticsCollection, StatisticsOptions, StatisticsRequest,
};
