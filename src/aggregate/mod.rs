//! Aggregation engine
//!
//! The decision core of the crate: the mode registry selects the statistical
//! reduction for each aggregation mode, and the bucket walker applies it
//! across the anchored bucket grid the store produced. Everything around
//! these two modules is I/O plumbing.

pub mod mode;
pub mod walker;

pub use mode::AggregationMode;
pub use walker::enumerate_statistics;
