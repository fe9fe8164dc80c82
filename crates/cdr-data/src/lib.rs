//! Query and aggregation layer for call detail records.
//!
//! [`store::RecordStore`] holds the records of one analysis run in insertion
//! order; [`aggregator::CallAggregator`] computes per-extension counts,
//! duration filters and the most active endpoint pair by scanning it.

pub mod aggregator;
pub mod store;

pub use cdr_core as core;
pub use aggregator::{CallAggregator, DurationStats, EndpointPair, FrequencyTable, PairActivity};
pub use store::RecordStore;
