//! Metric and bucket aggregations
//!
//! Supported aggregations:
//! - `avg` / `sum`
//! - `terms`
//! - `date_histogram`
//! - `range`

mod builder;
mod factory;
mod types;

pub use factory::AggregationFactory;
pub use types::{aggregations_value, Aggregation, AggregationKind, DEFAULT_HISTOGRAM_INTERVAL};
