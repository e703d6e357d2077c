//! Fluent Elasticsearch query builder
//!
//! ```ignore
//! use quarry::{IndexModel, Model, Params};
//!
//! let products = IndexModel::new("products");
//! let mut q = products.query();
//! q.filter(|f| {
//!     f.term("status", "active");
//! })
//! .terms_aggregation("colors", Some("color"), Params::new(), None)
//! .size(20);
//!
//! let result = q.get().await?;
//! let names = result.pluck("name")?;
//! let colors = result.aggregations(&["colors"])?;
//! ```

pub mod aggregations;
pub mod collection;
pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod search;
pub mod transport;

pub use aggregations::{Aggregation, AggregationFactory, AggregationKind};
pub use collection::{BucketSummary, Collection};
pub use config::{Config, ConnectionConfig};
pub use error::{Error, Result};
pub use model::{IndexModel, Model};
pub use query::{params, BoolClause, BoolRole, Clause, Params};
pub use search::{ResetScope, SearchBuilder, SearchRequest, SortOrder};
pub use transport::{HttpTransport, Transport};
