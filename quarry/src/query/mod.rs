//! Query clauses and the boolean composer
//!
//! Clause kinds:
//! - `term` / `terms`
//! - `range`
//! - `match` / `match_phrase`
//! - `simple_query_string`
//! - `match_all`
//! - `bool` (must, must_not, should, filter)

mod boolean;
mod builder;
mod clause;

pub use boolean::{BoolClause, BoolRole};
pub use clause::{Clause, DEFAULT_QUERY_OPERATOR, DEFAULT_RANGE_FORMAT};

use serde_json::{Map, Value};

/// Engine-specific parameters attached to a clause or aggregation.
///
/// Keys keep insertion order.
pub type Params = Map<String, Value>;

/// Turn a JSON object into [`Params`]. Anything but an object gives an empty map.
pub fn params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        _ => Params::new(),
    }
}
