//! Leaf query clauses
//!
//! Every clause keeps its field, value and an open-ended parameter map.
//! Parameters the engine understands but this crate doesn't model (boost,
//! analyzer, fuzziness, ...) pass through verbatim.

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

use super::boolean::BoolClause;
use super::Params;

/// Date format used by range clauses that don't name one
pub const DEFAULT_RANGE_FORMAT: &str = "yyyy-MM-dd HH:mm:ss";

/// Operator used by simple_query_string unless the caller sets `default_operator`
pub const DEFAULT_QUERY_OPERATOR: &str = "and";

/// A single unit of search criteria
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Exact match on a non-analyzed value
    Term {
        field: String,
        value: Value,
        params: Params,
    },

    /// Exact match against any of several values
    Terms {
        field: String,
        values: Vec<Value>,
        params: Params,
    },

    /// Bounded range; `gte`, `lte` and `format` are merged into `params`
    Range { field: String, params: Params },

    /// Analyzed full-text match
    Match {
        field: String,
        query: String,
        params: Params,
    },

    /// Analyzed phrase match
    MatchPhrase {
        field: String,
        query: String,
        params: Params,
    },

    /// Simple query string; `fields` and `default_operator` live in `params`
    SimpleQueryString { query: String, params: Params },

    /// Matches every document
    MatchAll { params: Params },

    /// Compound boolean clause
    Bool(BoolClause),
}

impl Clause {
    pub fn term(field: impl Into<String>, value: impl Into<Value>, params: Params) -> Self {
        Clause::Term {
            field: field.into(),
            value: value.into(),
            params,
        }
    }

    pub fn terms<I, V>(field: impl Into<String>, values: I, params: Params) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Clause::Terms {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
            params,
        }
    }

    /// Range clause over `[gte, lte]`.
    ///
    /// Both bounds are required. The bounds and the format always win over
    /// same-named keys in `params`.
    pub fn range(
        field: impl Into<String>,
        gte: impl Into<Value>,
        lte: impl Into<Value>,
        format: Option<&str>,
        mut params: Params,
    ) -> Self {
        params.insert("gte".to_string(), gte.into());
        params.insert("lte".to_string(), lte.into());
        params.insert(
            "format".to_string(),
            Value::String(format.unwrap_or(DEFAULT_RANGE_FORMAT).to_string()),
        );

        Clause::Range {
            field: field.into(),
            params,
        }
    }

    pub fn match_query(field: impl Into<String>, query: impl Into<String>, params: Params) -> Self {
        Clause::Match {
            field: field.into(),
            query: query.into(),
            params,
        }
    }

    pub fn match_phrase(
        field: impl Into<String>,
        query: impl Into<String>,
        params: Params,
    ) -> Self {
        Clause::MatchPhrase {
            field: field.into(),
            query: query.into(),
            params,
        }
    }

    /// Simple query string over `fields`.
    ///
    /// `fields` replaces any `fields` parameter; `default_operator` is only
    /// filled in when missing.
    pub fn simple_query_string<I, S>(query: impl Into<String>, fields: I, mut params: Params) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<Value> = fields
            .into_iter()
            .map(|f| Value::String(f.into()))
            .collect();
        params.insert("fields".to_string(), Value::Array(fields));
        if !params.contains_key("default_operator") {
            params.insert(
                "default_operator".to_string(),
                Value::String(DEFAULT_QUERY_OPERATOR.to_string()),
            );
        }

        Clause::SimpleQueryString {
            query: query.into(),
            params,
        }
    }

    pub fn match_all(params: Params) -> Self {
        Clause::MatchAll { params }
    }

    /// Wire name of the clause
    pub fn kind(&self) -> &'static str {
        match self {
            Clause::Term { .. } => "term",
            Clause::Terms { .. } => "terms",
            Clause::Range { .. } => "range",
            Clause::Match { .. } => "match",
            Clause::MatchPhrase { .. } => "match_phrase",
            Clause::SimpleQueryString { .. } => "simple_query_string",
            Clause::MatchAll { .. } => "match_all",
            Clause::Bool(_) => "bool",
        }
    }

    /// Serialize into the engine's query document
    pub fn to_value(&self) -> Value {
        match self {
            Clause::Term {
                field,
                value,
                params,
            } => {
                if params.is_empty() {
                    json!({ "term": { field: value } })
                } else {
                    let mut body = Map::new();
                    body.insert("value".to_string(), value.clone());
                    json!({ "term": { field: merged(body, params) } })
                }
            }

            Clause::Terms {
                field,
                values,
                params,
            } => {
                let mut body = Map::new();
                body.insert(field.clone(), Value::Array(values.clone()));
                json!({ "terms": merged(body, params) })
            }

            Clause::Range { field, params } => {
                json!({ "range": { field: Value::Object(params.clone()) } })
            }

            Clause::Match {
                field,
                query,
                params,
            } => json!({ "match": { field: query_body(query, params) } }),

            Clause::MatchPhrase {
                field,
                query,
                params,
            } => json!({ "match_phrase": { field: query_body(query, params) } }),

            Clause::SimpleQueryString { query, params } => {
                json!({ "simple_query_string": query_body(query, params) })
            }

            Clause::MatchAll { params } => json!({ "match_all": Value::Object(params.clone()) }),

            Clause::Bool(bool_clause) => bool_clause.to_value(),
        }
    }
}

impl From<BoolClause> for Clause {
    fn from(bool_clause: BoolClause) -> Self {
        Clause::Bool(bool_clause)
    }
}

impl Serialize for Clause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

fn merged(mut body: Map<String, Value>, params: &Params) -> Value {
    for (key, value) in params {
        body.insert(key.clone(), value.clone());
    }
    Value::Object(body)
}

fn query_body(query: &str, params: &Params) -> Value {
    let mut body = Map::new();
    body.insert("query".to_string(), Value::String(query.to_string()));
    merged(body, params)
}
