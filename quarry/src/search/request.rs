//! Assembled search request

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::aggregations::{aggregations_value, Aggregation};
use crate::query::{BoolClause, Params};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("invalid sort order '{}', expected asc or desc", other)),
        }
    }
}

/// One entry of the request's `sort` list
#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
    pub params: Params,
}

impl Sort {
    /// `{field: {"order": "desc", ..params}}`; an `order` key in `params`
    /// never overrides the sort's own order
    pub fn to_value(&self) -> Value {
        let mut body = Map::new();
        body.insert(
            "order".to_string(),
            Value::String(self.order.as_str().to_string()),
        );
        for (key, value) in &self.params {
            if key != "order" {
                body.insert(key.clone(), value.clone());
            }
        }

        let mut outer = Map::new();
        outer.insert(self.field.clone(), Value::Object(body));
        Value::Object(outer)
    }
}

/// The wire payload for one search, plus the index it targets.
///
/// Produced by the request assembler and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub(crate) index: String,
    pub(crate) query: BoolClause,
    pub(crate) aggregations: Vec<Aggregation>,
    pub(crate) sort: Vec<Sort>,
    pub(crate) source: Option<Vec<String>>,
    pub(crate) size: Option<usize>,
    pub(crate) from: usize,
}

impl SearchRequest {
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Outer query container; the root boolean clause sits first under `must`
    pub fn query(&self) -> &BoolClause {
        &self.query
    }

    pub fn aggregations(&self) -> &[Aggregation] {
        &self.aggregations
    }

    pub fn sort(&self) -> &[Sort] {
        &self.sort
    }

    pub fn source(&self) -> Option<&[String]> {
        self.source.as_deref()
    }

    pub fn size(&self) -> Option<usize> {
        self.size
    }

    pub fn from(&self) -> usize {
        self.from
    }

    /// Request body with keys `query`, `aggregations`, `sort`, `_source`,
    /// `size`, `from` in that order. Empty sections are left out; `from` is
    /// always present.
    pub fn to_value(&self) -> Value {
        let mut body = Map::new();

        body.insert("query".to_string(), self.query.to_query_value());

        if !self.aggregations.is_empty() {
            body.insert(
                "aggregations".to_string(),
                aggregations_value(&self.aggregations),
            );
        }

        if !self.sort.is_empty() {
            body.insert(
                "sort".to_string(),
                Value::Array(self.sort.iter().map(Sort::to_value).collect()),
            );
        }

        if let Some(source) = &self.source {
            body.insert(
                "_source".to_string(),
                Value::Array(source.iter().cloned().map(Value::String).collect()),
            );
        }

        if let Some(size) = self.size {
            body.insert("size".to_string(), Value::from(size));
        }

        body.insert("from".to_string(), Value::from(self.from));

        Value::Object(body)
    }
}

impl Serialize for SearchRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::params;
    use serde_json::json;

    #[test]
    fn test_sort_to_value() {
        let sort = Sort {
            field: "created".to_string(),
            order: SortOrder::Asc,
            params: params(json!({"missing": "_last"})),
        };
        assert_eq!(
            sort.to_value(),
            json!({"created": {"order": "asc", "missing": "_last"}})
        );
    }

    #[test]
    fn test_sort_params_cannot_override_order() {
        let sort = Sort {
            field: "price".to_string(),
            order: SortOrder::Asc,
            params: params(json!({"order": "desc", "mode": "avg"})),
        };
        assert_eq!(
            sort.to_value(),
            json!({"price": {"order": "asc", "mode": "avg"}})
        );

        let defaulted = Sort {
            field: "price".to_string(),
            order: SortOrder::default(),
            params: params(json!({"order": "asc"})),
        };
        assert_eq!(defaulted.to_value()["price"]["order"], json!("desc"));
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("up".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::default(), SortOrder::Desc);
    }

    #[test]
    fn test_request_key_order() {
        let request = SearchRequest {
            index: "logs".to_string(),
            query: BoolClause::new(),
            aggregations: vec![Aggregation::avg("a", Some("b"), None)],
            sort: vec![Sort {
                field: "ts".to_string(),
                order: SortOrder::Desc,
                params: Params::new(),
            }],
            source: Some(vec!["title".to_string()]),
            size: Some(5),
            from: 0,
        };

        let value = request.to_value();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            vec!["query", "aggregations", "sort", "_source", "size", "from"]
        );
        assert_eq!(serde_json::to_value(&request).unwrap(), value);
    }

    #[test]
    fn test_request_omits_unset_size() {
        let request = SearchRequest {
            index: "logs".to_string(),
            query: BoolClause::new(),
            aggregations: vec![],
            sort: vec![],
            source: None,
            size: None,
            from: 0,
        };
        assert_eq!(request.to_value(), json!({"query": {"bool": {}}, "from": 0}));
    }
}
