//! Response collection
//!
//! Wraps a raw response document (or any sub-structure extracted from one)
//! and offers chained extraction: hit counts, `_source` projection, dotted
//! path plucking and aggregation bucket reshaping. Every extraction returns
//! a new [`Collection`]; the wrapped document is never modified.

mod response;

pub use response::{BucketSummary, RawBucket, TotalHits};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    items: Value,
}

impl Collection {
    pub fn new(items: Value) -> Self {
        Self { items }
    }

    pub fn as_value(&self) -> &Value {
        &self.items
    }

    pub fn into_value(self) -> Value {
        self.items
    }

    /// Elements of a list, entries of a map, 0 for null, 1 for a scalar
    pub fn len(&self) -> usize {
        match &self.items {
            Value::Array(a) => a.len(),
            Value::Object(m) => m.len(),
            Value::Null => 0,
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn first(&self) -> Option<&Value> {
        match &self.items {
            Value::Array(a) => a.first(),
            Value::Object(m) => m.values().next(),
            _ => None,
        }
    }

    /// List elements, or map values in key order
    pub fn iter(&self) -> Box<dyn Iterator<Item = &Value> + '_> {
        match &self.items {
            Value::Array(a) => Box::new(a.iter()),
            Value::Object(m) => Box::new(m.values()),
            _ => Box::new(std::iter::empty()),
        }
    }

    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.items.clone())?)
    }

    /// Total hit count from `hits.total`
    pub fn total(&self) -> Result<u64> {
        let total = self
            .hits_object()?
            .get("total")
            .ok_or_else(|| Error::MalformedResponse("hits.total".to_string()))?;

        let total: TotalHits = serde_json::from_value(total.clone())
            .map_err(|_| Error::MalformedResponse("hits.total".to_string()))?;
        Ok(total.value())
    }

    /// The raw `hits.hits` list
    pub fn hits(&self) -> Result<Collection> {
        Ok(Collection::new(self.hit_list()?.clone()))
    }

    /// `_source` of every hit
    pub fn source(&self) -> Result<Collection> {
        let sources = self
            .hit_list()?
            .as_array()
            .ok_or_else(|| Error::MalformedResponse("hits.hits".to_string()))?
            .iter()
            .map(|hit| {
                hit.get("_source")
                    .cloned()
                    .ok_or_else(|| Error::MalformedResponse("hits.hits[]._source".to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Collection::new(Value::Array(sources)))
    }

    /// Values at a dotted `path` for every element.
    ///
    /// A raw top-level response is first narrowed to its `_source` list.
    /// Each segment is then resolved per element: scalars pass through, a
    /// direct key is taken when present, otherwise the element's first value
    /// is indexed by the segment instead. That one-level fallback is a
    /// heuristic for responses that wrap the addressable object once more;
    /// it is not general path resolution.
    pub fn pluck(&self, path: &str) -> Result<Collection> {
        let mut items = if self.is_raw_response() {
            self.source()?.items
        } else {
            self.items.clone()
        };

        for segment in path.split('.') {
            items = pluck_segment(items, segment)?;
        }

        Ok(Collection::new(items))
    }

    /// Aggregation results.
    ///
    /// With no names, the whole `aggregations` document. With one name, that
    /// aggregation's buckets as `{title, count}`. With several, a map from
    /// name to reshaped buckets.
    pub fn aggregations(&self, names: &[&str]) -> Result<Collection> {
        let aggregations = self
            .items
            .get("aggregations")
            .ok_or_else(|| Error::MalformedResponse("aggregations".to_string()))?;

        if names.is_empty() {
            return Ok(Collection::new(aggregations.clone()));
        }

        let mut reshaped = Map::new();
        for name in names {
            reshaped.insert(name.to_string(), reshape_buckets(aggregations, name)?);
        }

        if names.len() > 1 {
            return Ok(Collection::new(Value::Object(reshaped)));
        }

        let single = reshaped.remove(names[0]).unwrap_or(Value::Null);
        Ok(Collection::new(single))
    }

    /// `aggregations.hits.buckets`
    pub fn buckets(&self) -> Result<Collection> {
        let buckets = self
            .aggregations(&[])?
            .items
            .get("hits")
            .and_then(|hits| hits.get("buckets"))
            .cloned()
            .ok_or_else(|| Error::MalformedResponse("aggregations.hits.buckets".to_string()))?;

        Ok(Collection::new(buckets))
    }

    fn hits_object(&self) -> Result<&Map<String, Value>> {
        self.items
            .get("hits")
            .and_then(Value::as_object)
            .ok_or_else(|| Error::MalformedResponse("hits".to_string()))
    }

    fn hit_list(&self) -> Result<&Value> {
        self.hits_object()?
            .get("hits")
            .ok_or_else(|| Error::MalformedResponse("hits.hits".to_string()))
    }

    /// Top-level responses carry a non-empty `_shards` section
    fn is_raw_response(&self) -> bool {
        self.items.get("_shards").is_some_and(|shards| !is_blank(shards))
    }
}

impl From<Value> for Collection {
    fn from(items: Value) -> Self {
        Self::new(items)
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(a) => a.is_empty(),
        Value::Object(m) => m.is_empty(),
    }
}

fn pluck_segment(items: Value, segment: &str) -> Result<Value> {
    match items {
        Value::Array(elements) => elements
            .into_iter()
            .map(|element| pluck_element(element, segment))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(entries) => entries
            .into_iter()
            .map(|(key, element)| Ok((key, pluck_element(element, segment)?)))
            .collect::<Result<Map<_, _>>>()
            .map(Value::Object),
        _ => Err(Error::Pluck {
            segment: segment.to_string(),
        }),
    }
}

fn pluck_element(element: Value, segment: &str) -> Result<Value> {
    if !matches!(element, Value::Array(_) | Value::Object(_)) {
        return Ok(element);
    }

    if let Some(value) = lookup(&element, segment) {
        return Ok(value.clone());
    }

    let first = match &element {
        Value::Object(m) => m.values().next(),
        Value::Array(a) => a.first(),
        _ => None,
    };

    first
        .and_then(|inner| lookup(inner, segment))
        .cloned()
        .ok_or_else(|| Error::Pluck {
            segment: segment.to_string(),
        })
}

fn lookup<'v>(element: &'v Value, key: &str) -> Option<&'v Value> {
    match element {
        Value::Object(m) => m.get(key),
        Value::Array(a) => key.parse::<usize>().ok().and_then(|i| a.get(i)),
        _ => None,
    }
}

fn reshape_buckets(aggregations: &Value, name: &str) -> Result<Value> {
    let path = format!("aggregations.{}.buckets", name);
    let buckets = aggregations
        .get(name)
        .and_then(|aggregation| aggregation.get("buckets"))
        .ok_or_else(|| Error::MalformedResponse(path.clone()))?;

    let summarize = |bucket: &Value| -> Result<Value> {
        let bucket: RawBucket = serde_json::from_value(bucket.clone())
            .map_err(|_| Error::MalformedResponse(path.clone()))?;
        Ok(serde_json::to_value(BucketSummary::from(bucket))?)
    };

    match buckets {
        Value::Array(list) => list
            .iter()
            .map(summarize)
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        // keyed range aggregations return buckets as a map
        Value::Object(keyed) => keyed
            .iter()
            .map(|(key, bucket)| Ok((key.clone(), summarize(bucket)?)))
            .collect::<Result<Map<_, _>>>()
            .map(Value::Object),
        _ => Err(Error::MalformedResponse(path)),
    }
}
