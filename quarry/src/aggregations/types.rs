//! Aggregation values and their wire shape

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::query::Params;

/// Interval used by date histograms that don't name one
pub const DEFAULT_HISTOGRAM_INTERVAL: &str = "day";

#[derive(Debug, Clone, PartialEq)]
pub enum AggregationKind {
    /// Average of a numeric field
    Avg,
    /// Sum of a numeric field
    Sum,
    /// One bucket per unique value
    Terms,
    /// Buckets per calendar interval
    DateHistogram {
        interval: String,
        format: Option<String>,
    },
    /// Caller-defined ranges, passed through as given
    Range { ranges: Vec<Value>, keyed: bool },
}

impl AggregationKind {
    /// Wire name of the aggregation type
    pub fn type_name(&self) -> &'static str {
        match self {
            AggregationKind::Avg => "avg",
            AggregationKind::Sum => "sum",
            AggregationKind::Terms => "terms",
            AggregationKind::DateHistogram { .. } => "date_histogram",
            AggregationKind::Range { .. } => "range",
        }
    }

    /// Bucket kinds may own sub-aggregations, metric kinds may not
    pub fn supports_nesting(&self) -> bool {
        !matches!(self, AggregationKind::Avg | AggregationKind::Sum)
    }
}

/// A named aggregation request.
///
/// The name doubles as the key of the result under `aggregations` in the
/// response.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    name: String,
    kind: AggregationKind,
    field: Option<String>,
    script: Option<String>,
    params: Params,
    aggregations: Vec<Aggregation>,
}

impl Aggregation {
    pub fn new(name: impl Into<String>, kind: AggregationKind) -> Self {
        Self {
            name: name.into(),
            kind,
            field: None,
            script: None,
            params: Params::new(),
            aggregations: Vec::new(),
        }
    }

    pub fn avg(name: impl Into<String>, field: Option<&str>, script: Option<&str>) -> Self {
        Self::new(name, AggregationKind::Avg).source(field, script)
    }

    pub fn sum(name: impl Into<String>, field: Option<&str>, script: Option<&str>) -> Self {
        Self::new(name, AggregationKind::Sum).source(field, script)
    }

    pub fn terms(name: impl Into<String>, field: Option<&str>, script: Option<&str>) -> Self {
        Self::new(name, AggregationKind::Terms).source(field, script)
    }

    /// Date histogram; `interval` falls back to [`DEFAULT_HISTOGRAM_INTERVAL`]
    pub fn date_histogram(
        name: impl Into<String>,
        field: Option<&str>,
        interval: Option<&str>,
        format: Option<&str>,
    ) -> Self {
        let kind = AggregationKind::DateHistogram {
            interval: interval.unwrap_or(DEFAULT_HISTOGRAM_INTERVAL).to_string(),
            format: format.map(str::to_string),
        };
        Self::new(name, kind).source(field, None)
    }

    /// Range buckets. `ranges` are not validated.
    pub fn range(name: impl Into<String>, field: Option<&str>, ranges: Vec<Value>, keyed: bool) -> Self {
        Self::new(name, AggregationKind::Range { ranges, keyed }).source(field, None)
    }

    fn source(mut self, field: Option<&str>, script: Option<&str>) -> Self {
        self.field = field.map(str::to_string);
        self.script = script.map(str::to_string);
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params.extend(params);
        self
    }

    /// Attach a sub-aggregation. Fails for metric aggregations.
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Result<Self> {
        if !self.kind.supports_nesting() {
            return Err(Error::NestingUnsupported(self.name));
        }
        self.aggregations.push(aggregation);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &AggregationKind {
        &self.kind
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn aggregations(&self) -> &[Aggregation] {
        &self.aggregations
    }

    /// `{"<type>": {...}, "aggregations": {...}}`
    pub fn body(&self) -> Value {
        let mut inner = Map::new();

        if let Some(field) = &self.field {
            inner.insert("field".to_string(), Value::String(field.clone()));
        }
        if let Some(script) = &self.script {
            inner.insert("script".to_string(), Value::String(script.clone()));
        }

        match &self.kind {
            AggregationKind::DateHistogram { interval, format } => {
                inner.insert(
                    "calendar_interval".to_string(),
                    Value::String(interval.clone()),
                );
                if let Some(format) = format {
                    inner.insert("format".to_string(), Value::String(format.clone()));
                }
            }
            AggregationKind::Range { ranges, keyed } => {
                inner.insert("ranges".to_string(), Value::Array(ranges.clone()));
                inner.insert("keyed".to_string(), Value::Bool(*keyed));
            }
            AggregationKind::Avg | AggregationKind::Sum | AggregationKind::Terms => {}
        }

        for (key, value) in &self.params {
            inner.insert(key.clone(), value.clone());
        }

        let mut body = Map::new();
        body.insert(self.kind.type_name().to_string(), Value::Object(inner));
        if self.kind.supports_nesting() && !self.aggregations.is_empty() {
            body.insert(
                "aggregations".to_string(),
                aggregations_value(&self.aggregations),
            );
        }

        Value::Object(body)
    }
}

impl Serialize for Aggregation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.body().serialize(serializer)
    }
}

/// Name → body map. A repeated name replaces the earlier body in place.
pub fn aggregations_value(aggregations: &[Aggregation]) -> Value {
    let mut map = Map::new();
    for aggregation in aggregations {
        map.insert(aggregation.name.clone(), aggregation.body());
    }
    Value::Object(map)
}
