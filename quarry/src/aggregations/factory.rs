//! Standalone aggregation constructors

use serde_json::Value;

use super::types::Aggregation;
use crate::query::Params;

/// Builds aggregations outside the fluent chain.
///
/// Handed to aggregation transforms so they can create sub-aggregations.
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregationFactory;

impl AggregationFactory {
    pub fn avg(&self, name: impl Into<String>, field: Option<&str>, script: Option<&str>) -> Aggregation {
        Aggregation::avg(name, field, script)
    }

    pub fn sum(
        &self,
        name: impl Into<String>,
        field: Option<&str>,
        params: Params,
        script: Option<&str>,
    ) -> Aggregation {
        Aggregation::sum(name, field, script).with_params(params)
    }

    pub fn terms_aggregation(
        &self,
        name: impl Into<String>,
        field: Option<&str>,
        params: Params,
        script: Option<&str>,
    ) -> Aggregation {
        Aggregation::terms(name, field, script).with_params(params)
    }

    pub fn date_histogram(
        &self,
        name: impl Into<String>,
        field: Option<&str>,
        interval: Option<&str>,
        format: Option<&str>,
    ) -> Aggregation {
        Aggregation::date_histogram(name, field, interval, format)
    }

    pub fn range_aggregation(
        &self,
        name: impl Into<String>,
        field: Option<&str>,
        ranges: Vec<Value>,
        keyed: bool,
    ) -> Aggregation {
        Aggregation::range(name, field, ranges, keyed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::params;
    use serde_json::json;

    #[test]
    fn test_factory_applies_params() {
        let factory = AggregationFactory;
        let agg = factory.terms_aggregation("tags", Some("tag"), params(json!({"size": 5})), None);
        assert_eq!(agg.body(), json!({"terms": {"field": "tag", "size": 5}}));

        let agg = factory.sum("total", Some("amount"), params(json!({"missing": 0})), None);
        assert_eq!(agg.body(), json!({"sum": {"field": "amount", "missing": 0}}));
    }

    #[test]
    fn test_factory_avg_has_no_params() {
        let agg = AggregationFactory.avg("avg", Some("price"), None);
        assert!(agg.params().is_empty());
        assert_eq!(agg.name(), "avg");
    }
}
