//! Fluent aggregation methods on [`SearchBuilder`]

use serde_json::Value;

use super::factory::AggregationFactory;
use super::types::Aggregation;
use crate::error::Result;
use crate::query::Params;
use crate::search::SearchBuilder;

impl<'m> SearchBuilder<'m> {
    /// One bucket per unique value of `field` (or of `script`)
    pub fn terms_aggregation(
        &mut self,
        name: impl Into<String>,
        field: Option<&str>,
        params: Params,
        script: Option<&str>,
    ) -> &mut Self {
        let aggregation = AggregationFactory.terms_aggregation(name, field, params, script);
        self.aggregation(aggregation)
    }

    /// Date histogram; `interval` defaults to `day`
    pub fn date_histogram(
        &mut self,
        name: impl Into<String>,
        field: Option<&str>,
        interval: Option<&str>,
        format: Option<&str>,
    ) -> &mut Self {
        self.aggregation(Aggregation::date_histogram(name, field, interval, format))
    }

    /// Date histogram post-processed by `transform` before it is stored
    pub fn date_histogram_with<F>(
        &mut self,
        name: impl Into<String>,
        field: Option<&str>,
        interval: Option<&str>,
        format: Option<&str>,
        transform: F,
    ) -> Result<&mut Self>
    where
        F: FnOnce(Aggregation, &AggregationFactory) -> Result<Aggregation>,
    {
        self.transformed(
            Aggregation::date_histogram(name, field, interval, format),
            transform,
        )
    }

    pub fn sum(&mut self, name: impl Into<String>, field: Option<&str>, script: Option<&str>) -> &mut Self {
        self.aggregation(Aggregation::sum(name, field, script))
    }

    pub fn sum_with<F>(
        &mut self,
        name: impl Into<String>,
        field: Option<&str>,
        script: Option<&str>,
        transform: F,
    ) -> Result<&mut Self>
    where
        F: FnOnce(Aggregation, &AggregationFactory) -> Result<Aggregation>,
    {
        self.transformed(Aggregation::sum(name, field, script), transform)
    }

    pub fn avg(&mut self, name: impl Into<String>, field: Option<&str>, script: Option<&str>) -> &mut Self {
        self.aggregation(Aggregation::avg(name, field, script))
    }

    /// Range buckets. `ranges` go to the engine unchecked.
    pub fn range_aggregation(
        &mut self,
        name: impl Into<String>,
        field: Option<&str>,
        ranges: Vec<Value>,
        keyed: bool,
    ) -> &mut Self {
        self.aggregation(Aggregation::range(name, field, ranges, keyed))
    }

    pub fn range_aggregation_with<F>(
        &mut self,
        name: impl Into<String>,
        field: Option<&str>,
        ranges: Vec<Value>,
        keyed: bool,
        transform: F,
    ) -> Result<&mut Self>
    where
        F: FnOnce(Aggregation, &AggregationFactory) -> Result<Aggregation>,
    {
        self.transformed(Aggregation::range(name, field, ranges, keyed), transform)
    }

    /// Append a prebuilt aggregation
    pub fn aggregation(&mut self, aggregation: Aggregation) -> &mut Self {
        self.state_mut().aggregations.push(aggregation);
        self
    }

    fn transformed<F>(&mut self, aggregation: Aggregation, transform: F) -> Result<&mut Self>
    where
        F: FnOnce(Aggregation, &AggregationFactory) -> Result<Aggregation>,
    {
        let aggregation = transform(aggregation, &AggregationFactory)?;
        Ok(self.aggregation(aggregation))
    }
}
