//! Search builder and request assembly
//!
//! A [`SearchBuilder`] accumulates clauses, aggregations, sorting and
//! pagination, assembles them into a [`SearchRequest`] and executes it
//! through a [`Transport`]. After a successful execution the builder is
//! reset so it can start the next request.

mod request;
mod state;

pub use request::{SearchRequest, Sort, SortOrder};
pub use state::{RequestState, ResetScope};

use serde_json::Value;

use crate::collection::Collection;
use crate::error::Result;
use crate::model::Model;
use crate::query::{BoolClause, Clause, Params};
use crate::transport::Transport;

/// Size used by [`SearchBuilder::size`] when called with `None`
pub const DEFAULT_PAGE_SIZE: usize = 15;

/// Fluent request builder bound to a [`Model`]
pub struct SearchBuilder<'m> {
    model: &'m dyn Model,
    state: RequestState,
    reset_scope: ResetScope,
}

impl<'m> SearchBuilder<'m> {
    pub fn new(model: &'m dyn Model) -> Self {
        Self {
            model,
            state: RequestState::default(),
            reset_scope: ResetScope::default(),
        }
    }

    pub fn model(&self) -> &'m dyn Model {
        self.model
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut RequestState {
        &mut self.state
    }

    /// Consume the builder, keeping only what boolean folding needs
    pub(crate) fn into_clauses(self) -> (Vec<Clause>, BoolClause) {
        (self.state.queries, self.state.booleans)
    }

    /// Restrict the returned `_source` to `fields`
    pub fn source<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.source = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Page size; `None` means [`DEFAULT_PAGE_SIZE`]
    pub fn size(&mut self, size: impl Into<Option<usize>>) -> &mut Self {
        self.state.size = Some(size.into().unwrap_or(DEFAULT_PAGE_SIZE));
        self
    }

    /// Return no hits (aggregation-only requests)
    pub fn size_less(&mut self) -> &mut Self {
        self.size(0)
    }

    /// Sort by `field`, descending unless `order` says otherwise
    pub fn sort(&mut self, field: impl Into<String>, order: Option<SortOrder>) -> &mut Self {
        self.sort_with(field, order, Params::new())
    }

    pub fn sort_with(
        &mut self,
        field: impl Into<String>,
        order: Option<SortOrder>,
        params: Params,
    ) -> &mut Self {
        self.state.sort.push(Sort {
            field: field.into(),
            order: order.unwrap_or_default(),
            params,
        });
        self
    }

    /// Offset of the first hit
    pub fn from(&mut self, from: usize) -> &mut Self {
        self.state.from = from;
        self
    }

    pub fn offset(&self) -> usize {
        self.state.from
    }

    /// Choose which of sort / offset are also cleared after execution
    pub fn reset_scope(&mut self, scope: ResetScope) -> &mut Self {
        self.reset_scope = scope;
        self
    }

    /// Assemble the request without executing it
    pub fn request(&self) -> SearchRequest {
        self.state.assemble(self.model.index())
    }

    /// The exact document [`get`](Self::get) would send
    pub fn debug(&self) -> Value {
        self.request().to_value()
    }

    /// Execute through the model's transport
    pub async fn get(&mut self) -> Result<Collection> {
        let transport = self.model.transport()?;
        self.get_with(transport.as_ref()).await
    }

    /// Execute through `transport`, then reset the builder
    pub async fn get_with(&mut self, transport: &dyn Transport) -> Result<Collection> {
        let request = self.request();

        tracing::debug!(
            index = request.index(),
            clauses = self.state.queries.len(),
            aggregations = self.state.aggregations.len(),
            "executing search"
        );

        let response = transport.search(&request, request.index()).await?;

        self.state.reset(self.reset_scope);

        Ok(Collection::new(response))
    }
}
