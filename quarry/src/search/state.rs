//! Per-builder request state and the reset that follows execution

use super::request::{SearchRequest, Sort};
use crate::aggregations::Aggregation;
use crate::query::{BoolClause, BoolRole, Clause};

/// Which of the otherwise surviving fields a reset also clears.
///
/// Pending clauses, the root boolean clause, aggregations, size and source
/// projection are always cleared after execution. Sort and offset survive by
/// default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetScope {
    pub clear_sort: bool,
    pub clear_offset: bool,
}

impl ResetScope {
    /// Clear everything, leaving a builder identical to a fresh one
    pub fn all() -> Self {
        Self {
            clear_sort: true,
            clear_offset: true,
        }
    }
}

/// Everything accumulated by one fluent call chain
#[derive(Debug, Clone, Default)]
pub struct RequestState {
    pub(crate) queries: Vec<Clause>,
    pub(crate) booleans: BoolClause,
    pub(crate) aggregations: Vec<Aggregation>,
    pub(crate) sort: Vec<Sort>,
    pub(crate) source: Option<Vec<String>>,
    pub(crate) size: Option<usize>,
    pub(crate) from: usize,
}

impl RequestState {
    /// Pending leaf clauses in call order
    pub fn queries(&self) -> &[Clause] {
        &self.queries
    }

    /// Root boolean clause fed by must / must_not / should / filter
    pub fn booleans(&self) -> &BoolClause {
        &self.booleans
    }

    pub fn aggregations(&self) -> &[Aggregation] {
        &self.aggregations
    }

    pub fn sorts(&self) -> &[Sort] {
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

    /// Build the request for `index` without touching the state
    pub fn assemble(&self, index: &str) -> SearchRequest {
        let mut query = BoolClause::new();
        query.add(Clause::Bool(self.booleans.clone()), BoolRole::Must);
        for clause in &self.queries {
            query.add(clause.clone(), BoolRole::Must);
        }

        SearchRequest {
            index: index.to_string(),
            query,
            aggregations: self.aggregations.clone(),
            sort: self.sort.clone(),
            source: self.source.clone(),
            size: self.size,
            from: self.from,
        }
    }

    pub fn reset(&mut self, scope: ResetScope) {
        self.queries.clear();
        self.booleans = BoolClause::new();
        self.aggregations.clear();
        self.size = None;
        self.source = None;

        if scope.clear_sort {
            self.sort.clear();
        }
        if scope.clear_offset {
            self.from = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Params;
    use crate::search::SortOrder;

    fn populated() -> RequestState {
        let mut state = RequestState::default();
        state.queries.push(Clause::match_all(Params::new()));
        state
            .booleans
            .add(Clause::term("a", "1", Params::new()), BoolRole::Must);
        state.aggregations.push(Aggregation::avg("x", Some("y"), None));
        state.sort.push(Sort {
            field: "ts".to_string(),
            order: SortOrder::Asc,
            params: Params::new(),
        });
        state.source = Some(vec!["title".to_string()]);
        state.size = Some(10);
        state.from = 20;
        state
    }

    #[test]
    fn test_default_reset_keeps_sort_and_offset() {
        let mut state = populated();
        state.reset(ResetScope::default());

        assert!(state.queries().is_empty());
        assert!(state.booleans().is_empty());
        assert!(state.aggregations().is_empty());
        assert_eq!(state.size(), None);
        assert_eq!(state.source(), None);
        assert_eq!(state.sorts().len(), 1);
        assert_eq!(state.from(), 20);
    }

    #[test]
    fn test_full_reset_clears_everything() {
        let mut state = populated();
        state.reset(ResetScope::all());

        assert!(state.sorts().is_empty());
        assert_eq!(state.from(), 0);
    }

    #[test]
    fn test_assemble_puts_root_bool_first() {
        let state = populated();
        let request = state.assemble("products");

        assert_eq!(request.index(), "products");
        let must = request.query().clauses(BoolRole::Must);
        assert_eq!(must.len(), 2);
        assert!(matches!(&must[0], Clause::Bool(_)));
        assert_eq!(must[1].kind(), "match_all");
    }
}
