//! Fluent query methods on [`SearchBuilder`]

use serde_json::Value;

use super::boolean::BoolRole;
use super::clause::Clause;
use super::Params;
use crate::search::SearchBuilder;

impl<'m> SearchBuilder<'m> {
    /// Exact term match
    pub fn term(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.term_with(field, value, Params::new())
    }

    pub fn term_with(
        &mut self,
        field: impl Into<String>,
        value: impl Into<Value>,
        params: Params,
    ) -> &mut Self {
        self.push_query(Clause::term(field, value, params))
    }

    /// Match any of several exact terms
    pub fn terms<I, V>(&mut self, field: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.terms_with(field, values, Params::new())
    }

    pub fn terms_with<I, V>(&mut self, field: impl Into<String>, values: I, params: Params) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_query(Clause::terms(field, values, params))
    }

    /// Limit `field` to `[gte, lte]` using the default date format
    pub fn range(
        &mut self,
        field: impl Into<String>,
        gte: impl Into<Value>,
        lte: impl Into<Value>,
    ) -> &mut Self {
        self.range_with(field, gte, lte, None, Params::new())
    }

    pub fn range_with(
        &mut self,
        field: impl Into<String>,
        gte: impl Into<Value>,
        lte: impl Into<Value>,
        format: Option<&str>,
        params: Params,
    ) -> &mut Self {
        self.push_query(Clause::range(field, gte, lte, format, params))
    }

    /// Analyzed full-text match
    pub fn match_query(&mut self, field: impl Into<String>, query: impl Into<String>) -> &mut Self {
        self.match_query_with(field, query, Params::new())
    }

    pub fn match_query_with(
        &mut self,
        field: impl Into<String>,
        query: impl Into<String>,
        params: Params,
    ) -> &mut Self {
        self.push_query(Clause::match_query(field, query, params))
    }

    pub fn match_phrase(&mut self, field: impl Into<String>, query: impl Into<String>) -> &mut Self {
        self.match_phrase_with(field, query, Params::new())
    }

    pub fn match_phrase_with(
        &mut self,
        field: impl Into<String>,
        query: impl Into<String>,
        params: Params,
    ) -> &mut Self {
        self.push_query(Clause::match_phrase(field, query, params))
    }

    pub fn simple_query_string<I, S>(&mut self, query: impl Into<String>, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.simple_query_string_with(query, fields, Params::new())
    }

    pub fn simple_query_string_with<I, S>(
        &mut self,
        query: impl Into<String>,
        fields: I,
        params: Params,
    ) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_query(Clause::simple_query_string(query, fields, params))
    }

    pub fn match_all(&mut self) -> &mut Self {
        self.push_query(Clause::match_all(Params::new()))
    }

    /// Clauses built by `build` must match and contribute to the score.
    ///
    /// ```ignore
    /// builder.must(|q| {
    ///     q.term("status", "active").range("created", "2020-01-01", "2020-12-31");
    /// });
    /// ```
    pub fn must<F>(&mut self, build: F) -> &mut Self
    where
        F: FnOnce(&mut SearchBuilder<'m>),
    {
        self.compose(BoolRole::Must, build)
    }

    /// Clauses built by `build` must not match
    pub fn must_not<F>(&mut self, build: F) -> &mut Self
    where
        F: FnOnce(&mut SearchBuilder<'m>),
    {
        self.compose(BoolRole::MustNot, build)
    }

    /// Clauses built by `build` should match
    pub fn should<F>(&mut self, build: F) -> &mut Self
    where
        F: FnOnce(&mut SearchBuilder<'m>),
    {
        self.compose(BoolRole::Should, build)
    }

    /// Clauses built by `build` must match, without scoring
    pub fn filter<F>(&mut self, build: F) -> &mut Self
    where
        F: FnOnce(&mut SearchBuilder<'m>),
    {
        self.compose(BoolRole::Filter, build)
    }

    /// Run `build` against a fresh builder bound to the same model and fold
    /// what it produced into the root boolean clause under `role`.
    fn compose<F>(&mut self, role: BoolRole, build: F) -> &mut Self
    where
        F: FnOnce(&mut SearchBuilder<'m>),
    {
        let mut nested = SearchBuilder::new(self.model());
        build(&mut nested);

        let (queries, booleans) = nested.into_clauses();

        if queries.is_empty() {
            self.state_mut().booleans.add(Clause::Bool(booleans), role);
        } else {
            if !booleans.is_empty() {
                tracing::debug!(
                    role = %role,
                    discarded = booleans.len(),
                    "nested builder produced leaf clauses; ignoring its boolean clauses"
                );
            }
            for query in queries {
                self.state_mut().booleans.add(query, role);
            }
        }

        self
    }

    fn push_query(&mut self, clause: Clause) -> &mut Self {
        self.state_mut().queries.push(clause);
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{IndexModel, Model};
    use crate::query::{params, BoolRole, Clause};
    use crate::search::SearchBuilder;
    use serde_json::json;

    fn model() -> IndexModel {
        IndexModel::new("products")
    }

    fn active(q: &mut SearchBuilder<'_>) {
        q.term("status", "active");
    }

    // ===================================================================
    // Leaf clauses
    // ===================================================================

    #[test]
    fn test_leaf_calls_preserve_order() {
        let model = model();
        let mut q = model.query();
        q.term("a", "1")
            .match_query("title", "fox")
            .terms("tag", ["x", "y"])
            .match_all()
            .term("a", "1");

        let kinds: Vec<&str> = q.state().queries().iter().map(Clause::kind).collect();
        assert_eq!(kinds, vec!["term", "match", "terms", "match_all", "term"]);
    }

    #[test]
    fn test_with_variants_pass_params() {
        let model = model();
        let mut q = model.query();
        q.match_phrase_with("body", "brown fox", params(json!({"slop": 1})));

        assert_eq!(
            q.state().queries()[0].to_value(),
            json!({"match_phrase": {"body": {"query": "brown fox", "slop": 1}}})
        );
    }

    // ===================================================================
    // Boolean composition
    // ===================================================================

    #[test]
    fn test_single_clause_callback_lands_in_role() {
        for role in BoolRole::ALL {
            let model = model();
            let mut q = model.query();
            match role {
                BoolRole::Must => q.must(active),
                BoolRole::MustNot => q.must_not(active),
                BoolRole::Should => q.should(active),
                BoolRole::Filter => q.filter(active),
            };

            let booleans = q.state().booleans();
            assert_eq!(booleans.len(), 1);
            assert_eq!(
                booleans.clauses(role),
                &[Clause::term("status", "active", Default::default())]
            );
            assert!(q.state().queries().is_empty());
        }
    }

    #[test]
    fn test_callback_with_only_booleans_nests_container() {
        let model = model();
        let mut q = model.query();
        q.should(|n| {
            n.must(|m| {
                m.term("a", "1");
            })
            .must_not(|m| {
                m.term("b", "2");
            });
        });

        let should = q.state().booleans().clauses(BoolRole::Should);
        assert_eq!(should.len(), 1);
        match &should[0] {
            Clause::Bool(inner) => {
                assert_eq!(inner.clauses(BoolRole::Must).len(), 1);
                assert_eq!(inner.clauses(BoolRole::MustNot).len(), 1);
            }
            other => panic!("Expected Bool, got {:?}", other),
        }
    }

    #[test]
    fn test_leaf_clauses_win_over_nested_booleans() {
        let model = model();
        let mut q = model.query();
        q.filter(|n| {
            n.term("a", "1").must(|m| {
                m.term("ignored", "x");
            });
        });

        let filter = q.state().booleans().clauses(BoolRole::Filter);
        assert_eq!(filter, &[Clause::term("a", "1", Default::default())]);
    }

    #[test]
    fn test_nested_state_does_not_leak_into_parent() {
        let model = model();
        let mut q = model.query();
        q.match_all().must(|n| {
            n.term("a", "1").size(99).sort("x", None);
        });

        assert_eq!(q.state().queries().len(), 1);
        assert_eq!(q.state().size(), None);
        assert!(q.state().sorts().is_empty());
    }

    #[test]
    fn test_all_roles_share_one_root_container() {
        let model = model();
        let mut q = model.query();
        q.must(|n| {
            n.term("a", "1");
        })
        .should(|n| {
            n.term("b", "2").term("c", "3");
        });

        let booleans = q.state().booleans();
        assert_eq!(booleans.clauses(BoolRole::Must).len(), 1);
        assert_eq!(booleans.clauses(BoolRole::Should).len(), 2);
    }
}
