//! Boolean clause container (must / must_not / should / filter)

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::clause::Clause;
use super::Params;

/// Role a clause plays inside a boolean container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolRole {
    /// Must match and contributes to the score
    Must,
    /// Must not match; evaluated in filter context
    MustNot,
    /// Should match
    Should,
    /// Must match; scoring is ignored
    Filter,
}

impl BoolRole {
    /// Roles in wire order
    pub const ALL: [BoolRole; 4] = [
        BoolRole::Must,
        BoolRole::MustNot,
        BoolRole::Should,
        BoolRole::Filter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BoolRole::Must => "must",
            BoolRole::MustNot => "must_not",
            BoolRole::Should => "should",
            BoolRole::Filter => "filter",
        }
    }
}

impl std::fmt::Display for BoolRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compound clause grouping sub-clauses by role.
///
/// Nesting is expressed by adding a [`Clause::Bool`] under one of the roles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolClause {
    must: Vec<Clause>,
    must_not: Vec<Clause>,
    should: Vec<Clause>,
    filter: Vec<Clause>,
    params: Params,
}

impl BoolClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach container-level parameters (`minimum_should_match`, `boost`, ...)
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn add(&mut self, clause: Clause, role: BoolRole) {
        self.role_mut(role).push(clause);
    }

    pub fn clauses(&self, role: BoolRole) -> &[Clause] {
        match role {
            BoolRole::Must => &self.must,
            BoolRole::MustNot => &self.must_not,
            BoolRole::Should => &self.should,
            BoolRole::Filter => &self.filter,
        }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Total number of clauses across all roles
    pub fn len(&self) -> usize {
        BoolRole::ALL.iter().map(|r| self.clauses(*r).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn role_mut(&mut self, role: BoolRole) -> &mut Vec<Clause> {
        match role {
            BoolRole::Must => &mut self.must,
            BoolRole::MustNot => &mut self.must_not,
            BoolRole::Should => &mut self.should,
            BoolRole::Filter => &mut self.filter,
        }
    }

    /// `{"bool": {...}}`, empty roles omitted
    pub fn to_value(&self) -> Value {
        self.render(self.must.iter().collect())
    }

    /// Serialization used for the request's top-level query.
    ///
    /// Empty boolean containers are dropped from `must`, and a container
    /// holding a single `must` clause and nothing else collapses to that
    /// clause.
    pub(crate) fn to_query_value(&self) -> Value {
        let must: Vec<&Clause> = self
            .must
            .iter()
            .filter(|c| !matches!(c, Clause::Bool(b) if b.is_empty()))
            .collect();

        let only_must = self.must_not.is_empty()
            && self.should.is_empty()
            && self.filter.is_empty()
            && self.params.is_empty();

        if only_must && must.len() == 1 {
            return must[0].to_value();
        }

        self.render(must)
    }

    fn render(&self, must: Vec<&Clause>) -> Value {
        let mut body = Map::new();

        for role in BoolRole::ALL {
            let clauses: Vec<Value> = match role {
                BoolRole::Must => must.iter().map(|c| c.to_value()).collect(),
                other => self.clauses(other).iter().map(Clause::to_value).collect(),
            };
            if !clauses.is_empty() {
                body.insert(role.as_str().to_string(), Value::Array(clauses));
            }
        }

        for (key, value) in &self.params {
            body.insert(key.clone(), value.clone());
        }

        let mut outer = Map::new();
        outer.insert("bool".to_string(), Value::Object(body));
        Value::Object(outer)
    }
}

impl Serialize for BoolClause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}
