//! Filter translation with wildcard semantics
//!
//! Request filters are flat `attribute=value` pairs. A `*` at either end of
//! the value selects the match kind:
//!
//! ```text
//! ?host_name=*web*   contains "web"
//! ?host_name=web*    starts with "web"
//! ?host_name=*web    ends with "web"
//! ?host_name=web     exactly "web"
//! ?host_name=*       contains "" (everything)
//! ```

use indexmap::IndexMap;
use serde::Serialize;

/// How a filter value is compared with an attribute value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Contains,
    StartsWith,
    EndsWith,
}

impl MatchKind {
    /// Evaluate the predicate against a candidate attribute value
    pub fn matches(self, candidate: &str, value: &str) -> bool {
        match self {
            MatchKind::Exact => candidate == value,
            MatchKind::Contains => candidate.contains(value),
            MatchKind::StartsWith => candidate.starts_with(value),
            MatchKind::EndsWith => candidate.ends_with(value),
        }
    }
}

/// A single match predicate on one attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Term {
    pub value: String,
    pub kind: MatchKind,
}

/// Ordered set of match predicates, all of which must hold
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Query {
    terms: IndexMap<String, Term>,
}

impl Query {
    /// A query matching everything
    pub fn all() -> Self {
        Self::default()
    }

    /// A single exact-match term
    pub fn exact(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        let mut query = Self::default();
        query.insert(attribute, value, MatchKind::Exact);
        query
    }

    pub fn insert(&mut self, attribute: impl Into<String>, value: impl Into<String>, kind: MatchKind) {
        self.terms.insert(
            attribute.into(),
            Term {
                value: value.into(),
                kind,
            },
        );
    }

    pub fn get(&self, attribute: &str) -> Option<&Term> {
        self.terms.get(attribute)
    }

    pub fn terms(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.terms.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Check every term against an attribute map
    ///
    /// An attribute absent from the map never matches.
    pub fn matches(&self, attributes: &IndexMap<String, String>) -> bool {
        self.terms.iter().all(|(attribute, term)| {
            attributes
                .get(attribute)
                .is_some_and(|candidate| term.kind.matches(candidate, &term.value))
        })
    }
}

/// Split a raw filter value into its match kind and stripped value
pub fn parse_term(raw: &str) -> Term {
    let (kind, value) = if raw.len() >= 2 && raw.starts_with('*') && raw.ends_with('*') {
        (MatchKind::Contains, &raw[1..raw.len() - 1])
    } else if raw == "*" {
        (MatchKind::Contains, "")
    } else if let Some(rest) = raw.strip_prefix('*') {
        (MatchKind::EndsWith, rest)
    } else if let Some(rest) = raw.strip_suffix('*') {
        (MatchKind::StartsWith, rest)
    } else {
        (MatchKind::Exact, raw)
    };

    Term {
        value: value.to_string(),
        kind,
    }
}

/// Translate raw request filters into a [`Query`]
///
/// A repeated attribute keeps its last value.
pub fn translate<I>(raw: I) -> Query
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut query = Query::default();
    for (attribute, value) in raw {
        let term = parse_term(&value);
        query.terms.insert(attribute, term);
    }
    query
}
