//! Backend query model.
//!
//! A small, vendor-neutral subset of a JSON search DSL. Every node serializes to
//! the engine's native shape:
//!
//! ```json
//! {
//!   "bool": {
//!     "must": [
//!       { "multi_match": { "query": "boson", "fields": ["titles.title"] } }
//!     ],
//!     "must_not": [
//!       { "range": { "citation_count": { "lt": "50" } } }
//!     ]
//!   }
//! }
//! ```

use serde::{Serialize, Serializer};
use serde_json::{Map, Value as JsonValue, json};

/// A compiled query ready for serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendQuery {
    /// Match text against several weighted fields.
    MultiMatch(MultiMatchQuery),
    /// Match text against one field.
    Match(MatchQuery),
    /// Bound a field's value.
    Range(RangeQuery),
    /// Match a field against a regular expression.
    Regexp(RegexpQuery),
    /// Boolean combination of clauses.
    Bool(BoolQuery),
    /// Matches no document.
    MatchNone,
}

impl BackendQuery {
    /// Combines clauses that must all match.
    pub fn must(clauses: Vec<Self>) -> Self {
        Self::Bool(BoolQuery {
            must: clauses,
            ..BoolQuery::default()
        })
    }

    /// Combines clauses of which at least one should match.
    pub fn should(clauses: Vec<Self>) -> Self {
        Self::Bool(BoolQuery {
            should: clauses,
            ..BoolQuery::default()
        })
    }

    /// Wraps clauses that must not match.
    pub fn must_not(clauses: Vec<Self>) -> Self {
        Self::Bool(BoolQuery {
            must_not: clauses,
            ..BoolQuery::default()
        })
    }

    /// Combines clauses with `should`, unwrapping a single clause.
    pub fn any_of(mut clauses: Vec<Self>) -> Self {
        if clauses.len() == 1
            && let Some(clause) = clauses.pop()
        {
            return clause;
        }
        Self::should(clauses)
    }

    /// Returns the query in the backend's JSON form.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::MultiMatch(query) => json!({ "multi_match": query.to_json() }),
            Self::Match(query) => json!({ "match": { query.field.clone(): query.query } }),
            Self::Range(query) => json!({ "range": { query.field.clone(): query.bounds.to_json() } }),
            Self::Regexp(query) => json!({ "regexp": { query.field.clone(): query.value } }),
            Self::Bool(query) => json!({ "bool": query.to_json() }),
            Self::MatchNone => json!({ "match_none": {} }),
        }
    }

    /// Returns the nesting depth of boolean containers.
    pub fn bool_depth(&self) -> usize {
        match self {
            Self::Bool(query) => {
                1 + query
                    .must
                    .iter()
                    .chain(&query.should)
                    .chain(&query.must_not)
                    .map(Self::bool_depth)
                    .max()
                    .unwrap_or(0)
            }
            _ => 0,
        }
    }
}

impl Serialize for BackendQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Whether a multi-field match is analyzed or phrase-exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    /// Terms may appear anywhere.
    BestFields,
    /// Terms must appear in sequence.
    Phrase,
}

/// A `multi_match` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiMatchQuery {
    /// Query text.
    pub query: String,
    /// Match type.
    pub match_type: MatchType,
    /// Whether a query with no terms matches every document.
    pub zero_terms_all: bool,
    /// Fields, as `name` or `name^boost`.
    pub fields: Vec<String>,
}

impl MultiMatchQuery {
    /// Creates an analyzed match over `fields`.
    pub fn new(query: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            query: query.into(),
            match_type: MatchType::BestFields,
            zero_terms_all: false,
            fields,
        }
    }

    /// Switches the match to phrase type.
    pub fn phrase(mut self) -> Self {
        self.match_type = MatchType::Phrase;
        self
    }

    /// Makes an empty query match everything.
    pub fn zero_terms_all(mut self) -> Self {
        self.zero_terms_all = true;
        self
    }

    /// Returns the JSON body of the query.
    fn to_json(&self) -> JsonValue {
        let mut body = Map::new();
        body.insert("query".into(), json!(self.query));
        if self.match_type == MatchType::Phrase {
            body.insert("type".into(), json!("phrase"));
        }
        if self.zero_terms_all {
            body.insert("zero_terms_query".into(), json!("all"));
        }
        body.insert("fields".into(), json!(self.fields));
        JsonValue::Object(body)
    }
}

/// A single-field `match` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchQuery {
    /// Field name.
    pub field: String,
    /// Query text.
    pub query: String,
}

/// A `range` query on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeQuery {
    /// Field name.
    pub field: String,
    /// Range bounds.
    pub bounds: RangeBounds,
}

/// Range bounds; unset bounds are omitted from the output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeBounds {
    /// Greater than.
    pub gt: Option<String>,
    /// Greater than or equal.
    pub gte: Option<String>,
    /// Less than.
    pub lt: Option<String>,
    /// Less than or equal.
    pub lte: Option<String>,
}

impl RangeBounds {
    /// Returns the JSON body of the bounds.
    fn to_json(&self) -> JsonValue {
        let mut body = Map::new();
        let bounds = [
            ("gt", &self.gt),
            ("gte", &self.gte),
            ("lt", &self.lt),
            ("lte", &self.lte),
        ];
        for (name, bound) in bounds {
            if let Some(value) = bound {
                body.insert(name.into(), json!(value));
            }
        }
        JsonValue::Object(body)
    }
}

/// A `regexp` query on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexpQuery {
    /// Field name.
    pub field: String,
    /// Regular expression.
    pub value: String,
}

/// A `bool` query. Empty clause lists are omitted from the output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoolQuery {
    /// Clauses that must all match.
    pub must: Vec<BackendQuery>,
    /// Clauses of which at least one should match.
    pub should: Vec<BackendQuery>,
    /// Clauses that must not match.
    pub must_not: Vec<BackendQuery>,
}

impl BoolQuery {
    /// Returns the JSON body of the query.
    fn to_json(&self) -> JsonValue {
        let mut body = Map::new();
        let clauses = [
            ("must", &self.must),
            ("should", &self.should),
            ("must_not", &self.must_not),
        ];
        for (name, list) in clauses {
            if !list.is_empty() {
                let items = list.iter().map(BackendQuery::to_json).collect();
                body.insert(name.into(), JsonValue::Array(items));
            }
        }
        JsonValue::Object(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(field: &str, query: &str) -> BackendQuery {
        BackendQuery::Match(MatchQuery {
            field: field.into(),
            query: query.into(),
        })
    }

    #[test]
    fn multi_match_json() {
        let query = BackendQuery::MultiMatch(
            MultiMatchQuery::new("", vec!["title^3".into(), "doi^10".into()]).zero_terms_all(),
        );
        assert_eq!(
            query.to_json(),
            json!({"multi_match": {"query": "", "zero_terms_query": "all", "fields": ["title^3", "doi^10"]}})
        );
    }

    #[test]
    fn phrase_multi_match_json() {
        let query =
            BackendQuery::MultiMatch(MultiMatchQuery::new("a b", vec!["dois.value".into()]).phrase());
        assert_eq!(
            query.to_json(),
            json!({"multi_match": {"query": "a b", "type": "phrase", "fields": ["dois.value"]}})
        );
    }

    #[test]
    fn bool_omits_empty_lists() {
        let query = BoolQuery {
            must: vec![text("a", "x")],
            should: vec![],
            must_not: vec![text("b", "y")],
        };
        assert_eq!(
            BackendQuery::Bool(query).to_json(),
            json!({"bool": {"must": [{"match": {"a": "x"}}], "must_not": [{"match": {"b": "y"}}]}})
        );
    }

    #[test]
    fn range_and_regexp_json() {
        let range = BackendQuery::Range(RangeQuery {
            field: "citation_count".into(),
            bounds: RangeBounds {
                gte: Some("50".into()),
                lte: Some("100".into()),
                ..RangeBounds::default()
            },
        });
        assert_eq!(
            range.to_json(),
            json!({"range": {"citation_count": {"gte": "50", "lte": "100"}}})
        );

        let regexp = BackendQuery::Regexp(RegexpQuery {
            field: "authors.full_name".into(),
            value: "ell.*".into(),
        });
        assert_eq!(
            regexp.to_json(),
            json!({"regexp": {"authors.full_name": "ell.*"}})
        );
    }

    #[test]
    fn match_none_json() {
        assert_eq!(BackendQuery::MatchNone.to_json(), json!({"match_none": {}}));
    }

    #[test]
    fn serialize_matches_to_json() {
        let query = BackendQuery::should(vec![text("a", "x"), text("b", "y")]);
        let serialized = serde_json::to_value(&query).unwrap();
        assert_eq!(serialized, query.to_json());
    }

    #[test]
    fn any_of_unwraps_single_clause() {
        assert_eq!(BackendQuery::any_of(vec![text("a", "x")]), text("a", "x"));
        assert!(matches!(
            BackendQuery::any_of(vec![text("a", "x"), text("b", "x")]),
            BackendQuery::Bool(_)
        ));
    }

    #[test]
    fn bool_depth_counts_nesting() {
        let inner = BackendQuery::must(vec![text("a", "x")]);
        let outer = BackendQuery::must_not(vec![inner]);
        assert_eq!(outer.bool_depth(), 2);
        assert_eq!(text("a", "x").bool_depth(), 0);
    }
}
