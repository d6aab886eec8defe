//! Backend query emitter.
//!
//! Compiles a normalized AST into a [`BackendQuery`], with one `compile_*` method
//! per node kind. Field names and boosts come from the keyword table.

use biblio_config::{FieldSpec, KeywordKind, KeywordSpec, MatchMode, QueryConfig};
use biblio_query::{QueryNode, Value};

use crate::{
    classify::{QueryClass, classify},
    query::{
        BackendQuery, BoolQuery, MatchQuery, MultiMatchQuery, RangeBounds, RangeQuery, RegexpQuery,
    },
};

/// Compiles a normalized AST, classifying it first.
pub fn compile(ast: &QueryNode, config: &QueryConfig) -> BackendQuery {
    Emitter::new(config).emit(ast, classify(ast))
}

/// Compiles AST nodes into backend queries.
#[derive(Debug, Clone, Copy)]
pub struct Emitter<'a> {
    /// Keyword table and default fields.
    config: &'a QueryConfig,
}

impl<'a> Emitter<'a> {
    /// Creates an emitter over `config`.
    pub fn new(config: &'a QueryConfig) -> Self {
        Self { config }
    }

    /// Compiles `ast` as the given class.
    ///
    /// Empty input matches everything, a malformed tree matches nothing, and a
    /// free-text tree becomes a single weighted match over the default fields.
    pub fn emit(&self, ast: &QueryNode, class: QueryClass) -> BackendQuery {
        match ast {
            QueryNode::Empty => self.compile_free_text(""),
            QueryNode::Malformed(_) => BackendQuery::MatchNone,
            _ => match class {
                QueryClass::FreeText => self.compile_free_text(&ast.to_free_text()),
                QueryClass::Fielded => self.compile_node(ast),
            },
        }
    }

    /// Compiles one node of a fielded query.
    fn compile_node(&self, node: &QueryNode) -> BackendQuery {
        match node {
            QueryNode::Empty => self.compile_free_text(""),
            QueryNode::Malformed(_) => BackendQuery::MatchNone,
            QueryNode::Value(value) => self.compile_unfielded(value),
            QueryNode::Keyword { keyword, value } => self.compile_keyword(keyword, value),
            QueryNode::And(left, right) => self.compile_and(left, right),
            QueryNode::Or(left, right) => {
                BackendQuery::should(vec![self.compile_node(left), self.compile_node(right)])
            }
            QueryNode::Not(inner) => BackendQuery::must_not(vec![self.compile_node(inner)]),
        }
    }

    /// Compiles a conjunction. A negated right side becomes a `must_not` clause of
    /// the same container.
    fn compile_and(&self, left: &QueryNode, right: &QueryNode) -> BackendQuery {
        let left = self.compile_node(left);
        match right {
            QueryNode::Not(negated) => BackendQuery::Bool(BoolQuery {
                must: vec![left],
                should: Vec::new(),
                must_not: vec![self.compile_node(negated)],
            }),
            _ => BackendQuery::must(vec![left, self.compile_node(right)]),
        }
    }

    /// Compiles free text over the default fields; empty text matches everything.
    fn compile_free_text(&self, text: &str) -> BackendQuery {
        let fields = render_fields(self.config.free_text_fields.iter());
        BackendQuery::MultiMatch(MultiMatchQuery::new(text, fields).zero_terms_all())
    }

    /// Compiles a value without a keyword inside a fielded query.
    fn compile_unfielded(&self, value: &Value) -> BackendQuery {
        let fields = render_fields(self.config.free_text_fields.iter());
        match value {
            Value::Quoted(text) => BackendQuery::MultiMatch(MultiMatchQuery::new(text, fields).phrase()),
            Value::Simple(text) => BackendQuery::MultiMatch(MultiMatchQuery::new(text, fields)),
            other => BackendQuery::MultiMatch(MultiMatchQuery::new(other.to_query_string(), fields)),
        }
    }

    /// Compiles a keyword clause through the keyword table.
    fn compile_keyword(&self, keyword: &str, value: &Value) -> BackendQuery {
        let Some(spec) = self.config.keywords.spec(keyword) else {
            return self.compile_unfielded(value);
        };

        match spec.kind {
            KeywordKind::Author => compile_author(spec, value),
            KeywordKind::Text | KeywordKind::Date | KeywordKind::Numeric => {
                compile_fields(&spec.fields, value)
            }
        }
    }
}

/// Compiles an author clause over its full-name and name-variants fields.
///
/// Unquoted names match either field. Quoted names must match the variants field
/// and only score on the full-name field.
fn compile_author(spec: &KeywordSpec, value: &Value) -> BackendQuery {
    let [full_name, variants] = spec.fields.as_slice() else {
        return compile_fields(&spec.fields, value);
    };

    match value {
        Value::Simple(text) => BackendQuery::should(vec![
            match_field(&variants.name, text),
            match_field(&full_name.name, text),
        ]),
        Value::Quoted(text) => BackendQuery::Bool(BoolQuery {
            must: vec![match_field(&variants.name, text)],
            should: vec![match_field(&full_name.name, text)],
            must_not: Vec::new(),
        }),
        Value::Regex(pattern) => BackendQuery::Regexp(RegexpQuery {
            field: full_name.name.clone(),
            value: pattern.clone(),
        }),
        range => compile_text(&spec.fields, &range.to_query_string(), false),
    }
}

/// Compiles a value against a list of weighted fields.
fn compile_fields(fields: &[FieldSpec], value: &Value) -> BackendQuery {
    match value {
        Value::Simple(text) => compile_text(fields, text, false),
        Value::Quoted(text) => compile_text(fields, text, true),
        Value::Regex(pattern) => BackendQuery::any_of(
            fields
                .iter()
                .map(|field| {
                    BackendQuery::Regexp(RegexpQuery {
                        field: field.name.clone(),
                        value: pattern.clone(),
                    })
                })
                .collect(),
        ),
        range => {
            let bounds = range_bounds(range);
            BackendQuery::any_of(
                fields
                    .iter()
                    .map(|field| {
                        BackendQuery::Range(RangeQuery {
                            field: field.name.clone(),
                            bounds: bounds.clone(),
                        })
                    })
                    .collect(),
            )
        }
    }
}

/// Compiles text against fields, honoring per-field phrase mode.
///
/// Phrase-mode fields (or every field, when `phrase` is set) get a phrase
/// `multi_match`; the rest get an analyzed one; the two are OR-ed.
fn compile_text(fields: &[FieldSpec], text: &str, phrase: bool) -> BackendQuery {
    let (phrase_fields, default_fields): (Vec<&FieldSpec>, Vec<&FieldSpec>) = fields
        .iter()
        .partition(|field| phrase || field.mode == MatchMode::Phrase);

    let mut clauses = Vec::new();
    if !default_fields.is_empty() {
        let fields = render_fields(default_fields.into_iter());
        clauses.push(BackendQuery::MultiMatch(MultiMatchQuery::new(text, fields)));
    }
    if !phrase_fields.is_empty() {
        let fields = render_fields(phrase_fields.into_iter());
        clauses.push(BackendQuery::MultiMatch(
            MultiMatchQuery::new(text, fields).phrase(),
        ));
    }
    BackendQuery::any_of(clauses)
}

/// Converts a range-family value into bounds.
fn range_bounds(value: &Value) -> RangeBounds {
    let mut bounds = RangeBounds::default();
    match value {
        Value::Range { from, to } => {
            bounds.gte = Some(from.clone());
            bounds.lte = Some(to.clone());
        }
        Value::Greater(v) => bounds.gt = Some(v.clone()),
        Value::GreaterEqual(v) => bounds.gte = Some(v.clone()),
        Value::Lower(v) => bounds.lt = Some(v.clone()),
        Value::LowerEqual(v) => bounds.lte = Some(v.clone()),
        Value::Simple(_) | Value::Quoted(_) | Value::Regex(_) => {}
    }
    bounds
}

/// Builds a single-field `match` clause.
fn match_field(field: &str, text: &str) -> BackendQuery {
    BackendQuery::Match(MatchQuery {
        field: field.to_string(),
        query: text.to_string(),
    })
}

/// Renders fields as `name^boost` strings.
fn render_fields<'f>(fields: impl Iterator<Item = &'f FieldSpec>) -> Vec<String> {
    fields.map(ToString::to_string).collect()
}
