//! Parse tree to AST conversion.
//!
//! A bottom-up mapping with two passes folded in:
//!
//! - operand chains become left-deep binary nodes, in the order they were typed;
//! - a bare value joined by an explicit connective borrows the most recent keyword
//!   of its chain (`find a x and y` ⇒ `a:x and a:y`), looking through at most one
//!   `not`.

use biblio_config::KeywordTable;
use tracing::debug;

use crate::{
    ast::{QueryNode, Value},
    parse_tree::{Connective, KeywordQuery, KeywordTarget, Operand, ParseTree, QueryBody},
};

/// Converts a parse tree into the query AST.
///
/// `keywords` decides whether a borrowed keyword can hold a range value: a
/// range such as `after 2000` is left unfielded rather than attached to a
/// keyword like `author`.
pub fn convert(tree: ParseTree, keywords: &KeywordTable) -> QueryNode {
    let converter = Converter { keywords };
    match tree {
        ParseTree::Empty => QueryNode::Empty,
        ParseTree::Find { body, .. } | ParseTree::Bare(body) => converter.body(body),
        ParseTree::FreeText(text) => QueryNode::Value(Value::Simple(text)),
    }
}

/// Conversion state shared by the recursive passes.
struct Converter<'a> {
    /// Table used to check range support of borrowed keywords.
    keywords: &'a KeywordTable,
}

impl Converter<'_> {
    /// Folds a chain left-deep, propagating keywords across explicit connectives.
    fn body(&self, body: QueryBody) -> QueryNode {
        let mut tree = self.operand(body.first);
        let mut last_keyword = tree.direct_keyword().map(str::to_string);

        for (connective, operand) in body.rest {
            let mut right = self.operand(operand);
            if connective.negates() {
                right = QueryNode::not(right);
            }
            if connective.is_explicit() {
                right = self.propagate(right, last_keyword.as_deref());
            }
            if let Some(keyword) = right.direct_keyword() {
                last_keyword = Some(keyword.to_string());
            }

            tree = match connective {
                Connective::Or => QueryNode::or(tree, right),
                Connective::Implicit | Connective::And | Connective::Not | Connective::AndNot => {
                    QueryNode::and(tree, right)
                }
            };
        }

        tree
    }

    /// Converts one operand.
    fn operand(&self, operand: Operand) -> QueryNode {
        match operand {
            Operand::Group(body) => self.body(*body),
            Operand::Negated(inner) => QueryNode::not(self.operand(*inner)),
            Operand::Keyword(query) => self.keyword(query),
            Operand::Value(value) => QueryNode::Value(value),
        }
    }

    /// Converts a keyword query, distributing the keyword over a group.
    fn keyword(&self, query: KeywordQuery) -> QueryNode {
        match query.target {
            KeywordTarget::Value(value) => QueryNode::keyword(query.keyword, value),
            KeywordTarget::Group(body) => distribute(self.body(*body), &query.keyword),
        }
    }

    /// Rewrites a bare right-hand operand to carry `keyword`.
    fn propagate(&self, node: QueryNode, keyword: Option<&str>) -> QueryNode {
        match node {
            QueryNode::Value(value) => match keyword {
                Some(keyword) if !value.is_range() || self.accepts_ranges(keyword) => {
                    QueryNode::keyword(keyword, value)
                }
                Some(keyword) => {
                    debug!(
                        keyword,
                        value = %value.to_query_string(),
                        "keyword takes no ranges, value left unfielded"
                    );
                    QueryNode::Value(value)
                }
                None => {
                    debug!(
                        value = %value.to_query_string(),
                        "no preceding keyword to borrow, value left unfielded"
                    );
                    QueryNode::Value(value)
                }
            },
            QueryNode::Not(inner) if matches!(inner.as_ref(), QueryNode::Value(_)) => {
                QueryNode::not(self.propagate(*inner, keyword))
            }
            other => other,
        }
    }

    /// Whether `keyword` resolves to a kind that takes range values.
    ///
    /// Unknown keywords are later searched as text, so they never take ranges.
    fn accepts_ranges(&self, keyword: &str) -> bool {
        self.keywords
            .lookup(keyword)
            .is_some_and(|(_, spec)| spec.kind.accepts_ranges())
    }
}

/// Applies `keyword` to every bare value of `node`; explicit keywords win.
fn distribute(node: QueryNode, keyword: &str) -> QueryNode {
    match node {
        QueryNode::Value(value) => QueryNode::keyword(keyword, value),
        QueryNode::And(left, right) => {
            QueryNode::and(distribute(*left, keyword), distribute(*right, keyword))
        }
        QueryNode::Or(left, right) => {
            QueryNode::or(distribute(*left, keyword), distribute(*right, keyword))
        }
        QueryNode::Not(inner) => QueryNode::not(distribute(*inner, keyword)),
        other @ (QueryNode::Empty | QueryNode::Malformed(_) | QueryNode::Keyword { .. }) => other,
    }
}

#[cfg(test)]
mod tests {
    use biblio_config::builtin_keywords;

    use super::*;
    use crate::parser::Parser;

    fn ast(input: &str) -> QueryNode {
        let keywords = builtin_keywords();
        convert(Parser::new(&keywords).parse(input).unwrap(), &keywords)
    }

    fn kw(keyword: &str, text: &str) -> QueryNode {
        QueryNode::keyword(keyword, Value::Simple(text.into()))
    }

    #[test]
    fn empty_and_free_text() {
        assert_eq!(ast("   "), QueryNode::Empty);
        assert_eq!(ast("higgs boson mass"), QueryNode::simple("higgs boson mass"));
    }

    #[test]
    fn propagates_across_and() {
        assert_eq!(
            ast("find author x and y"),
            QueryNode::and(kw("author", "x"), kw("author", "y"))
        );
    }

    #[test]
    fn propagates_through_one_not() {
        assert_eq!(
            ast("find a x and not y"),
            QueryNode::and(kw("a", "x"), QueryNode::not(kw("a", "y")))
        );
        assert_eq!(
            ast("find a x or not y"),
            QueryNode::or(kw("a", "x"), QueryNode::not(kw("a", "y")))
        );
    }

    #[test]
    fn does_not_propagate_through_two_nots() {
        assert_eq!(
            ast("find a x and not not y"),
            QueryNode::and(
                kw("a", "x"),
                QueryNode::not(QueryNode::not(QueryNode::simple("y")))
            )
        );
    }

    #[test]
    fn successive_nots_fold_left_deep() {
        assert_eq!(
            ast("f a ostapchenko not olinto not haungs"),
            QueryNode::and(
                QueryNode::and(
                    kw("a", "ostapchenko"),
                    QueryNode::not(kw("a", "olinto"))
                ),
                QueryNode::not(kw("a", "haungs"))
            )
        );
    }

    #[test]
    fn implicit_and_does_not_propagate() {
        assert_eq!(
            ast("a:ellis boson"),
            QueryNode::and(kw("a", "ellis"), QueryNode::simple("boson"))
        );
    }

    #[test]
    fn mixed_connectives_fold_left_to_right() {
        assert_eq!(
            ast("a:x or t:y and j:z"),
            QueryNode::and(QueryNode::or(kw("a", "x"), kw("t", "y")), kw("j", "z"))
        );
    }

    #[test]
    fn last_keyword_wins() {
        assert_eq!(
            ast("a:x or t:y or z"),
            QueryNode::or(QueryNode::or(kw("a", "x"), kw("t", "y")), kw("t", "z"))
        );
    }

    #[test]
    fn keyword_distributes_over_group() {
        assert_eq!(
            ast("a:(ellis or not hawking) and t:boson"),
            QueryNode::and(
                QueryNode::or(kw("a", "ellis"), QueryNode::not(kw("a", "hawking"))),
                kw("t", "boson")
            )
        );
    }

    #[test]
    fn explicit_keyword_inside_group_is_kept() {
        assert_eq!(
            ast("a:(ellis or t:boson)"),
            QueryNode::or(kw("a", "ellis"), kw("t", "boson"))
        );
    }

    #[test]
    fn range_value_inherits_keyword() {
        assert_eq!(
            ast("find date 2000+ and before 2005"),
            QueryNode::and(
                QueryNode::keyword("date", Value::GreaterEqual("2000".into())),
                QueryNode::keyword("date", Value::Lower("2005".into()))
            )
        );
    }

    #[test]
    fn range_value_does_not_borrow_keyword_without_ranges() {
        assert_eq!(
            ast("find a ellis and after 2000"),
            QueryNode::and(
                kw("a", "ellis"),
                QueryNode::Value(Value::Greater("2000".into()))
            )
        );
        assert_eq!(
            ast("find a ellis and not before 2000"),
            QueryNode::and(
                kw("a", "ellis"),
                QueryNode::not(QueryNode::Value(Value::Lower("2000".into())))
            )
        );
    }

    #[test]
    fn unresolved_value_stays_unfielded() {
        assert_eq!(
            ast("find higgs and boson"),
            QueryNode::and(QueryNode::simple("higgs"), QueryNode::simple("boson"))
        );
    }

    #[test]
    fn nested_group_chain_is_left_deep() {
        assert_eq!(
            ast("t:a and (t:b or t:c) and t:d"),
            QueryNode::and(
                QueryNode::and(kw("t", "a"), QueryNode::or(kw("t", "b"), kw("t", "c"))),
                kw("t", "d")
            )
        );
    }
}
