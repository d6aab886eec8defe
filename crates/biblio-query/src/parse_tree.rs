//! Concrete parse tree.
//!
//! Mirrors the grammar productions one to one. The converter in [`crate::convert`]
//! maps it onto the [`QueryNode`](crate::QueryNode) AST.

use std::iter;

use crate::ast::Value;

/// Result of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseTree {
    /// Empty or all-whitespace input.
    Empty,

    /// A query introduced by `find`, `fin` or `f`.
    Find {
        /// The command word as typed.
        command: String,
        /// The query body after the command word.
        body: QueryBody,
    },

    /// A query with keyword prefixes and no command word.
    Bare(QueryBody),

    /// Input with no keyword construct, accepted whole as one free-text value.
    FreeText(String),
}

impl ParseTree {
    /// Returns every extra keyword found nested inside a keyword value, in order.
    pub fn extra_keywords(&self) -> Vec<String> {
        let mut found = Vec::new();
        match self {
            Self::Find { body, .. } | Self::Bare(body) => body.collect_extra_keywords(&mut found),
            Self::Empty | Self::FreeText(_) => {}
        }
        found
    }
}

/// A chain of operands joined by connectives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBody {
    /// The leading operand.
    pub first: Operand,
    /// Following operands with the connective that joins each to the chain.
    pub rest: Vec<(Connective, Operand)>,
}

impl QueryBody {
    /// Returns true if any operand, at any depth, carries a keyword.
    pub fn has_keyword(&self) -> bool {
        self.operands().any(Operand::has_keyword)
    }

    /// Iterates over all operands of this chain.
    pub fn operands(&self) -> impl Iterator<Item = &Operand> {
        iter::once(&self.first).chain(self.rest.iter().map(|(_, operand)| operand))
    }

    /// Appends extra keywords of all operands to `found`.
    fn collect_extra_keywords(&self, found: &mut Vec<String>) {
        for operand in self.operands() {
            operand.collect_extra_keywords(found);
        }
    }
}

/// Boolean connective between two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    /// Adjacent operands with no connective.
    Implicit,
    /// `and`
    And,
    /// `or`
    Or,
    /// `not`, meaning "and not".
    Not,
    /// `and not`
    AndNot,
}

impl Connective {
    /// Returns true for connectives written by the user.
    pub fn is_explicit(self) -> bool {
        self != Self::Implicit
    }

    /// Returns true if the right operand is negated.
    pub fn negates(self) -> bool {
        matches!(self, Self::Not | Self::AndNot)
    }

    /// Returns the connective as written; empty for implicit AND.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Implicit => "",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::AndNot => "and not",
        }
    }
}

/// One operand of a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// A parenthesized sub-query.
    Group(Box<QueryBody>),
    /// An operand prefixed with `not`.
    Negated(Box<Self>),
    /// A keyword-qualified query.
    Keyword(KeywordQuery),
    /// A value with no keyword.
    Value(Value),
}

impl Operand {
    /// Returns true if this operand carries a keyword at any depth.
    pub fn has_keyword(&self) -> bool {
        match self {
            Self::Group(body) => body.has_keyword(),
            Self::Negated(inner) => inner.has_keyword(),
            Self::Keyword(_) => true,
            Self::Value(_) => false,
        }
    }

    /// Appends extra keywords found in this operand to `found`.
    fn collect_extra_keywords(&self, found: &mut Vec<String>) {
        match self {
            Self::Group(body) => body.collect_extra_keywords(found),
            Self::Negated(inner) => inner.collect_extra_keywords(found),
            Self::Keyword(query) => {
                found.extend(query.extra_keywords.iter().cloned());
                if let KeywordTarget::Group(body) = &query.target {
                    body.collect_extra_keywords(found);
                }
            }
            Self::Value(_) => {}
        }
    }
}

/// A keyword applied to a value or to a parenthesized group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordQuery {
    /// Keyword as typed (lowercased), possibly a compound alias such as `refersto:recid`.
    pub keyword: String,
    /// Known aliases that appeared as nested prefixes inside the value.
    pub extra_keywords: Vec<String>,
    /// What the keyword applies to.
    pub target: KeywordTarget,
}

/// Right-hand side of a keyword query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordTarget {
    /// A single value.
    Value(Value),
    /// A parenthesized sub-query; the keyword distributes over its bare values.
    Group(Box<QueryBody>),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyword(name: &str, extra: &[&str]) -> Operand {
        Operand::Keyword(KeywordQuery {
            keyword: name.into(),
            extra_keywords: extra.iter().map(|s| (*s).to_string()).collect(),
            target: KeywordTarget::Value(Value::Simple("x".into())),
        })
    }

    #[test]
    fn has_keyword_looks_inside_groups_and_negation() {
        let plain = QueryBody {
            first: Operand::Value(Value::Simple("higgs".into())),
            rest: vec![],
        };
        assert!(!plain.has_keyword());

        let nested = QueryBody {
            first: Operand::Value(Value::Simple("higgs".into())),
            rest: vec![(
                Connective::Implicit,
                Operand::Group(Box::new(QueryBody {
                    first: Operand::Negated(Box::new(keyword("t", &[]))),
                    rest: vec![],
                })),
            )],
        };
        assert!(nested.has_keyword());
    }

    #[test]
    fn extra_keywords_in_order() {
        let tree = ParseTree::Bare(QueryBody {
            first: keyword("author", &["title"]),
            rest: vec![(Connective::Or, keyword("j", &["date", "t"]))],
        });
        assert_eq!(tree.extra_keywords(), vec!["title", "date", "t"]);
        assert!(ParseTree::Empty.extra_keywords().is_empty());
    }

    #[test]
    fn connective_flags() {
        assert!(!Connective::Implicit.is_explicit());
        assert!(Connective::Or.is_explicit());
        assert!(Connective::AndNot.negates());
        assert!(Connective::Not.negates());
        assert!(!Connective::And.negates());
        assert_eq!(Connective::AndNot.as_str(), "and not");
    }
}
