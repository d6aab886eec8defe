//! Fielded versus free-text classification.

use std::ops::ControlFlow;

use biblio_query::QueryNode;
use serde::Serialize;

/// How a query is compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryClass {
    /// At least one keyword clause; compiled clause by clause.
    Fielded,
    /// No keyword clause; compiled to one weighted multi-field match.
    FreeText,
}

impl QueryClass {
    /// Returns the lowercase name of the class.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fielded => "fielded",
            Self::FreeText => "free_text",
        }
    }
}

/// Classifies `ast`, stopping at the first keyword found.
pub fn classify(ast: &QueryNode) -> QueryClass {
    match find_keyword(ast) {
        ControlFlow::Break(()) => QueryClass::Fielded,
        ControlFlow::Continue(()) => QueryClass::FreeText,
    }
}

/// Walks the tree, breaking out at the first keyword node.
fn find_keyword(node: &QueryNode) -> ControlFlow<()> {
    match node {
        QueryNode::Keyword { .. } => ControlFlow::Break(()),
        QueryNode::And(left, right) | QueryNode::Or(left, right) => {
            find_keyword(left)?;
            find_keyword(right)
        }
        QueryNode::Not(inner) => find_keyword(inner),
        QueryNode::Empty | QueryNode::Malformed(_) | QueryNode::Value(_) => {
            ControlFlow::Continue(())
        }
    }
}
