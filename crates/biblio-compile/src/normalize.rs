//! Keyword normalization.
//!
//! Rewrites every keyword of an AST to its canonical name. Keywords missing from
//! the alias table are dropped from their clause, leaving the value unfielded, and
//! reported back so the caller can warn about them.

use biblio_config::KeywordTable;
use biblio_query::QueryNode;
use thiserror::Error;
use tracing::debug;

/// An alias that is not in the keyword table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported keyword '{0}'")]
pub struct UnknownKeyword(pub String);

/// Resolves a user-facing alias to its canonical keyword.
pub fn normalize_keyword(table: &KeywordTable, alias: &str) -> Result<String, UnknownKeyword> {
    table
        .resolve(alias)
        .map(str::to_string)
        .ok_or_else(|| UnknownKeyword(alias.to_ascii_lowercase()))
}

/// Canonicalizes every keyword in `ast`.
///
/// Returns the rewritten tree and the unknown keywords, deduplicated, in the order
/// they were met.
pub fn normalize(ast: QueryNode, table: &KeywordTable) -> (QueryNode, Vec<UnknownKeyword>) {
    let mut unknown = Vec::new();
    let ast = normalize_node(ast, table, &mut unknown);
    (ast, unknown)
}

/// Rewrites one node, recording unknown keywords.
fn normalize_node(
    node: QueryNode,
    table: &KeywordTable,
    unknown: &mut Vec<UnknownKeyword>,
) -> QueryNode {
    match node {
        QueryNode::Keyword { keyword, value } => match normalize_keyword(table, &keyword) {
            Ok(canonical) => QueryNode::Keyword {
                keyword: canonical,
                value,
            },
            Err(err) => {
                debug!(keyword = %err.0, "dropping unsupported keyword");
                if !unknown.contains(&err) {
                    unknown.push(err);
                }
                QueryNode::Value(value)
            }
        },
        QueryNode::And(left, right) => QueryNode::and(
            normalize_node(*left, table, unknown),
            normalize_node(*right, table, unknown),
        ),
        QueryNode::Or(left, right) => QueryNode::or(
            normalize_node(*left, table, unknown),
            normalize_node(*right, table, unknown),
        ),
        QueryNode::Not(inner) => QueryNode::not(normalize_node(*inner, table, unknown)),
        other @ (QueryNode::Empty | QueryNode::Malformed(_) | QueryNode::Value(_)) => other,
    }
}
