//! The query compiler facade.
//!
//! Runs parse, convert, normalize, classify and emit, and turns every failure
//! along the way into a signal. [`QueryCompiler::compile_query`] always returns a
//! usable query.

use biblio_config::QueryConfig;
use biblio_query::{Parser, QueryNode, convert};
use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    classify::{QueryClass, classify},
    emit::Emitter,
    normalize::{UnknownKeyword, normalize},
    query::BackendQuery,
    signal::Signal,
};

/// Output of one compile call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledQuery {
    /// The backend query to execute.
    pub query: BackendQuery,
    /// The normalized AST the query was compiled from.
    #[serde(skip)]
    pub ast: QueryNode,
    /// How the query was compiled.
    pub class: QueryClass,
    /// Diagnostics raised along the way.
    pub signals: Vec<Signal>,
}

impl CompiledQuery {
    /// Returns true if the input could not be parsed.
    pub fn is_malformed(&self) -> bool {
        matches!(self.ast, QueryNode::Malformed(_))
    }

    /// Builds the match-nothing result for unparsable input.
    fn malformed(text: &str, signal: Signal) -> Self {
        Self {
            query: BackendQuery::MatchNone,
            ast: QueryNode::Malformed(text.to_string()),
            class: QueryClass::FreeText,
            signals: vec![signal],
        }
    }
}

/// Compiles query strings against an immutable configuration.
///
/// Holds no mutable state; one instance can serve any number of threads.
#[derive(Debug, Clone)]
pub struct QueryCompiler {
    /// Keyword table, default fields and input cap.
    config: QueryConfig,
}

impl QueryCompiler {
    /// Creates a compiler over `config`.
    pub fn new(config: QueryConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Compiles a user query. Never fails.
    pub fn compile_query(&self, text: &str) -> CompiledQuery {
        let limit = self.config.max_query_length;
        if text.len() > limit {
            debug!(length = text.len(), limit, "query exceeds length cap");
            let signal = Signal::MalformedQuery {
                message: format!("query is longer than {limit} bytes"),
                position: Some(limit),
                suggestion: Some("Shorten the query or split it into several searches".into()),
            };
            return CompiledQuery::malformed(text, signal);
        }

        let tree = match Parser::new(&self.config.keywords).parse(text) {
            Ok(tree) => tree,
            Err(err) => {
                debug!(error = err.message(), position = ?err.position(), "malformed query");
                return CompiledQuery::malformed(text, Signal::malformed(&err));
            }
        };

        let mut signals = Vec::new();
        let extra = tree.extra_keywords();
        if !extra.is_empty() {
            signals.push(Signal::ExtraKeywords { keywords: extra });
        }

        let keywords = &self.config.keywords;
        let (ast, unknown) = normalize(convert(tree, keywords), keywords);
        signals.extend(
            unknown
                .into_iter()
                .map(|UnknownKeyword(keyword)| Signal::UnsupportedKeyword { keyword }),
        );

        let class = classify(&ast);
        let query = Emitter::new(&self.config).emit(&ast, class);
        trace!(class = class.as_str(), signals = signals.len(), "compiled query");

        CompiledQuery {
            query,
            ast,
            class,
            signals,
        }
    }
}
