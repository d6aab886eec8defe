//! Compiles biblio search queries into search backend queries.
//!
//! The pipeline runs in five stages:
//!
//! 1. **parse**: text to parse tree ([`biblio_query::Parser`])
//! 2. **convert**: parse tree to AST, with implicit keyword propagation
//! 3. **normalize**: aliases to canonical keywords ([`normalize`])
//! 4. **classify**: fielded or free text ([`classify`])
//! 5. **emit**: AST to [`BackendQuery`] ([`Emitter`])
//!
//! [`QueryCompiler`] wraps all five and never fails: problems come back as
//! [`Signal`]s next to a query that is always safe to execute.
//!
//! # Example
//!
//! ```
//! use biblio_compile::{QueryClass, QueryCompiler};
//! use biblio_config::QueryConfig;
//!
//! let compiler = QueryCompiler::new(QueryConfig::default());
//! let compiled = compiler.compile_query("find a ellis and t higgs boson");
//! assert_eq!(compiled.class, QueryClass::Fielded);
//! assert!(compiled.signals.is_empty());
//! println!("{}", compiled.query.to_json());
//! ```

#![warn(missing_docs)]

mod classify;
mod emit;
mod facade;
mod normalize;
mod query;
mod signal;

pub use classify::{QueryClass, classify};
pub use emit::{Emitter, compile};
pub use facade::{CompiledQuery, QueryCompiler};
pub use normalize::{UnknownKeyword, normalize, normalize_keyword};
pub use query::{
    BackendQuery, BoolQuery, MatchQuery, MatchType, MultiMatchQuery, RangeBounds, RangeQuery,
    RegexpQuery,
};
pub use signal::Signal;
