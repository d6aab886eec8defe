//! Query grammar, parse tree and AST for biblio search.
//!
//! The query language has two dialects:
//!
//! - **find queries**: `find a ellis and t higgs boson` - a command word, keywords
//!   separated from multi-word values by whitespace
//! - **bare queries**: `author:ellis title:"higgs boson"` - `keyword:value` pairs
//!
//! Both support `and`, `or`, `not`, `and not`, parentheses, quoted phrases,
//! `/regex/` values and range forms (`date:2000->2005`, `date after 2000`,
//! `topcite:50+`). Anything without a keyword construct is plain free text.
//!
//! # Example
//!
//! ```
//! use biblio_config::builtin_keywords;
//! use biblio_query::{Parser, QueryNode, convert};
//!
//! let keywords = builtin_keywords();
//! let tree = Parser::new(&keywords).parse("find a ellis and hawking").unwrap();
//! let ast = convert(tree, &keywords);
//! assert!(matches!(ast, QueryNode::And(..)));
//! ```

#![warn(missing_docs)]

mod ast;
mod convert;
mod error;
mod lexer;
mod parse_tree;
mod parser;

pub use ast::{QueryNode, Value};
pub use convert::convert;
pub use error::{LexError, ParseError, QueryError, QueryErrorKind};
pub use lexer::{Spanned, Token, tokenize};
pub use parse_tree::{Connective, KeywordQuery, KeywordTarget, Operand, ParseTree, QueryBody};
pub use parser::Parser;
