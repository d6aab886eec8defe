//! Error types for query lexing and parsing.
//!
//! Every error here maps to the single `SyntaxError` outcome of the parser; the
//! compile facade turns it into a malformed-query diagnostic.

use std::{error, fmt};

use thiserror::Error;

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at byte {position}")]
pub struct LexError {
    /// Error message.
    pub message: String,
    /// Byte position in input where error occurred.
    pub position: usize,
}

impl LexError {
    /// Creates a new lexer error.
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// Parse error with position information.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    /// Error message.
    pub message: String,
    /// Byte position in input where error occurred (if applicable).
    pub position: Option<usize>,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(message: impl Into<String>, position: Option<usize>) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// A syntax error for a whole query.
///
/// Carries the original query string so it can be displayed with a position
/// indicator and a correction hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    /// The kind of error that occurred.
    pub kind: QueryErrorKind,
    /// The original query string.
    pub query: String,
}

/// The specific kind of query error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// Tokenization failed (unclosed quote or regex).
    Lex {
        /// Error message.
        message: String,
        /// Byte position in input.
        position: usize,
    },
    /// The token stream does not match the grammar.
    Parse {
        /// Error message.
        message: String,
        /// Byte position in input (if available).
        position: Option<usize>,
    },
}

impl QueryError {
    /// Creates a lex error.
    pub fn lex(message: impl Into<String>, position: usize, query: impl Into<String>) -> Self {
        Self {
            kind: QueryErrorKind::Lex {
                message: message.into(),
                position,
            },
            query: query.into(),
        }
    }

    /// Creates a parse error.
    pub fn parse(
        message: impl Into<String>,
        position: Option<usize>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            kind: QueryErrorKind::Parse {
                message: message.into(),
                position,
            },
            query: query.into(),
        }
    }

    /// Wraps a lexer error whose positions are relative to `offset` within `query`.
    pub fn from_lex(err: LexError, offset: usize, query: &str) -> Self {
        Self::lex(err.message, err.position + offset, query)
    }

    /// Wraps a parser error whose positions are relative to `offset` within `query`.
    pub fn from_parse(err: ParseError, offset: usize, query: &str) -> Self {
        Self::parse(err.message, err.position.map(|p| p + offset), query)
    }

    /// Returns the error message without context.
    pub fn message(&self) -> &str {
        match &self.kind {
            QueryErrorKind::Lex { message, .. } | QueryErrorKind::Parse { message, .. } => message,
        }
    }

    /// Returns the byte position of the error, if known.
    pub fn position(&self) -> Option<usize> {
        match &self.kind {
            QueryErrorKind::Lex { position, .. } => Some(*position),
            QueryErrorKind::Parse { position, .. } => *position,
        }
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        let message = self.message();
        if message.contains("unclosed quote") {
            Some("Add a closing quote (\") to complete the phrase")
        } else if message.contains("unclosed regular expression") {
            Some("Add a closing slash (/) to complete the regular expression")
        } else if message.contains("closing parenthesis") {
            Some("Check that every ( has a matching )")
        } else if message.contains("reserved") {
            Some("'and', 'or' and 'not' join search terms, e.g. 'find a ellis and t boson'")
        } else if message.contains("expected a value") {
            Some("Give the keyword a value, e.g. 'author:ellis' or 'find t higgs'")
        } else if message.contains("needs an expression") {
            Some("Connectives need a search term on both sides, e.g. 'a ellis or a hawking'")
        } else {
            None
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "query syntax error: {}", self.message())?;
        writeln!(f, "  {}", self.query)?;
        if let Some(pos) = self.position() {
            let clamped = pos.min(self.query.len());
            writeln!(f, "  {}^", " ".repeat(clamped))?;
        }
        if let Some(suggestion) = self.suggestion() {
            write!(f, "hint: {suggestion}")?;
        }
        Ok(())
    }
}

impl error::Error for QueryError {}
