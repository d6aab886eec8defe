//! Diagnostic signals raised while compiling a query.

use std::fmt;

use biblio_query::QueryError;
use serde::Serialize;

/// A diagnostic for the presentation layer. Signals never stop compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum Signal {
    /// A keyword that is not in the alias table; its value was searched unfielded.
    UnsupportedKeyword {
        /// The keyword as typed, lowercased.
        keyword: String,
    },
    /// The query could not be parsed and matches nothing.
    MalformedQuery {
        /// What went wrong.
        message: String,
        /// Byte offset of the problem, if known.
        position: Option<usize>,
        /// A hint for fixing the query.
        suggestion: Option<String>,
    },
    /// Keyword prefixes nested inside another keyword's value, kept as literal text.
    ExtraKeywords {
        /// The nested keywords, in order.
        keywords: Vec<String>,
    },
}

impl Signal {
    /// Builds a malformed-query signal from a syntax error.
    pub fn malformed(err: &QueryError) -> Self {
        Self::MalformedQuery {
            message: err.message().to_string(),
            position: err.position(),
            suggestion: err.suggestion().map(str::to_string),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedKeyword { keyword } => {
                write!(f, "unsupported keyword '{keyword}', searched as plain text")
            }
            Self::MalformedQuery {
                message,
                position,
                suggestion,
            } => {
                write!(f, "malformed query: {message}")?;
                if let Some(position) = position {
                    write!(f, " (at byte {position})")?;
                }
                if let Some(suggestion) = suggestion {
                    write!(f, "; {suggestion}")?;
                }
                Ok(())
            }
            Self::ExtraKeywords { keywords } => write!(
                f,
                "nested keywords searched as text: {}",
                keywords.join(", ")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_with_tag() {
        let signal = Signal::UnsupportedKeyword {
            keyword: "xyz".into(),
        };
        assert_eq!(
            serde_json::to_value(&signal).unwrap(),
            json!({"signal": "unsupported_keyword", "keyword": "xyz"})
        );
    }

    #[test]
    fn malformed_from_error() {
        let err = QueryError::parse("expected closing parenthesis", Some(7), "a:(x");
        let signal = Signal::malformed(&err);
        let Signal::MalformedQuery {
            position,
            suggestion,
            ..
        } = &signal
        else {
            panic!("expected malformed signal");
        };
        assert_eq!(*position, Some(7));
        assert!(suggestion.is_some());
        assert!(signal.to_string().contains("at byte 7"));
    }

    #[test]
    fn display_extra_keywords() {
        let signal = Signal::ExtraKeywords {
            keywords: vec!["title".into(), "date".into()],
        };
        assert_eq!(
            signal.to_string(),
            "nested keywords searched as text: title, date"
        );
    }
}
