//! Query abstract syntax tree.
//!
//! The AST is built fresh for every compile call by [`crate::convert`], is never
//! mutated afterwards, and is consumed by the backend emitter. Boolean chains are
//! left-deep: `a and b or c` is `Or(And(a, b), c)`.

use std::fmt;

/// A value operand: the thing a keyword (or free text) is matched against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// One or more plain words.
    Simple(String),

    /// An exact phrase, written in double quotes.
    Quoted(String),

    /// A regular expression, written between slashes.
    Regex(String),

    /// Inclusive range `from->to`.
    Range {
        /// Lower bound.
        from: String,
        /// Upper bound.
        to: String,
    },

    /// Strictly greater than (`>x`, `after x`).
    Greater(String),

    /// Greater than or equal (`>=x`, `x+`).
    GreaterEqual(String),

    /// Strictly lower than (`<x`, `before x`).
    Lower(String),

    /// Lower than or equal (`<=x`, `x-`).
    LowerEqual(String),
}

impl Value {
    /// Returns true for the range family of values.
    pub fn is_range(&self) -> bool {
        matches!(
            self,
            Self::Range { .. }
                | Self::Greater(_)
                | Self::GreaterEqual(_)
                | Self::Lower(_)
                | Self::LowerEqual(_)
        )
    }

    /// Returns the raw text of a simple, quoted or regex value.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Simple(text) | Self::Quoted(text) | Self::Regex(text) => Some(text),
            _ => None,
        }
    }

    /// Formats the value as query text.
    pub fn to_query_string(&self) -> String {
        match self {
            Self::Simple(text) => text.clone(),
            Self::Quoted(text) => format!("\"{text}\""),
            Self::Regex(pattern) => format!("/{pattern}/"),
            Self::Range { from, to } => format!("{from}->{to}"),
            Self::Greater(v) => format!(">{v}"),
            Self::GreaterEqual(v) => format!(">={v}"),
            Self::Lower(v) => format!("<{v}"),
            Self::LowerEqual(v) => format!("<={v}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(text) => write!(f, "Simple({text:?})"),
            Self::Quoted(text) => write!(f, "Quoted({text:?})"),
            Self::Regex(pattern) => write!(f, "Regex({pattern:?})"),
            Self::Range { from, to } => write!(f, "Range({from:?}, {to:?})"),
            Self::Greater(v) => write!(f, "Greater({v:?})"),
            Self::GreaterEqual(v) => write!(f, "GreaterEqual({v:?})"),
            Self::Lower(v) => write!(f, "Lower({v:?})"),
            Self::LowerEqual(v) => write!(f, "LowerEqual({v:?})"),
        }
    }
}

/// A parsed, converted query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryNode {
    /// Empty or all-whitespace input.
    Empty,

    /// Input that could not be parsed; replaces the whole tree.
    Malformed(String),

    /// A value with no keyword.
    Value(Value),

    /// A value scoped to a keyword.
    Keyword {
        /// Keyword name. Canonical once normalized.
        keyword: String,
        /// Value to match.
        value: Value,
    },

    /// Both sides must match.
    And(Box<Self>, Box<Self>),

    /// Either side must match.
    Or(Box<Self>, Box<Self>),

    /// The operand must not match.
    Not(Box<Self>),
}

impl QueryNode {
    /// Creates an And node.
    pub fn and(left: Self, right: Self) -> Self {
        Self::And(Box::new(left), Box::new(right))
    }

    /// Creates an Or node.
    pub fn or(left: Self, right: Self) -> Self {
        Self::Or(Box::new(left), Box::new(right))
    }

    /// Creates a Not node.
    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Self) -> Self {
        Self::Not(Box::new(inner))
    }

    /// Creates a keyword node.
    pub fn keyword(keyword: impl Into<String>, value: Value) -> Self {
        Self::Keyword {
            keyword: keyword.into(),
            value,
        }
    }

    /// Creates a simple value node.
    pub fn simple(text: impl Into<String>) -> Self {
        Self::Value(Value::Simple(text.into()))
    }

    /// Returns the keyword of a keyword node, looking through one `Not`.
    pub fn direct_keyword(&self) -> Option<&str> {
        match self {
            Self::Keyword { keyword, .. } => Some(keyword),
            Self::Not(inner) => match inner.as_ref() {
                Self::Keyword { keyword, .. } => Some(keyword),
                _ => None,
            },
            _ => None,
        }
    }

    /// Formats the node as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Empty => writeln!(f, "{prefix}Empty"),
            Self::Malformed(text) => writeln!(f, "{prefix}Malformed({text:?})"),
            Self::Value(value) => writeln!(f, "{prefix}{value}"),
            Self::Keyword { keyword, value } => writeln!(f, "{prefix}Keyword({keyword:?}, {value})"),
            Self::And(left, right) => {
                writeln!(f, "{prefix}And")?;
                left.fmt_tree(f, indent + 1)?;
                right.fmt_tree(f, indent + 1)
            }
            Self::Or(left, right) => {
                writeln!(f, "{prefix}Or")?;
                left.fmt_tree(f, indent + 1)?;
                right.fmt_tree(f, indent + 1)
            }
            Self::Not(inner) => {
                writeln!(f, "{prefix}Not")?;
                inner.fmt_tree(f, indent + 1)
            }
        }
    }

    /// Formats the node as query text.
    ///
    /// Produces output like `author:ellis and not (t:boson or t:higgs)`. Right-hand
    /// boolean operands are parenthesized so the left-deep shape survives.
    pub fn to_query_string(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Malformed(text) => text.clone(),
            Self::Value(value) => value.to_query_string(),
            Self::Keyword { keyword, value } => format!("{keyword}:{}", value.to_query_string()),
            Self::And(left, right) => {
                format!("{} and {}", left.to_query_string(), right.fmt_operand())
            }
            Self::Or(left, right) => {
                format!("{} or {}", left.to_query_string(), right.fmt_operand())
            }
            Self::Not(inner) => format!("not {}", inner.fmt_operand()),
        }
    }

    /// Formats the node as text for a free-text search.
    ///
    /// Unlike [`to_query_string`](Self::to_query_string), `and` becomes plain
    /// juxtaposition and values drop their quoting, so `xyz:foo boson` searches
    /// for `foo boson`.
    pub fn to_free_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Malformed(text) => text.clone(),
            Self::Value(value) | Self::Keyword { value, .. } => value
                .text()
                .map_or_else(|| value.to_query_string(), str::to_string),
            Self::And(left, right) => format!("{} {}", left.to_free_text(), right.to_free_text()),
            Self::Or(left, right) => {
                format!("{} or {}", left.to_free_text(), right.to_free_text())
            }
            Self::Not(inner) => format!("not {}", inner.to_free_text()),
        }
    }

    /// Formats a nested operand, parenthesizing binary nodes.
    fn fmt_operand(&self) -> String {
        match self {
            Self::And(..) | Self::Or(..) => format!("({})", self.to_query_string()),
            _ => self.to_query_string(),
        }
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}
