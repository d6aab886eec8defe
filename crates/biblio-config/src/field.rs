//! Backend field specifications.
//!
//! A field spec names one field of the search backend together with the boost it
//! receives and how values are matched against it. The textual form is the one the
//! backend understands in `multi_match` field lists: `title^3`, `doi`.

use std::{fmt, str::FromStr};

use serde::Deserialize;

use crate::ConfigError;

/// How values are matched against a backend field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Analyzed match, terms may appear in any order.
    #[default]
    Default,
    /// Phrase match, terms must appear in sequence.
    Phrase,
}

/// One backend field with its boost weight and match mode.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Backend field name (dotted path into the record).
    pub name: String,
    /// Relevance multiplier; `1.0` means no boost.
    pub boost: f32,
    /// How values are matched against this field.
    pub mode: MatchMode,
}

impl FieldSpec {
    /// Creates an unboosted field with the default match mode.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            boost: 1.0,
            mode: MatchMode::Default,
        }
    }

    /// Creates a boosted field with the default match mode.
    pub fn boosted(name: impl Into<String>, boost: f32) -> Self {
        Self {
            boost,
            ..Self::new(name)
        }
    }

    /// Returns this field with phrase matching enabled.
    pub fn phrase(mut self) -> Self {
        self.mode = MatchMode::Phrase;
        self
    }

    /// Checks that the spec is usable by the backend.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(self.invalid("empty field name"));
        }
        if self.name.chars().any(|c| c.is_whitespace() || c == '^') {
            return Err(self.invalid("field names cannot contain whitespace or '^'"));
        }
        if !self.boost.is_finite() || self.boost <= 0.0 {
            return Err(self.invalid("boost must be a positive number"));
        }
        Ok(())
    }

    /// Builds an `InvalidField` error for this spec.
    fn invalid(&self, reason: &str) -> ConfigError {
        ConfigError::InvalidField {
            field: self.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.boost == 1.0 {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}^{}", self.name, self.boost)
        }
    }
}

impl FromStr for FieldSpec {
    type Err = ConfigError;

    /// Parses `name` or `name^boost`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let spec = match s.split_once('^') {
            Some((name, boost)) => {
                let boost = boost.parse::<f32>().map_err(|_| ConfigError::InvalidField {
                    field: s.to_string(),
                    reason: format!("invalid boost '{boost}'"),
                })?;
                Self::boosted(name, boost)
            }
            None => Self::new(s),
        };
        spec.validate()?;
        Ok(spec)
    }
}
