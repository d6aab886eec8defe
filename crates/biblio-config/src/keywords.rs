//! Keyword alias and field mapping tables.
//!
//! Users type keywords in many spellings (`a`, `au`, `author`, `name`). The table maps
//! every spelling, case-insensitively, onto one canonical keyword, and maps each
//! canonical keyword onto the backend fields it searches.

use std::{
    collections::{BTreeMap, HashMap},
    str::FromStr,
};

use crate::{ConfigError, FieldSpec};

/// How a keyword's values are compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordKind {
    /// Text search over the keyword's fields.
    Text,
    /// Author search: a full-name field plus a name-variants field.
    Author,
    /// Dates stored redundantly across several fields; accepts range forms.
    Date,
    /// Numbers and identifiers; accepts range forms.
    Numeric,
}

impl KeywordKind {
    /// Whether `after`/`before`, `2000+` and `a->b` forms apply to this keyword.
    pub fn accepts_ranges(self) -> bool {
        matches!(self, Self::Date | Self::Numeric)
    }

    /// Lowercase name as used in config files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Author => "author",
            Self::Date => "date",
            Self::Numeric => "numeric",
        }
    }
}

impl FromStr for KeywordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "author" => Ok(Self::Author),
            "date" => Ok(Self::Date),
            "numeric" => Ok(Self::Numeric),
            other => Err(other.to_string()),
        }
    }
}

/// Field mapping for one canonical keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordSpec {
    /// How values of this keyword are compiled.
    pub kind: KeywordKind,
    /// Backend fields searched by this keyword, in emission order.
    ///
    /// For [`KeywordKind::Author`] the first field is the full-name field and the
    /// second the name-variants field.
    pub fields: Vec<FieldSpec>,
}

impl KeywordSpec {
    /// Creates a spec.
    pub fn new(kind: KeywordKind, fields: Vec<FieldSpec>) -> Self {
        Self { kind, fields }
    }

    /// Validates field count and every field spec.
    fn validate(&self, keyword: &str) -> Result<(), ConfigError> {
        if self.fields.is_empty() {
            return Err(ConfigError::EmptyFields {
                keyword: keyword.into(),
            });
        }
        if self.kind == KeywordKind::Author && self.fields.len() != 2 {
            return Err(ConfigError::AuthorFields {
                keyword: keyword.into(),
                count: self.fields.len(),
            });
        }
        self.fields.iter().try_for_each(FieldSpec::validate)
    }
}

/// Case-insensitive alias table plus per-keyword field mappings.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct KeywordTable {
    /// Lowercased alias -> canonical keyword.
    aliases: HashMap<String, String>,
    /// Canonical keyword -> field mapping.
    keywords: BTreeMap<String, KeywordSpec>,
}

impl KeywordTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines (or redefines) a canonical keyword.
    ///
    /// The canonical name also becomes an alias of itself.
    pub fn define(&mut self, keyword: &str, spec: KeywordSpec) -> Result<(), ConfigError> {
        let keyword = keyword.to_ascii_lowercase();
        spec.validate(&keyword)?;
        self.insert(&keyword, spec);
        Ok(())
    }

    /// Adds an alias for an already-defined canonical keyword.
    pub fn add_alias(&mut self, alias: &str, keyword: &str) -> Result<(), ConfigError> {
        let keyword = keyword.to_ascii_lowercase();
        if !self.keywords.contains_key(&keyword) {
            return Err(ConfigError::UnknownCanonical {
                alias: alias.into(),
                keyword,
            });
        }
        self.aliases.insert(alias.to_ascii_lowercase(), keyword);
        Ok(())
    }

    /// Inserts a keyword without validation. Used for the built-in table.
    pub(crate) fn insert(&mut self, keyword: &str, spec: KeywordSpec) {
        self.aliases.insert(keyword.to_string(), keyword.to_string());
        self.keywords.insert(keyword.to_string(), spec);
    }

    /// Inserts aliases without checking the target. Used for the built-in table.
    pub(crate) fn insert_aliases(&mut self, keyword: &str, aliases: &[&str]) {
        for alias in aliases {
            self.aliases.insert(alias.to_ascii_lowercase(), keyword.to_string());
        }
    }

    /// Resolves an alias to its canonical keyword.
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.aliases
            .get(&alias.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns true if `word` is a known alias (in any case).
    pub fn is_alias(&self, word: &str) -> bool {
        self.resolve(word).is_some()
    }

    /// Returns the field mapping for a canonical keyword.
    pub fn spec(&self, keyword: &str) -> Option<&KeywordSpec> {
        self.keywords.get(keyword)
    }

    /// Resolves an alias straight to its field mapping.
    pub fn lookup(&self, alias: &str) -> Option<(&str, &KeywordSpec)> {
        let keyword = self.resolve(alias)?;
        self.keywords.get(keyword).map(|spec| (keyword, spec))
    }

    /// Returns all aliases of a canonical keyword, sorted.
    pub fn aliases_of(&self, keyword: &str) -> Vec<&str> {
        let mut aliases: Vec<&str> = self
            .aliases
            .iter()
            .filter(|(_, canonical)| canonical.as_str() == keyword)
            .map(|(alias, _)| alias.as_str())
            .collect();
        aliases.sort_unstable();
        aliases
    }

    /// Iterates canonical keywords in name order.
    pub fn keywords(&self) -> impl Iterator<Item = (&str, &KeywordSpec)> {
        self.keywords.iter().map(|(k, spec)| (k.as_str(), spec))
    }

    /// Number of aliases, canonical names included.
    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    /// Checks that every alias resolves and every keyword spec is valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (alias, keyword) in &self.aliases {
            if !self.keywords.contains_key(keyword) {
                return Err(ConfigError::UnknownCanonical {
                    alias: alias.clone(),
                    keyword: keyword.clone(),
                });
            }
        }
        self.keywords
            .iter()
            .try_for_each(|(keyword, spec)| spec.validate(keyword))
    }
}
