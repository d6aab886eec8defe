//! Configuration for the biblio query compiler.
//!
//! The compiler is driven by one immutable [`QueryConfig`] value, built at startup and
//! shared by reference afterwards. It carries the keyword alias table, the per-keyword
//! field/boost mapping, the free-text field list and the input length cap.
//!
//! The built-in table can be extended with `.biblio.toml` files. Configuration is
//! resolved by walking up the directory tree from the working directory, collecting
//! any `.biblio.toml` files found, then loading `~/.biblio.toml` with lowest precedence.

#![warn(missing_docs)]

mod builtin;
mod discovery;
mod error;
mod field;
mod keywords;
mod merge;
mod parse;
#[cfg(test)]
mod test_support;

use std::path::Path;

pub use builtin::{builtin_keywords, free_text_fields};
pub use discovery::{
    CONFIG_FILENAME, ConfigScope, ConfigSource, discover_config_sources, global_config_path,
};
pub use error::ConfigError;
pub use field::{FieldSpec, MatchMode};
pub use keywords::{KeywordKind, KeywordSpec, KeywordTable};
pub use merge::{ParsedConfig, apply_raw_config, merge_configs};
pub use parse::{RawConfig, RawField, RawKeyword, RawSettings, parse_config_file, parse_config_str};

/// Default cap on query length, in bytes.
pub const DEFAULT_MAX_QUERY_LENGTH: usize = 2048;

/// Immutable configuration shared by every compile call.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Alias and field mapping tables.
    pub keywords: KeywordTable,
    /// Fields searched by free-text queries.
    pub free_text_fields: Vec<FieldSpec>,
    /// Queries longer than this many bytes are treated as malformed.
    pub max_query_length: usize,
    /// Config files this value was built from, highest precedence first.
    pub sources: Vec<ConfigSource>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            keywords: builtin_keywords(),
            free_text_fields: free_text_fields(),
            max_query_length: DEFAULT_MAX_QUERY_LENGTH,
            sources: Vec::new(),
        }
    }
}

impl QueryConfig {
    /// Loads configuration by discovering and merging all relevant `.biblio.toml` files.
    ///
    /// Returns the built-in configuration if no files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        Self::load_sources(discover_config_sources(cwd))
    }

    /// Loads configuration from the given sources, highest precedence first.
    ///
    /// Every source must exist; a missing explicit file is an error.
    pub fn load_sources(sources: Vec<ConfigSource>) -> Result<Self, ConfigError> {
        let parsed = sources
            .into_iter()
            .map(|source| {
                let config = parse_config_file(&source.path)?;
                Ok(ParsedConfig { source, config })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Builds configuration from a TOML string layered over the built-in defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let raw = parse_config_str(contents, Path::new("<inline>"))?;
        let mut config = Self::default();
        apply_raw_config(&mut config, &raw)?;
        Ok(config)
    }

    /// Checks the keyword table and settings for consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_query_length == 0 {
            return Err(ConfigError::ZeroQueryLength);
        }
        if self.free_text_fields.is_empty() {
            return Err(ConfigError::EmptyFields {
                keyword: "free_text_fields".into(),
            });
        }
        self.free_text_fields
            .iter()
            .try_for_each(FieldSpec::validate)?;
        self.keywords.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = QueryConfig::default();
        config.validate().unwrap();
        assert_eq!(config.max_query_length, DEFAULT_MAX_QUERY_LENGTH);
        assert_eq!(config.free_text_fields.len(), 9);
    }

    #[test]
    fn from_toml_layers_over_builtin() {
        let config = QueryConfig::from_toml_str(
            r#"
[settings]
max_query_length = 64

[aliases]
writer = "author"
"#,
        )
        .unwrap();
        assert_eq!(config.max_query_length, 64);
        assert_eq!(config.keywords.resolve("writer"), Some("author"));
        assert_eq!(config.keywords.resolve("au"), Some("author"));
    }

    #[test]
    fn config_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<QueryConfig>();
    }
}
