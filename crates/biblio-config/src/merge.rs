//! Configuration merging.
//!
//! Applies parsed `RawConfig` files on top of the built-in defaults, lowest
//! precedence first, so the file closest to the working directory wins.

use std::str::FromStr;

use crate::{
    ConfigError, ConfigSource, KeywordKind, KeywordSpec, QueryConfig,
    parse::{RawConfig, RawKeyword, RawSettings},
};

/// A parsed config file with where it came from.
pub struct ParsedConfig {
    /// The file and how it was found.
    pub source: ConfigSource,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges configuration files into a single `QueryConfig`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar settings: first defined value wins
/// - Keywords: a later (higher precedence) definition replaces the field list entirely
/// - Aliases: added on top of the built-in table; higher precedence wins on conflicts
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<QueryConfig, ConfigError> {
    let mut result = QueryConfig::default();

    for parsed in configs.iter().rev() {
        apply_raw_config(&mut result, &parsed.config)?;
        result.sources.push(parsed.source.clone());
    }
    result.sources.reverse();

    Ok(result)
}

/// Applies one raw config on top of `result`.
///
/// Keywords are applied before aliases so a file can alias its own keywords.
pub fn apply_raw_config(result: &mut QueryConfig, raw: &RawConfig) -> Result<(), ConfigError> {
    if let Some(settings) = &raw.settings {
        apply_raw_settings(result, settings)?;
    }
    if let Some(keywords) = &raw.keywords {
        for (keyword, raw_keyword) in keywords {
            apply_raw_keyword(result, keyword, raw_keyword)?;
        }
    }
    if let Some(aliases) = &raw.aliases {
        for (alias, keyword) in aliases {
            result.keywords.add_alias(alias, keyword)?;
        }
    }
    Ok(())
}

/// Applies raw settings, overwriting any present values.
fn apply_raw_settings(result: &mut QueryConfig, raw: &RawSettings) -> Result<(), ConfigError> {
    if let Some(v) = raw.max_query_length {
        if v == 0 {
            return Err(ConfigError::ZeroQueryLength);
        }
        result.max_query_length = v;
    }
    if let Some(fields) = &raw.free_text_fields {
        if fields.is_empty() {
            return Err(ConfigError::EmptyFields {
                keyword: "free_text_fields".into(),
            });
        }
        result.free_text_fields = fields
            .iter()
            .map(|f| f.to_spec())
            .collect::<Result<_, _>>()?;
    }
    Ok(())
}

/// Defines or redefines one keyword.
///
/// Without an explicit kind, an existing keyword keeps its kind and a new one is `text`.
fn apply_raw_keyword(
    result: &mut QueryConfig,
    keyword: &str,
    raw: &RawKeyword,
) -> Result<(), ConfigError> {
    let kind = match &raw.kind {
        Some(kind) => KeywordKind::from_str(kind).map_err(|kind| ConfigError::UnknownKind {
            keyword: keyword.into(),
            kind,
        })?,
        None => result
            .keywords
            .spec(&keyword.to_ascii_lowercase())
            .map_or(KeywordKind::Text, |spec| spec.kind),
    };
    let fields = raw
        .fields
        .iter()
        .map(|f| f.to_spec())
        .collect::<Result<Vec<_>, _>>()?;
    result.keywords.define(keyword, KeywordSpec::new(kind, fields))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::parse::parse_config_str;

    fn parsed(name: &str, toml: &str) -> ParsedConfig {
        ParsedConfig {
            source: ConfigSource::explicit(name),
            config: parse_config_str(toml, Path::new(name)).unwrap(),
        }
    }

    #[test]
    fn no_configs_gives_defaults() {
        let config = merge_configs(&[]).unwrap();
        assert_eq!(config.max_query_length, QueryConfig::default().max_query_length);
        assert!(config.sources.is_empty());
    }

    #[test]
    fn closest_setting_wins() {
        let local = parsed("local.toml", "[settings]\nmax_query_length = 100\n");
        let global = parsed("global.toml", "[settings]\nmax_query_length = 900\n");
        let config = merge_configs(&[local, global]).unwrap();
        assert_eq!(config.max_query_length, 100);
        let paths: Vec<&Path> = config.sources.iter().map(|s| s.path.as_path()).collect();
        assert_eq!(paths, vec![Path::new("local.toml"), Path::new("global.toml")]);
    }

    #[test]
    fn alias_to_builtin_keyword() {
        let config = merge_configs(&[parsed("a.toml", "[aliases]\nwriter = \"author\"\n")]).unwrap();
        assert_eq!(config.keywords.resolve("Writer"), Some("author"));
    }

    #[test]
    fn alias_to_own_keyword() {
        let toml = r#"
[aliases]
coll = "collection"

[keywords.collection]
fields = ["_collections^2"]
"#;
        let config = merge_configs(&[parsed("a.toml", toml)]).unwrap();
        assert_eq!(config.keywords.resolve("coll"), Some("collection"));
        let spec = config.keywords.spec("collection").unwrap();
        assert_eq!(spec.kind, KeywordKind::Text);
        assert_eq!(spec.fields[0].to_string(), "_collections^2");
    }

    #[test]
    fn redefinition_keeps_kind() {
        let toml = "[keywords.date]\nfields = [\"earliest_date\"]\n";
        let config = merge_configs(&[parsed("a.toml", toml)]).unwrap();
        let spec = config.keywords.spec("date").unwrap();
        assert_eq!(spec.kind, KeywordKind::Date);
        assert_eq!(spec.fields.len(), 1);
    }

    #[test]
    fn alias_to_unknown_keyword_fails() {
        let err = merge_configs(&[parsed("a.toml", "[aliases]\nx = \"nope\"\n")]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownCanonical { .. }));
    }

    #[test]
    fn unknown_kind_fails() {
        let toml = "[keywords.foo]\nkind = \"bogus\"\nfields = \"foo\"\n";
        let err = merge_configs(&[parsed("a.toml", toml)]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKind { .. }));
    }

    #[test]
    fn zero_length_rejected() {
        let err =
            merge_configs(&[parsed("a.toml", "[settings]\nmax_query_length = 0\n")]).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroQueryLength));
    }
}
