//! Configuration file parsing.
//!
//! Parses individual `.biblio.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};

use crate::{ConfigError, FieldSpec, MatchMode};

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// General settings section.
    pub settings: Option<RawSettings>,
    /// Extra aliases: alias -> canonical keyword.
    pub aliases: Option<BTreeMap<String, String>>,
    /// Keyword definitions: canonical keyword -> field mapping.
    pub keywords: Option<BTreeMap<String, RawKeyword>>,
}

/// Raw general settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    /// Longest query accepted before it is treated as malformed.
    pub max_query_length: Option<usize>,
    /// Fields searched by free-text queries.
    pub free_text_fields: Option<Vec<RawField>>,
}

/// Raw keyword definition.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct RawKeyword {
    /// One of `text`, `author`, `date`, `numeric`.
    pub kind: Option<String>,
    /// Backend fields. Accepts either a single field or an array.
    #[serde_as(as = "OneOrMany<_>")]
    pub fields: Vec<RawField>,
}

/// A field written either as `"name^boost"` or as an inline table.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    /// `"title^3"`
    Short(String),
    /// `{ name = "title", boost = 3.0, mode = "phrase" }`
    Full {
        /// Backend field name.
        name: String,
        /// Boost weight.
        #[serde(default = "unit_boost")]
        boost: f32,
        /// Match mode.
        #[serde(default)]
        mode: MatchMode,
    },
}

/// Default boost for inline field tables.
fn unit_boost() -> f32 {
    1.0
}

impl RawField {
    /// Converts into a validated field spec.
    pub fn to_spec(&self) -> Result<FieldSpec, ConfigError> {
        match self {
            Self::Short(text) => text.parse(),
            Self::Full { name, boost, mode } => {
                let spec = FieldSpec {
                    name: name.clone(),
                    boost: *boost,
                    mode: *mode,
                };
                spec.validate()?;
                Ok(spec)
            }
        }
    }
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}
