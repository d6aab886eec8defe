//! Error types for biblio configuration.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use toml::de;

/// Errors that can occur when loading or building query configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: de::Error,
    },

    /// An alias points at a keyword that has no field mapping.
    #[error("alias '{alias}' refers to unknown keyword '{keyword}'")]
    UnknownCanonical {
        /// The alias being defined.
        alias: String,
        /// The canonical keyword it refers to.
        keyword: String,
    },

    /// A field specification could not be parsed.
    #[error("invalid field '{field}': {reason}")]
    InvalidField {
        /// The offending field text.
        field: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A keyword was defined without any backend field.
    #[error("keyword '{keyword}' has no fields")]
    EmptyFields {
        /// The keyword with an empty field list.
        keyword: String,
    },

    /// An author keyword needs a full-name field and a name-variants field.
    #[error("author keyword '{keyword}' needs exactly two fields, got {count}")]
    AuthorFields {
        /// The author-like keyword.
        keyword: String,
        /// Number of fields that were configured.
        count: usize,
    },

    /// An unrecognized keyword kind in a config file.
    #[error("unknown keyword kind '{kind}' for '{keyword}'")]
    UnknownKind {
        /// The keyword being defined.
        keyword: String,
        /// The kind that was given.
        kind: String,
    },

    /// `max_query_length` must allow at least one byte.
    #[error("max_query_length must be greater than zero")]
    ZeroQueryLength,
}
