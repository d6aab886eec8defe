//! Locating the `.biblio.toml` files a configuration is built from.
//!
//! A query service normally runs from a project directory: every `.biblio.toml` in that
//! directory and its ancestors applies, nearest first, followed by the per-user file in
//! the home directory. An explicit path replaces the search entirely.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use directories::BaseDirs;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".biblio.toml";

/// How a configuration file was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    /// Named directly, e.g. with `--config`.
    Explicit,
    /// Found in the working directory or one of its ancestors.
    Local,
    /// The per-user file in the home directory.
    Global,
}

impl ConfigScope {
    /// Returns the lowercase label shown next to a file.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::Local => "local",
            Self::Global => "global",
        }
    }
}

impl fmt::Display for ConfigScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configuration file together with how it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    /// Path to the file.
    pub path: PathBuf,
    /// How the file was selected.
    pub scope: ConfigScope,
}

impl ConfigSource {
    /// A file named directly by the caller. It need not exist yet; loading reports that.
    pub fn explicit(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            scope: ConfigScope::Explicit,
        }
    }
}

/// Finds the configuration files that apply in `cwd`, highest precedence first.
///
/// Ancestors are searched from `cwd` upwards. A file with `root = true` closes the list;
/// otherwise the per-user file comes last. Directories named like the config file are
/// skipped.
pub fn discover_config_sources(cwd: &Path) -> Vec<ConfigSource> {
    let global = global_config_path();
    let scope_of = |path: &Path| {
        if global.as_deref() == Some(path) {
            ConfigScope::Global
        } else {
            ConfigScope::Local
        }
    };

    let mut sources = Vec::new();
    for path in cwd
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .filter(|path| path.is_file())
    {
        let closes = is_root_config(&path);
        sources.push(ConfigSource {
            scope: scope_of(&path),
            path,
        });
        if closes {
            return sources;
        }
    }

    if let Some(path) = global.filter(|path| path.is_file())
        && !sources.iter().any(|source| source.path == path)
    {
        sources.push(ConfigSource {
            path,
            scope: ConfigScope::Global,
        });
    }
    sources
}

/// Returns the per-user configuration path (`~/.biblio.toml`), if a home directory is known.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::test_support::TestDir;

    /// Paths of the local sources; the global file depends on the machine.
    fn local_paths(sources: &[ConfigSource]) -> Vec<&Path> {
        sources
            .iter()
            .filter(|source| source.scope == ConfigScope::Local)
            .map(|source| source.path.as_path())
            .collect()
    }

    #[test]
    fn nothing_found() {
        let test_dir = TestDir::new();
        let subdir = test_dir.create_dir("a/b/c");
        assert!(local_paths(&discover_config_sources(&subdir)).is_empty());
    }

    #[test]
    fn nearest_file_first() {
        let test_dir = TestDir::new();
        let outer = test_dir.create_config_at_root();
        let middle = test_dir.create_config("a/b");
        let inner = test_dir.create_config("a/b/c/d");
        let cwd = test_dir.create_dir("a/b/c/d/e");

        let sources = discover_config_sources(&cwd);
        assert_eq!(
            local_paths(&sources),
            vec![inner.as_path(), middle.as_path(), outer.as_path()]
        );
    }

    #[test]
    fn directory_named_like_config_is_skipped() {
        let test_dir = TestDir::new();
        fs::create_dir_all(test_dir.path().join(CONFIG_FILENAME)).unwrap();
        let subdir = test_dir.create_dir("subdir");

        assert!(local_paths(&discover_config_sources(&subdir)).is_empty());
    }

    #[test]
    fn root_file_closes_the_list() {
        let test_dir = TestDir::new();
        test_dir.create_config_at_root();
        let project = test_dir.create_root_config("project");
        let nested = test_dir.create_config("project/sub");
        let cwd = test_dir.create_dir("project/sub/deep");

        let sources = discover_config_sources(&cwd);
        assert_eq!(sources, vec![
            ConfigSource {
                path: nested,
                scope: ConfigScope::Local,
            },
            ConfigSource {
                path: project,
                scope: ConfigScope::Local,
            },
        ]);
    }

    #[test]
    fn explicit_source_and_labels() {
        let source = ConfigSource::explicit("custom.toml");
        assert_eq!(source.path, PathBuf::from("custom.toml"));
        assert_eq!(source.scope.to_string(), "explicit");
        assert_eq!(ConfigScope::Global.as_str(), "global");
        assert!(global_config_path().unwrap().ends_with(CONFIG_FILENAME));
    }
}
