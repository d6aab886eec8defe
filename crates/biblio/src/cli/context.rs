//! Shared context for running CLI commands.

use std::{env, path::Path, process::ExitCode};

use biblio_compile::QueryCompiler;
use biblio_config::{ConfigSource, QueryConfig, discover_config_sources};
use tracing::debug;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Compiler over the loaded configuration.
    pub compiler: QueryCompiler,
}

impl CommandContext {
    /// Loads configuration from `--config` or by discovery from the working directory.
    pub fn load(config_override: Option<&Path>) -> Result<Self, ExitCode> {
        let config = load_config(config_override).map_err(|e| {
            eprintln!("error: failed to load configuration: {e}");
            ExitCode::FAILURE
        })?;

        Ok(Self {
            compiler: QueryCompiler::new(config),
        })
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &QueryConfig {
        self.compiler.config()
    }
}

/// Loads the configuration every command runs with.
///
/// `--config` names the only file to read; otherwise files are discovered from the
/// working directory. Errors are returned preformatted for the terminal.
pub fn load_config(config_override: Option<&Path>) -> Result<QueryConfig, String> {
    let sources = match config_override {
        Some(path) => vec![ConfigSource::explicit(path)],
        None => {
            let cwd = env::current_dir()
                .map_err(|e| format!("could not determine current directory: {e}"))?;
            discover_config_sources(&cwd)
        }
    };
    debug!(files = sources.len(), "loading configuration");

    let config = QueryConfig::load_sources(sources).map_err(|e| e.to_string())?;
    for source in &config.sources {
        debug!(path = %source.path.display(), scope = %source.scope, "loaded config file");
    }
    Ok(config)
}
