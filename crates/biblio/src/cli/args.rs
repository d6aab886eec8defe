//! Clap argument definitions for the `biblio` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "biblio")]
#[command(about = "Compile bibliographic search queries into search backend JSON")]
pub struct Cli {
    /// Use this config file instead of discovering .biblio.toml files
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Supported `biblio` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Compile queries and print the backend query JSON
    Compile(CompileCommand),

    /// List keywords, their aliases and backend fields
    Keywords(KeywordsCommand),

    /// Validate configuration and report the files it was loaded from
    Check,
}

/// Arguments for `biblio compile`.
#[derive(Args, Debug, Clone)]
pub struct CompileCommand {
    /// Queries to compile
    #[arg(required = true)]
    pub queries: Vec<String>,

    /// Also show the normalized query tree and its classification
    #[arg(long)]
    pub explain: bool,

    /// Print each query on a single line
    #[arg(long)]
    pub compact: bool,
}

/// Arguments for `biblio keywords`.
#[derive(Args, Debug, Clone)]
pub struct KeywordsCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::parse_from(["biblio", "compile", "a:ellis", "--config", "x.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        let Commands::Compile(cmd) = cli.command else {
            panic!("expected compile");
        };
        assert_eq!(cmd.queries, vec!["a:ellis"]);
    }
}
