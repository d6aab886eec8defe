//! Command implementations and dispatch.

pub mod check;
pub mod compile;
pub mod keywords;

use std::{path::Path, process::ExitCode};

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
///
/// `check` loads configuration itself so it can report the files it read.
pub fn run(command: &Commands, config_override: Option<&Path>) -> ExitCode {
    match command {
        Commands::Compile(cmd) => with_context(config_override, |ctx| compile::run(ctx, cmd)),
        Commands::Keywords(cmd) => with_context(config_override, |ctx| keywords::run(ctx, cmd)),
        Commands::Check => check::run(config_override),
    }
}

/// Loads the command context, then runs `command` with it.
fn with_context(
    config_override: Option<&Path>,
    command: impl FnOnce(&CommandContext) -> ExitCode,
) -> ExitCode {
    match CommandContext::load(config_override) {
        Ok(ctx) => command(&ctx),
        Err(code) => code,
    }
}
