//! Command-line interface for the biblio query compiler.

mod cli;

use std::{io, process::ExitCode};

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{args::Cli, commands};

fn main() -> ExitCode {
    // Logs go to stderr so compiled JSON on stdout stays pipeable.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    commands::run(&cli.command, cli.config.as_deref())
}
