//! Implementation of `biblio check`.

use std::{path::Path, process::ExitCode};

use crate::cli::{context::load_config, output::Styles};

/// Loads and validates the configuration, reporting the files it came from.
pub fn run(config_override: Option<&Path>) -> ExitCode {
    let out = Styles::stdout();
    println!("Checking configuration...");
    println!();

    let config = match load_config(config_override) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("{}", out.subheader("Config files:"));
    if config.sources.is_empty() {
        println!("   {}", out.dim("(none found, using built-in keywords)"));
    } else {
        for source in &config.sources {
            let scope = format!("({})", source.scope);
            println!("   {} {}", source.path.display(), out.dim(&scope));
        }
    }
    println!();

    if let Err(e) = config.validate() {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    println!("{}", out.subheader("Summary:"));
    println!(
        "   {} keywords, {} aliases",
        config.keywords.keywords().count(),
        config.keywords.alias_count()
    );
    println!("   {} free-text fields", config.free_text_fields.len());
    println!("   max query length: {} bytes", config.max_query_length);
    println!();

    println!("No issues found.");
    ExitCode::SUCCESS
}
