//! Implementation of `biblio compile`.

use std::process::ExitCode;

use biblio_compile::CompiledQuery;

use crate::cli::{
    args::CompileCommand,
    context::CommandContext,
    output::{JsonHighlighter, Styles, to_json},
};

/// Compiles each query and prints its backend JSON.
///
/// Signals go to stderr. Exits non-zero if any query was malformed.
pub fn run(ctx: &CommandContext, cmd: &CompileCommand) -> ExitCode {
    let out = Styles::stdout();
    let err = Styles::stderr();
    let highlighter = out.enabled().then(JsonHighlighter::new);
    let mut malformed = false;

    for (i, text) in cmd.queries.iter().enumerate() {
        let compiled = ctx.compiler.compile_query(text);
        malformed |= compiled.is_malformed();

        for signal in &compiled.signals {
            eprintln!("{} {signal}", err.warning("warning:"));
        }

        let json = match to_json(&compiled.query, cmd.compact) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("error: failed to serialize JSON: {e}");
                return ExitCode::FAILURE;
            }
        };
        let json = match &highlighter {
            Some(highlighter) => highlighter.highlight(&format!("{json}\n")),
            None => format!("{json}\n"),
        };

        if cmd.explain {
            if i > 0 {
                println!();
            }
            print_explanation(out, text, &compiled);
            println!("{}", out.subheader("Backend query:"));
        }
        print!("{json}");
    }

    if malformed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Prints the normalized tree and classification of a compiled query.
fn print_explanation(out: Styles, text: &str, compiled: &CompiledQuery) {
    println!("{}", out.header(&format!("Query: {text}")));
    println!();

    println!("{} {}", out.subheader("Class:"), compiled.class.as_str());
    println!();

    println!("{}", out.subheader("Tree:"));
    let tree = compiled.ast.to_string();
    for line in tree.lines() {
        println!("  {line}");
    }
    println!();

    println!("{}", out.subheader("Normalized:"));
    let normalized = compiled.ast.to_query_string();
    if normalized.is_empty() {
        println!("  {}", out.dim("(empty)"));
    } else {
        println!("  {normalized}");
    }
    println!();
}
