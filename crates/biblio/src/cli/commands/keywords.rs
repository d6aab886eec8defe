//! Implementation of `biblio keywords`.

use std::process::ExitCode;

use biblio_config::{KeywordTable, MatchMode};
use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use serde::Serialize;

use crate::cli::{args::KeywordsCommand, context::CommandContext, output::Styles};

/// JSON output for one canonical keyword.
#[derive(Serialize)]
struct JsonKeyword<'a> {
    /// Canonical keyword name.
    keyword: &'a str,
    /// Keyword kind.
    kind: &'static str,
    /// Aliases other than the canonical name.
    aliases: Vec<&'a str>,
    /// Backend fields, rendered as `name^boost`.
    fields: Vec<String>,
    /// Fields queried as exact phrases.
    phrase_fields: Vec<&'a str>,
}

/// Lists every canonical keyword with its aliases and fields.
pub fn run(ctx: &CommandContext, cmd: &KeywordsCommand) -> ExitCode {
    let keywords = collect(&ctx.config().keywords);

    if cmd.json {
        return match serde_json::to_string_pretty(&keywords) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: failed to serialize JSON: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Keyword", "Kind", "Aliases", "Fields"]);
    for keyword in &keywords {
        table.add_row(vec![
            Cell::new(keyword.keyword),
            Cell::new(keyword.kind),
            Cell::new(keyword.aliases.join(", ")),
            Cell::new(keyword.fields.join("\n")),
        ]);
    }
    println!("{table}");
    println!(
        "{}",
        Styles::stdout().dim(&format!(
            "{} keywords, {} aliases",
            keywords.len(),
            ctx.config().keywords.alias_count()
        ))
    );
    ExitCode::SUCCESS
}

/// Flattens the keyword table into output rows, in keyword order.
fn collect(table: &KeywordTable) -> Vec<JsonKeyword<'_>> {
    table
        .keywords()
        .map(|(keyword, spec)| JsonKeyword {
            keyword,
            kind: spec.kind.as_str(),
            aliases: table
                .aliases_of(keyword)
                .into_iter()
                .filter(|alias| *alias != keyword)
                .collect(),
            fields: spec.fields.iter().map(ToString::to_string).collect(),
            phrase_fields: spec
                .fields
                .iter()
                .filter(|field| field.mode == MatchMode::Phrase)
                .map(|field| field.name.as_str())
                .collect(),
        })
        .collect()
}
