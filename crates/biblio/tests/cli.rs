//! CLI integration tests for biblio commands.
//!
//! These tests focus on exit codes and the JSON printed on stdout. Output is
//! piped here, so it must carry no color escapes.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};

/// Helper to create a temp directory for tests.
fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

/// Helper to run `biblio` in `dir` with HOME isolated to it.
fn biblio_in(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("biblio").unwrap();
    cmd.current_dir(dir).env("HOME", dir).env_remove("RUST_LOG");
    cmd
}

/// Parses every stdout line as one JSON document.
fn json_lines(stdout: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

mod compile {
    use super::*;

    #[test]
    fn prints_backend_json() {
        let dir = temp_dir();
        let output = biblio_in(dir.path())
            .args(["compile", "refersto:recid:1286113"])
            .output()
            .unwrap();

        assert!(output.status.success());
        let json: Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(
            json,
            json!({"multi_match": {"query": "1286113", "fields": ["references.recid"]}})
        );
    }

    #[test]
    fn compact_prints_one_line_per_query() {
        let dir = temp_dir();
        let output = biblio_in(dir.path())
            .args(["compile", "--compact", "author: vagenas", "higgs boson"])
            .output()
            .unwrap();

        assert!(output.status.success());
        let queries = json_lines(&output.stdout);
        assert_eq!(queries.len(), 2);
        assert_eq!(
            queries[0]["bool"]["should"][0],
            json!({"match": {"authors.name_variations": "vagenas"}})
        );
        assert_eq!(queries[1]["multi_match"]["query"], "higgs boson");
    }

    #[test]
    fn malformed_query_fails_with_warning() {
        let dir = temp_dir();
        biblio_in(dir.path())
            .args(["compile", "--compact", "author:(ellis or hawking"])
            .assert()
            .failure()
            .stdout(predicate::str::contains(r#"{"match_none":{}}"#))
            .stderr(predicate::str::contains("malformed query"));
    }

    #[test]
    fn unsupported_keyword_warns_but_succeeds() {
        let dir = temp_dir();
        biblio_in(dir.path())
            .args(["compile", "xyz:foo"])
            .assert()
            .success()
            .stderr(predicate::str::contains("unsupported keyword 'xyz'"));
    }

    #[test]
    fn piped_warnings_are_plain() {
        let dir = temp_dir();
        biblio_in(dir.path())
            .args(["compile", "xyz:foo"])
            .assert()
            .success()
            .stderr(predicate::str::starts_with("warning: unsupported keyword"))
            .stderr(predicate::str::contains("\u{1b}").not());
    }

    #[test]
    fn explain_shows_tree_and_class() {
        let dir = temp_dir();
        let output = biblio_in(dir.path())
            .args(["compile", "--explain", "find a ellis or hawking"])
            .output()
            .unwrap();

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(!stdout.contains('\u{1b}'));
        assert!(stdout.contains("Class: fielded"));
        assert!(stdout.contains("author:ellis or author:hawking"));
        assert!(stdout.contains("Backend query:"));
    }

    #[test]
    fn requires_a_query() {
        let dir = temp_dir();
        biblio_in(dir.path()).arg("compile").assert().failure();
    }

    #[test]
    fn uses_discovered_config() {
        let dir = temp_dir();
        fs::write(
            dir.path().join(".biblio.toml"),
            "[aliases]\nwriter = \"author\"\n",
        )
        .unwrap();

        let output = biblio_in(dir.path())
            .args(["compile", "writer:ellis"])
            .output()
            .unwrap();

        assert!(output.status.success());
        let json: Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(
            json["bool"]["should"][1],
            json!({"match": {"authors.full_name": "ellis"}})
        );
    }

    #[test]
    fn config_flag_overrides_discovery() {
        let dir = temp_dir();
        fs::write(dir.path().join(".biblio.toml"), "not valid toml [").unwrap();
        let explicit = dir.path().join("explicit.toml");
        fs::write(&explicit, "[settings]\nmax_query_length = 5\n").unwrap();

        biblio_in(dir.path())
            .args(["compile", "--compact", "--config"])
            .arg(&explicit)
            .arg("higgs boson")
            .assert()
            .failure()
            .stdout(predicate::str::contains("match_none"));
    }

    #[test]
    fn invalid_config_fails() {
        let dir = temp_dir();
        fs::write(dir.path().join(".biblio.toml"), "not valid toml [").unwrap();

        biblio_in(dir.path())
            .args(["compile", "higgs"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to load configuration"));
    }
}

mod keywords {
    use super::*;

    #[test]
    fn lists_keywords_in_table() {
        let dir = temp_dir();
        biblio_in(dir.path())
            .arg("keywords")
            .assert()
            .success()
            .stdout(predicate::str::contains("author"))
            .stdout(predicate::str::contains("authors.name_variations"))
            .stdout(predicate::str::contains("aliases"));
    }

    #[test]
    fn json_output() {
        let dir = temp_dir();
        let output = biblio_in(dir.path())
            .args(["keywords", "--json"])
            .output()
            .unwrap();

        assert!(output.status.success());
        let json: Value = serde_json::from_slice(&output.stdout).unwrap();
        let keywords = json.as_array().unwrap();
        let date = keywords
            .iter()
            .find(|keyword| keyword["keyword"] == "date")
            .unwrap();
        assert_eq!(date["kind"], "date");
        assert_eq!(date["fields"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn includes_configured_keywords() {
        let dir = temp_dir();
        fs::write(
            dir.path().join(".biblio.toml"),
            "[keywords.grant]\nfields = \"funding.grant_number\"\n",
        )
        .unwrap();

        biblio_in(dir.path())
            .args(["keywords", "--json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("funding.grant_number"));
    }
}

mod check {
    use super::*;

    #[test]
    fn succeeds_without_config() {
        let dir = temp_dir();
        biblio_in(dir.path())
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("No issues found."));
    }

    #[test]
    fn reports_config_files() {
        let dir = temp_dir();
        fs::write(
            dir.path().join(".biblio.toml"),
            "[settings]\nmax_query_length = 4096\n",
        )
        .unwrap();

        let output = biblio_in(dir.path()).arg("check").output().unwrap();
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(!stdout.contains('\u{1b}'));
        assert!(stdout.contains(".biblio.toml (local)"));
        assert!(stdout.contains("max query length: 4096 bytes"));
    }

    #[test]
    fn reports_explicit_config_file() {
        let dir = temp_dir();
        fs::write(dir.path().join(".biblio.toml"), "not valid toml [").unwrap();
        fs::write(dir.path().join("team.toml"), "[aliases]\nwriter = \"author\"\n").unwrap();

        biblio_in(dir.path())
            .args(["check", "--config", "team.toml"])
            .assert()
            .success()
            .stdout(predicate::str::contains("team.toml (explicit)"))
            .stdout(predicate::str::contains(".biblio.toml").not());
    }

    #[test]
    fn fails_on_unknown_alias_target() {
        let dir = temp_dir();
        fs::write(
            dir.path().join(".biblio.toml"),
            "[aliases]\nwriter = \"nonexistent\"\n",
        )
        .unwrap();

        biblio_in(dir.path()).arg("check").assert().failure();
    }

    #[test]
    fn fails_on_missing_config_flag_file() {
        let dir = temp_dir();
        biblio_in(dir.path())
            .args(["check", "--config", "missing.toml"])
            .assert()
            .failure();
    }
}
