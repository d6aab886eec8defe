//! Terminal styling and JSON rendering for CLI output.

use std::{
    env,
    io::{self, IsTerminal},
};

use serde::Serialize;
use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::SyntaxSet,
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

/// ANSI escape codes.
mod colors {
    /// Bold cyan text.
    pub const BOLD_CYAN: &str = "\x1b[1m\x1b[36m";
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Yellow text.
    pub const YELLOW: &str = "\x1b[33m";
    /// Dim text.
    pub const DIM: &str = "\x1b[2m";
    /// Reset all attributes.
    pub const RESET: &str = "\x1b[0m";
}

/// Returns true if `stream` should get ANSI colors.
///
/// Honors `NO_COLOR`; redirected streams are never colored.
fn use_color(stream: &impl IsTerminal) -> bool {
    stream.is_terminal() && env::var_os("NO_COLOR").is_none()
}

/// Text styling for one output stream. Plain text passes through when disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Styles {
    /// Whether escapes are emitted.
    enabled: bool,
}

impl Styles {
    /// Styling for stdout.
    pub fn stdout() -> Self {
        Self::new(use_color(&io::stdout()))
    }

    /// Styling for stderr, decided independently of stdout.
    pub fn stderr() -> Self {
        Self::new(use_color(&io::stderr()))
    }

    /// Styling that is on or off regardless of the terminal.
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Returns true if escapes are emitted.
    pub const fn enabled(self) -> bool {
        self.enabled
    }

    /// Wraps `text` in `codes` when enabled.
    fn paint(self, codes: &str, text: &str) -> String {
        if self.enabled {
            format!("{codes}{text}{}", colors::RESET)
        } else {
            text.to_string()
        }
    }

    /// Formats text as a section header (bold cyan).
    pub fn header(self, text: &str) -> String {
        self.paint(colors::BOLD_CYAN, text)
    }

    /// Formats text as a subheader (bold).
    pub fn subheader(self, text: &str) -> String {
        self.paint(colors::BOLD, text)
    }

    /// Formats text as less important (dim).
    pub fn dim(self, text: &str) -> String {
        self.paint(colors::DIM, text)
    }

    /// Formats text as a warning (yellow).
    pub fn warning(self, text: &str) -> String {
        self.paint(colors::YELLOW, text)
    }
}

/// Serializes `value` as JSON, pretty-printed unless `compact`.
pub fn to_json<T: Serialize>(value: &T, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
}

/// Highlights JSON for terminal output.
pub struct JsonHighlighter {
    /// Syntax definitions.
    syntax_set: SyntaxSet,
    /// Color themes.
    theme_set: EmbeddedLazyThemeSet,
}

impl Default for JsonHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonHighlighter {
    /// Creates a highlighter with the bundled syntaxes and themes.
    pub fn new() -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
        }
    }

    /// Returns `json` with terminal color escapes; unknown syntax leaves it unchanged.
    pub fn highlight(&self, json: &str) -> String {
        let Some(syntax) = self.syntax_set.find_syntax_by_extension("json") else {
            return json.to_string();
        };
        let theme = self.theme_set.get(EmbeddedThemeName::Dracula);
        let mut highlighter = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        for line in LinesWithEndings::from(json) {
            let ranges: Vec<(Style, &str)> = highlighter
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            output.push_str(&as_24_bit_terminal_escaped(&ranges, false));
        }
        output.push_str(colors::RESET);
        output
    }
}
