//! Syntax highlighting and terminal colors for deckq.
//!
//! This crate provides utilities for syntax-highlighted output of queries, configuration and
//! filter documents, as well as styled terminal output for headers and status messages.

#![warn(missing_docs)]

use deckq_query::{Span, Token, TokenKind};
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

/// A syntax highlighter that can highlight code for terminal output.
pub struct Highlighter {
    /// The syntax set containing language definitions (including TOML and JSON).
    syntax_set: SyntaxSet,
    /// The theme set containing color themes.
    theme_set: EmbeddedLazyThemeSet,
    /// The theme to use.
    theme: EmbeddedThemeName,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Creates a new highlighter with the default theme (Dracula).
    pub fn new() -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
            theme: EmbeddedThemeName::Dracula,
        }
    }

    /// Highlights TOML content for terminal output.
    pub fn highlight_toml(&self, content: &str) -> String {
        self.highlight(content, "toml")
    }

    /// Highlights JSON content for terminal output.
    pub fn highlight_json(&self, content: &str) -> String {
        self.highlight(content, "json")
    }

    /// Highlights content with the specified syntax for terminal output.
    ///
    /// If the syntax is not found, returns the content unchanged.
    pub fn highlight(&self, content: &str, syntax_name: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_extension(syntax_name)
            .or_else(|| self.syntax_set.find_syntax_by_name(syntax_name))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self.theme_set.get(self.theme);
        let mut highlighter = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        for line in LinesWithEndings::from(content) {
            let ranges: Vec<(Style, &str)> = highlighter
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            output.push_str(&escaped);
        }
        // Reset terminal colors at the end
        output.push_str("\x1b[0m");
        output
    }
}

/// ANSI color codes for terminal output.
pub mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan text (for headers and operators).
    pub const CYAN: &str = "\x1b[36m";
    /// Green text (for success and strings).
    pub const GREEN: &str = "\x1b[32m";
    /// Yellow text (for warnings and logic).
    pub const YELLOW: &str = "\x1b[33m";
    /// Magenta text (for regexes).
    pub const MAGENTA: &str = "\x1b[35m";
    /// Red text (for errors).
    pub const RED: &str = "\x1b[31m";
    /// Dim/gray text (for less important info).
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Punctuation that joins, groups or negates expressions.
const LOGIC_PUNCT: &[&str] = &["&", "|", "(", ")", "-", "!"];

/// Highlights a token stream as a query.
///
/// Command names (an identifier directly followed by an operator) are bold, operators cyan,
/// logic punctuation yellow, strings green and regexes magenta.
pub fn highlight_query(tokens: &[Token]) -> String {
    let mut output = String::new();
    for (i, token) in tokens.iter().enumerate() {
        let color = match token.kind {
            TokenKind::Whitespace => None,
            TokenKind::String => Some(colors::GREEN),
            TokenKind::Regex => Some(colors::MAGENTA),
            TokenKind::Punctuation if LOGIC_PUNCT.contains(&token.text.as_str()) => {
                Some(colors::YELLOW)
            }
            TokenKind::Punctuation => Some(colors::CYAN),
            TokenKind::Identifier => tokens
                .get(i + 1)
                .filter(|next| is_operator(next))
                .map(|_| colors::BOLD),
        };
        match color {
            Some(color) => {
                output.push_str(color);
                output.push_str(&token.text);
                output.push_str(colors::RESET);
            }
            None => output.push_str(&token.text),
        }
    }
    output
}

/// Whether a token is operator punctuation.
fn is_operator(token: &Token) -> bool {
    token.kind == TokenKind::Punctuation && !LOGIC_PUNCT.contains(&token.text.as_str())
}

/// Renders `input` with the span underlined by carets on the following line.
///
/// Spans are byte offsets; the caret column counts characters.
pub fn caret_line(input: &str, span: Span) -> String {
    let start = span.start.min(input.len());
    let end = span.end.clamp(start, input.len());
    let column = input.get(..start).map_or(start, |s| s.chars().count());
    let width = input.get(start..end).map_or(1, |s| s.chars().count()).max(1);
    format!(
        "{input}\n{}{}",
        " ".repeat(column),
        error(&"^".repeat(width))
    )
}

/// Formats a header with bold cyan styling.
pub fn header(text: &str) -> String {
    format!("{}{}{}{}", colors::BOLD, colors::CYAN, text, colors::RESET)
}

/// Formats text as a subheader (bold).
pub fn subheader(text: &str) -> String {
    format!("{}{}{}", colors::BOLD, text, colors::RESET)
}

/// Formats text as dimmed/less important.
pub fn dim(text: &str) -> String {
    format!("{}{}{}", colors::DIM, text, colors::RESET)
}

/// Formats text as a success message (green).
pub fn success(text: &str) -> String {
    format!("{}{}{}", colors::GREEN, text, colors::RESET)
}

/// Formats text as a warning (yellow).
pub fn warning(text: &str) -> String {
    format!("{}{}{}", colors::YELLOW, text, colors::RESET)
}

/// Formats text as an error (red).
pub fn error(text: &str) -> String {
    format!("{}{}{}", colors::RED, text, colors::RESET)
}

/// Removes ANSI escape sequences.
pub fn strip_ansi(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            output.push(ch);
        }
    }
    output
}
