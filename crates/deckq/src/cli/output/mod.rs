//! Rendering and JSON serialization for CLI output.

use std::process::ExitCode;

pub use deckq_highlight::{dim, header, subheader, success, warning};
use deckq_highlight::{Highlighter, strip_ansi};
use deckq_query::Span;
use deckq_search::SearchError;
use serde::Serialize;

/// JSON shape of a failed query.
#[derive(Serialize)]
struct JsonError<'a> {
    /// Stable kebab-case code.
    code: &'a str,
    /// Human-readable message.
    message: String,
    /// Byte span in the query.
    span: Span,
}

/// JSON envelope for a failed query.
#[derive(Serialize)]
struct JsonErrorOutput<'a> {
    /// The query as given.
    query: &'a str,
    /// What went wrong.
    error: JsonError<'a>,
}

/// Prints styled text, stripping styles when colour is off.
pub fn emit(text: &str, color: bool) {
    if color {
        println!("{text}");
    } else {
        println!("{}", strip_ansi(text));
    }
}

/// Prints a value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Prints a JSON document, highlighted when colour is on.
pub fn print_document<T: Serialize>(value: &T, color: bool) -> ExitCode {
    if !color {
        return print_json(value);
    }
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            print!("{}", Highlighter::new().highlight_json(&format!("{json}\n")));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// The one-line message for an error, without the rendered query.
fn error_message(err: &SearchError) -> String {
    match err {
        SearchError::Query(e) => e.message(),
        SearchError::Translate(e) => e.to_string(),
    }
}

/// Reports a failed query and returns the failure exit code.
///
/// JSON mode writes the error document to stdout; text mode writes the caret diagnostic to
/// stderr.
pub fn report_query_error(query: &str, err: &SearchError, json: bool) -> ExitCode {
    if json {
        let output = JsonErrorOutput {
            query,
            error: JsonError {
                code: err.code(),
                message: error_message(err),
                span: err.span(),
            },
        };
        print_json(&output);
    } else {
        eprintln!("error: {}", err.render(query).trim_end());
    }
    ExitCode::FAILURE
}
