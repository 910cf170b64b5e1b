//! Query lexer (tokenizer).
//!
//! Converts a query string into typed tokens with byte spans. Lexing never aborts: problems are
//! recorded as [`LexError`]s and a best-effort token is still produced, so the parser can keep
//! going and report the most useful error.
//!
//! Classification, in priority order:
//!
//! 1. whitespace runs
//! 2. punctuators `- : ( ) & | ! > = < #`, with `!:`, `!=`, `>=` and `<=` taken greedily
//! 3. quoted strings (`'...'` or `"..."`, backslash escapes)
//! 4. regex literals (`/.../flags`), only in regex context
//! 5. identifiers (everything else)

use serde::Serialize;
use tracing::trace;

use crate::error::{LexError, LexErrorKind};

/// All single-character punctuators.
pub const PUNCTUATORS: &[char] = &['-', ':', '(', ')', '&', '|', '!', '>', '=', '<', '#'];

/// Punctuators that stay structural in text mode.
const STRUCTURAL: &[char] = &['(', ')', '&', '|'];

/// Byte range `[start, end)` in the query input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    /// First byte covered.
    pub start: usize,
    /// One past the last byte covered.
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// An empty span at `position`.
    pub const fn at(position: usize) -> Self {
        Self::new(position, position)
    }

    /// Number of bytes covered.
    pub const fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers nothing.
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// The smallest span covering both `self` and `other`.
    pub fn to(self, other: Self) -> Self {
        Self::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// Token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    /// A run of whitespace.
    Whitespace,
    /// An operator, separator or grouping character.
    Punctuation,
    /// A bare word; may contain internal hyphens, dots and slashes.
    Identifier,
    /// A quoted string, quotes included.
    String,
    /// A regex literal, slashes and flags included.
    Regex,
}

/// A token in the query language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Token classification.
    pub kind: TokenKind,
    /// Source text exactly as written.
    pub text: String,
    /// Location in the input.
    pub span: Span,
}

impl Token {
    /// Whether this is the punctuation token `text`.
    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punctuation && self.text == text
    }
}

/// Per-call lexing options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexOptions {
    /// Treat non-structural punctuators as plain text (used for command arguments).
    pub text: bool,
}

impl LexOptions {
    /// Text mode: only `( ) & |` remain punctuation.
    pub const TEXT: Self = Self { text: true };
}

/// Tokenizes a query string on demand.
///
/// [`Lexer::next`] and [`Lexer::peek`] are deterministic given the current position and the
/// kind of the previously consumed token.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    /// The original input string.
    input: &'a str,
    /// Current byte position in input.
    position: usize,
    /// Kind of the last consumed token; drives regex context.
    previous: Option<TokenKind>,
    /// Errors recorded by consumed tokens.
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            previous: None,
            errors: Vec::new(),
        }
    }

    /// The input being lexed.
    pub const fn input(&self) -> &'a str {
        self.input
    }

    /// Current byte position.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Errors recorded so far.
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    /// Consumes the lexer, returning the recorded errors.
    pub fn into_errors(self) -> Vec<LexError> {
        self.errors
    }

    /// Consumes and returns the next token, or `None` at end of input.
    pub fn next(&mut self, opts: LexOptions) -> Option<Token> {
        let (token, errors) = self.scan(opts)?;
        trace!(kind = ?token.kind, text = %token.text, "token");
        self.position = token.span.end;
        self.previous = Some(token.kind);
        self.errors.extend(errors);
        Some(token)
    }

    /// Returns the next token without consuming it.
    pub fn peek(&self, opts: LexOptions) -> Option<Token> {
        self.scan(opts).map(|(token, _)| token)
    }

    /// A `/` starts a regex only at the start of input or after whitespace or punctuation.
    const fn in_regex_context(&self) -> bool {
        matches!(
            self.previous,
            None | Some(TokenKind::Whitespace | TokenKind::Punctuation)
        )
    }

    /// Classifies the token at the current position.
    fn scan(&self, opts: LexOptions) -> Option<(Token, Vec<LexError>)> {
        let start = self.position;
        let rest = self.input.get(start..)?;
        let ch = rest.chars().next()?;
        let mut errors = Vec::new();

        let (kind, len) = if ch.is_whitespace() {
            (TokenKind::Whitespace, whitespace_length(rest))
        } else if is_punctuator(ch, opts) {
            (TokenKind::Punctuation, punctuator_length(rest))
        } else if ch == '"' || ch == '\'' {
            (TokenKind::String, string_length(rest, start, &mut errors))
        } else if ch == '/' && self.in_regex_context() {
            (TokenKind::Regex, regex_length(rest, start, &mut errors))
        } else if ch.is_control() {
            let len = ch.len_utf8();
            errors.push(LexError::new(
                LexErrorKind::UnknownChar,
                Span::new(start, start + len),
            ));
            (TokenKind::Punctuation, len)
        } else {
            (TokenKind::Identifier, identifier_length(rest, opts))
        };

        let end = start + len;
        let token = Token {
            kind,
            text: rest[..len].to_string(),
            span: Span::new(start, end),
        };
        Some((token, errors))
    }
}

/// Whether `ch` is a punctuator under `opts`.
fn is_punctuator(ch: char, opts: LexOptions) -> bool {
    if opts.text {
        STRUCTURAL.contains(&ch)
    } else {
        PUNCTUATORS.contains(&ch)
    }
}

/// Whether `ch` may continue an identifier.
fn is_identifier_char(ch: char, opts: LexOptions) -> bool {
    !ch.is_whitespace()
        && !ch.is_control()
        && ch != '"'
        && ch != '\''
        && !is_punctuator(ch, opts)
}

/// Length of the whitespace run at the start of `rest`.
fn whitespace_length(rest: &str) -> usize {
    rest.find(|c: char| !c.is_whitespace())
        .unwrap_or(rest.len())
}

/// Length of the punctuator at the start of `rest`, preferring two-character operators.
fn punctuator_length(rest: &str) -> usize {
    let mut chars = rest.chars();
    let first = chars.next();
    let second = chars.next();
    match (first, second) {
        (Some('!'), Some(':' | '=')) | (Some('>' | '<'), Some('=')) => 2,
        (Some(c), _) => c.len_utf8(),
        (None, _) => 0,
    }
}

/// Length of the quoted string at the start of `rest`.
fn string_length(rest: &str, start: usize, errors: &mut Vec<LexError>) -> usize {
    let mut chars = rest.char_indices();
    let Some((_, quote)) = chars.next() else {
        return 0;
    };

    while let Some((i, ch)) = chars.next() {
        if ch == '\\' {
            if chars.next().is_none() {
                errors.push(LexError::new(
                    LexErrorKind::UnexpectedEscape,
                    Span::new(start + i, start + i + 1),
                ));
                break;
            }
        } else if ch == quote {
            return i + 1;
        }
    }

    errors.push(LexError::new(
        LexErrorKind::UnterminatedString,
        Span::new(start, start + rest.len()),
    ));
    rest.len()
}

/// Length of the regex literal at the start of `rest`, including trailing flags.
///
/// A `/` inside a `[...]` class does not terminate the literal.
fn regex_length(rest: &str, start: usize, errors: &mut Vec<LexError>) -> usize {
    let mut chars = rest.char_indices().skip(1);
    let mut class_start = None;

    while let Some((i, ch)) = chars.next() {
        match ch {
            '\\' => {
                if chars.next().is_none() {
                    errors.push(LexError::new(
                        LexErrorKind::UnexpectedEscape,
                        Span::new(start + i, start + i + 1),
                    ));
                    break;
                }
            }
            '[' if class_start.is_none() => class_start = Some(i),
            ']' if class_start.is_some() => class_start = None,
            '/' if class_start.is_none() => {
                let flags = rest[i + 1..]
                    .chars()
                    .take_while(char::is_ascii_alphabetic)
                    .count();
                return i + 1 + flags;
            }
            _ => {}
        }
    }

    let end = start + rest.len();
    let error = match class_start {
        Some(class) => LexError::new(
            LexErrorKind::UnterminatedRegexClass,
            Span::new(start + class, end),
        ),
        None => LexError::new(LexErrorKind::UnterminatedRegex, Span::new(start, end)),
    };
    errors.push(error);
    rest.len()
}

/// Length of the identifier at the start of `rest`.
///
/// Outside text mode a `-` belongs to the identifier only when another identifier character
/// follows it, so a trailing or standalone `-` stays a negation punctuator.
fn identifier_length(rest: &str, opts: LexOptions) -> usize {
    let mut chars = rest.char_indices().peekable();
    let mut end = 0;

    while let Some((i, ch)) = chars.next() {
        if ch == '-' && !opts.text {
            match chars.peek() {
                Some(&(_, next)) if is_identifier_char(next, opts) => {
                    end = i + 1;
                    continue;
                }
                _ => break,
            }
        }
        if !is_identifier_char(ch, opts) {
            break;
        }
        end = i + ch.len_utf8();
    }

    end
}

/// Tokenizes an entire query, returning every token and every recorded error.
pub fn tokenize(input: &str) -> (Vec<Token>, Vec<LexError>) {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next(LexOptions::default()) {
        tokens.push(token);
    }
    (tokens, lexer.into_errors())
}

/// Returns the contents of a string token with quotes stripped and escapes resolved.
///
/// Unterminated strings yield everything after the opening quote.
pub fn string_value(text: &str) -> String {
    let mut chars = text.chars();
    let Some(quote) = chars.next() else {
        return String::new();
    };

    let mut value = String::with_capacity(text.len());
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    value.push(escaped);
                }
            }
            c if c == quote => break,
            c => value.push(c),
        }
    }
    value
}

/// Splits a regex token into its body and flags.
///
/// Unterminated regexes yield everything after the opening slash and no flags.
pub fn regex_parts(text: &str) -> (&str, &str) {
    let inner = text.strip_prefix('/').unwrap_or(text);
    match inner.rfind('/') {
        Some(close) if inner[close + 1..].chars().all(|c| c.is_ascii_alphabetic()) => {
            (&inner[..close], &inner[close + 1..])
        }
        _ => (inner, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<(TokenKind, String)> {
        tokenize(input)
            .0
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    fn tok(kind: TokenKind, text: &str) -> (TokenKind, String) {
        (kind, text.to_string())
    }

    use super::TokenKind::{Identifier, Punctuation, Regex, String as Str, Whitespace};

    #[test]
    fn empty_input() {
        let (tokens, errors) = tokenize("");
        assert!(tokens.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn whitespace_is_a_token() {
        assert_eq!(kinds("   "), vec![tok(Whitespace, "   ")]);
    }

    #[test]
    fn simple_command() {
        assert_eq!(
            kinds("cost>=3"),
            vec![
                tok(Identifier, "cost"),
                tok(Punctuation, ">="),
                tok(Identifier, "3")
            ]
        );
    }

    #[test]
    fn negated_operators_are_greedy() {
        assert_eq!(
            kinds("a!:b c!=d"),
            vec![
                tok(Identifier, "a"),
                tok(Punctuation, "!:"),
                tok(Identifier, "b"),
                tok(Whitespace, " "),
                tok(Identifier, "c"),
                tok(Punctuation, "!="),
                tok(Identifier, "d"),
            ]
        );
    }

    #[test]
    fn spans_are_byte_offsets() {
        let (tokens, _) = tokenize("ab <= cd");
        let spans: Vec<Span> = tokens.iter().map(|t| t.span).collect();
        assert_eq!(
            spans,
            vec![
                Span::new(0, 2),
                Span::new(2, 3),
                Span::new(3, 5),
                Span::new(5, 6),
                Span::new(6, 8)
            ]
        );
    }

    #[test]
    fn internal_hyphen_stays_in_identifier() {
        assert_eq!(kinds("half-elf"), vec![tok(Identifier, "half-elf")]);
    }

    #[test]
    fn leading_hyphen_is_negation() {
        assert_eq!(
            kinds("-goblin"),
            vec![tok(Punctuation, "-"), tok(Identifier, "goblin")]
        );
    }

    #[test]
    fn trailing_hyphen_is_punctuation() {
        assert_eq!(
            kinds("elf- x"),
            vec![
                tok(Identifier, "elf"),
                tok(Punctuation, "-"),
                tok(Whitespace, " "),
                tok(Identifier, "x")
            ]
        );
    }

    #[test]
    fn quoted_strings_keep_their_quotes() {
        assert_eq!(
            kinds("\"lightning bolt\" 'x'"),
            vec![
                tok(Str, "\"lightning bolt\""),
                tok(Whitespace, " "),
                tok(Str, "'x'")
            ]
        );
    }

    #[test]
    fn escaped_quote_does_not_terminate() {
        assert_eq!(kinds(r#""a\"b""#), vec![tok(Str, r#""a\"b""#)]);
    }

    #[test]
    fn unterminated_string_is_recorded_and_returned() {
        let (tokens, errors) = tokenize("name:\"text");
        assert_eq!(tokens.last().map(|t| t.kind), Some(Str));
        assert_eq!(tokens.last().map(|t| t.text.as_str()), Some("\"text"));
        assert_eq!(
            errors,
            vec![LexError::new(
                LexErrorKind::UnterminatedString,
                Span::new(5, 10)
            )]
        );
    }

    #[test]
    fn trailing_backslash_is_unexpected_escape() {
        let (_, errors) = tokenize("\"abc\\");
        let codes: Vec<&str> = errors.iter().map(|e| e.kind.code()).collect();
        assert_eq!(codes, vec!["unexpected-escape", "unterminated-string"]);
    }

    #[test]
    fn regex_at_start() {
        assert_eq!(kinds("/^bolt$/i"), vec![tok(Regex, "/^bolt$/i")]);
    }

    #[test]
    fn regex_after_operator() {
        assert_eq!(
            kinds("name:/goblin/"),
            vec![
                tok(Identifier, "name"),
                tok(Punctuation, ":"),
                tok(Regex, "/goblin/")
            ]
        );
    }

    #[test]
    fn slash_inside_identifier_is_not_a_regex() {
        assert_eq!(kinds("2/3"), vec![tok(Identifier, "2/3")]);
        assert_eq!(kinds("w/u/b"), vec![tok(Identifier, "w/u/b")]);
    }

    #[test]
    fn slash_inside_class_does_not_terminate() {
        assert_eq!(kinds("/[/]x/"), vec![tok(Regex, "/[/]x/")]);
    }

    #[test]
    fn unterminated_regex_class() {
        let (tokens, errors) = tokenize("/ab[cd");
        assert_eq!(tokens.len(), 1);
        assert_eq!(
            errors,
            vec![LexError::new(
                LexErrorKind::UnterminatedRegexClass,
                Span::new(3, 6)
            )]
        );
    }

    #[test]
    fn unterminated_regex() {
        let (tokens, errors) = tokenize("/abc");
        assert_eq!(tokens[0].kind, Regex);
        assert_eq!(errors[0].kind, LexErrorKind::UnterminatedRegex);
        assert_eq!(errors[0].span, Span::new(0, 4));
    }

    #[test]
    fn control_character_is_unknown() {
        let (tokens, errors) = tokenize("a\u{7}b");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].kind, Punctuation);
        assert_eq!(errors[0].kind, LexErrorKind::UnknownChar);
        assert_eq!(errors[0].span, Span::new(1, 2));
    }

    #[test]
    fn text_mode_absorbs_operators() {
        let mut lexer = Lexer::new(">=2 & x");
        let token = lexer.next(LexOptions::TEXT).unwrap();
        assert_eq!(token.kind, Identifier);
        assert_eq!(token.text, ">=2");
    }

    #[test]
    fn text_mode_keeps_structure() {
        let mut lexer = Lexer::new("name-)");
        assert_eq!(lexer.next(LexOptions::TEXT).unwrap().text, "name-");
        assert!(lexer.next(LexOptions::TEXT).unwrap().is_punct(")"));
    }

    #[test]
    fn peek_does_not_consume() {
        let mut lexer = Lexer::new("a:b");
        let peeked = lexer.peek(LexOptions::default());
        assert_eq!(peeked, lexer.next(LexOptions::default()));
        assert_eq!(lexer.position(), 1);
    }

    #[test]
    fn peek_does_not_record_errors() {
        let lexer = Lexer::new("\"open");
        assert!(lexer.peek(LexOptions::default()).is_some());
        assert!(lexer.errors().is_empty());
    }

    #[test]
    fn string_value_unescapes() {
        assert_eq!(string_value(r#""a\"b""#), "a\"b");
        assert_eq!(string_value("'it''"), "it");
        assert_eq!(string_value("\"open"), "open");
    }

    #[test]
    fn regex_parts_split_flags() {
        assert_eq!(regex_parts("/^a.c$/im"), ("^a.c$", "im"));
        assert_eq!(regex_parts("/a\\/b/"), ("a\\/b", ""));
        assert_eq!(regex_parts("/open"), ("open", ""));
    }
}
