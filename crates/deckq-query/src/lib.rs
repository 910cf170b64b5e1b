//! Query lexing, parsing and AST for deckq card search.
//!
//! The query language is built from command expressions combined with explicit separators:
//!
//! - **Commands**: `cost>=3`, `type:goblin`, `name="Lightning Bolt"`
//! - **Qualified operators**: `type!:goblin` (the `!` negates the comparison)
//! - **Raw values**: `goblin`, `"goblin king"`, `/^gob/i`
//! - **Shorthands**: `#tribal` (hash), `w/u/b` (slash alternation)
//! - **Composition**: `a & b`, `a | b`, `-a`, `!a`, `(a | b) & c`
//!
//! `&` and `|` cannot be mixed at one nesting level without parentheses.
//!
//! # Example
//!
//! ```
//! use deckq_query::parse;
//!
//! let query = parse("type:goblin & (cost<=2 | #haste)").unwrap();
//! assert_eq!(query.expr.sexp(), "(& (: type goblin) (group (| (<= cost 2) (# haste))))");
//! ```

mod ast;
mod error;
mod lexer;
mod parser;

pub use ast::{
    ArgKind, Expr, ExprKind, Operator, Qualifier, Qualifiers, Separator, operator_text,
};
pub use error::{LexError, LexErrorKind, QueryError, QueryErrorKind, SyntaxErrorKind};
pub use lexer::{
    LexOptions, Lexer, PUNCTUATORS, Span, Token, TokenKind, regex_parts, string_value, tokenize,
};
pub use parser::{ParseOutcome, Query, parse, parse_partial};
