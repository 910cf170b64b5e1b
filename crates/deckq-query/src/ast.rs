//! Query abstract syntax tree.
//!
//! Represents parsed query expressions before they are bound to registered commands.

use std::{collections::BTreeSet, fmt, ops::Range};

use serde::Serialize;

use crate::lexer::Span;

/// Comparison operator between a command and its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operator {
    /// No operator: a bare/raw token (`""`).
    Bare,
    /// `:`
    Colon,
    /// `=`
    Eq,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
}

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Bare,
        Self::Colon,
        Self::Eq,
        Self::Gt,
        Self::Gte,
        Self::Lt,
        Self::Lte,
    ];

    /// The operator as written in a query.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bare => "",
            Self::Colon => ":",
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }

    /// Parses an operator punctuation token.
    ///
    /// Returns the base operator and whether it carried the `!` qualifier.
    pub fn from_punct(text: &str) -> Option<(Self, bool)> {
        let op = match text {
            ":" => (Self::Colon, false),
            "!:" => (Self::Colon, true),
            "=" => (Self::Eq, false),
            "!=" => (Self::Eq, true),
            ">" => (Self::Gt, false),
            ">=" => (Self::Gte, false),
            "<" => (Self::Lt, false),
            "<=" => (Self::Lte, false),
            _ => return None,
        };
        Some(op)
    }

    /// Parses an operator as written (`""` is the bare operator).
    pub fn parse(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == text)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unary modifier attached to an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Qualifier {
    /// `!`: negate the comparison.
    #[serde(rename = "!")]
    Not,
}

impl Qualifier {
    /// The qualifier as written in a query.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Not => "!",
        }
    }
}

/// The set of qualifiers on an operator.
pub type Qualifiers = BTreeSet<Qualifier>;

/// Renders an operator with its qualifiers as written (`!:`, `>=`).
pub fn operator_text(operator: Operator, qualifiers: &Qualifiers) -> String {
    let mut text: String = qualifiers.iter().map(|q| q.as_str()).collect();
    text.push_str(operator.as_str());
    text
}

/// The lexical form of an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArgKind {
    /// A bare text run.
    Text,
    /// A quoted string (quotes kept in the raw value).
    String,
    /// A regex literal (slashes and flags kept in the raw value).
    Regex,
}

/// Boolean combinator between sibling expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Separator {
    /// `&`
    #[serde(rename = "&")]
    And,
    /// `|`
    #[serde(rename = "|")]
    Or,
}

impl Separator {
    /// The separator as written in a query.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "&",
            Self::Or => "|",
        }
    }
}

/// The shape of a parsed expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ExprKind {
    /// `id OP value`.
    Simple {
        /// Command name as written (may carry a `.modifier` suffix).
        command: String,
        /// Base operator.
        operator: Operator,
        /// Qualifiers split off the operator.
        qualifiers: Qualifiers,
        /// Lexical form of the argument.
        arg_kind: ArgKind,
        /// Argument text as written.
        raw_value: String,
    },
    /// Bare text, string or regex with no command prefix.
    Raw {
        /// Lexical form of the value.
        arg_kind: ArgKind,
        /// Value text as written.
        raw_value: String,
    },
    /// `#tag` shorthand.
    Hash {
        /// The tag, without `#`.
        tag: String,
    },
    /// `a/b/c` alternation.
    Slash {
        /// The slash-separated parts.
        parts: Vec<String>,
    },
    /// Unary negation (`-` or `!`).
    Not {
        /// The negated expression.
        inner: Box<Expr>,
    },
    /// Parenthesized grouping.
    Paren {
        /// The grouped expression.
        inner: Box<Expr>,
    },
    /// Conjunction or disjunction of two or more children.
    Logic {
        /// The separator used at this level.
        separator: Separator,
        /// The combined expressions.
        children: Vec<Expr>,
    },
}

/// A parsed query expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expr {
    /// What was parsed.
    #[serde(flatten)]
    pub kind: ExprKind,
    /// Bytes of input this expression covers.
    pub span: Span,
    /// Indices into the parser's token history consumed by this expression.
    pub tokens: Range<usize>,
    /// Whether this expression sits at the top level of the query.
    ///
    /// Only the root and the direct children of a root `Logic` node are top level. Commands that
    /// cannot be expressed as composable predicates (e.g. ordering) are only valid there.
    pub top_level: bool,
}

impl Expr {
    /// Creates a nested (non-top-level) expression.
    pub const fn new(kind: ExprKind, span: Span, tokens: Range<usize>) -> Self {
        Self {
            kind,
            span,
            tokens,
            top_level: false,
        }
    }

    /// Marks this expression, and the children of a root `Logic`, as top level.
    pub fn mark_top_level(&mut self) {
        self.top_level = true;
        if let ExprKind::Logic { children, .. } = &mut self.kind {
            for child in children {
                child.top_level = true;
            }
        }
    }

    /// Compact one-line rendering, e.g. `(& (: a x) (! (raw b)))`.
    pub fn sexp(&self) -> String {
        match &self.kind {
            ExprKind::Simple {
                command,
                operator,
                qualifiers,
                raw_value,
                ..
            } => format!(
                "({} {command} {raw_value})",
                operator_text(*operator, qualifiers)
            ),
            ExprKind::Raw { raw_value, .. } => format!("(raw {raw_value})"),
            ExprKind::Hash { tag } => format!("(# {tag})"),
            ExprKind::Slash { parts } => format!("(/ {})", parts.join(" ")),
            ExprKind::Not { inner } => format!("(not {})", inner.sexp()),
            ExprKind::Paren { inner } => format!("(group {})", inner.sexp()),
            ExprKind::Logic {
                separator,
                children,
            } => {
                let parts: Vec<String> = children.iter().map(Self::sexp).collect();
                format!("({} {})", separator.as_str(), parts.join(" "))
            }
        }
    }

    /// Formats the expression back into query syntax.
    pub fn to_query_string(&self) -> String {
        match &self.kind {
            ExprKind::Simple {
                command,
                operator,
                qualifiers,
                raw_value,
                ..
            } => format!(
                "{command}{}{raw_value}",
                operator_text(*operator, qualifiers)
            ),
            ExprKind::Raw { raw_value, .. } => raw_value.clone(),
            ExprKind::Hash { tag } => format!("#{tag}"),
            ExprKind::Slash { parts } => parts.join("/"),
            ExprKind::Not { inner } => format!("-{}", inner.to_query_string()),
            ExprKind::Paren { inner } => format!("({})", inner.to_query_string()),
            ExprKind::Logic {
                separator,
                children,
            } => {
                let parts: Vec<String> = children.iter().map(Self::to_query_string).collect();
                parts.join(&format!(" {} ", separator.as_str()))
            }
        }
    }

    /// Formats the expression as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        let marker = if self.top_level { " [top]" } else { "" };
        let at = format!("@{}..{}{marker}", self.span.start, self.span.end);
        match &self.kind {
            ExprKind::Simple {
                command,
                operator,
                qualifiers,
                arg_kind,
                raw_value,
            } => writeln!(
                f,
                "{prefix}Simple({command:?} {:?} {arg_kind:?} {raw_value:?}) {at}",
                operator_text(*operator, qualifiers)
            ),
            ExprKind::Raw {
                arg_kind,
                raw_value,
            } => writeln!(f, "{prefix}Raw({arg_kind:?} {raw_value:?}) {at}"),
            ExprKind::Hash { tag } => writeln!(f, "{prefix}Hash({tag:?}) {at}"),
            ExprKind::Slash { parts } => writeln!(f, "{prefix}Slash({parts:?}) {at}"),
            ExprKind::Not { inner } => {
                writeln!(f, "{prefix}Not {at}")?;
                inner.fmt_tree(f, indent + 1)
            }
            ExprKind::Paren { inner } => {
                writeln!(f, "{prefix}Paren {at}")?;
                inner.fmt_tree(f, indent + 1)
            }
            ExprKind::Logic {
                separator,
                children,
            } => {
                writeln!(f, "{prefix}Logic({}) {at}", separator.as_str())?;
                for child in children {
                    child.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}
