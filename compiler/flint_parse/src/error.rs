//! Structured parse errors.
//!
//! A `ParseError` unwinds (by `Result`) only to `declaration`, which turns
//! it into a diagnostic and synchronizes. It never crosses the crate
//! boundary.

use flint_diagnostic::Diagnostic;
use flint_ir::{Span, StringInterner, Token, TokenKind};

pub(crate) type ParseResult<T> = Result<T, ParseError>;

/// A syntax error at a specific token.
#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
    line: u32,
    span: Span,
    /// Rendered lexeme of the offending token (empty at EOF).
    lexeme: String,
    at_end: bool,
}

impl ParseError {
    /// Build an error pointing at `token`.
    pub fn at_token(token: &Token, interner: &StringInterner, message: impl Into<String>) -> Self {
        let at_end = matches!(token.kind, TokenKind::Eof);
        ParseError {
            message: message.into(),
            line: token.line,
            span: token.span,
            lexeme: token.kind.display_lexeme(interner),
            at_end,
        }
    }

    /// Convert into a renderable diagnostic.
    pub fn into_diagnostic(self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.line, self.message).with_span(self.span);
        if self.at_end {
            diagnostic.at_end()
        } else {
            diagnostic.at_lexeme(self.lexeme)
        }
    }
}
