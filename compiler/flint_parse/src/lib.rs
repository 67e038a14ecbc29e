//! Flint parser - recursive descent over the token stream.
//!
//! Each top-level element is parsed by `declaration`; a parse error unwinds
//! (by `Result`) only that far, gets reported to the diagnostic queue, and
//! the parser synchronizes to the next statement boundary so one malformed
//! statement doesn't hide the rest of the program. The caller never sees a
//! `ParseError` - only the queue.

mod cursor;
mod error;
mod grammar;
mod recovery;


use flint_diagnostic::DiagnosticQueue;
use flint_ir::{Stmt, StringInterner, Token, TokenKind};
use tracing::debug;

use cursor::Cursor;
use error::{ParseError, ParseResult};
use recovery::synchronize;

/// How top-level expression statements are treated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseMode {
    /// Script mode: expression statements evaluate and discard.
    Script,
    /// Interactive mode: a bare top-level expression statement becomes an
    /// implicit `print`, so REPL entries auto-display.
    Repl,
}

/// Parse a token stream into statements (script mode).
///
/// Syntax errors are reported to `diagnostics`; statements that failed to
/// parse are dropped after synchronization. A run with any queued error
/// must not be evaluated.
pub fn parse(
    tokens: &[Token],
    interner: &StringInterner,
    diagnostics: &mut DiagnosticQueue,
) -> Vec<Stmt> {
    parse_with_mode(tokens, interner, diagnostics, ParseMode::Script)
}

/// Parse a token stream with an explicit [`ParseMode`].
pub fn parse_with_mode(
    tokens: &[Token],
    interner: &StringInterner,
    diagnostics: &mut DiagnosticQueue,
    mode: ParseMode,
) -> Vec<Stmt> {
    Parser::new(tokens, interner, diagnostics, mode).program()
}

struct Parser<'a> {
    cursor: Cursor<'a>,
    interner: &'a StringInterner,
    diagnostics: &'a mut DiagnosticQueue,
    mode: ParseMode,
}

impl<'a> Parser<'a> {
    fn new(
        tokens: &'a [Token],
        interner: &'a StringInterner,
        diagnostics: &'a mut DiagnosticQueue,
        mode: ParseMode,
    ) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            interner,
            diagnostics,
            mode,
        }
    }

    fn program(&mut self) -> Vec<Stmt> {
        debug!(tokens = self.cursor.token_count(), mode = ?self.mode, "parse");
        let mut statements = Vec::new();
        while !self.cursor.is_at_end() {
            if let Some(stmt) = self.declaration() {
                let stmt = match (self.mode, stmt) {
                    (ParseMode::Repl, Stmt::Expression(expr)) => Stmt::Print(expr),
                    (_, stmt) => stmt,
                };
                statements.push(stmt);
            }
        }
        statements
    }

    /// Parse one declaration, recovering on error.
    ///
    /// On a parse error the diagnostic is queued, the cursor synchronizes
    /// to the next statement boundary, and no statement is produced.
    fn declaration(&mut self) -> Option<Stmt> {
        let result = if self.cursor.match_kind(&TokenKind::Fn) {
            self.function_declaration()
        } else if self.cursor.match_kind(&TokenKind::Var) {
            self.var_declaration()
        } else {
            self.statement()
        };
        match result {
            Ok(stmt) => Some(stmt),
            Err(error) => {
                self.diagnostics.report(error.into_diagnostic());
                synchronize(&mut self.cursor);
                None
            }
        }
    }

    /// Consume a token of the given kind or raise a parse error.
    fn consume(&mut self, kind: &TokenKind, message: &str) -> ParseResult<Token> {
        if self.cursor.check(kind) {
            return Ok(self.cursor.advance().clone());
        }
        Err(self.error_at_current(message))
    }

    /// Consume an identifier token or raise a parse error.
    fn consume_ident(&mut self, message: &str) -> ParseResult<Token> {
        if self.cursor.check_ident() {
            return Ok(self.cursor.advance().clone());
        }
        Err(self.error_at_current(message))
    }

    /// Build a parse error pointing at the current token.
    fn error_at_current(&self, message: &str) -> ParseError {
        ParseError::at_token(self.cursor.current(), self.interner, message)
    }

    /// Report an error at a token without aborting the current production.
    fn report_non_fatal(&mut self, token: &Token, message: &str) {
        let error = ParseError::at_token(token, self.interner, message);
        self.diagnostics.report(error.into_diagnostic());
    }
}
