//! Token cursor for navigating the token stream.

use flint_ir::{Token, TokenKind};

/// Cursor over an EOF-terminated token stream.
///
/// Invariant: the stream ends with exactly one EOF token (the scanner
/// guarantees this), and the position never moves past it.
pub(crate) struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        debug_assert!(
            matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)),
            "token stream must be EOF-terminated"
        );
        Cursor { tokens, pos: 0 }
    }

    /// Total number of tokens in the stream.
    #[inline]
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// The current (unconsumed) token.
    #[inline]
    pub fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// The most recently consumed token.
    #[inline]
    pub fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    /// Check if the cursor is at the EOF token.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }

    /// Check the current token's kind by discriminant (payloads ignored).
    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.current().kind.discriminant_index() == kind.discriminant_index()
    }

    /// Check if the current token is an identifier.
    #[inline]
    pub fn check_ident(&self) -> bool {
        matches!(self.current().kind, TokenKind::Ident(_))
    }

    /// Consume the current token and return it.
    ///
    /// At EOF this is a no-op returning the EOF token.
    #[inline]
    pub fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        self.previous()
    }

    /// Consume the current token if its kind matches.
    #[inline]
    pub fn match_kind(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            return true;
        }
        false
    }

    /// Consume the current token if its kind is in `kinds`, returning the
    /// consumed token.
    pub fn match_any(&mut self, kinds: &[TokenKind]) -> Option<Token> {
        for kind in kinds {
            if self.check(kind) {
                return Some(self.advance().clone());
            }
        }
        None
    }
}
