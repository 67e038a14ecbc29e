//! Error recovery: token sets and statement-boundary synchronization.
//!
//! Uses a bitset for O(1) membership testing over token kind discriminants.

use flint_ir::TokenKind;

use crate::cursor::Cursor;

/// A set of token kinds using bitset representation.
///
/// Each bit in the u64 corresponds to a `TokenKind` discriminant index
/// (39 kinds, so u64 covers all of them).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TokenSet(u64);

impl TokenSet {
    /// Create an empty token set.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Add a token kind (builder pattern for const contexts).
    #[must_use]
    pub const fn with(self, kind: TokenKind) -> Self {
        Self(self.0 | (1u64 << kind.discriminant_index()))
    }

    /// Check if this set contains a token kind.
    #[inline]
    pub const fn contains(&self, kind: &TokenKind) -> bool {
        (self.0 & (1u64 << kind.discriminant_index())) != 0
    }
}

/// Tokens that begin a new declaration or statement: synchronization stops
/// just before one of these.
pub(crate) const DECL_START: TokenSet = TokenSet::new()
    .with(TokenKind::Class)
    .with(TokenKind::Fn)
    .with(TokenKind::Var)
    .with(TokenKind::For)
    .with(TokenKind::If)
    .with(TokenKind::While)
    .with(TokenKind::Print)
    .with(TokenKind::Return);

/// Discard tokens until a likely statement boundary: just after a `;`, or
/// just before a token that starts a new statement, or EOF.
pub(crate) fn synchronize(cursor: &mut Cursor<'_>) {
    cursor.advance();
    while !cursor.is_at_end() {
        if matches!(cursor.previous().kind, TokenKind::Semicolon) {
            return;
        }
        if DECL_START.contains(&cursor.current().kind) {
            return;
        }
        cursor.advance();
    }
}
