//! Single-pass byte scanner.

use flint_diagnostic::{Diagnostic, DiagnosticQueue};
use flint_ir::{Span, StringInterner, Token, TokenKind};
use memchr::{memchr, memchr_iter};

/// Scan `source` into tokens.
///
/// Always returns an EOF-terminated stream; lexical errors go to
/// `diagnostics` and scanning continues at the next character.
pub fn scan(
    source: &str,
    interner: &StringInterner,
    diagnostics: &mut DiagnosticQueue,
) -> Vec<Token> {
    Scanner::new(source, interner, diagnostics).scan_tokens()
}

struct Scanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    /// Byte offset where the current lexeme started.
    start: u32,
    /// Byte offset of the next unconsumed byte.
    current: u32,
    /// 1-based line of the current position.
    line: u32,
    tokens: Vec<Token>,
    interner: &'a StringInterner,
    diagnostics: &'a mut DiagnosticQueue,
}

fn is_ident_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

fn is_ident_continue(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn count_newlines(region: &[u8]) -> u32 {
    memchr_iter(b'\n', region).count() as u32
}

impl<'a> Scanner<'a> {
    fn new(
        source: &'a str,
        interner: &'a StringInterner,
        diagnostics: &'a mut DiagnosticQueue,
    ) -> Self {
        Scanner {
            source,
            bytes: source.as_bytes(),
            start: 0,
            current: 0,
            line: 1,
            tokens: Vec::with_capacity(source.len() / 4),
            interner,
            diagnostics,
        }
    }

    fn scan_tokens(mut self) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }
        self.tokens.push(Token::new(
            TokenKind::Eof,
            Span::point(self.current),
            self.line,
        ));
        self.tokens
    }

    fn scan_token(&mut self) {
        let byte = self.advance();
        match byte {
            b'(' => self.add_token(TokenKind::LeftParen),
            b')' => self.add_token(TokenKind::RightParen),
            b'{' => self.add_token(TokenKind::LeftBrace),
            b'}' => self.add_token(TokenKind::RightBrace),
            b',' => self.add_token(TokenKind::Comma),
            b'.' => self.add_token(TokenKind::Dot),
            b'-' => self.add_token(TokenKind::Minus),
            b'+' => self.add_token(TokenKind::Plus),
            b';' => self.add_token(TokenKind::Semicolon),
            b'*' => self.add_token(TokenKind::Star),

            b'/' => {
                if self.match_byte(b'/') {
                    self.line_comment();
                } else if self.match_byte(b'*') {
                    self.block_comment();
                } else {
                    self.add_token(TokenKind::Slash);
                }
            }

            b'!' => {
                let kind = if self.match_byte(b'=') {
                    TokenKind::BangEqual
                } else {
                    TokenKind::Bang
                };
                self.add_token(kind);
            }
            b'=' => {
                let kind = if self.match_byte(b'=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                };
                self.add_token(kind);
            }
            b'<' => {
                let kind = if self.match_byte(b'=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                };
                self.add_token(kind);
            }
            b'>' => {
                let kind = if self.match_byte(b'=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                };
                self.add_token(kind);
            }

            b' ' | b'\r' | b'\t' => {}
            b'\n' => self.line += 1,

            b'"' => self.string(),
            b'0'..=b'9' => self.number(),
            byte if is_ident_start(byte) => self.identifier(),

            other => self.unexpected(other),
        }
    }

    /// Skip a `//` comment up to (not including) the newline.
    fn line_comment(&mut self) {
        let rest = &self.bytes[self.current as usize..];
        match memchr(b'\n', rest) {
            Some(offset) => self.current += offset as u32,
            None => self.current = self.bytes.len() as u32,
        }
    }

    /// Skip a `/* ... */` comment, tracking embedded newlines.
    fn block_comment(&mut self) {
        let mut pos = self.current as usize;
        loop {
            match memchr(b'*', &self.bytes[pos..]) {
                Some(offset) => {
                    let star = pos + offset;
                    if self.bytes.get(star + 1) == Some(&b'/') {
                        self.line += count_newlines(&self.bytes[self.current as usize..star]);
                        self.current = (star + 2) as u32;
                        return;
                    }
                    pos = star + 1;
                }
                None => {
                    self.line += count_newlines(&self.bytes[self.current as usize..]);
                    self.current = self.bytes.len() as u32;
                    let span = Span::new(self.start, self.current);
                    self.diagnostics
                        .report(Diagnostic::error(self.line, "Unterminated comment.").with_span(span));
                    return;
                }
            }
        }
    }

    /// Scan a string literal. The opening quote is already consumed; the
    /// stored value is the text between the quotes. Embedded newlines are
    /// allowed and counted.
    fn string(&mut self) {
        let rest = &self.bytes[self.current as usize..];
        match memchr(b'"', rest) {
            Some(offset) => {
                let close = self.current as usize + offset;
                self.line += count_newlines(&self.bytes[self.current as usize..close]);
                let value = &self.source[self.current as usize..close];
                let name = self.interner.intern(value);
                self.current = close as u32 + 1;
                self.add_token(TokenKind::Str(name));
            }
            None => {
                self.line += count_newlines(rest);
                self.current = self.bytes.len() as u32;
                let span = Span::new(self.start, self.current);
                self.diagnostics
                    .report(Diagnostic::error(self.line, "Unterminated string.").with_span(span));
            }
        }
    }

    /// Scan a number literal: digits with an optional fractional part. The
    /// dot is only consumed when a digit immediately follows it, so `123.`
    /// scans as the number `123` followed by a `.` token.
    fn number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }
        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }
        let text = &self.source[self.start as usize..self.current as usize];
        match text.parse::<f64>() {
            Ok(value) => self.add_token(TokenKind::number(value)),
            Err(_) => {
                let message = format!("Invalid number: {text}");
                let span = Span::new(self.start, self.current);
                self.diagnostics
                    .report(Diagnostic::error(self.line, message).with_span(span));
            }
        }
    }

    /// Scan an identifier or keyword.
    fn identifier(&mut self) {
        while is_ident_continue(self.peek()) {
            self.advance();
        }
        let text = &self.source[self.start as usize..self.current as usize];
        let kind = match TokenKind::keyword(text) {
            Some(keyword) => keyword,
            None => TokenKind::Ident(self.interner.intern(text)),
        };
        self.add_token(kind);
    }

    /// Report an unexpected character and skip it.
    fn unexpected(&mut self, byte: u8) {
        let ch = if byte.is_ascii() {
            byte as char
        } else {
            // Multi-byte character: decode it and consume all of its bytes.
            let rest = &self.source[self.start as usize..];
            let ch = rest.chars().next().unwrap_or(char::REPLACEMENT_CHARACTER);
            self.current = self.start + ch.len_utf8() as u32;
            ch
        };
        let span = Span::new(self.start, self.current);
        self.diagnostics.report(
            Diagnostic::error(self.line, format!("Unexpected character: {ch}")).with_span(span),
        );
    }

    fn add_token(&mut self, kind: TokenKind) {
        let span = Span::new(self.start, self.current);
        self.tokens.push(Token::new(kind, span, self.line));
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.current as usize >= self.bytes.len()
    }

    #[inline]
    fn advance(&mut self) -> u8 {
        let byte = self.bytes[self.current as usize];
        self.current += 1;
        byte
    }

    #[inline]
    fn peek(&self) -> u8 {
        self.bytes.get(self.current as usize).copied().unwrap_or(0)
    }

    #[inline]
    fn peek_next(&self) -> u8 {
        self.bytes
            .get(self.current as usize + 1)
            .copied()
            .unwrap_or(0)
    }

    /// Consume the next byte if it matches `expected`.
    #[inline]
    fn match_byte(&mut self, expected: u8) -> bool {
        if self.peek() == expected {
            self.current += 1;
            true
        } else {
            false
        }
    }
}
