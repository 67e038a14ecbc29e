//! A single reported error.

use std::fmt;

use flint_ir::Span;

/// Where in the line the error points, rendered after "Error".
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub enum Context {
    /// No location context beyond the line (scanner errors).
    #[default]
    Bare,
    /// At a specific lexeme: `Error at 'foo':`.
    AtLexeme(String),
    /// At end of input: `Error at end:`.
    AtEnd,
}

/// A reported syntax error.
///
/// Renders in the interpreter's line-oriented format:
///
/// ```text
/// [line 3] Error at ')': Expect expression.
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
#[must_use = "diagnostics should be reported to a queue, not silently dropped"]
pub struct Diagnostic {
    pub message: String,
    pub line: u32,
    pub span: Span,
    pub context: Context,
}

impl Diagnostic {
    /// Create an error diagnostic at a source line.
    pub fn error(line: u32, message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            line,
            span: Span::DUMMY,
            context: Context::Bare,
        }
    }

    /// Attach the offending span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Point at a lexeme: `Error at '<lexeme>':`.
    pub fn at_lexeme(mut self, lexeme: impl Into<String>) -> Self {
        self.context = Context::AtLexeme(lexeme.into());
        self
    }

    /// Point at end of input: `Error at end:`.
    pub fn at_end(mut self) -> Self {
        self.context = Context::AtEnd;
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Context::Bare => write!(f, "[line {}] Error: {}", self.line, self.message),
            Context::AtLexeme(lexeme) => {
                write!(f, "[line {}] Error at '{}': {}", self.line, lexeme, self.message)
            }
            Context::AtEnd => write!(f, "[line {}] Error at end: {}", self.line, self.message),
        }
    }
}
