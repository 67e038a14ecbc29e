//! Diagnostic queue: the accumulator the driver owns.

use std::io::{self, Write};

use crate::Diagnostic;

/// Accumulates diagnostics across a scan/parse pass.
///
/// Replaces process-global had-error flags: the driver creates one queue
/// per run (or per REPL entry), hands it to the scanner and parser, and
/// checks [`has_errors`](Self::has_errors) before evaluating.
#[derive(Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic to the queue.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Check if any error was reported.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Number of queued diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Iterate over queued diagnostics in report order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Drop all queued diagnostics (REPL reset between entries).
    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }

    /// Write every diagnostic, one per line, to `out`.
    pub fn emit_all(&self, out: &mut dyn Write) -> io::Result<()> {
        for diagnostic in &self.diagnostics {
            writeln!(out, "{diagnostic}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_queue() {
        let queue = DiagnosticQueue::new();
        assert!(!queue.has_errors());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_report_and_emit() {
        let mut queue = DiagnosticQueue::new();
        queue.report(Diagnostic::error(1, "Unterminated string."));
        queue.report(Diagnostic::error(3, "Expect expression.").at_lexeme("+"));
        assert!(queue.has_errors());
        assert_eq!(queue.len(), 2);

        let mut out = Vec::new();
        queue.emit_all(&mut out).ok();
        let text = String::from_utf8(out).unwrap_or_default();
        assert_eq!(
            text,
            "[line 1] Error: Unterminated string.\n\
             [line 3] Error at '+': Expect expression.\n"
        );
    }

    #[test]
    fn test_clear() {
        let mut queue = DiagnosticQueue::new();
        queue.report(Diagnostic::error(1, "Unexpected character: $"));
        queue.clear();
        assert!(!queue.has_errors());
    }
}
