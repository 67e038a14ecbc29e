//! Script execution: scan, parse, gate on syntax errors, interpret.

use std::fs;
use std::io;

use flint_diagnostic::DiagnosticQueue;
use flint_eval::Interpreter;
use flint_ir::StringInterner;
use flint_parse::ParseMode;
use tracing::debug;

use super::{EXIT_RUNTIME, EXIT_SYNTAX};

/// Run a script file, returning the process exit code.
pub fn run_file(path: &str) -> i32 {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error reading file: {error}");
            return EXIT_SYNTAX;
        }
    };

    let interner = StringInterner::new();
    let mut interpreter = Interpreter::new(&interner);
    run_source(&source, &interner, &mut interpreter, ParseMode::Script)
}

/// Run one source unit through the full pipeline.
///
/// Syntax errors are emitted to stderr and suppress evaluation (exit 64).
/// A runtime fault is reported as `[line N] <message>` (exit 70). Returns
/// 0 on success. The interpreter keeps its environment either way, so the
/// REPL reuses it across entries.
pub fn run_source(
    source: &str,
    interner: &StringInterner,
    interpreter: &mut Interpreter<'_>,
    mode: ParseMode,
) -> i32 {
    debug!(bytes = source.len(), ?mode, "run");

    let mut diagnostics = DiagnosticQueue::new();
    let tokens = flint_lexer::scan(source, interner, &mut diagnostics);
    let statements = flint_parse::parse_with_mode(&tokens, interner, &mut diagnostics, mode);

    if diagnostics.has_errors() {
        diagnostics.emit_all(&mut io::stderr()).ok();
        return EXIT_SYNTAX;
    }

    match interpreter.interpret(&statements) {
        Ok(()) => 0,
        Err(fault) => {
            eprintln!("[line {}] {}", fault.line, fault.message);
            EXIT_RUNTIME
        }
    }
}
