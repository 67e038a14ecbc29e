//! Interactive read-eval-print loop.

use std::io::{self, BufRead, Write};

use flint_eval::Interpreter;
use flint_ir::StringInterner;
use flint_parse::ParseMode;

use super::run_source;

/// Start the REPL. Returns the process exit code (always 0: faults are
/// reported per entry and the session continues).
pub fn repl() -> i32 {
    println!("Flint REPL (type 'exit' to quit)");

    // One interner and one interpreter for the whole session: names must
    // resolve identically across entries, and globals accumulate.
    let interner = StringInterner::new();
    let mut interpreter = Interpreter::new(&interner);

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let line = line.trim();
        if line.is_empty() || line == "exit" {
            break;
        }

        // Bare expressions auto-display in REPL mode. Errors of either
        // family don't end the session.
        run_source(line, &interner, &mut interpreter, ParseMode::Repl);
    }
    0
}
