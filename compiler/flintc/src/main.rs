//! Flint CLI
//!
//! `flint <script>` runs a file; `flint` with no arguments starts the REPL.

use flintc::commands::{repl, run_file, EXIT_SYNTAX};

fn main() {
    flintc::init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let code = match args.len() {
        1 => repl(),
        2 => run_file(&args[1]),
        _ => {
            eprintln!("Usage: flint [script]");
            EXIT_SYNTAX
        }
    };
    std::process::exit(code);
}
