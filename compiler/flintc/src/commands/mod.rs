//! CLI commands.

mod repl;
mod run;

pub use repl::repl;
pub use run::{run_file, run_source};

/// Exit code for usage and syntax errors (BSD sysexits `EX_USAGE`).
pub const EXIT_SYNTAX: i32 = 64;
/// Exit code for runtime faults (BSD sysexits `EX_SOFTWARE`).
pub const EXIT_RUNTIME: i32 = 70;
