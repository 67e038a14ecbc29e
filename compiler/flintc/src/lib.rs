//! Flint driver: file execution, REPL, and exit-code mapping.
//!
//! # Debugging
//!
//! Enable tracing with environment variables:
//! - `RUST_LOG=flint_parse=trace` - follow the parser token by token
//! - `RUST_LOG=debug` - debug-level output across all crates

pub mod commands;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times. Does nothing
/// unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
