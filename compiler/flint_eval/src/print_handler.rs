//! Print handler for configurable output.
//!
//! `print` output goes to stdout by default; tests and embedders swap in a
//! buffer. Enum dispatch keeps the hot path free of vtable indirection.

use std::cell::RefCell;
use std::rc::Rc;

/// Print handler implementation using enum dispatch.
pub enum PrintHandler {
    /// Writes to stdout (default).
    Stdout,
    /// Captures to a buffer (testing/embedding).
    Buffer(RefCell<String>),
}

/// Shared handle to a print handler.
pub type SharedPrintHandler = Rc<PrintHandler>;

/// A handler writing to stdout.
pub fn stdout_handler() -> SharedPrintHandler {
    Rc::new(PrintHandler::Stdout)
}

/// A handler capturing output to a buffer.
pub fn buffer_handler() -> SharedPrintHandler {
    Rc::new(PrintHandler::Buffer(RefCell::new(String::new())))
}

impl PrintHandler {
    /// Print a line (with newline).
    pub fn println(&self, msg: &str) {
        match self {
            PrintHandler::Stdout => println!("{msg}"),
            PrintHandler::Buffer(buffer) => {
                let mut buffer = buffer.borrow_mut();
                buffer.push_str(msg);
                buffer.push('\n');
            }
        }
    }

    /// Get all captured output (empty for stdout).
    pub fn get_output(&self) -> String {
        match self {
            PrintHandler::Stdout => String::new(),
            PrintHandler::Buffer(buffer) => buffer.borrow().clone(),
        }
    }

    /// Clear captured output (no-op for stdout).
    pub fn clear(&self) {
        if let PrintHandler::Buffer(buffer) = self {
            buffer.borrow_mut().clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_buffer_captures_lines() {
        let handler = buffer_handler();
        handler.println("one");
        handler.println("two");
        assert_eq!(handler.get_output(), "one\ntwo\n");
    }

    #[test]
    fn test_buffer_clear() {
        let handler = buffer_handler();
        handler.println("gone");
        handler.clear();
        assert_eq!(handler.get_output(), "");
    }

    #[test]
    fn test_stdout_captures_nothing() {
        let handler = stdout_handler();
        assert_eq!(handler.get_output(), "");
    }
}
