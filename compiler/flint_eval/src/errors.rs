//! Runtime fault types and constructors.
//!
//! `RuntimeErrorKind` gives typed fault categories; factory functions
//! populate both `kind` and `message` and carry the offending token's
//! location. `return` is not a fault but a control-flow signal riding the
//! same channel: it propagates by `Result` up through statement execution
//! and is intercepted at the call boundary.

use std::fmt;

use flint_ir::{Span, Token};

use crate::value::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, RuntimeError>;

/// Control flow signal for non-local `return`.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlFlow {
    /// Return from the enclosing function, with its result value.
    Return(Value),
}

/// Typed fault category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    UndefinedVariable { name: String },
    AlreadyDefined { name: String },
    OperandMustBeNumber,
    OperandsMustBeNumbers,
    InvalidAddition,
    DivisionByZero,
    NotCallable,
    ArityMismatch { expected: usize, got: usize },
    ReturnOutsideFunction,
}

impl fmt::Display for RuntimeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedVariable { name } => write!(f, "Undefined variable '{name}'."),
            Self::AlreadyDefined { name } => {
                write!(f, "Variable '{name}' is already defined in this scope.")
            }
            Self::OperandMustBeNumber => write!(f, "Operand must be a number."),
            Self::OperandsMustBeNumbers => write!(f, "Operands must be numbers."),
            Self::InvalidAddition => write!(f, "Operands must be two numbers or two strings."),
            Self::DivisionByZero => write!(f, "Division by zero is not allowed."),
            Self::NotCallable => write!(f, "Can only call functions and classes."),
            Self::ArityMismatch { expected, got } => {
                write!(f, "Expected {expected} arguments but got {got}.")
            }
            Self::ReturnOutsideFunction => write!(f, "Cannot return from top-level code."),
        }
    }
}

/// A runtime fault with the location it should be reported at.
#[derive(Clone, Debug)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    /// Human-readable message (equals `kind.to_string()`).
    pub message: String,
    /// 1-based source line of the offending token.
    pub line: u32,
    pub span: Span,
    /// Set when this is a control-flow signal rather than a fault.
    pub control_flow: Option<ControlFlow>,
}

impl RuntimeError {
    fn from_kind(kind: RuntimeErrorKind, token: &Token) -> Self {
        let message = kind.to_string();
        RuntimeError {
            kind,
            message,
            line: token.line,
            span: token.span,
            control_flow: None,
        }
    }

    /// Create a `return` signal carrying the function's result.
    ///
    /// If the signal escapes to the top level (a `return` outside any
    /// function) it reads as the "Cannot return from top-level code." fault.
    pub fn return_signal(value: Value, keyword: &Token) -> Self {
        let mut error = Self::from_kind(RuntimeErrorKind::ReturnOutsideFunction, keyword);
        error.control_flow = Some(ControlFlow::Return(value));
        error
    }

    /// Check if this is a control-flow signal.
    #[inline]
    pub fn is_control_flow(&self) -> bool {
        self.control_flow.is_some()
    }

    /// Intercept a `return` signal at the call boundary.
    ///
    /// Returns `Ok(value)` for a return signal, `Err(self)` for a real
    /// fault that should keep propagating.
    pub fn into_return_value(self) -> Result<Value, Self> {
        match self.control_flow {
            Some(ControlFlow::Return(value)) => Ok(value),
            None => Err(self),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

// Fault constructors. All carry the offending token for line/location.

/// Undefined variable (lookup or assignment).
#[cold]
pub fn undefined_variable(name: &str, token: &Token) -> RuntimeError {
    RuntimeError::from_kind(
        RuntimeErrorKind::UndefinedVariable {
            name: name.to_string(),
        },
        token,
    )
}

/// Redefinition in the same scope.
#[cold]
pub fn already_defined(name: &str, token: &Token) -> RuntimeError {
    RuntimeError::from_kind(
        RuntimeErrorKind::AlreadyDefined {
            name: name.to_string(),
        },
        token,
    )
}

/// Non-numeric operand to unary `-`.
#[cold]
pub fn operand_must_be_number(token: &Token) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::OperandMustBeNumber, token)
}

/// Non-numeric operand to binary arithmetic/comparison.
#[cold]
pub fn operands_must_be_numbers(token: &Token) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::OperandsMustBeNumbers, token)
}

/// Invalid operand combination for `+`.
#[cold]
pub fn invalid_addition(token: &Token) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::InvalidAddition, token)
}

/// Division by zero.
#[cold]
pub fn division_by_zero(token: &Token) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::DivisionByZero, token)
}

/// A non-callable value was invoked.
#[cold]
pub fn not_callable(token: &Token) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::NotCallable, token)
}

/// Argument count does not equal the callable's arity.
#[cold]
pub fn arity_mismatch(expected: usize, got: usize, token: &Token) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::ArityMismatch { expected, got }, token)
}
