//! Binary and unary operator dispatch.
//!
//! Operand type checks match per operator kind before acting: arithmetic
//! and comparisons require numbers, `+` also accepts two strings, equality
//! accepts anything and never faults.

use std::rc::Rc;

use flint_ir::{Token, TokenKind};

use crate::errors::{
    division_by_zero, invalid_addition, operand_must_be_number, operands_must_be_numbers,
    EvalResult,
};
use crate::value::Value;

/// Evaluate a binary operator over already-evaluated operands.
pub fn evaluate_binary(operator: &Token, left: Value, right: Value) -> EvalResult {
    match operator.kind {
        TokenKind::Plus => match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::Str(a), Value::Str(b)) => {
                let joined = format!("{a}{b}");
                Ok(Value::Str(Rc::from(joined)))
            }
            _ => Err(invalid_addition(operator)),
        },
        TokenKind::Minus => numeric(operator, left, right, |a, b| Value::Number(a - b)),
        TokenKind::Star => numeric(operator, left, right, |a, b| Value::Number(a * b)),
        TokenKind::Slash => match (left, right) {
            (Value::Number(_), Value::Number(b)) if b == 0.0 => Err(division_by_zero(operator)),
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a / b)),
            _ => Err(operands_must_be_numbers(operator)),
        },

        TokenKind::Greater => numeric(operator, left, right, |a, b| Value::Bool(a > b)),
        TokenKind::GreaterEqual => numeric(operator, left, right, |a, b| Value::Bool(a >= b)),
        TokenKind::Less => numeric(operator, left, right, |a, b| Value::Bool(a < b)),
        TokenKind::LessEqual => numeric(operator, left, right, |a, b| Value::Bool(a <= b)),

        TokenKind::EqualEqual => Ok(Value::Bool(left == right)),
        TokenKind::BangEqual => Ok(Value::Bool(left != right)),

        ref other => unreachable!("not a binary operator: {other:?}"),
    }
}

/// Evaluate a unary operator over an already-evaluated operand.
pub fn evaluate_unary(operator: &Token, operand: Value) -> EvalResult {
    match operator.kind {
        TokenKind::Bang => Ok(Value::Bool(!operand.is_truthy())),
        TokenKind::Minus => match operand {
            Value::Number(n) => Ok(Value::Number(-n)),
            _ => Err(operand_must_be_number(operator)),
        },
        ref other => unreachable!("not a unary operator: {other:?}"),
    }
}

/// Apply `op` when both operands are numbers, fault otherwise.
fn numeric(
    operator: &Token,
    left: Value,
    right: Value,
    op: impl FnOnce(f64, f64) -> Value,
) -> EvalResult {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(op(a, b)),
        _ => Err(operands_must_be_numbers(operator)),
    }
}
