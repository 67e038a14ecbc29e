//! The tree-walking interpreter: statement execution and expression
//! evaluation against the current environment.

mod scope_guard;

#[cfg(test)]
mod tests;

use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use flint_ir::{Expr, FunctionDecl, LiteralValue, Name, Stmt, StringInterner, Token, TokenKind};

use crate::environment::Environment;
use crate::errors::{
    already_defined, arity_mismatch, not_callable, undefined_variable, EvalResult, RuntimeError,
};
use crate::operators::{evaluate_binary, evaluate_unary};
use crate::print_handler::{stdout_handler, SharedPrintHandler};
use crate::value::{Callable, Value};

/// The evaluator.
///
/// Holds the persistent environment: in a REPL, one interpreter lives
/// across entries so globals accumulate. The interner must be the same one
/// the tokens were scanned with.
pub struct Interpreter<'a> {
    pub env: Environment,
    interner: &'a StringInterner,
    print: SharedPrintHandler,
}

/// Extract the interned symbol from an identifier token.
fn ident_symbol(token: &Token) -> Name {
    match token.kind {
        TokenKind::Ident(symbol) => symbol,
        ref other => unreachable!("expected identifier token, found {other:?}"),
    }
}

/// Current wall-clock time in seconds since the Unix epoch.
fn clock_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0.0, |elapsed| elapsed.as_secs_f64())
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter printing to stdout.
    pub fn new(interner: &'a StringInterner) -> Self {
        Self::with_print_handler(interner, stdout_handler())
    }

    /// Create an interpreter with an explicit print handler.
    pub fn with_print_handler(interner: &'a StringInterner, print: SharedPrintHandler) -> Self {
        let mut env = Environment::new();
        // The global scope is empty at this point, so seeding cannot
        // collide.
        env.define_global(interner.intern("clock"), Value::Callable(Callable::Clock))
            .ok();
        Interpreter {
            env,
            interner,
            print,
        }
    }

    /// Execute statements in order against the persistent environment.
    ///
    /// The first runtime fault aborts the remaining statements of this
    /// call; the environment stays usable for a following call.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for statement in statements {
            self.execute(statement)?;
        }
        Ok(())
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(())
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                self.print.println(&value.to_string());
                Ok(())
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.define_checked(name, value)
            }
            Stmt::Block(statements) => self.execute_block(statements),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    self.execute(body)?;
                }
                Ok(())
            }
            Stmt::Function(decl) => {
                let symbol = ident_symbol(&decl.name);
                let callable = Value::Callable(Callable::Function {
                    name: self.interner.lookup(symbol),
                    decl: Rc::clone(decl),
                });
                self.define_checked(&decl.name, callable)
            }
            Stmt::Return { keyword, value } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                Err(RuntimeError::return_signal(value, keyword))
            }
        }
    }

    /// Run a block's statements in a fresh scope. The scope is popped on
    /// every exit path, fault paths included.
    fn execute_block(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        let mut scoped = self.scoped();
        for statement in statements {
            scoped.execute(statement)?;
        }
        Ok(())
    }

    /// Define in the current scope, faulting on same-scope redefinition.
    fn define_checked(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        let symbol = ident_symbol(name);
        self.env
            .define(symbol, value)
            .map_err(|_| already_defined(&self.interner.lookup(symbol), name))
    }

    fn evaluate(&mut self, expr: &Expr) -> EvalResult {
        match expr {
            Expr::Literal(literal) => Ok(self.literal_value(*literal)),
            Expr::Grouping(inner) => self.evaluate(inner),
            Expr::Variable { name } => {
                let symbol = ident_symbol(name);
                self.env
                    .lookup(symbol)
                    .ok_or_else(|| undefined_variable(&self.interner.lookup(symbol), name))
            }
            Expr::Assign { name, value } => {
                let value = self.evaluate(value)?;
                let symbol = ident_symbol(name);
                self.env
                    .assign(symbol, value.clone())
                    .map_err(|_| undefined_variable(&self.interner.lookup(symbol), name))?;
                // Assignment is an expression with a value.
                Ok(value)
            }
            Expr::Logical {
                operator,
                left,
                right,
            } => {
                let left = self.evaluate(left)?;
                let short_circuits = match operator.kind {
                    TokenKind::Or => left.is_truthy(),
                    _ => !left.is_truthy(), // `and`
                };
                if short_circuits {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }
            Expr::Unary { operator, operand } => {
                let operand = self.evaluate(operand)?;
                evaluate_unary(operator, operand)
            }
            Expr::Binary {
                operator,
                left,
                right,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                evaluate_binary(operator, left, right)
            }
            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee = self.evaluate(callee)?;
                let mut args = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    args.push(self.evaluate(argument)?);
                }

                let Value::Callable(callable) = callee else {
                    return Err(not_callable(paren));
                };
                if args.len() != callable.arity() {
                    return Err(arity_mismatch(callable.arity(), args.len(), paren));
                }
                match callable {
                    Callable::Clock => Ok(Value::Number(clock_now())),
                    Callable::Function { decl, .. } => self.call_function(&decl, args),
                }
            }
        }
    }

    fn literal_value(&self, literal: LiteralValue) -> Value {
        match literal {
            LiteralValue::Nil => Value::Nil,
            LiteralValue::Bool(b) => Value::Bool(b),
            LiteralValue::Number(n) => Value::Number(n),
            LiteralValue::Str(name) => Value::Str(self.interner.lookup(name)),
        }
    }

    /// Invoke a user-defined function.
    ///
    /// The body runs against a fresh environment chained only to the
    /// globals: parameters and globals are visible, locals of the defining
    /// or calling scope are not. The caller's environment is restored on
    /// every path.
    fn call_function(&mut self, decl: &Rc<FunctionDecl>, args: Vec<Value>) -> EvalResult {
        let child = self.env.child();
        let saved = std::mem::replace(&mut self.env, child);
        let outcome = self.run_function_body(decl, args);
        self.env = saved;

        match outcome {
            // Falling off the end of the body yields nil.
            Ok(()) => Ok(Value::Nil),
            // A `return` signal becomes the call's result; real faults
            // keep propagating.
            Err(error) => error.into_return_value(),
        }
    }

    fn run_function_body(
        &mut self,
        decl: &FunctionDecl,
        args: Vec<Value>,
    ) -> Result<(), RuntimeError> {
        let mut scoped = self.scoped();
        for (param, arg) in decl.params.iter().zip(args) {
            scoped.define_checked(param, arg)?;
        }
        for statement in &decl.body {
            scoped.execute(statement)?;
        }
        Ok(())
    }
}
