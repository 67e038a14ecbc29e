//! End-to-end interpreter tests: scan, parse, and run real source.

use std::rc::Rc;

use flint_diagnostic::DiagnosticQueue;
use flint_ir::StringInterner;
use pretty_assertions::assert_eq;

use crate::errors::{RuntimeError, RuntimeErrorKind};
use crate::print_handler::buffer_handler;
use crate::Interpreter;

/// Run a program, returning captured output and the interpret result.
fn run(source: &str) -> (String, Result<(), RuntimeError>) {
    let interner = StringInterner::new();
    let mut diagnostics = DiagnosticQueue::new();
    let tokens = flint_lexer::scan(source, &interner, &mut diagnostics);
    let statements = flint_parse::parse(&tokens, &interner, &mut diagnostics);
    assert!(
        !diagnostics.has_errors(),
        "unexpected syntax errors in test program: {source}"
    );

    let print = buffer_handler();
    let mut interpreter = Interpreter::with_print_handler(&interner, Rc::clone(&print));
    let result = interpreter.interpret(&statements);
    (print.get_output(), result)
}

/// Run a program that must succeed, returning its output.
fn run_ok(source: &str) -> String {
    let (output, result) = run(source);
    if let Err(error) = result {
        panic!("unexpected runtime fault: {error}");
    }
    output
}

/// Run a program that must fault, returning output so far and the fault.
fn run_err(source: &str) -> (String, RuntimeError) {
    let (output, result) = run(source);
    match result {
        Err(error) => (output, error),
        Ok(()) => panic!("expected a runtime fault: {source}"),
    }
}

#[test]
fn test_print_arithmetic() {
    assert_eq!(run_ok("print 1 + 2;"), "3\n");
}

#[test]
fn test_number_formatting() {
    assert_eq!(run_ok("print 7 / 2;"), "3.5\n");
    assert_eq!(run_ok("print 0.5 + 0.25;"), "0.75\n");
    assert_eq!(run_ok("print -3;"), "-3\n");
}

#[test]
fn test_string_concatenation() {
    assert_eq!(run_ok("print \"foo\" + \"bar\";"), "foobar\n");
}

#[test]
fn test_grouping_precedence() {
    assert_eq!(run_ok("print (1 + 2) * 3;"), "9\n");
    assert_eq!(run_ok("print 1 + 2 * 3;"), "7\n");
}

#[test]
fn test_variables() {
    assert_eq!(run_ok("var x = 10; print x;"), "10\n");
    assert_eq!(run_ok("var x; print x;"), "nil\n");
}

#[test]
fn test_assignment_is_an_expression() {
    assert_eq!(run_ok("var x = 1; print x = 2; print x;"), "2\n2\n");
}

#[test]
fn test_block_shadowing_does_not_leak() {
    let source = "var x = 10; { var x = 20; print x; } print x;";
    assert_eq!(run_ok(source), "20\n10\n");
}

#[test]
fn test_assignment_in_block_mutates_outer() {
    let source = "var x = 1; { x = 2; } print x;";
    assert_eq!(run_ok(source), "2\n");
}

#[test]
fn test_redefinition_in_same_scope_faults() {
    let (_, error) = run_err("var x = 1; var x = 2;");
    assert_eq!(
        error.message,
        "Variable 'x' is already defined in this scope."
    );
}

#[test]
fn test_redefinition_in_nested_scope_allowed() {
    assert_eq!(run_ok("var x = 1; { var x = 2; } { var x = 3; }"), "");
}

#[test]
fn test_undefined_variable_faults() {
    let (_, error) = run_err("print ghost;");
    assert_eq!(error.message, "Undefined variable 'ghost'.");
    assert_eq!(error.line, 1);
}

#[test]
fn test_assignment_to_undefined_faults() {
    let (_, error) = run_err("ghost = 1;");
    assert_eq!(error.kind, RuntimeErrorKind::UndefinedVariable {
        name: "ghost".to_string()
    });
}

#[test]
fn test_if_else() {
    assert_eq!(run_ok("if (1 < 2) print \"yes\"; else print \"no\";"), "yes\n");
    assert_eq!(run_ok("if (1 > 2) print \"yes\"; else print \"no\";"), "no\n");
    assert_eq!(run_ok("if (false) print \"unseen\";"), "");
}

#[test]
fn test_truthiness_in_conditions() {
    // Only nil and false are falsy; 0 and "" are truthy.
    assert_eq!(run_ok("if (0) print \"zero\";"), "zero\n");
    assert_eq!(run_ok("if (\"\") print \"empty\";"), "empty\n");
    assert_eq!(run_ok("if (nil) print \"unseen\"; else print \"nil falsy\";"), "nil falsy\n");
}

#[test]
fn test_while_loop() {
    let source = "var i = 0; while (i < 3) { print i; i = i + 1; }";
    assert_eq!(run_ok(source), "0\n1\n2\n");
}

#[test]
fn test_for_loop() {
    let source = "for (var i = 0; i < 3; i = i + 1) print i;";
    assert_eq!(run_ok(source), "0\n1\n2\n");
}

#[test]
fn test_logical_operators_return_operands() {
    assert_eq!(run_ok("print nil or 2;"), "2\n");
    assert_eq!(run_ok("print 1 and 2;"), "2\n");
    assert_eq!(run_ok("print false and 3;"), "false\n");
    assert_eq!(run_ok("print \"a\" or \"b\";"), "a\n");
}

#[test]
fn test_and_short_circuits() {
    let source = "\
fn sideEffect() { print \"called\"; return true; }
false and sideEffect();";
    assert_eq!(run_ok(source), "");
}

#[test]
fn test_or_short_circuits() {
    let source = "\
fn sideEffect() { print \"called\"; return true; }
true or sideEffect();";
    assert_eq!(run_ok(source), "");
}

#[test]
fn test_division_by_zero() {
    let (_, error) = run_err("print 1 / 0;");
    assert_eq!(error.kind, RuntimeErrorKind::DivisionByZero);
    assert_eq!(error.message, "Division by zero is not allowed.");
}

#[test]
fn test_fault_aborts_remaining_statements() {
    let (output, error) = run_err("print 1; print 1 / 0; print 2;");
    assert_eq!(output, "1\n");
    assert_eq!(error.kind, RuntimeErrorKind::DivisionByZero);
}

#[test]
fn test_unary_minus_requires_number() {
    let (_, error) = run_err("print -\"four\";");
    assert_eq!(error.message, "Operand must be a number.");
}

#[test]
fn test_mixed_addition_faults() {
    let (_, error) = run_err("print \"n=\" + 1;");
    assert_eq!(error.message, "Operands must be two numbers or two strings.");
}

#[test]
fn test_comparison_requires_numbers() {
    let (_, error) = run_err("print \"a\" < \"b\";");
    assert_eq!(error.message, "Operands must be numbers.");
}

#[test]
fn test_equality() {
    assert_eq!(run_ok("print nil == nil;"), "true\n");
    assert_eq!(run_ok("print nil == false;"), "false\n");
    assert_eq!(run_ok("print \"a\" == \"a\";"), "true\n");
    assert_eq!(run_ok("print 1 == \"1\";"), "false\n");
    assert_eq!(run_ok("print 2 != 3;"), "true\n");
}

#[test]
fn test_function_call_and_return() {
    let source = "fn add(a, b) { return a + b; } print add(1, 2);";
    assert_eq!(run_ok(source), "3\n");
}

#[test]
fn test_function_without_return_yields_nil() {
    assert_eq!(run_ok("fn noop() {} print noop();"), "nil\n");
}

#[test]
fn test_bare_return_yields_nil() {
    assert_eq!(run_ok("fn early() { return; print \"unseen\"; } print early();"), "nil\n");
}

#[test]
fn test_early_return_skips_rest_of_body() {
    let source = "\
fn pick(flag) {
  if (flag) return \"first\";
  return \"second\";
}
print pick(true);
print pick(false);";
    assert_eq!(run_ok(source), "first\nsecond\n");
}

#[test]
fn test_recursion() {
    let source = "\
fn fib(n) {
  if (n < 2) return n;
  return fib(n - 1) + fib(n - 2);
}
print fib(10);";
    assert_eq!(run_ok(source), "55\n");
}

#[test]
fn test_function_display() {
    assert_eq!(run_ok("fn add(a, b) { return a + b; } print add;"), "<fn add>\n");
    assert_eq!(run_ok("print clock;"), "<native fn>\n");
}

#[test]
fn test_functions_are_values() {
    let source = "\
fn twice(f) { f(); f(); }
fn hello() { print \"hi\"; }
twice(hello);";
    assert_eq!(run_ok(source), "hi\nhi\n");
}

#[test]
fn test_call_chaining() {
    let source = "fn id() { return id; } print id()() == id;";
    assert_eq!(run_ok(source), "true\n");
}

#[test]
fn test_arity_mismatch_does_not_run_body() {
    let (output, error) = run_err("fn one(a) { print \"ran\"; } one(1, 2);");
    assert_eq!(output, "");
    assert_eq!(error.message, "Expected 1 arguments but got 2.");
}

#[test]
fn test_calling_non_callable_faults() {
    let (_, error) = run_err("var x = 1; x();");
    assert_eq!(error.message, "Can only call functions and classes.");
}

#[test]
fn test_functions_see_globals() {
    let source = "var g = 7; fn show() { print g; } show();";
    assert_eq!(run_ok(source), "7\n");
}

#[test]
fn test_functions_do_not_capture_enclosing_locals() {
    // Function bodies chain to the globals, not the defining scope, so a
    // block-local variable is invisible at call time.
    let source = "{ var hidden = 5; fn peek() { print hidden; } peek(); }";
    let (_, error) = run_err(source);
    assert_eq!(error.kind, RuntimeErrorKind::UndefinedVariable {
        name: "hidden".to_string()
    });
}

#[test]
fn test_global_mutation_visible_to_functions() {
    let source = "\
var counter = 0;
fn bump() { counter = counter + 1; }
bump(); bump();
print counter;";
    assert_eq!(run_ok(source), "2\n");
}

#[test]
fn test_top_level_return_faults() {
    let (_, error) = run_err("return 1;");
    assert_eq!(error.message, "Cannot return from top-level code.");
}

#[test]
fn test_clock_returns_positive_number() {
    assert_eq!(run_ok("print clock() > 0;"), "true\n");
}

#[test]
fn test_clock_advances() {
    assert_eq!(run_ok("var a = clock(); var b = clock(); print b >= a;"), "true\n");
}

#[test]
fn test_interpretation_is_idempotent_for_pure_programs() {
    let interner = StringInterner::new();
    let mut diagnostics = DiagnosticQueue::new();
    let tokens = flint_lexer::scan("print (1 + 2);", &interner, &mut diagnostics);
    let statements = flint_parse::parse(&tokens, &interner, &mut diagnostics);

    let print = buffer_handler();
    let mut interpreter = Interpreter::with_print_handler(&interner, Rc::clone(&print));
    assert!(interpreter.interpret(&statements).is_ok());
    assert!(interpreter.interpret(&statements).is_ok());
    assert_eq!(print.get_output(), "3\n3\n");
}

#[test]
fn test_state_survives_a_fault() {
    // A fault aborts one interpret call without corrupting the
    // environment for the next (REPL behavior).
    let interner = StringInterner::new();
    let print = buffer_handler();
    let mut interpreter = Interpreter::with_print_handler(&interner, Rc::clone(&print));

    for (source, expect_fault) in [
        ("var x = 1;", false),
        ("print x / 0;", true),
        ("print x;", false),
    ] {
        let mut diagnostics = DiagnosticQueue::new();
        let tokens = flint_lexer::scan(source, &interner, &mut diagnostics);
        let statements = flint_parse::parse(&tokens, &interner, &mut diagnostics);
        assert!(!diagnostics.has_errors());
        assert_eq!(interpreter.interpret(&statements).is_err(), expect_fault);
    }
    assert_eq!(print.get_output(), "1\n");
}

#[test]
fn test_scope_restored_after_fault_in_block() {
    // A fault inside a block must still pop the block scope.
    let interner = StringInterner::new();
    let print = buffer_handler();
    let mut interpreter = Interpreter::with_print_handler(&interner, Rc::clone(&print));

    let mut diagnostics = DiagnosticQueue::new();
    let tokens = flint_lexer::scan(
        "var x = 1; { var x = 2; print ghost; }",
        &interner,
        &mut diagnostics,
    );
    let statements = flint_parse::parse(&tokens, &interner, &mut diagnostics);
    assert!(interpreter.interpret(&statements).is_err());
    assert_eq!(interpreter.env.depth(), 1);

    // The outer binding is intact.
    let mut diagnostics = DiagnosticQueue::new();
    let tokens = flint_lexer::scan("print x;", &interner, &mut diagnostics);
    let statements = flint_parse::parse(&tokens, &interner, &mut diagnostics);
    assert!(interpreter.interpret(&statements).is_ok());
    assert_eq!(print.get_output(), "1\n");
}

#[test]
fn test_fib_iterative_with_for() {
    let source = "\
var a = 0;
var b = 1;
for (var i = 0; i < 10; i = i + 1) {
  var next = a + b;
  a = b;
  b = next;
}
print a;";
    assert_eq!(run_ok(source), "55\n");
}
