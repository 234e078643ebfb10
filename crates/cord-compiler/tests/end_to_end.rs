//! Parses, compiles and runs small Cord programs end-to-end, exercising the
//! parser, compiler and runtime together the way a host (the REPL, a script
//! file) would.

use cord_compiler::{compile, Parser};
use cord_runtime::{exec, Context, Number, Runtime, Value};

fn run(source: &str) -> Context {
    let runtime = Runtime::new(false);
    let tokens = Parser::new(source, "<test>").parse().expect("parses");
    let values = compile(&tokens, &runtime);
    let mut ctx = Context::new(runtime);
    for value in &values {
        assert!(exec(&mut ctx, value), "program should not fail");
    }
    ctx
}

#[test]
fn arithmetic_resolves_numeric_literals_and_dispatches_on_stack_top() {
    let ctx = run("1 2 +");
    assert!(matches!(ctx.peek(), Some(Value::Number(Number::Int(3)))));
}

#[test]
fn word_definitions_are_callable_afterwards() {
    let ctx = run(": double dup + ; 21 double");
    assert!(matches!(ctx.peek(), Some(Value::Number(Number::Int(42)))));
}

#[test]
fn nested_quote_only_runs_when_explicitly_called() {
    let ctx = run("( 1 2 + )");
    assert!(matches!(ctx.peek(), Some(Value::Quote(_))), "a bare quote is data, not invoked");

    let ctx = run("( 1 2 + ) call");
    assert!(matches!(ctx.peek(), Some(Value::Number(Number::Int(3)))));
}

#[test]
fn array_literal_elements_resolve_their_bare_numeric_symbols() {
    let ctx = run("[ 1, 2, 3 ] 1 @");
    assert!(matches!(ctx.peek(), Some(Value::Number(Number::Int(2)))));
}

#[test]
fn array_literal_elements_resolve_a_word_bound_symbol_to_its_quote() {
    // `eval` resolves a symbol to its referent without invoking it, so a
    // word-bound identifier inside a literal yields the word's quote, not
    // the result of calling it.
    let ctx = run(": one 1 ; [ one ] 0 @ call");
    assert!(matches!(ctx.peek(), Some(Value::Number(Number::Int(1)))));
}

#[test]
fn a_word_body_wrapped_in_its_own_parens_yields_a_quote_not_a_call() {
    // A word's quote body is exactly the tokens between the symbol and `;`,
    // with no special-casing when that happens to be a single
    // nested quote token. `: square ( dup * ) ;` therefore defines `square`
    // as a one-step word whose step pushes the inner quote as data — calling
    // `square` leaves that quote sitting on the stack uninvoked, the same as
    // any other bare quote literal. Dropping the redundant parens around the
    // body (`: square dup * ;`) is what actually squares the top of stack.
    let ctx = run(": square ( dup * ) ; 5 square");
    assert!(matches!(ctx.peek(), Some(Value::Quote(_))));

    let ctx = run(": square dup * ; 5 square");
    assert!(matches!(ctx.peek(), Some(Value::Number(Number::Int(25)))));
}

#[test]
fn object_property_access_finds_inherited_members() {
    let ctx = run(r#"{ "name": "cord" } "name" @"#);
    match ctx.peek() {
        Some(Value::String(s)) => assert_eq!(&**s, "cord"),
        other => panic!("expected a string, found {other:?}"),
    }
}

#[test]
fn boolean_short_circuit_like_chain_matches_scenario() {
    let ctx = run("true false and not");
    assert!(matches!(ctx.peek(), Some(Value::Boolean(true))));
}

#[test]
fn division_by_zero_surfaces_as_a_pending_error() {
    let mut ctx = run("1 0");
    assert!(!exec(&mut ctx, &Value::Symbol(std::rc::Rc::new(
        cord_runtime::SymbolData::new("/", None),
    ))));
    assert!(ctx.has_error());
}

#[test]
fn unresolved_symbol_is_a_reference_error() {
    let runtime = Runtime::new(false);
    let tokens = Parser::new("this-word-does-not-exist", "<test>")
        .parse()
        .expect("parses");
    let values = compile(&tokens, &runtime);
    let mut ctx = Context::new(runtime);
    assert!(!exec(&mut ctx, &values[0]));
    assert_eq!(ctx.current_error().unwrap().code, cord_core::ErrorCode::Reference);
}
