//! Global stdlib words installed into every runtime's global dictionary: the
//! handful of type-agnostic stack shuffles and the literal-like words
//! (`true`, `false`, `null`) that stand in for the boolean/null token syntax
//! the grammar does not have — only array, object, quote, string, symbol and
//! word are literal token kinds; everything else, numbers included, is a bare
//! symbol resolved through the dictionary.

use std::rc::Rc;

use crate::context::Context;
use crate::dictionary::Dictionary;
use crate::value::{QuoteData, SymbolData, Value, WordData};

/// Define a global native word named `name`.
fn define(dictionary: &mut Dictionary, name: &str, f: fn(&mut Context) -> bool) {
    let symbol = Value::Symbol(Rc::new(SymbolData::new(name, None)));
    let quote = Value::Quote(Rc::new(QuoteData::native(f)));
    dictionary.define(Value::Word(Rc::new(WordData { symbol, quote })));
}

pub fn install(dictionary: &mut Dictionary) {
    define(dictionary, "true", push_true);
    define(dictionary, "false", push_false);
    define(dictionary, "null", push_null);
    define(dictionary, "dup", dup);
    define(dictionary, "drop", drop_top);
    define(dictionary, "swap", swap);
    define(dictionary, "over", over);
    define(dictionary, "clear", clear);
    define(dictionary, "depth", depth);
    define(dictionary, "error.current", error_current);
    define(dictionary, "error.clear", error_clear);
}

fn push_true(ctx: &mut Context) -> bool {
    ctx.push(Value::Boolean(true));
    true
}

fn push_false(ctx: &mut Context) -> bool {
    ctx.push(Value::Boolean(false));
    true
}

fn push_null(ctx: &mut Context) -> bool {
    ctx.push(Value::Null);
    true
}

/// Stack effect: ( a -- a a )
fn dup(ctx: &mut Context) -> bool {
    let top = match ctx.pop() {
        Some(v) => v,
        None => return false,
    };
    ctx.push(top.clone());
    ctx.push(top);
    true
}

/// Stack effect: ( a -- )
fn drop_top(ctx: &mut Context) -> bool {
    ctx.pop().is_some()
}

/// Stack effect: ( a b -- b a )
fn swap(ctx: &mut Context) -> bool {
    let b = match ctx.pop() {
        Some(v) => v,
        None => return false,
    };
    let a = match ctx.pop() {
        Some(v) => v,
        None => {
            ctx.push(b);
            return false;
        }
    };
    ctx.push(b);
    ctx.push(a);
    true
}

/// Stack effect: ( a b -- a b a )
fn over(ctx: &mut Context) -> bool {
    let b = match ctx.pop() {
        Some(v) => v,
        None => return false,
    };
    let a = match ctx.pop() {
        Some(v) => v,
        None => {
            ctx.push(b);
            return false;
        }
    };
    ctx.push(a.clone());
    ctx.push(b);
    ctx.push(a);
    true
}

/// Stack effect: ( ... -- ), discards the whole stack.
fn clear(ctx: &mut Context) -> bool {
    ctx.stack.clear();
    true
}

/// Stack effect: ( -- depth )
fn depth(ctx: &mut Context) -> bool {
    let n = ctx.stack.len() as i64;
    ctx.push(Value::Number(crate::value::Number::Int(n)));
    true
}

/// Stack effect: ( -- error|null ), the current pending error without clearing it.
fn error_current(ctx: &mut Context) -> bool {
    match ctx.current_error().cloned() {
        Some(err) => ctx.push(Value::Error(Rc::new(err))),
        None => ctx.push(Value::Null),
    }
    true
}

/// Stack effect: ( -- ), discards the pending error slot.
fn error_clear(ctx: &mut Context) -> bool {
    ctx.clear_error();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Runtime;
    use crate::value::Number;

    #[test]
    fn true_false_and_null_push_their_literals() {
        let runtime = Runtime::new(false);
        let mut ctx = Context::new(runtime);
        let mut dictionary = Dictionary::new();
        install(&mut dictionary);
        ctx.dictionary = dictionary;

        assert!(ctx.dictionary.contains("true"));
        if let Some(Value::Word(w)) = ctx.dictionary.get("null").cloned() {
            assert!(ctx.call(&w.quote));
            assert!(matches!(ctx.peek(), Some(Value::Null)));
        } else {
            panic!("expected null to be defined");
        }
    }

    #[test]
    fn swap_exchanges_the_top_two_values() {
        let runtime = Runtime::new(false);
        let mut ctx = Context::new(runtime);
        ctx.push(Value::Number(Number::Int(1)));
        ctx.push(Value::Number(Number::Int(2)));
        assert!(swap(&mut ctx));
        assert!(matches!(ctx.pop(), Some(Value::Number(Number::Int(1)))));
        assert!(matches!(ctx.pop(), Some(Value::Number(Number::Int(2)))));
    }

    #[test]
    fn swap_with_one_element_restores_the_stack() {
        let runtime = Runtime::new(false);
        let mut ctx = Context::new(runtime);
        ctx.push(Value::Number(Number::Int(1)));
        assert!(!swap(&mut ctx));
        assert_eq!(ctx.stack.len(), 1);
    }
}
