//! Number prototype: arithmetic, comparisons, and array indexing — a
//! demonstrative subset; the full numeric standard library is out of scope.

use cord_core::CordError;

use crate::context::Context;
use crate::value::{Number, Value};

use super::define;

pub fn install(proto: &Value) {
    define(proto, "+", add);
    define(proto, "-", subtract);
    define(proto, "*", multiply);
    define(proto, "/", divide);
    define(proto, "<", less_than);
    define(proto, ">", greater_than);
    define(proto, "<=", less_or_equal);
    define(proto, ">=", greater_or_equal);
    define(proto, "=", equal);
    define(proto, "@", index);
}

/// Pop two numbers (`b` on top, then `a`), restoring `b` on failure to fetch
/// `a` so a typed-pop error always leaves the stack exactly as it found it.
fn pop_pair(ctx: &mut Context) -> Option<(Number, Number)> {
    let b = ctx.pop_number()?;
    let a = match ctx.pop_number() {
        Some(a) => a,
        None => {
            ctx.push(Value::Number(b));
            return None;
        }
    };
    Some((a, b))
}

/// Integer arithmetic stays integer; mixing in a real promotes the result.
fn numeric_binop(a: Number, b: Number, int_op: fn(i64, i64) -> i64, real_op: fn(f64, f64) -> f64) -> Number {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => Number::Int(int_op(x, y)),
        _ => Number::Real(real_op(a.as_real(), b.as_real())),
    }
}

/// Stack effect: ( a b -- a+b )
fn add(ctx: &mut Context) -> bool {
    let (a, b) = match pop_pair(ctx) {
        Some(v) => v,
        None => return false,
    };
    ctx.push(Value::Number(numeric_binop(a, b, |x, y| x.wrapping_add(y), |x, y| x + y)));
    true
}

/// Stack effect: ( a b -- a-b )
fn subtract(ctx: &mut Context) -> bool {
    let (a, b) = match pop_pair(ctx) {
        Some(v) => v,
        None => return false,
    };
    ctx.push(Value::Number(numeric_binop(a, b, |x, y| x.wrapping_sub(y), |x, y| x - y)));
    true
}

/// Stack effect: ( a b -- a*b )
fn multiply(ctx: &mut Context) -> bool {
    let (a, b) = match pop_pair(ctx) {
        Some(v) => v,
        None => return false,
    };
    ctx.push(Value::Number(numeric_binop(a, b, |x, y| x.wrapping_mul(y), |x, y| x * y)));
    true
}

/// Stack effect: ( a b -- a/b )
///
/// Division always yields a real, even for two integer operands, and a zero
/// divisor is a `value` error rather than a panic.
fn divide(ctx: &mut Context) -> bool {
    let b = match ctx.pop_number() {
        Some(v) => v,
        None => return false,
    };
    let a = match ctx.pop_number() {
        Some(v) => v,
        None => {
            ctx.push(Value::Number(b));
            return false;
        }
    };
    if b.as_real() == 0.0 {
        ctx.push(Value::Number(a));
        ctx.push(Value::Number(b));
        ctx.set_error(CordError::value_error("division by zero"));
        return false;
    }
    ctx.push(Value::Number(Number::Real(a.as_real() / b.as_real())));
    true
}

fn compare(ctx: &mut Context, op: fn(f64, f64) -> bool) -> bool {
    let (a, b) = match pop_pair(ctx) {
        Some(v) => v,
        None => return false,
    };
    ctx.push(ctx.runtime.boolean(op(a.as_real(), b.as_real())));
    true
}

/// Stack effect: ( a b -- a<b )
fn less_than(ctx: &mut Context) -> bool {
    compare(ctx, |a, b| a < b)
}

/// Stack effect: ( a b -- a>b )
fn greater_than(ctx: &mut Context) -> bool {
    compare(ctx, |a, b| a > b)
}

/// Stack effect: ( a b -- a<=b )
fn less_or_equal(ctx: &mut Context) -> bool {
    compare(ctx, |a, b| a <= b)
}

/// Stack effect: ( a b -- a>=b )
fn greater_or_equal(ctx: &mut Context) -> bool {
    compare(ctx, |a, b| a >= b)
}

/// Stack effect: ( a b -- a=b )
fn equal(ctx: &mut Context) -> bool {
    let (a, b) = match pop_pair(ctx) {
        Some(v) => v,
        None => return false,
    };
    ctx.push(ctx.runtime.boolean(a.numeric_eq(b)));
    true
}

/// Stack effect: ( array index -- element )
///
/// Dispatches on the index's number prototype (resolution against the stack
/// top picks up the index, not the container underneath it); an
/// out-of-range index restores both operands and raises a `range` error.
fn index(ctx: &mut Context) -> bool {
    let idx = match ctx.pop_number() {
        Some(v) => v,
        None => return false,
    };
    let array = match ctx.pop_array() {
        Some(v) => v,
        None => {
            ctx.push(Value::Number(idx));
            return false;
        }
    };
    let i = idx.as_int();
    if i < 0 || i as usize >= array.len() {
        let out_of_range = CordError::range(format!("array index {i} out of bounds"));
        ctx.push(Value::Array(array));
        ctx.push(Value::Number(idx));
        ctx.set_error(out_of_range);
        return false;
    }
    ctx.push(array[i as usize].clone());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Runtime;

    #[test]
    fn integer_addition_stays_integer() {
        let mut ctx = Context::new(Runtime::new(false));
        ctx.push(Value::Number(Number::Int(2)));
        ctx.push(Value::Number(Number::Int(3)));
        assert!(add(&mut ctx));
        assert!(matches!(ctx.peek(), Some(Value::Number(Number::Int(5)))));
    }

    #[test]
    fn mixed_addition_promotes_to_real() {
        let mut ctx = Context::new(Runtime::new(false));
        ctx.push(Value::Number(Number::Int(2)));
        ctx.push(Value::Number(Number::Real(0.5)));
        assert!(add(&mut ctx));
        assert!(matches!(ctx.peek(), Some(Value::Number(Number::Real(r))) if *r == 2.5));
    }

    #[test]
    fn division_by_zero_restores_operands_and_sets_value_error() {
        let mut ctx = Context::new(Runtime::new(false));
        ctx.push(Value::Number(Number::Int(1)));
        ctx.push(Value::Number(Number::Int(0)));
        assert!(!divide(&mut ctx));
        assert_eq!(ctx.current_error().unwrap().code, cord_core::ErrorCode::Value);
        assert_eq!(ctx.stack.len(), 2);
    }

    #[test]
    fn array_index_out_of_range_restores_both_operands() {
        let mut ctx = Context::new(Runtime::new(false));
        let array = Value::Array(std::rc::Rc::from(vec![Value::Number(Number::Int(9))]));
        ctx.push(array);
        ctx.push(Value::Number(Number::Int(5)));
        assert!(!index(&mut ctx));
        assert_eq!(ctx.current_error().unwrap().code, cord_core::ErrorCode::Range);
        assert_eq!(ctx.stack.len(), 2);
    }

    #[test]
    fn array_index_in_range_fetches_the_element() {
        let mut ctx = Context::new(Runtime::new(false));
        let array = Value::Array(std::rc::Rc::from(vec![
            Value::Number(Number::Int(9)),
            Value::Number(Number::Int(8)),
        ]));
        ctx.push(array);
        ctx.push(Value::Number(Number::Int(1)));
        assert!(index(&mut ctx));
        assert!(matches!(ctx.peek(), Some(Value::Number(Number::Int(8)))));
    }
}
