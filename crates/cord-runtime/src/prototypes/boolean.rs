//! Boolean prototype: `and`, `or`, `xor`, `not`, `?`.

use crate::context::Context;
use crate::value::Value;

use super::define;

pub fn install(proto: &Value) {
    define(proto, "and", and);
    define(proto, "or", or);
    define(proto, "xor", xor);
    define(proto, "not", not);
    define(proto, "?", select);
}

/// Stack effect: ( a b -- a&&b )
fn and(ctx: &mut Context) -> bool {
    let b = match ctx.pop_boolean() {
        Some(v) => v,
        None => return false,
    };
    let a = match ctx.pop_boolean() {
        Some(v) => v,
        None => {
            ctx.push(ctx.runtime.boolean(b));
            return false;
        }
    };
    ctx.push(ctx.runtime.boolean(a && b));
    true
}

/// Stack effect: ( a b -- a||b )
fn or(ctx: &mut Context) -> bool {
    let b = match ctx.pop_boolean() {
        Some(v) => v,
        None => return false,
    };
    let a = match ctx.pop_boolean() {
        Some(v) => v,
        None => {
            ctx.push(ctx.runtime.boolean(b));
            return false;
        }
    };
    ctx.push(ctx.runtime.boolean(a || b));
    true
}

/// Stack effect: ( a b -- a^b )
fn xor(ctx: &mut Context) -> bool {
    let b = match ctx.pop_boolean() {
        Some(v) => v,
        None => return false,
    };
    let a = match ctx.pop_boolean() {
        Some(v) => v,
        None => {
            ctx.push(ctx.runtime.boolean(b));
            return false;
        }
    };
    ctx.push(ctx.runtime.boolean(a != b));
    true
}

/// Stack effect: ( a -- !a )
fn not(ctx: &mut Context) -> bool {
    let a = match ctx.pop_boolean() {
        Some(v) => v,
        None => return false,
    };
    ctx.push(ctx.runtime.boolean(!a));
    true
}

/// Ternary select. Stack effect: ( a b cond -- a if cond else b )
fn select(ctx: &mut Context) -> bool {
    let cond = match ctx.pop_boolean() {
        Some(v) => v,
        None => return false,
    };
    let b = match ctx.pop() {
        Some(v) => v,
        None => {
            ctx.push(ctx.runtime.boolean(cond));
            return false;
        }
    };
    let a = match ctx.pop() {
        Some(v) => v,
        None => {
            ctx.push(b);
            ctx.push(ctx.runtime.boolean(cond));
            return false;
        }
    };
    ctx.push(if cond { a } else { b });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Runtime;
    use crate::value::Number;

    #[test]
    fn and_or_not_chain_combines_correctly() {
        let mut ctx = Context::new(Runtime::new(false));
        ctx.push(Value::Boolean(true));
        ctx.push(Value::Boolean(false));
        assert!(and(&mut ctx));
        assert!(matches!(ctx.peek(), Some(Value::Boolean(false))));
        assert!(not(&mut ctx));
        assert!(matches!(ctx.peek(), Some(Value::Boolean(true))));
    }

    #[test]
    fn select_restores_stack_on_missing_operand() {
        let mut ctx = Context::new(Runtime::new(false));
        ctx.push(Value::Number(Number::Int(1)));
        ctx.push(Value::Boolean(true));
        assert!(!select(&mut ctx));
        assert_eq!(ctx.stack.len(), 2, "both operands must be restored");
    }
}
