//! Array prototype: `length` (element access lives on the number prototype,
//! see `super::number`, since dispatch keys off the index on top of the
//! stack).

use crate::context::Context;
use crate::value::{Number, Value};

use super::define;

pub fn install(proto: &Value) {
    define(proto, "length", length);
}

/// Stack effect: ( array -- length )
fn length(ctx: &mut Context) -> bool {
    let array = match ctx.pop_array() {
        Some(v) => v,
        None => return false,
    };
    ctx.push(Value::Number(Number::Int(array.len() as i64)));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Runtime;
    use std::rc::Rc;

    #[test]
    fn length_counts_elements() {
        let mut ctx = Context::new(Runtime::new(false));
        let array = Value::Array(Rc::from(vec![
            Value::Number(Number::Int(1)),
            Value::Number(Number::Int(2)),
            Value::Number(Number::Int(3)),
        ]));
        ctx.push(array);
        assert!(length(&mut ctx));
        assert!(matches!(ctx.peek(), Some(Value::Number(Number::Int(3)))));
    }
}
