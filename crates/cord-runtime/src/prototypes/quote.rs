//! Quote prototype: `call`.

use crate::context::Context;
use crate::value::Value;

use super::define;

pub fn install(proto: &Value) {
    define(proto, "call", call);
}

/// Stack effect: ( quote -- ... )
fn call(ctx: &mut Context) -> bool {
    let quote = match ctx.pop_quote() {
        Some(v) => v,
        None => return false,
    };
    ctx.call(&quote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Runtime;
    use crate::value::{Number, QuoteData};
    use std::rc::Rc;

    #[test]
    fn call_runs_a_compiled_quote() {
        let mut ctx = Context::new(Runtime::new(false));
        let quote = Value::Quote(Rc::new(QuoteData::compiled(Rc::from(vec![Value::Number(
            Number::Int(7),
        )]))));
        ctx.push(quote);
        assert!(call(&mut ctx));
        assert!(matches!(ctx.peek(), Some(Value::Number(Number::Int(7)))));
    }
}
