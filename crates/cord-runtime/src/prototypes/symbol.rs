//! Symbol prototype: `call`, `position`.

use std::rc::Rc;

use crate::context::Context;
use crate::dictionary::resolve_and_invoke;
use crate::object::ObjectData;
use crate::value::{Number, Value};

use super::define;

pub fn install(proto: &Value) {
    define(proto, "call", call);
    define(proto, "position", position);
}

/// Stack effect: ( symbol -- ... )
///
/// Pops the symbol and resolves it through the same five-step algorithm `exec`
/// uses for a bare symbol token, so `\foo call` and a literal `foo` behave
/// identically.
fn call(ctx: &mut Context) -> bool {
    let symbol = match ctx.pop_symbol() {
        Some(v) => v,
        None => return false,
    };
    resolve_and_invoke(ctx, &symbol)
}

/// Stack effect: ( symbol -- position|null )
fn position(ctx: &mut Context) -> bool {
    let symbol = match ctx.pop_symbol() {
        Some(v) => v,
        None => return false,
    };
    match symbol.position.borrow().clone() {
        Some(pos) => {
            let pairs = vec![
                (Rc::from("filename"), Value::String(Rc::from(&*pos.filename))),
                (Rc::from("line"), Value::Number(Number::Int(pos.line as i64))),
                (Rc::from("column"), Value::Number(Number::Int(pos.column as i64))),
            ];
            ctx.push(Value::Object(Rc::new(ObjectData::from_pairs(pairs))));
        }
        None => ctx.push(Value::Null),
    }
    true
}
