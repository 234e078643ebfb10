//! Error prototype: `code`, `message`, `position`, `throw`.

use std::rc::Rc;

use crate::context::Context;
use crate::object::ObjectData;
use crate::value::{Number, Value};

use super::define;

pub fn install(proto: &Value) {
    define(proto, "code", code);
    define(proto, "message", message);
    define(proto, "position", position);
    define(proto, "throw", throw);
}

/// Stack effect: ( error -- string )
fn code(ctx: &mut Context) -> bool {
    let error = match ctx.pop_error() {
        Some(v) => v,
        None => return false,
    };
    ctx.push(Value::String(Rc::from(error.code.as_str())));
    true
}

/// Stack effect: ( error -- string )
fn message(ctx: &mut Context) -> bool {
    let error = match ctx.pop_error() {
        Some(v) => v,
        None => return false,
    };
    ctx.push(Value::String(Rc::from(error.message.as_str())));
    true
}

/// Stack effect: ( error -- position|null )
///
/// There is no dedicated `Value` variant for a source position, so a present
/// position is rendered as an object with `filename`, `line` and `column`
/// properties; an absent one pushes `null`.
fn position(ctx: &mut Context) -> bool {
    let error = match ctx.pop_error() {
        Some(v) => v,
        None => return false,
    };
    match &error.position {
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

/// Stack effect: ( error -- ), context error slot set
///
/// Always fails: raising the popped error is the whole point, and `call`'s
/// child loop aborts as soon as this native quote returns `false`.
fn throw(ctx: &mut Context) -> bool {
    let error = match ctx.pop_error() {
        Some(v) => v,
        None => return false,
    };
    ctx.set_error((*error).clone());
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Runtime;
    use cord_core::CordError;

    #[test]
    fn code_and_message_read_back_the_error() {
        let mut ctx = Context::new(Runtime::new(false));
        ctx.push(Value::Error(Rc::new(CordError::range("stack underflow"))));
        assert!(code(&mut ctx));
        assert!(matches!(ctx.peek(), Some(Value::String(s)) if &**s == "range"));

        let mut ctx = Context::new(Runtime::new(false));
        ctx.push(Value::Error(Rc::new(CordError::range("stack underflow"))));
        assert!(message(&mut ctx));
        assert!(matches!(ctx.peek(), Some(Value::String(s)) if &**s == "stack underflow"));
    }

    #[test]
    fn position_is_null_when_absent() {
        let mut ctx = Context::new(Runtime::new(false));
        ctx.push(Value::Error(Rc::new(CordError::range("stack underflow"))));
        assert!(position(&mut ctx));
        assert!(matches!(ctx.peek(), Some(Value::Null)));
    }

    #[test]
    fn throw_sets_the_error_slot_and_fails() {
        let mut ctx = Context::new(Runtime::new(false));
        ctx.push(Value::Error(Rc::new(CordError::value_error("bad value"))));
        assert!(!throw(&mut ctx));
        assert_eq!(ctx.current_error().unwrap().code, cord_core::ErrorCode::Value);
        assert!(ctx.stack.is_empty());
    }
}
