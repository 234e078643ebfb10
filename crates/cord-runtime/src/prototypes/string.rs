//! String prototype: `+`, `@`, `length`.

use std::rc::Rc;

use cord_core::CordError;

use crate::context::Context;
use crate::object::{lookup_chain, PrototypeLookup};
use crate::value::{Number, Value};

use super::define;

pub fn install(proto: &Value) {
    define(proto, "+", concat);
    define(proto, "@", property);
    define(proto, "length", length);
}

/// Stack effect: ( a b -- ab )
fn concat(ctx: &mut Context) -> bool {
    let b = match ctx.pop_string() {
        Some(v) => v,
        None => return false,
    };
    let a = match ctx.pop_string() {
        Some(v) => v,
        None => {
            ctx.push(Value::String(b));
            return false;
        }
    };
    let mut joined = String::with_capacity(a.len() + b.len());
    joined.push_str(&a);
    joined.push_str(&b);
    ctx.push(Value::String(Rc::from(joined)));
    true
}

/// Stack effect: ( object key -- value )
///
/// Dispatches on the key's string prototype (resolution against the stack top
/// picks up the key, not the object underneath it); walks the object's
/// `__proto__` chain the same way implicit word dispatch does, so a missing own
/// property still finds an inherited one.
fn property(ctx: &mut Context) -> bool {
    let key = match ctx.pop_string() {
        Some(v) => v,
        None => return false,
    };
    let object = match ctx.pop_object() {
        Some(v) => v,
        None => {
            ctx.push(Value::String(key));
            return false;
        }
    };
    match lookup_chain(&Value::Object(Rc::clone(&object)), &key, &ctx.runtime) {
        PrototypeLookup::Found(value) => {
            ctx.push(value);
            true
        }
        PrototypeLookup::NotFound => {
            let err = CordError::reference(format!("no such property: {key}"));
            ctx.push(Value::Object(object));
            ctx.push(Value::String(key));
            ctx.set_error(err);
            false
        }
        PrototypeLookup::CycleOverflow => {
            let err = CordError::range("prototype chain too deep");
            ctx.push(Value::Object(object));
            ctx.push(Value::String(key));
            ctx.set_error(err);
            false
        }
    }
}

/// Stack effect: ( string -- length )
///
/// Counts Unicode scalar values, matching the parser's character-based
/// string model rather than UTF-8 byte length.
fn length(ctx: &mut Context) -> bool {
    let s = match ctx.pop_string() {
        Some(v) => v,
        None => return false,
    };
    ctx.push(Value::Number(Number::Int(s.chars().count() as i64)));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectData;
    use crate::runtime::Runtime;

    #[test]
    fn concat_joins_two_strings() {
        let mut ctx = Context::new(Runtime::new(false));
        ctx.push(Value::String(Rc::from("foo")));
        ctx.push(Value::String(Rc::from("bar")));
        assert!(concat(&mut ctx));
        assert!(matches!(ctx.peek(), Some(Value::String(s)) if &**s == "foobar"));
    }

    #[test]
    fn length_counts_scalar_values() {
        let mut ctx = Context::new(Runtime::new(false));
        ctx.push(Value::String(Rc::from("caf\u{e9}")));
        assert!(length(&mut ctx));
        assert!(matches!(ctx.peek(), Some(Value::Number(Number::Int(4)))));
    }

    #[test]
    fn property_finds_own_and_inherited_keys() {
        let mut ctx = Context::new(Runtime::new(false));
        let object = Rc::new(ObjectData::new());
        object.set(Rc::from("name"), Value::String(Rc::from("cord")));
        ctx.push(Value::Object(object));
        ctx.push(Value::String(Rc::from("name")));
        assert!(property(&mut ctx));
        assert!(matches!(ctx.peek(), Some(Value::String(s)) if &**s == "cord"));
    }

    #[test]
    fn missing_property_restores_both_operands() {
        let mut ctx = Context::new(Runtime::new(false));
        let object = Rc::new(ObjectData::new());
        ctx.push(Value::Object(object));
        ctx.push(Value::String(Rc::from("missing")));
        assert!(!property(&mut ctx));
        assert_eq!(ctx.current_error().unwrap().code, cord_core::ErrorCode::Reference);
        assert_eq!(ctx.stack.len(), 2);
    }
}
