//! Root object prototype.
//!
//! Property access (`@`) dispatches on the *key's* prototype (see
//! `super::string`/`super::number`) rather than the object's, so the root
//! object prototype itself only needs to supply the one demonstrative word a
//! user-level standard library could not otherwise express: listing an
//! object's own keys.

use std::rc::Rc;

use crate::context::Context;
use crate::value::Value;

use super::define;

pub fn install(proto: &Value) {
    define(proto, "keys", keys);
}

/// Stack effect: ( object -- array )
fn keys(ctx: &mut Context) -> bool {
    let object = match ctx.pop_object() {
        Some(v) => v,
        None => return false,
    };
    let keys: Vec<Value> = object
        .keys()
        .into_iter()
        .map(Value::String)
        .collect();
    ctx.push(Value::Array(Rc::from(keys)));
    true
}
