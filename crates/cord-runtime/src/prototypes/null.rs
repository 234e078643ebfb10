//! Null prototype: intentionally empty. `null` carries no payload and has no
//! minimum words of its own; the reserved slot keeps `null` addressable
//! through the same prototype-dispatch machinery as every other kind, ready
//! for the out-of-scope standard library to extend.

use crate::value::Value;

pub fn install(_proto: &Value) {}
