//! The built-in prototype library.
//!
//! Each prototype object is populated at runtime start-up with a fixed set of
//! native quotes: the minimum required words for `boolean`, `error`, `symbol`
//! and `word`, plus a handful of demonstrative numeric/string/array/collection
//! words needed to make ordinary programs runnable (`+`, comparisons,
//! `length`, `@`, `call`). The rest of each type's standard library is an
//! out-of-scope external collaborator; see `DESIGN.md` at the workspace root
//! for the exact boundary and the reasoning behind each addition.

mod array;
mod boolean;
mod error;
mod null;
mod number;
mod object;
mod quote;
mod string;
mod symbol;
mod word;

use std::rc::Rc;

use crate::value::{NativeFn, QuoteData, Value};

use crate::runtime::PrototypeRegistry;

/// Install a native word named `name` onto prototype object `proto`.
fn define(proto: &Value, name: &str, f: NativeFn) {
    let Value::Object(data) = proto else {
        panic!("prototype objects are always Value::Object");
    };
    let quote = Value::Quote(Rc::new(QuoteData::native(f)));
    data.set(Rc::from(name), quote);
}

pub fn install_all(registry: &PrototypeRegistry) {
    boolean::install(&registry.boolean);
    error::install(&registry.error);
    symbol::install(&registry.symbol);
    word::install(&registry.word);
    number::install(&registry.number);
    string::install(&registry.string);
    array::install(&registry.array);
    quote::install(&registry.quote);
    object::install(&registry.root_object);
    null::install(&registry.null);
}
