//! Dictionaries and symbol resolution.

use std::collections::HashMap;
use std::rc::Rc;

use cord_core::CordError;
use tracing::debug;

use crate::context::Context;
use crate::object::{lookup_chain, PrototypeLookup};
use crate::value::{SymbolData, Value};

/// An ordered-by-insertion mapping from identifier to word. A context's local
/// dictionary shadows the runtime's global dictionary.
#[derive(Default)]
pub struct Dictionary {
    words: HashMap<Rc<str>, Value>,
}

impl Dictionary {
    pub fn new() -> Self {
        Dictionary {
            words: HashMap::new(),
        }
    }

    /// Install `word` (a `Value::Word`) under its symbol's identifier, overwriting
    /// any previous entry.
    pub fn define(&mut self, word: Value) {
        if let Value::Word(data) = &word {
            if let Value::Symbol(sym) = &data.symbol {
                self.words.insert(Rc::clone(&sym.identifier), word.clone());
            }
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&Value> {
        self.words.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.words.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Rc<str>, &Value)> {
        self.words.iter()
    }
}

/// Parse a bare identifier as a numeric literal: optional sign, decimal digits,
/// optional single `.` fractional part. Scientific notation and underscore
/// separators are deliberately not recognized.
pub fn parse_numeric_literal(identifier: &str) -> Option<crate::value::Number> {
    let bytes = identifier.as_bytes();
    if bytes.is_empty() {
        return None;
    }

    let mut i = 0;
    if bytes[i] == b'+' || bytes[i] == b'-' {
        i += 1;
    }
    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == digits_start {
        return None;
    }

    let mut is_real = false;
    if i < bytes.len() && bytes[i] == b'.' {
        is_real = true;
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == frac_start {
            return None; // a trailing lone '.' is not a valid numeric literal
        }
    }

    if i != bytes.len() {
        return None;
    }

    if is_real {
        identifier.parse::<f64>().ok().map(crate::value::Number::Real)
    } else {
        identifier.parse::<i64>().ok().map(crate::value::Number::Int)
    }
}

/// The full five-step symbol resolution algorithm invoked whenever `exec`
/// encounters a `Value::Symbol`.
pub fn resolve_and_invoke(ctx: &mut Context, symbol: &Rc<SymbolData>) -> bool {
    let identifier = Rc::clone(&symbol.identifier);

    // Step 1: stack-top prototype dispatch, without first popping `top`.
    if let Some(top) = ctx.stack.last().cloned() {
        let proto = top.prototype(&ctx.runtime);
        if let PrototypeLookup::Found(member) = lookup_chain(&proto, &identifier, &ctx.runtime) {
            match &member {
                Value::Quote(_) => return ctx.call(&member),
                Value::Word(word) => return ctx.call(&word.quote),
                _ => {} // not invocable: fall through to the remaining steps
            }
        }
    }

    // Step 2: local dictionary.
    if let Some(Value::Word(word)) = ctx.dictionary.get(&identifier).cloned() {
        return ctx.call(&word.quote);
    }

    // Step 3: global dictionary.
    let global_hit = ctx
        .runtime
        .global_dictionary
        .borrow()
        .get(&identifier)
        .cloned();
    if let Some(Value::Word(word)) = global_hit {
        return ctx.call(&word.quote);
    }

    // Step 4: numeric literal fallback.
    if let Some(n) = parse_numeric_literal(&identifier) {
        ctx.push(Value::Number(n));
        return true;
    }

    // Step 5: unresolved.
    debug!(%identifier, "word resolution exhausted all five steps");
    let position = symbol.position.borrow().clone();
    let mut err = CordError::reference(format!("unresolved word: {identifier}"));
    if let Some(pos) = position {
        err = err.with_position(pos);
    }
    ctx.set_error(err);
    false
}

/// Resolve `identifier` to its bound value *without* invoking it: used by
/// `eval` when a bare symbol appears in value position, e.g. inside an array or
/// object literal — symbols resolve to their referent without executing it.
pub fn resolve_value(ctx: &mut Context, symbol: &Rc<SymbolData>) -> Option<Value> {
    let identifier = &symbol.identifier;

    if let Some(Value::Word(word)) = ctx.dictionary.get(identifier).cloned() {
        return Some(word.quote.clone());
    }
    let global_hit = ctx.runtime.global_dictionary.borrow().get(identifier).cloned();
    if let Some(Value::Word(word)) = global_hit {
        return Some(word.quote.clone());
    }
    if let Some(n) = parse_numeric_literal(identifier) {
        return Some(Value::Number(n));
    }

    let position = symbol.position.borrow().clone();
    let mut err = CordError::reference(format!("unresolved word: {identifier}"));
    if let Some(pos) = position {
        err = err.with_position(pos);
    }
    ctx.set_error(err);
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_signed_integers_and_reals() {
        assert!(matches!(
            parse_numeric_literal("42"),
            Some(crate::value::Number::Int(42))
        ));
        assert!(matches!(
            parse_numeric_literal("-7"),
            Some(crate::value::Number::Int(-7))
        ));
        assert!(matches!(
            parse_numeric_literal("3.5"),
            Some(crate::value::Number::Real(r)) if r == 3.5
        ));
        assert!(matches!(parse_numeric_literal("+2.0"), Some(crate::value::Number::Real(_))));
    }

    #[test]
    fn rejects_non_numeric_identifiers() {
        assert!(parse_numeric_literal("foo").is_none());
        assert!(parse_numeric_literal("1e9").is_none());
        assert!(parse_numeric_literal("1_000").is_none());
        assert!(parse_numeric_literal("3.").is_none());
        assert!(parse_numeric_literal(".5").is_none());
        assert!(parse_numeric_literal("").is_none());
    }
}
