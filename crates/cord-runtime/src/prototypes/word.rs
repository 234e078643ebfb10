//! Word prototype: `symbol`, `quote`, `call`, `define`.

use crate::context::Context;
use crate::value::Value;

use super::define as define_native;

pub fn install(proto: &Value) {
    define_native(proto, "symbol", symbol);
    define_native(proto, "quote", quote);
    define_native(proto, "call", call);
    define_native(proto, "define", define);
}

/// Stack effect: ( word -- symbol )
fn symbol(ctx: &mut Context) -> bool {
    let word = match ctx.pop_word() {
        Some(v) => v,
        None => return false,
    };
    ctx.push(word.symbol.clone());
    true
}

/// Stack effect: ( word -- quote )
fn quote(ctx: &mut Context) -> bool {
    let word = match ctx.pop_word() {
        Some(v) => v,
        None => return false,
    };
    ctx.push(word.quote.clone());
    true
}

/// Stack effect: ( word -- ... )
///
/// Invokes the word's quote directly, bypassing dictionary resolution; useful
/// once a word value has been built or fetched rather than encountered as a
/// bare token.
fn call(ctx: &mut Context) -> bool {
    let word = match ctx.pop_word() {
        Some(v) => v,
        None => return false,
    };
    ctx.call(&word.quote)
}

/// Stack effect: ( word -- )
///
/// Installs `word` into the local dictionary under its symbol's identifier,
/// the same effect `exec` already gives a bare `Value::Word` token — exposed
/// explicitly for word values built or fetched at runtime.
fn define(ctx: &mut Context) -> bool {
    let word = match ctx.pop_word() {
        Some(v) => v,
        None => return false,
    };
    ctx.dictionary.define(Value::Word(word));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Runtime;
    use crate::value::{Number, QuoteData, SymbolData, WordData};
    use std::rc::Rc;

    fn sample_word() -> Rc<WordData> {
        Rc::new(WordData {
            symbol: Value::Symbol(Rc::new(SymbolData::new("answer", None))),
            quote: Value::Quote(Rc::new(QuoteData::compiled(Rc::from(vec![Value::Number(
                Number::Int(42),
            )])))),
        })
    }

    #[test]
    fn symbol_and_quote_project_the_two_fields() {
        let mut ctx = Context::new(Runtime::new(false));
        ctx.push(Value::Word(sample_word()));
        assert!(symbol(&mut ctx));
        assert!(matches!(ctx.peek(), Some(Value::Symbol(_))));

        let mut ctx = Context::new(Runtime::new(false));
        ctx.push(Value::Word(sample_word()));
        assert!(quote(&mut ctx));
        assert!(matches!(ctx.peek(), Some(Value::Quote(_))));
    }

    #[test]
    fn call_runs_the_word_quote_directly() {
        let mut ctx = Context::new(Runtime::new(false));
        ctx.push(Value::Word(sample_word()));
        assert!(call(&mut ctx));
        assert!(matches!(ctx.peek(), Some(Value::Number(Number::Int(42)))));
    }

    #[test]
    fn define_installs_into_the_local_dictionary() {
        let mut ctx = Context::new(Runtime::new(false));
        ctx.push(Value::Word(sample_word()));
        assert!(define(&mut ctx));
        assert!(ctx.dictionary.contains("answer"));
    }
}
