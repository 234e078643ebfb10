//! Lowers a token tree into the value tree `Context::call` executes.
//!
//! Each token maps to exactly one value, with no further structural change;
//! all the interesting work — number parsing, dictionary lookups — happens
//! later, during execution.

use std::rc::Rc;

use cord_runtime::{ObjectData, QuoteData, Runtime, Value, WordData};

use crate::token::{Token, TokenKind};

/// Compile a top-level token sequence (an already-parsed script or quote body)
/// into the values a compiled quote's body holds.
pub fn compile(tokens: &[Token], runtime: &Runtime) -> Vec<Value> {
    tokens.iter().map(|t| compile_token(t, runtime)).collect()
}

fn compile_token(token: &Token, runtime: &Runtime) -> Value {
    match &token.kind {
        TokenKind::Array(elements) => {
            let values: Vec<Value> = elements.iter().map(|t| compile_token(t, runtime)).collect();
            Value::Array(Rc::from(values))
        }
        TokenKind::Object(properties) => {
            let pairs: Vec<(Rc<str>, Value)> = properties
                .iter()
                .map(|(key, value)| (Rc::clone(key), compile_token(value, runtime)))
                .collect();
            Value::Object(Rc::new(ObjectData::from_pairs(pairs)))
        }
        TokenKind::Quote(children) => {
            let values: Vec<Value> = children.iter().map(|t| compile_token(t, runtime)).collect();
            Value::Quote(Rc::new(QuoteData::compiled(Rc::from(values))))
        }
        TokenKind::String(s) => Value::String(Rc::clone(s)),
        TokenKind::Symbol(id) => {
            Value::Symbol(runtime.make_symbol(Rc::clone(id), Some(token.position.clone())))
        }
        TokenKind::Word {
            symbol,
            symbol_position,
            body,
        } => {
            let symbol_value = Value::Symbol(
                runtime.make_symbol(Rc::clone(symbol), Some(symbol_position.clone())),
            );
            let body_values: Vec<Value> = body.iter().map(|t| compile_token(t, runtime)).collect();
            let quote = Value::Quote(Rc::new(QuoteData::compiled(Rc::from(body_values))));
            Value::Word(Rc::new(WordData {
                symbol: symbol_value,
                quote,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use cord_runtime::value::QuoteBody;

    fn compile_source(source: &str) -> (Vec<Value>, Rc<Runtime>) {
        let runtime = Runtime::new(false);
        let tokens = Parser::new(source, "<test>").parse().expect("parses");
        (compile(&tokens, &runtime), runtime)
    }

    #[test]
    fn bare_numeral_compiles_to_a_symbol_not_a_number() {
        let (values, _runtime) = compile_source("42");
        assert!(matches!(&values[0], Value::Symbol(s) if &*s.identifier == "42"));
    }

    #[test]
    fn quote_compiles_to_a_compiled_quote_value() {
        let (values, _runtime) = compile_source("( 1 2 + )");
        match &values[0] {
            Value::Quote(q) => match &q.body {
                QuoteBody::Compiled(children) => assert_eq!(children.len(), 3),
                _ => panic!("expected a compiled quote"),
            },
            _ => panic!("expected a quote value"),
        }
    }

    #[test]
    fn array_elements_compile_in_order() {
        let (values, _runtime) = compile_source("[1, 2]");
        match &values[0] {
            Value::Array(items) => {
                assert_eq!(items.len(), 2);
                assert!(matches!(&items[0], Value::Symbol(s) if &*s.identifier == "1"));
            }
            _ => panic!("expected an array value"),
        }
    }

    #[test]
    fn word_definition_compiles_to_a_word_value() {
        let (values, _runtime) = compile_source(": double dup + ;");
        match &values[0] {
            Value::Word(word) => {
                assert!(matches!(&word.symbol, Value::Symbol(s) if &*s.identifier == "double"));
                match &word.quote {
                    Value::Quote(q) => match &q.body {
                        QuoteBody::Compiled(children) => assert_eq!(children.len(), 2),
                        _ => panic!("expected a compiled quote body"),
                    },
                    _ => panic!("expected a quote"),
                }
            }
            _ => panic!("expected a word value"),
        }
    }

    #[test]
    fn interning_shares_equal_identifier_symbols_across_the_tree() {
        let runtime = Runtime::new(true);
        let tokens = Parser::new("foo foo", "<test>").parse().expect("parses");
        let values = compile(&tokens, &runtime);
        match (&values[0], &values[1]) {
            (Value::Symbol(a), Value::Symbol(b)) => assert!(Rc::ptr_eq(a, b)),
            _ => panic!("expected two symbols"),
        }
    }
}
