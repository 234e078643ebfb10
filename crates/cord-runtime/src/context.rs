//! The execution context: the data stack, the local dictionary, the pending error
//! slot, and the evaluation algorithm.

use std::rc::Rc;

use cord_core::CordError;

use crate::dictionary::{resolve_and_invoke, resolve_value, Dictionary};
use crate::object::ObjectData;
use crate::runtime::Runtime;
use crate::value::{Number, QuoteBody, Value, WordData};

/// Per-execution interpreter state.
pub struct Context {
    pub stack: Vec<Value>,
    pub dictionary: Dictionary,
    error: Option<CordError>,
    pub runtime: Rc<Runtime>,
}

impl Context {
    pub fn new(runtime: Rc<Runtime>) -> Self {
        Context {
            stack: Vec::new(),
            dictionary: Dictionary::new(),
            error: None,
            runtime,
        }
    }

    /// A fresh context that shares this context's runtime, used by the module
    /// loader to evaluate an imported file in isolation.
    pub fn child(&self) -> Self {
        Context::new(Rc::clone(&self.runtime))
    }

    // -- stack primitives ---------------------------------------------------

    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    pub fn pop(&mut self) -> Option<Value> {
        match self.stack.pop() {
            Some(v) => Some(v),
            None => {
                self.set_error(CordError::range("stack underflow"));
                None
            }
        }
    }

    pub fn peek(&self) -> Option<&Value> {
        self.stack.last()
    }

    /// A typed pop only removes the top of the stack when it matches; on a kind
    /// mismatch the stack is left untouched and a `type` error is raised.
    fn pop_typed<T>(&mut self, extract: impl Fn(&Value) -> Option<T>, expected: &str) -> Option<T> {
        match self.stack.last() {
            Some(v) => match extract(v) {
                Some(extracted) => {
                    self.stack.pop();
                    Some(extracted)
                }
                None => {
                    let found = v.kind().as_str();
                    self.set_error(CordError::type_error(format!(
                        "expected {expected}, found {found}"
                    )));
                    None
                }
            },
            None => {
                self.set_error(CordError::range("stack underflow"));
                None
            }
        }
    }

    pub fn pop_boolean(&mut self) -> Option<bool> {
        self.pop_typed(
            |v| if let Value::Boolean(b) = v { Some(*b) } else { None },
            "boolean",
        )
    }

    pub fn pop_number(&mut self) -> Option<Number> {
        self.pop_typed(
            |v| if let Value::Number(n) = v { Some(*n) } else { None },
            "number",
        )
    }

    pub fn pop_string(&mut self) -> Option<Rc<str>> {
        self.pop_typed(
            |v| if let Value::String(s) = v { Some(Rc::clone(s)) } else { None },
            "string",
        )
    }

    pub fn pop_array(&mut self) -> Option<Rc<[Value]>> {
        self.pop_typed(
            |v| if let Value::Array(a) = v { Some(Rc::clone(a)) } else { None },
            "array",
        )
    }

    pub fn pop_object(&mut self) -> Option<Rc<ObjectData>> {
        self.pop_typed(
            |v| if let Value::Object(o) = v { Some(Rc::clone(o)) } else { None },
            "object",
        )
    }

    pub fn pop_quote(&mut self) -> Option<Value> {
        self.pop_typed(
            |v| if matches!(v, Value::Quote(_)) { Some(v.clone()) } else { None },
            "quote",
        )
    }

    pub fn pop_symbol(&mut self) -> Option<Rc<crate::value::SymbolData>> {
        self.pop_typed(
            |v| if let Value::Symbol(s) = v { Some(Rc::clone(s)) } else { None },
            "symbol",
        )
    }

    pub fn pop_word(&mut self) -> Option<Rc<WordData>> {
        self.pop_typed(
            |v| if let Value::Word(w) = v { Some(Rc::clone(w)) } else { None },
            "word",
        )
    }

    pub fn pop_error(&mut self) -> Option<Rc<CordError>> {
        self.pop_typed(
            |v| if let Value::Error(e) = v { Some(Rc::clone(e)) } else { None },
            "error",
        )
    }

    // -- error slot -----------------------------------------------------------

    pub fn set_error(&mut self, error: CordError) {
        self.error = Some(error);
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn current_error(&self) -> Option<&CordError> {
        self.error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn take_error(&mut self) -> Option<CordError> {
        self.error.take()
    }

    // -- evaluation ------------------------------------------------------------

    /// Run a compiled or native quote. Returns `false` as soon as a child fails
    /// or a pending error is observed, without running the remaining children —
    /// this loop is the sole unwind point for a pending error.
    pub fn call(&mut self, quote: &Value) -> bool {
        let Value::Quote(data) = quote else {
            self.set_error(CordError::type_error(format!(
                "expected quote, found {}",
                quote.kind().as_str()
            )));
            return false;
        };
        match &data.body {
            QuoteBody::Native(f) => f(self),
            QuoteBody::Compiled(children) => {
                let children = Rc::clone(children);
                for child in children.iter() {
                    if self.has_error() {
                        return false;
                    }
                    if !exec(self, child) {
                        return false;
                    }
                }
                true
            }
        }
    }
}

/// Execute `value`: resolve-and-invoke a bare symbol, install a word definition,
/// or evaluate anything else and push the result.
pub fn exec(ctx: &mut Context, value: &Value) -> bool {
    match value {
        Value::Symbol(sym) => resolve_and_invoke(ctx, sym),
        Value::Word(_) => {
            ctx.dictionary.define(value.clone());
            true
        }
        other => match eval(ctx, other) {
            Some(result) => {
                ctx.push(result);
                true
            }
            None => false,
        },
    }
}

/// Evaluate `value` to its referent without invoking a word: a symbol resolves
/// to whatever it's bound to, arrays and objects evaluate element-wise, and
/// everything else is returned as-is.
///
/// Returns `None` when evaluation fails; the context's error slot is guaranteed
/// to be set in that case.
pub fn eval(ctx: &mut Context, value: &Value) -> Option<Value> {
    match value {
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items.iter() {
                out.push(eval(ctx, item)?);
            }
            Some(Value::Array(Rc::from(out)))
        }
        Value::Object(data) => {
            let mut pairs = Vec::with_capacity(data.len());
            for key in data.keys() {
                let property = data.get_own(&key).expect("key came from this object's own keys");
                let evaluated = eval(ctx, &property)?;
                pairs.push((key, evaluated));
            }
            Some(Value::Object(Rc::new(ObjectData::from_pairs(pairs))))
        }
        Value::Symbol(sym) => resolve_value(ctx, sym),
        Value::Word(_) => {
            ctx.set_error(CordError::syntax(
                "word definitions are statements, not expressions",
            ));
            None
        }
        other => Some(other.clone()),
    }
}

/// Install `word`: always succeeds and overwrites any previous definition under
/// the same identifier. Exposed for the parser/compiler's host integration
/// tests; `exec` already calls this for every `Value::Word` it sees.
pub fn define_word(ctx: &mut Context, symbol: Value, quote: Value) {
    let word = Value::Word(Rc::new(WordData { symbol, quote }));
    ctx.dictionary.define(word);
}
