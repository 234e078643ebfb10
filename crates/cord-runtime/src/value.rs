//! The Cord value model.
//!
//! A `Value` is a small, cheaply-cloned tagged union. Every variant that owns
//! non-trivial data stores it behind an `Rc`, so cloning a `Value` is always a
//! reference-count bump rather than a deep copy — this is what makes container
//! values (arrays, objects, compiled quotes, words) immutable after
//! construction and aliased only through reference-counted handles, without
//! hand-rolling reference counting.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;

use cord_core::{CordError, Position};

use crate::object::ObjectData;
use crate::runtime::Runtime;

/// A numeric value: either a 64-bit signed integer or a 64-bit IEEE-754 double.
/// Which variant is in play is always tracked; conversion between them is explicit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Real(f64),
}

impl Number {
    pub fn as_real(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Real(r) => r,
        }
    }

    pub fn as_int(self) -> i64 {
        match self {
            Number::Int(n) => n,
            Number::Real(r) => r as i64,
        }
    }

    pub fn is_int(self) -> bool {
        matches!(self, Number::Int(_))
    }

    /// Numeric equality compares by value across the integer/real divide.
    pub fn numeric_eq(self, other: Number) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            _ => self.as_real() == other.as_real(),
        }
    }

    pub fn to_display_string(self) -> String {
        match self {
            Number::Int(n) => n.to_string(),
            Number::Real(r) => {
                let mut s = format!("{}", r);
                if !s.contains('.') && !s.contains('e') && !s.contains("inf") && !s.contains("NaN")
                {
                    s.push_str(".0");
                }
                s
            }
        }
    }
}

/// The body of a quote: either a native function or a sequence of compiled children.
#[derive(Clone)]
pub enum QuoteBody {
    /// A built-in operation implemented in Rust. Returns `true` on success; on
    /// failure it must have set the context's error slot before returning `false`.
    Native(NativeFn),
    /// A quotation compiled from source: its children are executed in order by
    /// `Context::call`.
    Compiled(Rc<[Value]>),
}

pub type NativeFn = fn(&mut crate::context::Context) -> bool;

#[derive(Clone)]
pub struct QuoteData {
    pub body: QuoteBody,
}

impl QuoteData {
    pub fn native(f: NativeFn) -> Self {
        QuoteData {
            body: QuoteBody::Native(f),
        }
    }

    pub fn compiled(children: Rc<[Value]>) -> Self {
        QuoteData {
            body: QuoteBody::Compiled(children),
        }
    }
}

/// A symbol: an identifier, plus (unless it has been interned away) the position it
/// was parsed at.
pub struct SymbolData {
    pub identifier: Rc<str>,
    pub position: RefCell<Option<Position>>,
}

impl SymbolData {
    pub fn new(identifier: impl Into<Rc<str>>, position: Option<Position>) -> Self {
        SymbolData {
            identifier: identifier.into(),
            position: RefCell::new(position),
        }
    }
}

/// A word: a named procedure, pairing a symbol with the quote it installs.
pub struct WordData {
    pub symbol: Value,
    pub quote: Value,
}

/// The tagged union of every runtime value.
#[derive(Clone)]
pub enum Value {
    Null,
    Boolean(bool),
    Number(Number),
    String(Rc<str>),
    Array(Rc<[Value]>),
    Object(Rc<ObjectData>),
    Symbol(Rc<SymbolData>),
    Quote(Rc<QuoteData>),
    Word(Rc<WordData>),
    Error(Rc<CordError>),
}

/// The variant tag of a `Value`, returned by `Value::kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
    Symbol,
    Quote,
    Word,
    Error,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
            ValueKind::Symbol => "symbol",
            ValueKind::Quote => "quote",
            ValueKind::Word => "word",
            ValueKind::Error => "error",
        }
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
            Value::Symbol(_) => ValueKind::Symbol,
            Value::Quote(_) => ValueKind::Quote,
            Value::Word(_) => ValueKind::Word,
            Value::Error(_) => ValueKind::Error,
        }
    }

    /// The prototype object consulted during symbol dispatch.
    ///
    /// For objects: the value of the reserved `__proto__` own property, if that
    /// value is itself an object; otherwise the runtime's root object prototype.
    /// For every other kind: the runtime's per-type singleton prototype.
    pub fn prototype(&self, runtime: &Runtime) -> Value {
        match self {
            Value::Object(data) => data
                .get_own("__proto__")
                .filter(|v| matches!(v, Value::Object(_)))
                .unwrap_or_else(|| runtime.prototypes.root_object.clone()),
            Value::Null => runtime.prototypes.null.clone(),
            Value::Boolean(_) => runtime.prototypes.boolean.clone(),
            Value::Number(_) => runtime.prototypes.number.clone(),
            Value::String(_) => runtime.prototypes.string.clone(),
            Value::Array(_) => runtime.prototypes.array.clone(),
            Value::Symbol(_) => runtime.prototypes.symbol.clone(),
            Value::Quote(_) => runtime.prototypes.quote.clone(),
            Value::Word(_) => runtime.prototypes.word.clone(),
            Value::Error(_) => runtime.prototypes.error.clone(),
        }
    }

    /// Structural equality. Differing kinds are always unequal.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a.numeric_eq(*b),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equals(y))
            }
            (Value::Object(a), Value::Object(b)) => a.equals(b),
            (Value::Symbol(a), Value::Symbol(b)) => a.identifier == b.identifier,
            (Value::Quote(a), Value::Quote(b)) => match (&a.body, &b.body) {
                (QuoteBody::Native(f), QuoteBody::Native(g)) => {
                    *f as usize == *g as usize
                }
                (QuoteBody::Compiled(x), QuoteBody::Compiled(y)) => {
                    x.len() == y.len() && x.iter().zip(y.iter()).all(|(p, q)| p.equals(q))
                }
                _ => false,
            },
            (Value::Word(a), Value::Word(b)) => a.symbol.equals(&b.symbol) && a.quote.equals(&b.quote),
            (Value::Error(a), Value::Error(b)) => a == b,
            _ => false,
        }
    }

    /// Human-readable rendering. Strings render raw (unquoted); every other kind
    /// renders the same as `to_source`.
    pub fn to_string_value(&self) -> String {
        match self {
            Value::String(s) => s.to_string(),
            Value::Error(e) => e.to_string(),
            _ => self.to_source(),
        }
    }

    /// A rendering that, fed back into the parser, yields an equal value. This
    /// guarantee is scoped to values the parser can actually produce:
    /// native quotes and errors have no literal syntax and render as descriptive,
    /// non-reparseable placeholders (see `DESIGN.md`).
    pub fn to_source(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Number(n) => n.to_display_string(),
            Value::String(s) => quote_string(s),
            Value::Array(items) => {
                if items.is_empty() {
                    "[ ]".to_string()
                } else {
                    let rendered: Vec<String> = items.iter().map(Value::to_source).collect();
                    format!("[ {} ]", rendered.join(", "))
                }
            }
            Value::Object(data) => data.to_source(),
            Value::Symbol(sym) => sym.identifier.to_string(),
            Value::Quote(q) => match &q.body {
                QuoteBody::Native(_) => "<native>".to_string(),
                QuoteBody::Compiled(children) => {
                    if children.is_empty() {
                        "( )".to_string()
                    } else {
                        let rendered: Vec<String> =
                            children.iter().map(Value::to_source).collect();
                        format!("( {} )", rendered.join(" "))
                    }
                }
            },
            Value::Word(w) => {
                let symbol = w.symbol.to_source();
                match &w.quote {
                    Value::Quote(q) => match &q.body {
                        QuoteBody::Compiled(children) if !children.is_empty() => {
                            let rendered: Vec<String> =
                                children.iter().map(Value::to_source).collect();
                            format!(": {} {} ;", symbol, rendered.join(" "))
                        }
                        _ => format!(": {} ;", symbol),
                    },
                    _ => format!(": {} ;", symbol),
                }
            }
            Value::Error(e) => format!("<error:{}:{}>", e.code, e.message),
        }
    }
}

/// Escape a string: the control range 0x00-0x1F plus `"`, `\` and `/` are
/// escaped; named escapes are preferred over `\u00XX` where one exists,
/// matching the escapes the parser accepts.
fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '/' => out.push_str("\\/"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) <= 0x1F => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_equality_crosses_int_and_real() {
        assert!(Number::Int(3).numeric_eq(Number::Real(3.0)));
        assert!(!Number::Int(3).numeric_eq(Number::Real(3.1)));
    }

    #[test]
    fn real_to_source_always_has_a_decimal_point() {
        assert_eq!(Number::Real(2.0).to_display_string(), "2.0");
        assert_eq!(Number::Real(2.5).to_display_string(), "2.5");
    }

    #[test]
    fn string_source_escapes_control_range_and_nul() {
        let v = Value::String(Rc::from("a\u{0}b\"c\\d"));
        assert_eq!(v.to_source(), "\"a\\u0000b\\\"c\\\\d\"");
    }

    #[test]
    fn null_equals_only_null() {
        assert!(Value::Null.equals(&Value::Null));
        assert!(!Value::Null.equals(&Value::Boolean(false)));
    }

    #[test]
    fn arrays_compare_element_wise() {
        let a = Value::Array(Rc::from(vec![Value::Number(Number::Int(1))]));
        let b = Value::Array(Rc::from(vec![Value::Number(Number::Int(1))]));
        let c = Value::Array(Rc::from(vec![Value::Number(Number::Int(2))]));
        assert!(a.equals(&b));
        assert!(!a.equals(&c));
    }
}
