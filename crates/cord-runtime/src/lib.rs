//! The Cord execution engine: values, objects, the data stack, dictionaries,
//! symbol resolution, and the built-in prototype library.
//!
//! Parsing and compiling source text into `Value` trees is a separate
//! concern, left to the `cord-compiler` crate; this crate only knows how to
//! execute an already-compiled program.

pub mod context;
pub mod dictionary;
pub mod io;
pub mod module;
pub mod object;
pub mod prototypes;
pub mod runtime;
mod stdlib;
pub mod value;

pub use context::{define_word, eval, exec, Context};
pub use dictionary::Dictionary;
pub use object::ObjectData;
pub use runtime::{IoAdapters, Runtime, RuntimeBuilder};
pub use value::{Number, QuoteBody, QuoteData, SymbolData, Value, ValueKind, WordData};
