//! Shared state across contexts.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use cord_core::MemoryManager;

use crate::dictionary::Dictionary;
use crate::io::{BufferOutputAdapter, InputAdapter, OutputAdapter, StdInAdapter, StdOutAdapter};
use crate::module::ModuleLoader;
use crate::object::ObjectData;
use crate::prototypes;
use crate::value::{SymbolData, Value};

/// One native prototype object per value kind.
///
/// `root_object` is the prototype consulted for object values whose own
/// `__proto__` is absent or not itself an object; it has no `__proto__` of its
/// own, so it is its own fixed point under `Value::prototype`.
pub struct PrototypeRegistry {
    pub root_object: Value,
    pub null: Value,
    pub boolean: Value,
    pub number: Value,
    pub string: Value,
    pub array: Value,
    pub symbol: Value,
    pub quote: Value,
    pub word: Value,
    pub error: Value,
}

impl PrototypeRegistry {
    fn empty() -> Self {
        let fresh = || Value::Object(Rc::new(ObjectData::new()));
        PrototypeRegistry {
            root_object: fresh(),
            null: fresh(),
            boolean: fresh(),
            number: fresh(),
            string: fresh(),
            array: fresh(),
            symbol: fresh(),
            quote: fresh(),
            word: fresh(),
            error: fresh(),
        }
    }
}

/// I/O adapters owned by the runtime.
pub struct IoAdapters {
    pub input: Box<dyn InputAdapter>,
    pub output: Box<dyn OutputAdapter>,
}

impl Default for IoAdapters {
    fn default() -> Self {
        IoAdapters {
            input: Box::new(StdInAdapter::new()),
            output: Box::new(StdOutAdapter::new()),
        }
    }
}

impl IoAdapters {
    /// An adapter pair useful for tests and embedders that want to capture output
    /// rather than stream it to the terminal.
    pub fn buffered() -> Self {
        IoAdapters {
            input: Box::new(crate::io::BufferInputAdapter::new("")),
            output: Box::new(BufferOutputAdapter::default()),
        }
    }
}

/// State shared across every `Context` built from this runtime.
pub struct Runtime {
    pub global_dictionary: RefCell<Dictionary>,
    pub prototypes: PrototypeRegistry,
    pub true_value: Value,
    pub false_value: Value,
    pub memory: MemoryManager,
    pub io: RefCell<IoAdapters>,
    pub module_loader: Option<Box<dyn ModuleLoader>>,
    /// When enabled, equal-identifier symbols share one `Rc<SymbolData>` and
    /// discard their per-occurrence position.
    pub intern_symbols: bool,
    symbol_table: RefCell<HashMap<Rc<str>, Rc<SymbolData>>>,
}

impl Runtime {
    /// Build a runtime with the default stdio adapters and no module loader.
    pub fn new(intern_symbols: bool) -> Rc<Runtime> {
        Runtime::with_io(intern_symbols, IoAdapters::default())
    }

    pub fn with_io(intern_symbols: bool, io: IoAdapters) -> Rc<Runtime> {
        let runtime = Rc::new(Runtime {
            global_dictionary: RefCell::new(Dictionary::new()),
            prototypes: PrototypeRegistry::empty(),
            true_value: Value::Boolean(true),
            false_value: Value::Boolean(false),
            memory: MemoryManager::new(),
            io: RefCell::new(io),
            module_loader: None,
            intern_symbols,
            symbol_table: RefCell::new(HashMap::new()),
        });
        prototypes::install_all(&runtime.prototypes);
        crate::stdlib::install(&mut runtime.global_dictionary.borrow_mut());
        runtime
    }

    pub fn boolean(&self, value: bool) -> Value {
        if value {
            self.true_value.clone()
        } else {
            self.false_value.clone()
        }
    }

    /// Intern `identifier`, returning the shared `SymbolData` if interning is
    /// enabled, or a fresh one (keeping `position`) otherwise.
    pub fn make_symbol(
        &self,
        identifier: Rc<str>,
        position: Option<cord_core::Position>,
    ) -> Rc<SymbolData> {
        if !self.intern_symbols {
            return Rc::new(SymbolData::new(identifier, position));
        }
        let mut table = self.symbol_table.borrow_mut();
        if let Some(existing) = table.get(&identifier) {
            return Rc::clone(existing);
        }
        // Interned symbols discard their per-occurrence position.
        let data = Rc::new(SymbolData::new(Rc::clone(&identifier), None));
        table.insert(identifier, Rc::clone(&data));
        data
    }
}

/// A builder that lets hosts (the CLI, the module loader, embedders) configure a
/// runtime's I/O adapters and module loader before it is shared with any context.
pub struct RuntimeBuilder {
    intern_symbols: bool,
    io: IoAdapters,
    module_loader: Option<Box<dyn ModuleLoader>>,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        RuntimeBuilder {
            intern_symbols: false,
            io: IoAdapters::default(),
            module_loader: None,
        }
    }

    pub fn intern_symbols(mut self, enabled: bool) -> Self {
        self.intern_symbols = enabled;
        self
    }

    pub fn io(mut self, io: IoAdapters) -> Self {
        self.io = io;
        self
    }

    pub fn module_loader(mut self, loader: Box<dyn ModuleLoader>) -> Self {
        self.module_loader = Some(loader);
        self
    }

    pub fn build(self) -> Rc<Runtime> {
        let runtime = Rc::new(Runtime {
            global_dictionary: RefCell::new(Dictionary::new()),
            prototypes: PrototypeRegistry::empty(),
            true_value: Value::Boolean(true),
            false_value: Value::Boolean(false),
            memory: MemoryManager::new(),
            io: RefCell::new(self.io),
            module_loader: self.module_loader,
            intern_symbols: self.intern_symbols,
            symbol_table: RefCell::new(HashMap::new()),
        });
        prototypes::install_all(&runtime.prototypes);
        crate::stdlib::install(&mut runtime.global_dictionary.borrow_mut());
        runtime
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        RuntimeBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_shares_symbol_data_and_drops_position() {
        let runtime = Runtime::new(true);
        let pos = cord_core::Position::start("a.cord");
        let a = runtime.make_symbol(Rc::from("foo"), Some(pos.clone()));
        let b = runtime.make_symbol(Rc::from("foo"), Some(pos));
        assert!(Rc::ptr_eq(&a, &b));
        assert!(a.position.borrow().is_none());
    }

    #[test]
    fn interning_disabled_keeps_distinct_symbols_with_positions() {
        let runtime = Runtime::new(false);
        let pos = cord_core::Position::start("a.cord");
        let a = runtime.make_symbol(Rc::from("foo"), Some(pos.clone()));
        let b = runtime.make_symbol(Rc::from("foo"), Some(pos));
        assert!(!Rc::ptr_eq(&a, &b));
        assert!(a.position.borrow().is_some());
    }
}
