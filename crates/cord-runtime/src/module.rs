//! The module loader hook.
//!
//! `cord-runtime` only fixes the interface. A concrete loader that can actually
//! parse and compile Cord source lives in `cord-compiler` (see
//! `cord_compiler::loader::SourceModuleLoader`) since it needs the parser and
//! compiler, both of which depend on this crate — putting the implementation here
//! would create a dependency cycle.

use std::rc::Rc;

use cord_core::CordError;
use tracing::warn;

use crate::context::Context;
use crate::runtime::Runtime;
use crate::value::Value;

/// `import(context, path) -> object | null`.
///
/// Resolves `path` against a configured search list, reads the file, executes it
/// in a fresh child context sharing the runtime, and returns that child context's
/// local dictionary packaged as an object. Import failure raises an `import` error
/// on the caller's context rather than returning `Err` here, but the trait uses
/// `Result` to keep that policy decision with the caller (`Context::import`).
pub trait ModuleLoader {
    fn import(&self, runtime: &Rc<Runtime>, path: &str) -> Result<Value, CordError>;
}

impl Context {
    /// Run the runtime's configured module loader, if any, translating a missing
    /// loader or a loader failure into an `import` error on this context.
    pub fn import(&mut self, path: &str) -> bool {
        let runtime = Rc::clone(&self.runtime);
        let Some(loader) = runtime.module_loader.as_ref() else {
            self.set_error(CordError::import(format!(
                "no module loader configured: cannot import '{path}'"
            )));
            return false;
        };
        match loader.import(&runtime, path) {
            Ok(value) => {
                self.push(value);
                true
            }
            Err(err) => {
                warn!(%path, %err, "import failed");
                self.set_error(err);
                false
            }
        }
    }
}
