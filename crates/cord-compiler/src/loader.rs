//! A file-system module loader.
//!
//! Resolves an import path against a configured search list, reads the file,
//! compiles and runs it in a fresh child context, then packages that
//! context's local dictionary as an object so the importer can pick words out
//! of it by name.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use cord_core::{unicode, CordError};
use cord_runtime::module::ModuleLoader;
use cord_runtime::{Context, ObjectData, Runtime, Value};

use crate::compiler::compile;
use crate::parser::Parser;

/// Reads a Cord source file, discarding a leading UTF-8 BOM if present. A `#!`
/// shebang on the first line needs no special handling here: it is just an
/// ordinary `#` line comment as far as the parser is concerned.
pub fn read_source_file(path: &Path) -> Result<String, CordError> {
    let bytes = fs::read(path)
        .map_err(|e| CordError::import(format!("cannot read '{}': {e}", path.display())))?;
    unicode::decode_strict(unicode::strip_bom(&bytes))
        .map_err(|e| CordError::import(format!("'{}' is not valid UTF-8: {e}", path.display())))
}

/// Looks for `<path>` and `<path>.cord` under each directory in `search_paths`,
/// in order, returning the first that exists.
pub struct SourceModuleLoader {
    search_paths: Vec<PathBuf>,
}

impl SourceModuleLoader {
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        SourceModuleLoader { search_paths }
    }

    fn resolve(&self, path: &str) -> Option<PathBuf> {
        for dir in &self.search_paths {
            let direct = dir.join(path);
            if direct.is_file() {
                return Some(direct);
            }
            let with_extension = dir.join(format!("{path}.cord"));
            if with_extension.is_file() {
                return Some(with_extension);
            }
        }
        None
    }
}

impl ModuleLoader for SourceModuleLoader {
    fn import(&self, runtime: &Rc<Runtime>, path: &str) -> Result<Value, CordError> {
        let resolved = self
            .resolve(path)
            .ok_or_else(|| CordError::import(format!("module not found: {path}")))?;
        let source = read_source_file(&resolved)?;
        let filename: Rc<str> = Rc::from(resolved.to_string_lossy().into_owned());

        let tokens = Parser::new(&source, Rc::clone(&filename)).parse()?;
        let values = compile(&tokens, runtime);

        let mut child = Context::new(Rc::clone(runtime));
        for value in &values {
            if !cord_runtime::exec(&mut child, value) {
                return Err(child
                    .take_error()
                    .unwrap_or_else(|| CordError::import(format!("import of '{path}' failed"))));
            }
        }

        let pairs: Vec<(Rc<str>, Value)> = child
            .dictionary
            .iter()
            .filter_map(|(name, word)| {
                if let Value::Word(data) = word {
                    Some((Rc::clone(name), data.quote.clone()))
                } else {
                    None
                }
            })
            .collect();
        Ok(Value::Object(Rc::new(ObjectData::from_pairs(pairs))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn imports_a_module_and_exposes_its_words_as_properties() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("math.cord");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, ": double dup + ;").unwrap();

        let loader = SourceModuleLoader::new(vec![dir.path().to_path_buf()]);
        let runtime = Runtime::new(false);
        let result = loader.import(&runtime, "math").expect("import succeeds");
        match result {
            Value::Object(obj) => assert!(obj.get_own("double").is_some()),
            _ => panic!("expected an object of exported words"),
        }
    }

    #[test]
    fn read_source_file_strips_a_leading_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.cord");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"\xEF\xBB\xBF1 2 +").unwrap();
        drop(file);

        let source = read_source_file(&path).expect("reads");
        assert_eq!(source, "1 2 +");
    }

    #[test]
    fn missing_module_is_an_import_error() {
        let loader = SourceModuleLoader::new(vec![]);
        let runtime = Runtime::new(false);
        let err = loader.import(&runtime, "nowhere").unwrap_err();
        assert_eq!(err.code, cord_core::ErrorCode::Import);
    }
}
