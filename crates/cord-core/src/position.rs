//! Source positions attached to tokens, symbols and errors.

use std::fmt;
use std::rc::Rc;

/// A `(filename, line, column)` triple. Lines and columns are 1-indexed, matching
/// the convention readers expect from compiler diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub filename: Rc<str>,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(filename: impl Into<Rc<str>>, line: usize, column: usize) -> Self {
        Position {
            filename: filename.into(),
            line,
            column,
        }
    }

    /// The conventional starting position for a freshly opened source: line 1, column 1.
    pub fn start(filename: impl Into<Rc<str>>) -> Self {
        Position::new(filename, 1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.column)
    }
}
