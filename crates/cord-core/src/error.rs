//! The error taxonomy shared by the parser and the runtime.

use std::fmt;

use crate::position::Position;

/// Error categories. `Unknown` is reserved for hosts; the core never raises it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Syntax,
    Reference,
    Type,
    Value,
    Range,
    Import,
    Io,
    Unknown,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Syntax => "syntax",
            ErrorCode::Reference => "reference",
            ErrorCode::Type => "type",
            ErrorCode::Value => "value",
            ErrorCode::Range => "range",
            ErrorCode::Import => "import",
            ErrorCode::Io => "io",
            ErrorCode::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error value: a code, a human-readable message and an optional source position.
///
/// Two errors are equal iff their code and message match; position is not
/// part of the equality contract.
#[derive(Debug, Clone)]
pub struct CordError {
    pub code: ErrorCode,
    pub message: String,
    pub position: Option<Position>,
}

impl CordError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CordError {
            code,
            message: message.into(),
            position: None,
        }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        CordError::new(ErrorCode::Syntax, message)
    }

    pub fn reference(message: impl Into<String>) -> Self {
        CordError::new(ErrorCode::Reference, message)
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        CordError::new(ErrorCode::Type, message)
    }

    pub fn value_error(message: impl Into<String>) -> Self {
        CordError::new(ErrorCode::Value, message)
    }

    pub fn range(message: impl Into<String>) -> Self {
        CordError::new(ErrorCode::Range, message)
    }

    pub fn import(message: impl Into<String>) -> Self {
        CordError::new(ErrorCode::Import, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        CordError::new(ErrorCode::Io, message)
    }
}

impl PartialEq for CordError {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code && self.message == other.message
    }
}

impl fmt::Display for CordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.position {
            Some(pos) => write!(f, "{}: {} ({})", self.code, self.message, pos),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

impl std::error::Error for CordError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_position() {
        let a = CordError::range("stack underflow").with_position(Position::start("a.cord"));
        let b = CordError::range("stack underflow");
        assert_eq!(a, b);
    }

    #[test]
    fn different_codes_are_unequal() {
        let a = CordError::range("x");
        let b = CordError::type_error("x");
        assert_ne!(a, b);
    }
}
