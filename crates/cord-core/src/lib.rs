//! Cord Core: language-agnostic foundations for the Cord interpreter.
//!
//! This crate knows nothing about the Cord grammar or value model. It provides
//! the leaf components the rest of the workspace builds on:
//!
//! - `position`: source positions attached to tokens, symbols and errors.
//! - `unicode`: UTF-8 transcoding and code-point classification.
//! - `memory`: the pool allocator used for scratch buffers.
//! - `error`: the shared error taxonomy used by both the parser and runtime.

pub mod error;
pub mod memory;
pub mod position;
pub mod unicode;

pub use error::{CordError, ErrorCode};
pub use memory::{Allocation, MemoryManager};
pub use position::Position;
