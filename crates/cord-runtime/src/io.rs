//! Input/output adapters.
//!
//! These traits fix the interfaces the engine requires; concrete adapters for a
//! terminal, a GUI widget or a WebAssembly host are external collaborators.
//! `StdIoAdapter`/`NullOutputAdapter` below are the minimal standalone
//! implementations needed to run the CLI and the test suite.

use std::io::{self, Read as _, Write as _};

use cord_core::unicode;

/// Result of a single read from an `InputAdapter`.
pub enum ReadResult {
    /// `n` code points (or all remaining input, if the request was `0`) were
    /// decoded into the caller's buffer.
    Ok(String),
    /// The underlying source was exhausted before any more data arrived.
    Eof,
    /// The source could not be decoded as UTF-8, or the underlying I/O failed.
    Failure(String),
}

/// `read(n, buffer) -> {ok | eof | failure}`.
pub trait InputAdapter {
    /// Read up to `n` code points (`0` meaning "read to end"), rejecting malformed
    /// UTF-8 sequences.
    fn read(&mut self, n: usize) -> ReadResult;
}

/// `write(string)` encoding UTF-8 to the underlying sink.
pub trait OutputAdapter {
    fn write(&mut self, s: &str) -> Result<(), String>;
}

/// Reads from process stdin, byte-at-a-time, validating UTF-8 as it goes.
pub struct StdInAdapter {
    stdin: io::Stdin,
}

impl StdInAdapter {
    pub fn new() -> Self {
        StdInAdapter { stdin: io::stdin() }
    }
}

impl Default for StdInAdapter {
    fn default() -> Self {
        StdInAdapter::new()
    }
}

impl InputAdapter for StdInAdapter {
    fn read(&mut self, n: usize) -> ReadResult {
        let mut bytes = Vec::new();
        let mut one = [0u8; 1];
        let mut read_code_points = 0;
        loop {
            if n != 0 && read_code_points >= n {
                break;
            }
            match self.stdin.read(&mut one) {
                Ok(0) => break,
                Ok(_) => {
                    bytes.push(one[0]);
                    // Only count a code point once its UTF-8 sequence is complete.
                    if std::str::from_utf8(&bytes)
                        .map(|s| s.chars().count())
                        .unwrap_or(0)
                        > read_code_points
                    {
                        read_code_points += 1;
                    }
                }
                Err(e) => return ReadResult::Failure(e.to_string()),
            }
        }
        if bytes.is_empty() {
            return ReadResult::Eof;
        }
        match unicode::decode_strict(&bytes) {
            Ok(s) => ReadResult::Ok(s),
            Err(e) => ReadResult::Failure(e.to_string()),
        }
    }
}

/// Writes to process stdout.
pub struct StdOutAdapter {
    stdout: io::Stdout,
}

impl StdOutAdapter {
    pub fn new() -> Self {
        StdOutAdapter {
            stdout: io::stdout(),
        }
    }
}

impl Default for StdOutAdapter {
    fn default() -> Self {
        StdOutAdapter::new()
    }
}

impl OutputAdapter for StdOutAdapter {
    fn write(&mut self, s: &str) -> Result<(), String> {
        self.stdout
            .write_all(unicode::encode(s).as_slice())
            .map_err(|e| e.to_string())
    }
}

/// An in-memory output adapter, useful for tests and for embedding Cord in a host
/// that wants to capture program output rather than stream it.
#[derive(Default)]
pub struct BufferOutputAdapter {
    pub buffer: String,
}

impl OutputAdapter for BufferOutputAdapter {
    fn write(&mut self, s: &str) -> Result<(), String> {
        self.buffer.push_str(s);
        Ok(())
    }
}

/// An in-memory input adapter for tests.
pub struct BufferInputAdapter {
    remaining: std::vec::IntoIter<char>,
}

impl BufferInputAdapter {
    pub fn new(s: impl Into<String>) -> Self {
        BufferInputAdapter {
            remaining: s.into().chars().collect::<Vec<_>>().into_iter(),
        }
    }
}

impl InputAdapter for BufferInputAdapter {
    fn read(&mut self, n: usize) -> ReadResult {
        let mut out = String::new();
        let mut count = 0;
        while n == 0 || count < n {
            match self.remaining.next() {
                Some(c) => {
                    out.push(c);
                    count += 1;
                }
                None => break,
            }
        }
        if out.is_empty() {
            ReadResult::Eof
        } else {
            ReadResult::Ok(out)
        }
    }
}
