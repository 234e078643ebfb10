//! UTF-8 transcoding and code-point classification.
//!
//! Only code-point classification and UTF-8 transcoding are in scope; full Unicode
//! normalization is out of scope.

use std::str::Utf8Error;

/// The ten structural operators reserved by the parser. A code point that is one of
/// these can never appear inside a bare symbol.
pub const RESERVED_OPERATORS: [char; 10] =
    ['(', ')', '[', ']', '{', '}', ':', ';', ',', '"'];

/// Decode `bytes` as UTF-8, substituting U+FFFD for any malformed sequence.
/// Used by the permissive half of the input adapter contract.
pub fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Decode `bytes` as UTF-8, failing on the first malformed sequence.
/// Used by the strict half of the input adapter contract.
pub fn decode_strict(bytes: &[u8]) -> Result<String, Utf8Error> {
    std::str::from_utf8(bytes).map(|s| s.to_owned())
}

/// Encode `s` to its UTF-8 byte representation.
pub fn encode(s: &str) -> Vec<u8> {
    s.as_bytes().to_vec()
}

/// Strip a leading UTF-8 byte-order mark, if present: BOMs are tolerated and discarded.
pub fn strip_bom(bytes: &[u8]) -> &[u8] {
    const BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
    if bytes.starts_with(BOM) {
        &bytes[BOM.len()..]
    } else {
        bytes
    }
}

pub fn is_whitespace(c: char) -> bool {
    c.is_whitespace()
}

pub fn is_control(c: char) -> bool {
    c.is_control()
}

pub fn is_graphic(c: char) -> bool {
    !c.is_whitespace() && !c.is_control()
}

pub fn is_upper(c: char) -> bool {
    c.is_uppercase()
}

pub fn is_lower(c: char) -> bool {
    c.is_lowercase()
}

pub fn to_upper(c: char) -> char {
    // A symbol character always maps to exactly one code point under simple case
    // conversion for the alphabets this interpreter is expected to see; fall back to
    // the original character for the rare code point that expands under full mapping.
    c.to_uppercase().next().unwrap_or(c)
}

pub fn to_lower(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Word characters are what may appear in a bare symbol: anything that is not
/// whitespace, not a control character, and not one of the ten reserved operators.
pub fn is_word_character(c: char) -> bool {
    !is_whitespace(c) && !is_control(c) && !RESERVED_OPERATORS.contains(&c)
}
