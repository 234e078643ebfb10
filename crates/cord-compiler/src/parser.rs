//! Recursive-descent reader for Cord source text.
//!
//! Mirrors the shape of the original Plorth reader (one character of lookahead,
//! hand-rolled escape handling) but works over `char` rather than `char32_t`
//! since Rust's `char` already is a Unicode scalar value.

use std::rc::Rc;

use cord_core::{unicode, CordError, Position};

use crate::token::{Token, TokenKind};

/// Parses `source` into a top-level sequence of tokens: a whole script is
/// `value*`, the same grammar a quote's body uses.
pub struct Parser<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    filename: Rc<str>,
    line: usize,
    column: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, filename: impl Into<Rc<str>>) -> Self {
        Parser::with_start(source, filename, 1, 1)
    }

    pub fn with_start(
        source: &'a str,
        filename: impl Into<Rc<str>>,
        line: usize,
        column: usize,
    ) -> Self {
        Parser {
            chars: source.chars().peekable(),
            filename: filename.into(),
            line,
            column,
        }
    }

    pub fn parse(&mut self) -> Result<Vec<Token>, CordError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            if self.peek().is_none() {
                break;
            }
            tokens.push(self.parse_value()?);
        }
        Ok(tokens)
    }

    // -- low-level scanning --------------------------------------------------

    fn position(&self) -> Position {
        Position::new(Rc::clone(&self.filename), self.line, self.column)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn expect(&mut self, expected: char) -> Result<(), CordError> {
        match self.advance() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(self.syntax_error(format!("expected '{expected}', found '{c}'"))),
            None => Err(self.syntax_error(format!("expected '{expected}', found end of input"))),
        }
    }

    fn syntax_error(&self, message: impl Into<String>) -> CordError {
        CordError::syntax(message).with_position(self.position())
    }

    /// Two line-comment forms, both running to (and consuming) the next
    /// newline: `#` and the digraph `//`. A lone `/` not followed
    /// by a second `/` is not a comment opener; `/` is otherwise an ordinary
    /// word character (e.g. a symbol named `km/h`), so it's left alone here.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('#') => self.skip_line_comment(),
                Some('/') if self.peek_second() == Some('/') => self.skip_line_comment(),
                _ => break,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            self.advance();
            if c == '\n' {
                break;
            }
        }
    }

    fn peek_second(&self) -> Option<char> {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next()
    }

    // -- value grammar --------------------------------------------------------

    fn parse_value(&mut self) -> Result<Token, CordError> {
        match self.peek() {
            Some('(') => self.parse_quote(),
            Some('[') => self.parse_array(),
            Some('{') => self.parse_object(),
            Some('"') => self.parse_string(),
            Some(':') => self.parse_word(),
            Some(c) if unicode::is_word_character(c) => self.parse_symbol(),
            Some(c) => Err(self.syntax_error(format!("unexpected character '{c}'"))),
            None => Err(self.syntax_error("unexpected end of input")),
        }
    }

    /// `( value* )`
    fn parse_quote(&mut self) -> Result<Token, CordError> {
        let position = self.position();
        self.expect('(')?;
        let children = self.parse_value_sequence(')')?;
        self.expect(')')?;
        Ok(Token::new(TokenKind::Quote(children), position))
    }

    /// `'[' ( value (',' value)* ','? )? ']'` — the comma is optional but
    /// tolerated between any two elements, and a trailing one is allowed,
    /// so elements may simply be whitespace-separated.
    fn parse_array(&mut self) -> Result<Token, CordError> {
        let position = self.position();
        self.expect('[')?;
        let mut elements = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            if self.peek() == Some(']') {
                break;
            }
            if self.peek().is_none() {
                return Err(self.syntax_error("unexpected end of input, expected ']'"));
            }
            elements.push(self.parse_value()?);
            self.skip_whitespace_and_comments();
            if self.peek() == Some(',') {
                self.advance();
            }
        }
        self.expect(']')?;
        Ok(Token::new(TokenKind::Array(elements), position))
    }

    /// `'{' ( pair (',' pair)* ','? )? '}'`, `pair := string ':' value`:
    /// a key is always a string literal, never a bare symbol.
    fn parse_object(&mut self) -> Result<Token, CordError> {
        let position = self.position();
        self.expect('{')?;
        let mut properties = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            if self.peek() == Some('}') {
                break;
            }
            if self.peek().is_none() {
                return Err(self.syntax_error("unexpected end of input, expected '}'"));
            }
            let key = self.parse_object_key()?;
            self.skip_whitespace_and_comments();
            self.expect(':')?;
            self.skip_whitespace_and_comments();
            let value = self.parse_value()?;
            properties.push((key, value));
            self.skip_whitespace_and_comments();
            if self.peek() == Some(',') {
                self.advance();
            }
        }
        self.expect('}')?;
        Ok(Token::new(TokenKind::Object(properties), position))
    }

    fn parse_object_key(&mut self) -> Result<Rc<str>, CordError> {
        match self.peek() {
            Some('"') => match self.parse_string()?.kind {
                TokenKind::String(s) => Ok(s),
                _ => unreachable!("parse_string always yields TokenKind::String"),
            },
            Some(c) => Err(self.syntax_error(format!(
                "expected a string object key, found '{c}'"
            ))),
            None => Err(self.syntax_error("unterminated object literal")),
        }
    }

    /// `"` ... `"`, with the same escapes `Value::to_source` emits.
    fn parse_string(&mut self) -> Result<Token, CordError> {
        let position = self.position();
        self.expect('"')?;
        let mut out = String::new();
        loop {
            match self.advance() {
                Some('"') => break,
                Some('\\') => out.push(self.parse_escape_sequence()?),
                Some(c) => out.push(c),
                None => return Err(self.syntax_error("unterminated string literal")),
            }
        }
        Ok(Token::new(TokenKind::String(Rc::from(out)), position))
    }

    fn parse_escape_sequence(&mut self) -> Result<char, CordError> {
        match self.advance() {
            Some('"') => Ok('"'),
            Some('\\') => Ok('\\'),
            Some('/') => Ok('/'),
            Some('b') => Ok('\u{0008}'),
            Some('f') => Ok('\u{000C}'),
            Some('n') => Ok('\n'),
            Some('r') => Ok('\r'),
            Some('t') => Ok('\t'),
            Some('u') => {
                let mut code = 0u32;
                for _ in 0..4 {
                    let digit = self
                        .advance()
                        .and_then(|c| c.to_digit(16))
                        .ok_or_else(|| self.syntax_error("invalid \\u escape"))?;
                    code = code * 16 + digit;
                }
                char::from_u32(code).ok_or_else(|| self.syntax_error("invalid \\u escape"))
            }
            Some(c) => Err(self.syntax_error(format!("unknown escape sequence '\\{c}'"))),
            None => Err(self.syntax_error("unterminated escape sequence")),
        }
    }

    /// A maximal run of word characters.
    fn parse_symbol(&mut self) -> Result<Token, CordError> {
        let position = self.position();
        let mut id = String::new();
        while let Some(c) = self.peek() {
            if !unicode::is_word_character(c) {
                break;
            }
            id.push(c);
            self.advance();
        }
        if id.is_empty() {
            return Err(self.syntax_error("expected a symbol"));
        }
        Ok(Token::new(TokenKind::Symbol(Rc::from(id)), position))
    }

    /// `: symbol value* ;`. The symbol is mandatory: `: ;` with no
    /// intervening identifier is itself a syntax error — the grammar simply
    /// requires a symbol token there.
    fn parse_word(&mut self) -> Result<Token, CordError> {
        let position = self.position();
        self.expect(':')?;
        self.skip_whitespace_and_comments();
        let symbol_position = self.position();
        let symbol = match self.parse_symbol()?.kind {
            TokenKind::Symbol(s) => s,
            _ => unreachable!("parse_symbol always yields TokenKind::Symbol"),
        };
        let body = self.parse_value_sequence(';')?;
        self.expect(';')?;
        Ok(Token::new(
            TokenKind::Word {
                symbol,
                symbol_position,
                body,
            },
            position,
        ))
    }

    /// A `value*` run terminated by `closing`, without consuming it.
    fn parse_value_sequence(&mut self, closing: char) -> Result<Vec<Token>, CordError> {
        let mut values = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            match self.peek() {
                Some(c) if c == closing => break,
                Some(_) => values.push(self.parse_value()?),
                None => {
                    return Err(self.syntax_error(format!(
                        "unexpected end of input, expected '{closing}'"
                    )))
                }
            }
        }
        Ok(values)
    }
}
