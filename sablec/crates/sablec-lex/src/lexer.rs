//! The Sable lexer.
//!
//! A [`Lexer`] is a cursor over a shared source buffer, restricted to a
//! logical byte range. The top-level lexer covers the whole buffer; the
//! lexer inside a [`Token::Group`] covers the interior of one balanced
//! delimiter pair. Sub-lexers are plain values: each owns its cursor, and
//! advancing one never moves another, which is what makes the parser's
//! speculative rewinds safe.
//!
//! Tokenization is lazy. `next` strips whitespace and comments, then
//! classifies the next token by its first character. Failures are
//! [`Fatal`]: an invalid escape or an unclosed delimiter leaves no
//! position the lexer could meaningfully resume from.

use sablec_util::{Diagnostic, Fatal, FatalResult, Span};

use crate::token::{Delim, FloatSuffix, IntSuffix, Token};
use crate::unicode::{is_digit_in_base, is_ident_continue, is_ident_start};

/// A cursor over a logical range of the source buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Lexer<'src> {
    /// The full source buffer, shared by all lexers derived from it.
    source: &'src str,
    /// Current absolute byte offset.
    offset: usize,
    /// Absolute byte offset of the logical end of this lexer's range.
    end: usize,
}

impl<'src> Lexer<'src> {
    /// Create a lexer over an entire source buffer.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            offset: 0,
            end: source.len(),
        }
    }

    /// The shared source buffer.
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Current absolute byte offset of the cursor.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Absolute byte offset of this lexer's logical end.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Source text covered by a span.
    pub fn text(&self, span: Span) -> &'src str {
        &self.source[span.start..span.stop]
    }

    /// A zero-width span at the logical end, for end-of-input reports.
    pub fn eof_span(&self) -> Span {
        Span::point(self.end)
    }

    /// Reset the cursor to the start of `span`.
    ///
    /// The span must have been produced by this lexer or one sharing its
    /// buffer; offsets are absolute, so no translation is needed.
    pub fn rewind_to(&mut self, span: Span) {
        self.offset = span.start;
    }

    /// Skip whitespace and comments, then report whether tokens remain.
    pub fn is_empty(&mut self) -> bool {
        self.strip();
        self.offset >= self.end
    }

    /// Return the next token without advancing.
    pub fn peek(&mut self) -> FatalResult<Option<Token<'src>>> {
        let saved = self.offset;
        let token = self.next();
        self.offset = saved;
        token
    }

    /// Produce the next token, advancing the cursor past it.
    ///
    /// Returns `Ok(None)` at the logical end of the range.
    pub fn next(&mut self) -> FatalResult<Option<Token<'src>>> {
        self.strip();
        if self.offset >= self.end {
            return Ok(None);
        }

        let token = match self.byte() {
            b'(' => self.group(Delim::Paren)?,
            b'[' => self.group(Delim::Bracket)?,
            b'{' => self.group(Delim::Brace)?,
            b'"' => self.string()?,
            b'\'' => self.char_lit()?,
            b'0' if matches!(
                self.byte_at(self.offset + 1),
                Some(b'x' | b'X' | b'b' | b'B' | b'o' | b'O')
            ) =>
            {
                self.prefixed_int()?
            }
            b'0'..=b'9' => self.number()?,
            b',' | b':' | b'.' | b'-' | b'+' | b'*' | b'/' | b'&' | b'!' | b'<' | b'>' | b'^'
            | b'|' | b'=' | b';' | b'%' => self.punct(),
            _ => {
                let c = self.current_char();
                if is_ident_start(c) {
                    self.ident()
                } else {
                    let span = Span::new(self.offset, self.offset + c.len_utf8());
                    return Err(Fatal(Diagnostic::error(
                        "Unexpected token",
                        span,
                        "This character was not understood",
                    )));
                }
            }
        };
        Ok(Some(token))
    }

    // ------------------------------------------------------------------
    // Cursor primitives
    // ------------------------------------------------------------------

    /// Byte under the cursor. Caller must have checked `offset < end`.
    fn byte(&self) -> u8 {
        self.source.as_bytes()[self.offset]
    }

    /// Byte at an absolute offset, if it is inside the logical range.
    fn byte_at(&self, offset: usize) -> Option<u8> {
        if offset < self.end {
            Some(self.source.as_bytes()[offset])
        } else {
            None
        }
    }

    /// Character under the cursor. Caller must have checked `offset < end`.
    fn current_char(&self) -> char {
        // The logical end always sits on an ASCII delimiter or the buffer
        // end, so slicing to it stays on a char boundary.
        self.source[self.offset..self.end]
            .chars()
            .next()
            .unwrap_or('\0')
    }

    /// Consume `expected` if it is the next byte.
    fn eat(&mut self, expected: u8) -> bool {
        if self.byte_at(self.offset) == Some(expected) {
            self.offset += 1;
            true
        } else {
            false
        }
    }

    /// Require `expected` as the next character and consume it.
    fn expect(&mut self, expected: char) -> FatalResult<()> {
        if self.offset >= self.end {
            return Err(Fatal(Diagnostic::error(
                "Unexpected end of file",
                Span::point(self.offset),
                format!("Expected {expected}"),
            )));
        }
        if self.byte() != expected as u8 {
            return Err(Fatal(Diagnostic::error(
                "Unexpected token",
                Span::new(self.offset, self.offset + self.current_char().len_utf8()),
                format!("Expected {expected}, found this instead"),
            )));
        }
        self.offset += 1;
        Ok(())
    }

    /// Skip whitespace, `//` line comments, and `/* */` block comments.
    fn strip(&mut self) {
        loop {
            let rest = &self.source[self.offset..self.end];
            if rest.starts_with("//") {
                while self.offset < self.end && self.byte() != b'\n' {
                    self.offset += 1;
                }
            }
            let rest = &self.source[self.offset..self.end];
            if rest.starts_with("/*") {
                // Non-nested: scan to the first terminator.
                match rest[1..].find("*/") {
                    Some(i) => self.offset += 1 + i + 2,
                    None => self.offset = self.end,
                }
            }
            if self.offset >= self.end {
                return;
            }
            match self.byte() {
                b' ' | b'\t' | b'\n' | b'\r' => self.offset += 1,
                _ => return,
            }
        }
    }

    // ------------------------------------------------------------------
    // Token classes
    // ------------------------------------------------------------------

    /// Lex an identifier. The cursor sits on a valid start character.
    fn ident(&mut self) -> Token<'src> {
        let start = self.offset;
        self.offset += self.current_char().len_utf8();
        while self.offset < self.end && is_ident_continue(self.current_char()) {
            self.offset += self.current_char().len_utf8();
        }
        Token::Ident {
            span: Span::new(start, self.offset),
            text: &self.source[start..self.offset],
        }
    }

    /// Consume a run of digits valid in `radix`, returning their text.
    fn digits(&mut self, radix: u32) -> &'src str {
        let start = self.offset;
        while self.offset < self.end && is_digit_in_base(self.byte() as char, radix) {
            self.offset += 1;
        }
        &self.source[start..self.offset]
    }

    /// Consume digit groups separated by underscores into `accum`.
    fn digit_groups(&mut self, radix: u32, accum: &mut String) {
        accum.push_str(self.digits(radix));
        while self.byte_at(self.offset) == Some(b'_') {
            self.offset += 1;
            accum.push_str(self.digits(radix));
        }
    }

    /// Lex a `0x`/`0b`/`0o` integer literal. The cursor sits on the `0`.
    fn prefixed_int(&mut self) -> FatalResult<Token<'src>> {
        let start = self.offset;
        let radix = match self.source.as_bytes()[self.offset + 1] {
            b'x' | b'X' => 16,
            b'b' | b'B' => 2,
            _ => 8,
        };
        self.offset += 2;

        let mut digits = String::from(self.digits(radix));
        if digits.is_empty() {
            // Take any trailing identifier characters into the span so
            // `0xZZ` is underlined whole.
            while self.offset < self.end && is_ident_continue(self.current_char()) {
                self.offset += self.current_char().len_utf8();
            }
            return Err(Fatal(Diagnostic::error(
                "Invalid integer literal",
                Span::new(start, self.offset),
                "Expected digits after this prefix",
            )));
        }
        while self.byte_at(self.offset) == Some(b'_') {
            self.offset += 1;
            digits.push_str(self.digits(radix));
        }

        let value = match u128::from_str_radix(&digits, radix) {
            Ok(value) => value,
            Err(_) => {
                return Err(Fatal(Diagnostic::error(
                    "Integer literal too large",
                    Span::new(start, self.offset),
                    "This value does not fit in 128 bits",
                )))
            }
        };
        let suffix = self.int_suffix()?;
        Ok(Token::Int {
            span: Span::new(start, self.offset),
            value,
            suffix,
        })
    }

    /// Lex a decimal integer or float literal. The cursor sits on a digit.
    fn number(&mut self) -> FatalResult<Token<'src>> {
        let start = self.offset;
        let mut digits = String::new();
        self.digit_groups(10, &mut digits);

        let value = match digits.parse::<u128>() {
            Ok(value) => value,
            Err(_) => {
                return Err(Fatal(Diagnostic::error(
                    "Integer literal too large",
                    Span::new(start, self.offset),
                    "This value does not fit in 128 bits",
                )))
            }
        };

        if self.byte_at(self.offset) == Some(b'.') {
            self.offset += 1;
            let mut frac = String::new();
            self.digit_groups(10, &mut frac);

            let text = format!("{digits}.{frac}");
            let value = match text.parse::<f64>() {
                Ok(value) if value.is_finite() => value,
                _ => {
                    return Err(Fatal(Diagnostic::error(
                        "Invalid float literal",
                        Span::new(start, self.offset),
                        "This value does not fit in an f64",
                    )))
                }
            };
            let suffix = self.float_suffix()?;
            return Ok(Token::Float {
                span: Span::new(start, self.offset),
                value,
                suffix,
            });
        }

        let suffix = self.int_suffix()?;
        if suffix.is_none() {
            if let Some(suffix) = self.float_suffix()? {
                return Ok(Token::Float {
                    span: Span::new(start, self.offset),
                    value: value as f64,
                    suffix: Some(suffix),
                });
            }
        }
        Ok(Token::Int {
            span: Span::new(start, self.offset),
            value,
            suffix,
        })
    }

    /// Consume an integer size suffix if one starts here.
    fn int_suffix(&mut self) -> FatalResult<Option<IntSuffix>> {
        let sign = match self.byte_at(self.offset) {
            Some(b'i') => 'i',
            Some(b'u') => 'u',
            _ => return Ok(None),
        };
        let start = self.offset;
        self.offset += 1;
        let size = self.digits(10);
        match IntSuffix::from_parts(sign, size) {
            Some(suffix) => Ok(Some(suffix)),
            None => Err(Fatal(Diagnostic::error(
                "Invalid integer suffix",
                Span::new(start, self.offset),
                "This is not a valid integer size",
            ))),
        }
    }

    /// Consume a float width suffix if one starts here.
    fn float_suffix(&mut self) -> FatalResult<Option<FloatSuffix>> {
        if self.byte_at(self.offset) != Some(b'f') {
            return Ok(None);
        }
        let start = self.offset;
        self.offset += 1;
        let size = self.digits(10);
        match FloatSuffix::from_size(size) {
            Some(suffix) => Ok(Some(suffix)),
            None => Err(Fatal(Diagnostic::error(
                "Invalid float suffix",
                Span::new(start, self.offset),
                "This is not a valid float size",
            ))),
        }
    }

    /// Decode one escape sequence. The cursor sits just past the `\`.
    fn escape(&mut self) -> FatalResult<char> {
        if self.offset >= self.end {
            return Err(Fatal(Diagnostic::error(
                "Unexpected end of file",
                Span::point(self.offset),
                "Expected an escape sequence",
            )));
        }
        let c = self.current_char();
        self.offset += c.len_utf8();
        match c {
            'n' => Ok('\n'),
            't' => Ok('\t'),
            '\\' => Ok('\\'),
            '"' => Ok('"'),
            '0' => Ok('\0'),
            'r' => Ok('\r'),
            'b' => Ok('\u{8}'),
            'f' => Ok('\u{c}'),
            'v' => Ok('\u{b}'),
            'a' => Ok('\u{7}'),
            'u' => {
                self.expect('{')?;
                let start = self.offset;
                let digits = self.digits(16);
                let code = u32::from_str_radix(digits, 16).ok();
                self.expect('}')?;
                match code.and_then(char::from_u32) {
                    Some(decoded) => Ok(decoded),
                    None => Err(Fatal(Diagnostic::error(
                        "Invalid escape sequence",
                        Span::new(start, self.offset),
                        "This is not a valid Unicode scalar value",
                    ))),
                }
            }
            c => Err(Fatal(Diagnostic::error(
                "Invalid escape sequence",
                Span::new(self.offset - c.len_utf8(), self.offset),
                format!("\\{c} is not a valid escape sequence"),
            ))),
        }
    }

    /// Lex a string literal. The cursor sits on the opening `"`.
    fn string(&mut self) -> FatalResult<Token<'src>> {
        let start = self.offset;
        self.offset += 1;
        let mut value = String::new();
        loop {
            if self.offset >= self.end {
                return Err(Fatal(Diagnostic::error(
                    "Unterminated string literal",
                    Span::new(start, start + 1),
                    "Expected '\"' to close this string",
                )));
            }
            match self.byte() {
                b'"' => break,
                b'\\' => {
                    self.offset += 1;
                    value.push(self.escape()?);
                }
                _ => {
                    let c = self.current_char();
                    value.push(c);
                    self.offset += c.len_utf8();
                }
            }
        }
        self.offset += 1;
        Ok(Token::Str {
            span: Span::new(start, self.offset),
            value,
        })
    }

    /// Lex a character literal. The cursor sits on the opening `'`.
    fn char_lit(&mut self) -> FatalResult<Token<'src>> {
        let start = self.offset;
        self.offset += 1;
        if self.offset >= self.end {
            return Err(Fatal(Diagnostic::error(
                "Unterminated character literal",
                Span::new(start, start + 1),
                "Expected a character and a closing '",
            )));
        }
        let value = if self.byte() == b'\\' {
            self.offset += 1;
            self.escape()?
        } else {
            let c = self.current_char();
            self.offset += c.len_utf8();
            c
        };
        self.expect('\'')?;
        Ok(Token::Char {
            span: Span::new(start, self.offset),
            value,
        })
    }

    /// Lex a punctuation token by maximal munch. The cursor sits on the
    /// first operator character.
    fn punct(&mut self) -> Token<'src> {
        let start = self.offset;
        let first = self.byte();
        self.offset += 1;
        let text = match first {
            b',' => ",",
            b'.' => ".",
            b';' => ";",
            b':' => {
                if self.eat(b':') {
                    "::"
                } else {
                    ":"
                }
            }
            b'-' => {
                if self.eat(b'=') {
                    "-="
                } else if self.eat(b'>') {
                    "->"
                } else {
                    "-"
                }
            }
            b'+' => {
                if self.eat(b'=') {
                    "+="
                } else {
                    "+"
                }
            }
            b'*' => {
                if self.eat(b'=') {
                    "*="
                } else {
                    "*"
                }
            }
            b'/' => {
                if self.eat(b'=') {
                    "/="
                } else {
                    "/"
                }
            }
            b'&' => {
                if self.eat(b'=') {
                    "&="
                } else if self.eat(b'&') {
                    "&&"
                } else {
                    "&"
                }
            }
            b'!' => {
                if self.eat(b'=') {
                    "!="
                } else {
                    "!"
                }
            }
            b'<' => {
                if self.eat(b'=') {
                    "<="
                } else if self.eat(b'<') {
                    if self.eat(b'=') {
                        "<<="
                    } else {
                        "<<"
                    }
                } else {
                    "<"
                }
            }
            b'>' => {
                if self.eat(b'=') {
                    ">="
                } else if self.eat(b'>') {
                    if self.eat(b'=') {
                        ">>="
                    } else {
                        ">>"
                    }
                } else {
                    ">"
                }
            }
            b'^' => {
                if self.eat(b'=') {
                    "^="
                } else {
                    "^"
                }
            }
            b'|' => {
                if self.eat(b'=') {
                    "|="
                } else if self.eat(b'|') {
                    "||"
                } else {
                    "|"
                }
            }
            b'=' => {
                if self.eat(b'=') {
                    "=="
                } else if self.eat(b'>') {
                    "=>"
                } else {
                    "="
                }
            }
            b'%' => {
                if self.eat(b'=') {
                    "%="
                } else {
                    "%"
                }
            }
            _ => unreachable!("punct called on a non-operator byte"),
        };
        Token::Punct {
            span: Span::new(start, self.offset),
            text,
        }
    }

    /// Lex a balanced delimiter group. The cursor sits on the opener.
    ///
    /// Scans forward counting same-kind openers and closers until
    /// balanced, then emits a `Group` whose inner lexer covers the
    /// interior; the outer cursor lands just past the closer.
    fn group(&mut self, delim: Delim) -> FatalResult<Token<'src>> {
        let start = self.offset;
        let open = delim.open() as u8;
        let close = delim.close() as u8;
        let mut nesting = 1usize;
        while nesting > 0 {
            self.offset += 1;
            if self.offset >= self.end {
                return Err(Fatal(Diagnostic::error(
                    "Unclosed delimiters",
                    Span::new(start, self.end),
                    format!("Expected '{}' to close this group", delim.close()),
                )));
            }
            let b = self.byte();
            if b == open {
                nesting += 1;
            } else if b == close {
                nesting -= 1;
            }
        }
        let inner = Lexer {
            source: self.source,
            offset: start + 1,
            end: self.offset,
        };
        self.offset += 1;
        Ok(Token::Group {
            span: Span::new(start, self.offset),
            delim,
            inner,
        })
    }
}
