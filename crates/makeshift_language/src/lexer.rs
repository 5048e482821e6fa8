//! Lexer for the Makeshift build language.
//!
//! The lexer converts source text into a stream of text tokens with
//! source positions. Quoted strings keep their surrounding quotes; block
//! comments are skipped while their newlines still advance the line
//! counter.

use makeshift_foundation::{Error, ErrorContext, Result};

use crate::span::Span;
use crate::token::{Token, is_punctuation};

/// Lexer for Makeshift source code.
pub struct Lexer<'src> {
    /// Source text being tokenized.
    source: &'src str,
    /// Remaining source text.
    rest: &'src str,
    /// Current byte offset in source.
    position: usize,
    /// Current line number (0-based).
    line: u32,
    /// Current column number (0-based).
    column: u32,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            rest: source,
            position: 0,
            line: 0,
            column: 0,
        }
    }

    /// Tokenizes all source and returns a vector of tokens.
    ///
    /// # Errors
    /// Returns `InvalidSyntax` for an unterminated string literal, with
    /// the position of the opening quote.
    pub fn tokenize_all(source: &str) -> Result<Vec<Token>> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Returns the next token, or `None` at end of input.
    fn next_token(&mut self) -> Result<Option<Token>> {
        loop {
            self.skip_whitespace();

            if self.rest.starts_with("/*") {
                self.skip_comment();
                continue;
            }

            let start = self.position;
            let start_line = self.line;
            let start_column = self.column;

            let Some(c) = self.peek_char() else {
                return Ok(None);
            };

            if c == '\'' || c == '"' {
                return self.scan_string(c).map(Some);
            }

            if is_punctuation(c) {
                self.advance();
                let span = Span::new(start, self.position, start_line, start_column);
                return Ok(Some(Token::new(&self.source[start..self.position], span)));
            }

            self.scan_identifier();
            let span = Span::new(start, self.position, start_line, start_column);
            return Ok(Some(Token::new(&self.source[start..self.position], span)));
        }
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Advances past the next character.
    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            let len = c.len_utf8();
            self.rest = &self.rest[len..];
            self.position += len;
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_ascii_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Skips a `/* ... */` block comment. Comments do not nest; a comment
    /// left open at end of input simply ends there.
    fn skip_comment(&mut self) {
        self.advance(); // '/'
        self.advance(); // '*'
        while !self.rest.is_empty() {
            if self.rest.starts_with("*/") {
                self.advance();
                self.advance();
                return;
            }
            self.advance();
        }
    }

    /// Scans a quoted string, keeping the quotes in the token text.
    fn scan_string(&mut self, quote: char) -> Result<Token> {
        let start = self.position;
        let start_line = self.line;
        let start_column = self.column;

        self.advance(); // opening quote
        loop {
            match self.peek_char() {
                Some('\\') => {
                    self.advance();
                    self.advance(); // escaped character, whatever it is
                }
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some(_) => self.advance(),
                None => {
                    return Err(Error::invalid_syntax("unterminated string").with_context(
                        ErrorContext::new(quote.to_string(), start_line, start_column),
                    ));
                }
            }
        }

        let span = Span::new(start, self.position, start_line, start_column);
        Ok(Token::new(&self.source[start..self.position], span))
    }

    /// Scans an identifier, terminated by whitespace, punctuation, a
    /// quote, or end of input.
    fn scan_identifier(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_ascii_whitespace() || is_punctuation(c) || c == '\'' || c == '"' {
                break;
            }
            self.advance();
        }
    }
}
