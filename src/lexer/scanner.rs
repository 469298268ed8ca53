use std::sync::Arc;

use super::token::{Token, TokenKind};
use crate::error::{Coordinate, Error, Result};

/// Scanner for Lisp-style S-expression source text
///
/// The scanner is a lazy, single-pass tokenizer: it implements
/// `Iterator<Item = Result<Token>>`, producing one positioned token per
/// pull and terminating at end of input. The first error ends the
/// stream; subsequent pulls return `None`.
pub struct Scanner {
    /// Source code as character vector
    source: Vec<char>,
    /// Shared reference to the original text, for diagnostics
    text: Arc<str>,
    /// Input label carried on every coordinate
    filename: Arc<str>,
    /// Current position in source
    current: usize,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (0-indexed)
    column: usize,
    /// Set once an error has been produced
    failed: bool,
}

impl Scanner {
    /// Creates a new scanner over `source`; `filename` labels the input
    /// in diagnostics only.
    pub fn new(source: &str, filename: &str) -> Self {
        Scanner {
            source: source.chars().collect(),
            text: Arc::from(source),
            filename: Arc::from(filename),
            current: 0,
            line: 1,
            column: 0,
            failed: false,
        }
    }

    /// Scans the remaining input eagerly, failing on the first lexical
    /// error.
    pub fn scan_tokens(&mut self) -> Result<Vec<Token>> {
        self.collect()
    }

    fn scan_token(&mut self) -> Result<Token> {
        let start = self.current;
        let coord = self.coordinate();
        let c = self.advance();

        match c {
            // A quote must immediately precede a value: whitespace, a
            // closing paren or a comment after it is always an error.
            '\'' => match self.peek() {
                Some(n) if n.is_whitespace() || n == ')' || n == ';' => {
                    Err(Error::lexical(coord))
                }
                _ => Ok(Token::new(TokenKind::Quote, "'", coord)),
            },

            '(' => Ok(Token::new(TokenKind::LeftParen, "(", coord)),
            ')' => Ok(Token::new(TokenKind::RightParen, ")", coord)),

            c if c.is_ascii_digit() => Ok(self.scan_number(start, coord)),

            // A dot starts a float only with a digit right behind it;
            // a bare dot matches nothing.
            '.' => {
                if self.peek().is_some_and(|n| n.is_ascii_digit()) {
                    Ok(self.scan_fraction(start, coord))
                } else {
                    Err(Error::lexical(coord))
                }
            }

            c if is_symbol_start(c) => Ok(self.scan_symbol(start, coord)),

            _ => Err(Error::lexical(coord)),
        }
    }

    /// Scans the rest of a numeric literal whose first digit is already
    /// consumed: `\d+` is an integer, `\d+\.\d*` a float.
    fn scan_number(&mut self, start: usize, coord: Coordinate) -> Token {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        let mut kind = TokenKind::Integer;
        if self.peek() == Some('.') {
            kind = TokenKind::Float;
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        Token::new(kind, self.lexeme(start), coord)
    }

    /// Scans a float of the `\.\d+` shape; the leading dot is already
    /// consumed and the next character is known to be a digit.
    fn scan_fraction(&mut self, start: usize, coord: Coordinate) -> Token {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        Token::new(TokenKind::Float, self.lexeme(start), coord)
    }

    fn scan_symbol(&mut self, start: usize, coord: Coordinate) -> Token {
        while self.peek().is_some_and(is_symbol_continue) {
            self.advance();
        }
        Token::new(TokenKind::Symbol, self.lexeme(start), coord)
    }

    /// Consumes `;` through the end of the line, newline included.
    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            self.advance();
            if c == '\n' {
                break;
            }
        }
    }

    fn lexeme(&self, start: usize) -> String {
        self.source[start..self.current].iter().collect()
    }

    fn coordinate(&self) -> Coordinate {
        Coordinate::new(
            self.filename.clone(),
            self.line,
            self.column,
            self.text.clone(),
        )
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        c
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.current).copied()
    }
}

impl Iterator for Scanner {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Result<Token>> {
        if self.failed {
            return None;
        }

        loop {
            match self.peek() {
                None => return None,
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some(';') => self.skip_line_comment(),
                Some(_) => break,
            }
        }

        let result = self.scan_token();
        if let Err(err) = &result {
            self.failed = true;
            tracing::trace!(at = %err.coordinate(), "lexical error");
        }
        Some(result)
    }
}

/// First character of a symbol: anything but a paren, quote, double
/// quote, whitespace, digit, `;` or `.`.
fn is_symbol_start(c: char) -> bool {
    !matches!(c, '(' | ')' | '"' | '\'' | ';' | '.') && !c.is_whitespace() && !c.is_ascii_digit()
}

/// Continuation of a symbol: anything but a paren, quote, double quote,
/// whitespace, `;` or `#`.
fn is_symbol_continue(c: char) -> bool {
    !matches!(c, '(' | ')' | '"' | '\'' | ';' | '#') && !c.is_whitespace()
}
