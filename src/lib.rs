//! # sexpr-stream
//!
//! A streaming front end for a minimal Lisp surface syntax:
//! parenthesized lists, quote sugar, symbols, integer and float
//! literals, and `;` line comments.
//!
//! The pipeline is two lazy stages, pulled on demand:
//!
//! ```text
//! source text → Scanner → tokens → Parser → AST values
//! ```
//!
//! - [`Scanner`] tokenizes source text, attaching an exact
//!   [`Coordinate`] to every token.
//! - [`Parser`] assembles tokens into [`Expression`] values with an
//!   explicit stack, yielding each top-level form the moment it is
//!   complete — a streaming consumer sees finished forms while later
//!   input is still unread.
//!
//! Both stages surface failures as [`Error`] values carrying a
//! [`CoordinatedError`], which renders the offending source line with a
//! caret under the failing column. The first error ends the stream.
//!
//! ## Quick start
//!
//! ```rust
//! use sexpr_stream::{Expression, Parser, Scanner};
//!
//! # fn main() -> sexpr_stream::Result<()> {
//! let source = "(def pi 3.14) '(a b)";
//!
//! let scanner = Scanner::new(source, "input");
//! let mut parser = Parser::new(scanner);
//! let forms = parser.parse()?;
//!
//! assert_eq!(forms.len(), 2);
//! assert_eq!(forms[0].to_string(), "(def pi 3.14)");
//! assert_eq!(forms[1], Expression::quoted(Expression::list(vec![
//!     Expression::symbol("a"),
//!     Expression::symbol("b"),
//! ])));
//! # Ok(())
//! # }
//! ```
//!
//! Or pull forms one at a time:
//!
//! ```rust
//! use sexpr_stream::{Parser, Scanner};
//!
//! let forms = Parser::new(Scanner::new("(a) (b) (c)", "input"));
//! for form in forms {
//!     match form {
//!         Ok(expr) => println!("{}", expr),
//!         Err(err) => {
//!             eprintln!("{}", err);
//!             break;
//!         }
//!     }
//! }
//! ```

/// Version of the reader
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod lexer;
pub mod parser;

// Re-export main types
pub use error::{Coordinate, CoordinatedError, Error, Result};
pub use lexer::{Scanner, Token, TokenKind};
pub use parser::{ExprKind, Expression, Parser};

/// Scans and parses `source` eagerly, returning every top-level form.
///
/// `filename` labels the input in diagnostics only; no file I/O happens
/// here.
///
/// ```rust
/// let forms = sexpr_stream::parse_str("(a (b c)) 42", "input").unwrap();
/// assert_eq!(forms.len(), 2);
/// ```
pub fn parse_str(source: &str, filename: &str) -> Result<Vec<Expression>> {
    Parser::new(Scanner::new(source, filename)).parse()
}
