//! Error types and source positions for the reader.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

/// A position in source text, attached to every token and AST node.
///
/// `line` is 1-based, `column` is 0-based. The coordinate also carries a
/// shared reference to the full source text so a diagnostic can reproduce
/// the offending line; cloning is cheap.
#[derive(Debug, Clone, Serialize)]
pub struct Coordinate {
    /// Label for the input, used only in diagnostics
    pub filename: Arc<str>,
    /// Line number, 1-based
    pub line: usize,
    /// Column number, 0-based
    pub column: usize,
    /// The full source text the position points into
    #[serde(skip)]
    pub source: Arc<str>,
}

impl Coordinate {
    /// Creates a coordinate pointing into `source`
    pub fn new(filename: Arc<str>, line: usize, column: usize, source: Arc<str>) -> Self {
        Coordinate {
            filename,
            line,
            column,
            source,
        }
    }

    /// The source line this coordinate points at, or an empty string if
    /// the line number is out of range.
    pub fn source_line(&self) -> &str {
        self.source
            .lines()
            .nth(self.line.saturating_sub(1))
            .unwrap_or("")
    }
}

/// Position equality; the source reference is ignored.
impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.filename == other.filename && self.line == other.line && self.column == other.column
    }
}

impl Eq for Coordinate {}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.column)
    }
}

/// An error message anchored to a [`Coordinate`].
///
/// Renders as the position and message, followed by the offending source
/// line and a caret under the failing column:
///
/// ```text
/// input:1:5: Syntax Error
///     (foo ")
///          ^
/// ```
///
/// Rendering clamps rather than panics when the position falls outside
/// the source (an out-of-range line renders as empty, a column past the
/// end of its line pads the caret beyond it).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoordinatedError {
    /// Human-readable description
    pub message: String,
    /// Where in the source the error was detected
    pub coord: Coordinate,
}

impl CoordinatedError {
    /// Creates an error anchored at `coord`
    pub fn new(message: impl Into<String>, coord: Coordinate) -> Self {
        CoordinatedError {
            message: message.into(),
            coord,
        }
    }
}

impl fmt::Display for CoordinatedError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}: {}\n    {}\n    {}^",
            self.coord,
            self.message,
            self.coord.source_line(),
            " ".repeat(self.coord.column)
        )
    }
}

impl std::error::Error for CoordinatedError {}

/// Reader errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Lexical error: an unmatched character, a quote mark immediately
    /// followed by whitespace, `)` or a comment, or a numeric literal
    /// whose text does not fit the native payload type.
    #[error(transparent)]
    Lexical(CoordinatedError),

    /// A `)` with no matching `(` still open.
    #[error(transparent)]
    UnbalancedClose(CoordinatedError),

    /// End of input with an open `(` or a dangling `'`.
    #[error(transparent)]
    IncompleteForm(CoordinatedError),
}

impl Error {
    /// Lexical error with the scanner's uniform message
    pub fn lexical(coord: Coordinate) -> Self {
        Error::Lexical(CoordinatedError::new("Syntax Error", coord))
    }

    /// Unmatched `)` at `coord`
    pub fn unbalanced_close(coord: Coordinate) -> Self {
        Error::UnbalancedClose(CoordinatedError::new(
            "Syntax Error: too many closing parenthesis",
            coord,
        ))
    }

    /// Input ended with an unfinished form; `coord` is the last token
    /// processed.
    pub fn incomplete_form(coord: Coordinate) -> Self {
        Error::IncompleteForm(CoordinatedError::new("Syntax Error: incomplete parse", coord))
    }

    /// The position the error is anchored to
    pub fn coordinate(&self) -> &Coordinate {
        match self {
            Error::Lexical(e) | Error::UnbalancedClose(e) | Error::IncompleteForm(e) => &e.coord,
        }
    }
}

/// Result type for reader operations
pub type Result<T> = std::result::Result<T, Error>;
