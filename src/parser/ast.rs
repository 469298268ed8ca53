use std::fmt;

use serde::Serialize;

use crate::error::Coordinate;

/// A single value in the abstract syntax tree
///
/// Every value carries the position at which it began in source: for an
/// [`ExprKind::SExpression`] the opening `(`, for an
/// [`ExprKind::Quoted`] the `'` marker, for literals the literal
/// itself. Values built by hand carry no position.
#[derive(Debug, Clone, Serialize)]
pub struct Expression {
    /// The value itself
    pub kind: ExprKind,
    /// Where the value began in source, if it came from source
    pub coord: Option<Coordinate>,
}

/// All expressible forms
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    /// An identifier; equality and ordering are string-based
    Symbol(String),
    /// Integer literal
    Integer(i64),
    /// Floating-point literal
    Float(f64),
    /// A parenthesized list; element order is parse order
    SExpression(Vec<Expression>),
    /// Exactly one value marked as not-to-be-evaluated; nesting is
    /// preserved, never flattened
    Quoted(Box<Expression>),
}

impl Expression {
    /// Creates a value with an attached position
    pub fn new(kind: ExprKind, coord: Coordinate) -> Self {
        Expression {
            kind,
            coord: Some(coord),
        }
    }

    /// A positionless symbol
    pub fn symbol(name: impl Into<String>) -> Self {
        ExprKind::Symbol(name.into()).into()
    }

    /// A positionless integer literal
    pub fn integer(value: i64) -> Self {
        ExprKind::Integer(value).into()
    }

    /// A positionless float literal
    pub fn float(value: f64) -> Self {
        ExprKind::Float(value).into()
    }

    /// A positionless list
    pub fn list(elements: Vec<Expression>) -> Self {
        ExprKind::SExpression(elements).into()
    }

    /// A positionless quote wrapper
    pub fn quoted(inner: Expression) -> Self {
        ExprKind::Quoted(Box::new(inner)).into()
    }
}

impl From<ExprKind> for Expression {
    fn from(kind: ExprKind) -> Self {
        Expression { kind, coord: None }
    }
}

/// Structural equality; coordinates are ignored.
impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExprKind::Symbol(name) => write!(f, "{}", name),
            ExprKind::Integer(value) => write!(f, "{}", value),
            // A whole-valued float keeps its decimal point so the
            // rendering re-reads as a float, not an integer.
            ExprKind::Float(value) => {
                if value.fract() == 0.0 && value.is_finite() {
                    write!(f, "{:.1}", value)
                } else {
                    write!(f, "{}", value)
                }
            }
            ExprKind::SExpression(elements) => {
                write!(f, "(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, ")")
            }
            ExprKind::Quoted(inner) => write!(f, "'{}", inner),
        }
    }
}
