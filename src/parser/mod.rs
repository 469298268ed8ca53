//! Parsing
//!
//! Assembles the token stream into abstract syntax trees, one completed
//! top-level form at a time.

mod ast;
mod form_parser;

pub use ast::{ExprKind, Expression};
pub use form_parser::Parser;
