//! Syntax analysis: tokens to AST
//!
//! [`Parser`] drives a [`Lexer`] and builds a [`Program`], collecting
//! [`ParseError`]s along the way instead of stopping at the first one.

pub mod error;
pub mod parser;
pub mod precedence;

use crate::ast::Program;
use crate::lexical::Lexer;

pub use error::ParseError;
pub use parser::Parser;
pub use precedence::Precedence;

/// Parse a complete source string with default preferences
pub fn parse(source: &str) -> (Program, Vec<ParseError>) {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();
    (program, parser.into_errors())
}
