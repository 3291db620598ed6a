// Internal modules
pub mod ast;
pub mod config;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use ast::{Node, Program};
pub use lexical::{tokenize, Lexer};
pub use pipeline::{process_file, process_source, PipelineError, PipelineResult};
pub use syntax::{parse, ParseError, Parser};
pub use tokens::{Token, TokenKind};

pub use pipeline::output::PipelineOutput;
