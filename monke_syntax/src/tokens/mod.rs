//! Token model for monke lexical analysis
//!
//! A token is a [`TokenKind`] plus the literal text that produced it. The
//! lexer hands tokens out as [`SpannedToken`]s so diagnostics can point at
//! the exact source range.
//!
//! ## Token kinds
//!
//! - **Identifiers and literals**: `IDENT` for `[A-Za-z_]+` words that are not
//!   keywords, `INT` for runs of decimal digits (conversion happens in the
//!   parser)
//! - **Operators**: `= + - ! * / < > == !=`
//! - **Delimiters**: `, ; ( ) { }`
//! - **Keywords**: `fn let true false if else return`. `fn`, `if`, `else`,
//!   `true` and `false` are reserved but no grammar uses them yet
//! - **Special**: `ILLEGAL` for any other character and `EOF` at end of input

pub mod token;

pub use token::{Token, TokenKind};

pub use crate::utils::{Span, Spanned};

/// Token with source location information
pub type SpannedToken = Spanned<Token>;
