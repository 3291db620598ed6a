//! Lexical analysis for monke source text
//!
//! [`Lexer`] is pulled one token at a time by the parser. [`tokenize`] is a
//! convenience for callers that want the whole stream up front.

pub mod lexer;

use crate::config::runtime::LexicalPreferences;
use crate::tokens::{SpannedToken, TokenKind};

pub use lexer::{Lexer, LexicalMetrics};

/// Tokenize an entire source string, including the trailing EOF token
pub fn tokenize(source: &str) -> Vec<SpannedToken> {
    tokenize_with_preferences(source, LexicalPreferences::default())
}

pub fn tokenize_with_preferences(
    source: &str,
    preferences: LexicalPreferences,
) -> Vec<SpannedToken> {
    let mut lexer = Lexer::with_preferences(source, preferences);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token();
        let at_end = token.value.is(TokenKind::Eof);
        tokens.push(token);
        if at_end {
            return tokens;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_ends_with_single_eof() {
        let tokens = tokenize("let x = 5;");
        assert_eq!(tokens.len(), 6);
        assert!(tokens.last().is_some_and(|t| t.value.is(TokenKind::Eof)));
        assert_eq!(
            tokens.iter().filter(|t| t.value.is(TokenKind::Eof)).count(),
            1
        );
    }

    #[test]
    fn test_tokenize_empty_source() {
        let tokens = tokenize("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].span.start.offset, 0);
    }
}
