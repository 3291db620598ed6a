//! Parse diagnostics with error code mapping
//!
//! Every diagnostic is recoverable: the parser records it and keeps going.
//! Callers treat a non-empty error list as "do not trust this tree".

use serde::{Deserialize, Serialize};

use crate::logging::{codes, Code};
use crate::tokens::TokenKind;
use crate::utils::Span;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ParseError {
    #[error("expected next token {expected}, got {actual}")]
    UnexpectedToken {
        expected: TokenKind,
        actual: TokenKind,
        span: Span,
    },

    #[error("no prefix parse function for {kind}")]
    NoPrefixParseFn { kind: TokenKind, span: Span },

    #[error("could not parse {literal} as int64")]
    IntegerConversion { literal: String, span: Span },

    /// Resource limit rather than a grammar error; the rest of the
    /// statement is skipped
    #[error("expression nesting exceeds maximum depth of {max_depth}")]
    NestingTooDeep { max_depth: usize, span: Span },
}

impl ParseError {
    pub fn unexpected_token(expected: TokenKind, actual: TokenKind, span: Span) -> Self {
        Self::UnexpectedToken {
            expected,
            actual,
            span,
        }
    }

    pub fn no_prefix_parse_fn(kind: TokenKind, span: Span) -> Self {
        Self::NoPrefixParseFn { kind, span }
    }

    pub fn integer_conversion(literal: &str, span: Span) -> Self {
        Self::IntegerConversion {
            literal: literal.to_string(),
            span,
        }
    }

    pub fn nesting_too_deep(max_depth: usize, span: Span) -> Self {
        Self::NestingTooDeep { max_depth, span }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::UnexpectedToken { .. } => codes::syntax::UNEXPECTED_TOKEN,
            Self::NoPrefixParseFn { .. } => codes::syntax::NO_PREFIX_PARSE_FN,
            Self::IntegerConversion { .. } => codes::syntax::INTEGER_CONVERSION,
            Self::NestingTooDeep { .. } => codes::syntax::NESTING_TOO_DEEP,
        }
    }

    /// Location of the token the diagnostic is about
    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::NoPrefixParseFn { span, .. }
            | Self::IntegerConversion { span, .. }
            | Self::NestingTooDeep { span, .. } => *span,
        }
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn description(&self) -> &'static str {
        codes::get_description(self.error_code().as_str())
    }

    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.error_code().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    #[test]
    fn test_messages() {
        let span = Span::point(Position::start());

        assert_eq!(
            ParseError::unexpected_token(TokenKind::Ident, TokenKind::Assign, span).to_string(),
            "expected next token IDENT, got ="
        );
        assert_eq!(
            ParseError::unexpected_token(TokenKind::Assign, TokenKind::Int, span).to_string(),
            "expected next token =, got INT"
        );
        assert_eq!(
            ParseError::no_prefix_parse_fn(TokenKind::Illegal, span).to_string(),
            "no prefix parse function for ILLEGAL"
        );
        assert_eq!(
            ParseError::integer_conversion("99999999999999999999", span).to_string(),
            "could not parse 99999999999999999999 as int64"
        );
        assert_eq!(
            ParseError::nesting_too_deep(256, span).to_string(),
            "expression nesting exceeds maximum depth of 256"
        );
    }

    #[test]
    fn test_error_codes() {
        let span = Span::dummy();

        assert_eq!(
            ParseError::unexpected_token(TokenKind::Ident, TokenKind::Eof, span)
                .error_code()
                .as_str(),
            "E050"
        );
        assert_eq!(
            ParseError::no_prefix_parse_fn(TokenKind::Semicolon, span)
                .error_code()
                .as_str(),
            "E051"
        );
        assert_eq!(
            ParseError::integer_conversion("1", span).error_code().as_str(),
            "E052"
        );
        assert_eq!(
            ParseError::nesting_too_deep(8, span).error_code().as_str(),
            "E053"
        );
    }

    #[test]
    fn test_metadata_lookups() {
        let error = ParseError::no_prefix_parse_fn(TokenKind::Illegal, Span::dummy());
        assert_ne!(error.description(), "Unknown error");
        assert!(!error.recommended_action().is_empty());
        assert!(!error.severity().is_empty());
    }
}
