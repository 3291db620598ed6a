//! Character-level scanner producing spanned tokens on demand
//!
//! The lexer never fails. Characters it cannot classify come back as
//! `ILLEGAL` tokens and the parser decides what to do with them.

use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

use serde::{Deserialize, Serialize};

use crate::config::compile_time::lexical::MAX_LITERAL_PREVIEW;
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::tokens::{SpannedToken, Token, TokenKind};
use crate::utils::{Position, Span, Spanned};
use crate::{log_debug, log_success};

/// Per-lexer token counts
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub keyword_tokens: usize,
    pub identifier_tokens: usize,
    pub integer_tokens: usize,
    pub operator_tokens: usize,
    pub delimiter_tokens: usize,
    pub illegal_tokens: usize,

    // Only populated when operator tracking is enabled
    pub operator_usage_patterns: HashMap<String, usize>,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &Token, preferences: &LexicalPreferences) {
        self.total_tokens += 1;

        if !preferences.collect_detailed_metrics {
            return;
        }

        match token.kind {
            kind if kind.is_keyword() => self.keyword_tokens += 1,
            kind if kind.is_operator() => {
                self.operator_tokens += 1;

                if preferences.track_operator_patterns {
                    *self
                        .operator_usage_patterns
                        .entry(token.literal.clone())
                        .or_insert(0) += 1;
                }
            }
            kind if kind.is_delimiter() => self.delimiter_tokens += 1,
            TokenKind::Ident => self.identifier_tokens += 1,
            TokenKind::Int => self.integer_tokens += 1,
            TokenKind::Illegal => self.illegal_tokens += 1,
            _ => {}
        }
    }
}

/// On-demand lexer over a borrowed source string
pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<Chars<'a>>,
    position: Position,
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
    completion_logged: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_preferences(source, LexicalPreferences::default())
    }

    pub fn with_preferences(source: &'a str, preferences: LexicalPreferences) -> Self {
        Self {
            source,
            chars: source.chars().peekable(),
            position: Position::start(),
            metrics: LexicalMetrics::default(),
            preferences,
            completion_logged: false,
        }
    }

    /// Produce the next token. Once the input is exhausted every call
    /// returns the same EOF token.
    pub fn next_token(&mut self) -> SpannedToken {
        self.skip_whitespace();

        let start = self.position;
        let ch = match self.bump() {
            Some(ch) => ch,
            None => return self.eof_token(start),
        };

        let kind = match ch {
            '=' => self.with_trailing_eq(TokenKind::Assign, TokenKind::Eq),
            '!' => self.with_trailing_eq(TokenKind::Bang, TokenKind::NotEq),
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Asterisk,
            '/' => TokenKind::Slash,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            c if is_letter(c) => {
                self.bump_while(is_letter);
                TokenKind::lookup_ident(&self.source[start.offset..self.position.offset])
            }
            c if c.is_ascii_digit() => {
                self.bump_while(|c| c.is_ascii_digit());
                TokenKind::Int
            }
            _ => TokenKind::Illegal,
        };

        let span = Span::new(start, self.position);
        let token = Token::new(kind, span.slice(self.source));

        if kind == TokenKind::Illegal && self.preferences.log_illegal_characters {
            log_debug!("Illegal character in source",
                "literal" => preview(&token.literal),
                "span" => span
            );
        }

        self.metrics.record_token(&token, &self.preferences);
        Spanned::new(token, span)
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    fn eof_token(&mut self, at: Position) -> SpannedToken {
        if !self.completion_logged {
            self.completion_logged = true;
            log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
                "tokens" => self.metrics.total_tokens,
                "keywords" => self.metrics.keyword_tokens,
                "identifiers" => self.metrics.identifier_tokens,
                "integers" => self.metrics.integer_tokens,
                "operators" => self.metrics.operator_tokens,
                "illegal" => self.metrics.illegal_tokens
            );
        }

        Spanned::new(Token::eof(), Span::point(at))
    }

    fn with_trailing_eq(&mut self, single: TokenKind, double: TokenKind) -> TokenKind {
        if self.chars.peek() == Some(&'=') {
            self.bump();
            double
        } else {
            single
        }
    }

    fn skip_whitespace(&mut self) {
        self.bump_while(char::is_whitespace);
    }

    fn bump_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(&ch) = self.chars.peek() {
            if !predicate(ch) {
                break;
            }
            self.bump();
        }
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.position = self.position.advance(ch);
        Some(ch)
    }
}

/// Yields every token up to, but not including, EOF
impl Iterator for Lexer<'_> {
    type Item = SpannedToken;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.value.is(TokenKind::Eof) {
            None
        } else {
            Some(token)
        }
    }
}

fn is_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn preview(literal: &str) -> String {
    if literal.chars().count() <= MAX_LITERAL_PREVIEW {
        literal.to_string()
    } else {
        let truncated: String = literal.chars().take(MAX_LITERAL_PREVIEW).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_and_literals(source: &str) -> Vec<(TokenKind, String)> {
        let mut lexer = Lexer::new(source);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token().value;
            let done = token.is(TokenKind::Eof);
            out.push((token.kind, token.literal));
            if done {
                return out;
            }
        }
    }

    #[test]
    fn test_operators_and_delimiters() {
        let tokens = kinds_and_literals("=+(){},;");
        let expected = [
            (TokenKind::Assign, "="),
            (TokenKind::Plus, "+"),
            (TokenKind::LParen, "("),
            (TokenKind::RParen, ")"),
            (TokenKind::LBrace, "{"),
            (TokenKind::RBrace, "}"),
            (TokenKind::Comma, ","),
            (TokenKind::Semicolon, ";"),
            (TokenKind::Eof, ""),
        ];

        assert_eq!(tokens.len(), expected.len());
        for ((kind, literal), (want_kind, want_literal)) in tokens.iter().zip(expected) {
            assert_eq!(*kind, want_kind);
            assert_eq!(literal, want_literal);
        }
    }

    #[test]
    fn test_full_program() {
        let source = "let five = 5;\n\
                      let add = fn(x, y) { x + y; };\n\
                      !-/*5;\n\
                      5 < 10 > 5;\n\
                      if (5 < 10) { return true; } else { return false; }\n\
                      10 == 10; 10 != 9;";

        let kinds: Vec<TokenKind> = kinds_and_literals(source).into_iter().map(|(k, _)| k).collect();

        use TokenKind::*;
        let expected = vec![
            Let, Ident, Assign, Int, Semicolon,
            Let, Ident, Assign, Function, LParen, Ident, Comma, Ident, RParen,
            LBrace, Ident, Plus, Ident, Semicolon, RBrace, Semicolon,
            Bang, Minus, Slash, Asterisk, Int, Semicolon,
            Int, Lt, Int, Gt, Int, Semicolon,
            If, LParen, Int, Lt, Int, RParen, LBrace, Return, True, Semicolon,
            RBrace, Else, LBrace, Return, False, Semicolon, RBrace,
            Int, Eq, Int, Semicolon, Int, NotEq, Int, Semicolon,
            Eof,
        ];
        assert_eq!(kinds, expected);
    }

    #[test]
    fn test_eof_is_idempotent() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token().value.kind, TokenKind::Ident);

        let first = lexer.next_token();
        let second = lexer.next_token();
        let third = lexer.next_token();

        assert!(first.value.is(TokenKind::Eof));
        assert_eq!(first.value.literal, "");
        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[test]
    fn test_empty_and_whitespace_only_input() {
        assert_eq!(kinds_and_literals(""), vec![(TokenKind::Eof, String::new())]);
        assert_eq!(
            kinds_and_literals(" \t\r\n\u{00A0}\u{2003}"),
            vec![(TokenKind::Eof, String::new())]
        );
    }

    #[test]
    fn test_identifiers_exclude_digits() {
        let tokens = kinds_and_literals("foo_bar x1");
        assert_eq!(tokens[0], (TokenKind::Ident, "foo_bar".to_string()));
        assert_eq!(tokens[1], (TokenKind::Ident, "x".to_string()));
        assert_eq!(tokens[2], (TokenKind::Int, "1".to_string()));
    }

    #[test]
    fn test_illegal_characters_keep_whole_char() {
        let tokens = kinds_and_literals("@ é 5");
        assert_eq!(tokens[0], (TokenKind::Illegal, "@".to_string()));
        assert_eq!(tokens[1], (TokenKind::Illegal, "é".to_string()));
        assert_eq!(tokens[2], (TokenKind::Int, "5".to_string()));
    }

    #[test]
    fn test_spans_track_lines_and_columns() {
        let mut lexer = Lexer::new("let x\n  = 10;");
        let let_kw = lexer.next_token();
        let ident = lexer.next_token();
        let assign = lexer.next_token();
        let int = lexer.next_token();

        assert_eq!(let_kw.span.to_string(), "1:1-4");
        assert_eq!(ident.span.start, Position::new(4, 1, 5));
        assert_eq!(assign.span.start, Position::new(8, 2, 3));
        assert_eq!(int.span.slice("let x\n  = 10;"), "10");
    }

    #[test]
    fn test_iterator_stops_before_eof() {
        let tokens: Vec<SpannedToken> = Lexer::new("a + 1").collect();
        assert_eq!(tokens.len(), 3);
        assert!(tokens.iter().all(|t| !t.value.is(TokenKind::Eof)));
    }

    #[test]
    fn test_metrics_classify_tokens() {
        let mut lexer = Lexer::with_preferences(
            "let a = b + 1 + 2; $",
            LexicalPreferences {
                collect_detailed_metrics: true,
                track_operator_patterns: true,
                log_illegal_characters: false,
            },
        );
        while !lexer.next_token().value.is(TokenKind::Eof) {}

        let metrics = lexer.metrics();
        assert_eq!(metrics.total_tokens, 10);
        assert_eq!(metrics.keyword_tokens, 1);
        assert_eq!(metrics.identifier_tokens, 2);
        assert_eq!(metrics.integer_tokens, 2);
        assert_eq!(metrics.operator_tokens, 3);
        assert_eq!(metrics.delimiter_tokens, 1);
        assert_eq!(metrics.illegal_tokens, 1);
        assert_eq!(metrics.operator_usage_patterns.get("+"), Some(&2));
        assert_eq!(metrics.operator_usage_patterns.get("="), Some(&1));
    }

    #[test]
    fn test_metrics_without_detail_only_count_totals() {
        let mut lexer = Lexer::with_preferences(
            "a + b",
            LexicalPreferences {
                collect_detailed_metrics: false,
                track_operator_patterns: true,
                log_illegal_characters: false,
            },
        );
        let _: Vec<_> = lexer.by_ref().collect();

        assert_eq!(lexer.metrics().total_tokens, 3);
        assert_eq!(lexer.metrics().operator_tokens, 0);
        assert!(lexer.metrics().operator_usage_patterns.is_empty());
    }

    #[test]
    fn test_preview_truncates_long_literals() {
        let long = "x".repeat(MAX_LITERAL_PREVIEW + 10);
        let shown = preview(&long);
        assert!(shown.ends_with("..."));
        assert_eq!(shown.chars().count(), MAX_LITERAL_PREVIEW + 3);
        assert_eq!(preview("@"), "@");
    }
}
