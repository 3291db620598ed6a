//! Pratt parser with error collection
//!
//! The parser pulls tokens from a [`Lexer`] through a two-token window
//! (current and peek). Statements are dispatched on the current token;
//! expressions use top-down operator precedence. Failures never abort the
//! pass: each one is recorded as a [`ParseError`] and parsing resumes.

use crate::ast::{
    Expression, ExpressionStatement, Identifier, InfixExpression, IntegerLiteral, LetStatement,
    Node, PrefixExpression, Program, ReturnStatement, Statement,
};
use crate::config::compile_time::syntax::MAX_PARSE_DEPTH;
use crate::config::runtime::ParserPreferences;
use crate::lexical::{Lexer, LexicalMetrics};
use crate::logging::codes;
use crate::syntax::error::ParseError;
use crate::syntax::precedence::Precedence;
use crate::tokens::{SpannedToken, TokenKind};
use crate::utils::Span;
use crate::{log_debug, log_error, log_success};

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: SpannedToken,
    peek: SpannedToken,
    errors: Vec<ParseError>,
    preferences: ParserPreferences,
    /// Expression nesting, counting both recursion and left-chained operators
    parse_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self::with_preferences(lexer, ParserPreferences::default())
    }

    pub fn with_preferences(mut lexer: Lexer<'a>, preferences: ParserPreferences) -> Self {
        let current = lexer.next_token();
        let peek = lexer.next_token();

        Self {
            lexer,
            current,
            peek,
            errors: Vec::new(),
            preferences,
            parse_depth: 0,
        }
    }

    /// Parse statements until EOF
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        while !self.current_is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                if self.preferences.trace_statements {
                    log_debug!("Parsed statement",
                        "statement" => &statement,
                        "span" => statement.span()
                    );
                }
                statements.push(statement);
            }
            self.advance();
        }

        log_success!(codes::success::AST_CONSTRUCTION_COMPLETE, "AST construction completed",
            "statements" => statements.len(),
            "errors" => self.errors.len()
        );

        Program::new(statements)
    }

    /// Diagnostics recorded so far, in the order they were found
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    pub fn lexical_metrics(&self) -> &LexicalMetrics {
        self.lexer.metrics()
    }

    // === TOKEN WINDOW ===

    fn advance(&mut self) {
        let next = self.lexer.next_token();
        self.current = std::mem::replace(&mut self.peek, next);
    }

    fn current_is(&self, kind: TokenKind) -> bool {
        self.current.value.is(kind)
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.value.is(kind)
    }

    /// Advance only if the peek token has the expected kind, otherwise
    /// record an error and stay put
    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_is(kind) {
            self.advance();
            true
        } else {
            let error = ParseError::unexpected_token(kind, self.peek.value.kind, self.peek.span);
            self.record(error);
            false
        }
    }

    /// Move forward until the current token is `;` or EOF
    fn skip_to_semicolon(&mut self) {
        while !self.current_is(TokenKind::Semicolon) && !self.current_is(TokenKind::Eof) {
            self.advance();
        }
    }

    fn record(&mut self, error: ParseError) {
        if self.preferences.log_diagnostics {
            log_error!(error.error_code(), &error.to_string(), span = error.span());
        }
        self.errors.push(error);
    }

    // === STATEMENTS ===

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.current.value.kind {
            TokenKind::Let => self.parse_let_statement().map(Statement::Let),
            TokenKind::Return => Some(Statement::Return(self.parse_return_statement())),
            _ => self
                .parse_expression_statement()
                .map(Statement::Expression),
        }
    }

    fn parse_let_statement(&mut self) -> Option<LetStatement> {
        let start = self.current.clone();

        if !self.expect_peek(TokenKind::Ident) {
            self.skip_to_semicolon();
            return None;
        }

        let name = Identifier {
            token: self.current.value.clone(),
            value: self.current.value.literal.clone(),
            span: self.current.span,
        };

        if !self.expect_peek(TokenKind::Assign) {
            self.skip_to_semicolon();
            return None;
        }

        // Initializers are skipped, not parsed
        self.skip_to_semicolon();

        Some(LetStatement {
            token: start.value,
            name,
            value: None,
            span: start.span.merge(self.current.span),
        })
    }

    fn parse_return_statement(&mut self) -> ReturnStatement {
        let start = self.current.clone();

        self.advance();
        self.skip_to_semicolon();

        ReturnStatement {
            token: start.value,
            value: None,
            span: start.span.merge(self.current.span),
        }
    }

    fn parse_expression_statement(&mut self) -> Option<ExpressionStatement> {
        let start = self.current.clone();
        let expression = self.parse_expression(Precedence::Lowest);

        // Terminators are optional, and a run of them is absorbed here
        while self.peek_is(TokenKind::Semicolon) {
            self.advance();
        }

        let expression = expression?;
        let span = start.span.merge(expression.span());

        Some(ExpressionStatement {
            token: start.value,
            expression,
            span,
        })
    }

    // === EXPRESSIONS ===

    fn parse_expression(&mut self, min: Precedence) -> Option<Expression> {
        let entry_depth = self.parse_depth;
        let expression = self.parse_expression_within_depth(min);
        self.parse_depth = entry_depth;
        expression
    }

    fn parse_expression_within_depth(&mut self, min: Precedence) -> Option<Expression> {
        self.descend(self.current.span)?;
        let mut left = self.parse_prefix()?;

        while !self.peek_is(TokenKind::Semicolon) && min < Precedence::of(self.peek.value.kind) {
            if !is_infix_operator(self.peek.value.kind) {
                return Some(left);
            }
            // Each chained operator deepens the left spine of the tree
            self.descend(self.peek.span)?;
            self.advance();
            left = self.parse_infix(left)?;
        }

        Some(left)
    }

    /// Enter one more level of nesting, or record the limit and abandon the
    /// rest of the statement
    fn descend(&mut self, span: Span) -> Option<()> {
        if self.parse_depth >= MAX_PARSE_DEPTH {
            log_debug!("Expression nesting limit reached",
                "depth" => self.parse_depth,
                "max_depth" => MAX_PARSE_DEPTH
            );
            self.record(ParseError::nesting_too_deep(MAX_PARSE_DEPTH, span));
            self.skip_to_semicolon();
            return None;
        }

        self.parse_depth += 1;
        Some(())
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        match self.current.value.kind {
            TokenKind::Ident => Some(self.parse_identifier()),
            TokenKind::Int => self.parse_integer_literal(),
            TokenKind::Bang | TokenKind::Minus => self.parse_prefix_expression(),
            kind => {
                let error = ParseError::no_prefix_parse_fn(kind, self.current.span);
                self.record(error);
                None
            }
        }
    }

    fn parse_identifier(&self) -> Expression {
        Expression::Identifier(Identifier {
            token: self.current.value.clone(),
            value: self.current.value.literal.clone(),
            span: self.current.span,
        })
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        match self.current.value.literal.parse::<i64>() {
            Ok(value) => Some(Expression::Integer(IntegerLiteral {
                token: self.current.value.clone(),
                value,
                span: self.current.span,
            })),
            Err(_) => {
                let error =
                    ParseError::integer_conversion(&self.current.value.literal, self.current.span);
                self.record(error);
                None
            }
        }
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let start = self.current.clone();

        self.advance();
        let right = self.parse_expression(Precedence::Prefix)?;
        let span = start.span.merge(right.span());

        Some(Expression::Prefix(PrefixExpression {
            operator: start.value.literal.clone(),
            token: start.value,
            right: Box::new(right),
            span,
        }))
    }

    fn parse_infix(&mut self, left: Expression) -> Option<Expression> {
        let operator = self.current.clone();
        let precedence = Precedence::of(operator.value.kind);

        self.advance();
        let right = self.parse_expression(precedence)?;
        let span = left.span().merge(right.span());

        Some(Expression::Infix(InfixExpression {
            operator: operator.value.literal.clone(),
            token: operator.value,
            left: Box::new(left),
            right: Box::new(right),
            span,
        }))
    }
}

fn is_infix_operator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Asterisk
            | TokenKind::Slash
            | TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::Gt
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::path::PathBuf;

    fn parse_source(source: &str) -> (Program, Vec<ParseError>) {
        let mut parser = Parser::new(Lexer::new(source));
        let program = parser.parse_program();
        (program, parser.into_errors())
    }

    fn parse_clean(source: &str) -> Program {
        let (program, errors) = parse_source(source);
        assert!(errors.is_empty(), "unexpected errors for {:?}: {:?}", source, errors);
        program
    }

    fn single_expression(program: &Program) -> &Expression {
        assert_eq!(program.statements.len(), 1, "program: {}", program);
        match &program.statements[0] {
            Statement::Expression(statement) => &statement.expression,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_let_statements() {
        let program = parse_clean("let x = 5;\nlet y = 10;\nlet foobar = 838383;\n");

        assert_eq!(program.statements.len(), 3);
        for (statement, name) in program.statements.iter().zip(["x", "y", "foobar"]) {
            assert_eq!(statement.token_literal(), "let");
            assert_matches!(statement, Statement::Let(s) if s.name.value == name && s.name.token_literal() == name);
        }
    }

    #[test]
    fn test_malformed_let_statements_report_each_error() {
        let (program, errors) = parse_source("let x 5;\nlet = 10;\nlet 838383;\n");

        assert!(program.statements.is_empty());
        assert_eq!(errors.len(), 3, "errors: {:?}", errors);
        assert_matches!(
            errors[0],
            ParseError::UnexpectedToken { expected: TokenKind::Assign, actual: TokenKind::Int, .. }
        );
        assert_matches!(
            errors[1],
            ParseError::UnexpectedToken { expected: TokenKind::Ident, actual: TokenKind::Assign, .. }
        );
        assert_matches!(
            errors[2],
            ParseError::UnexpectedToken { expected: TokenKind::Ident, actual: TokenKind::Int, .. }
        );
        assert_eq!(errors[1].to_string(), "expected next token IDENT, got =");
    }

    #[test]
    fn test_recovery_resumes_after_bad_let() {
        let program = {
            let (program, errors) = parse_source("let = 1; let ok = 2; ok;");
            assert_eq!(errors.len(), 1);
            program
        };

        assert_eq!(program.statements.len(), 2);
        assert_matches!(&program.statements[0], Statement::Let(s) if s.name.value == "ok");
        assert_eq!(program.statements[1].to_string(), "ok");
    }

    #[test]
    fn test_return_statements() {
        let program = parse_clean("return 5;\nreturn 10;\nreturn 993322;\n");

        assert_eq!(program.statements.len(), 3);
        for statement in &program.statements {
            assert_matches!(statement, Statement::Return(_));
            assert_eq!(statement.token_literal(), "return");
        }
    }

    #[test]
    fn test_values_are_not_parsed() {
        let program = parse_clean("let myVar = anotherVar; return x + y;");
        assert_eq!(program.to_string(), "let myVar = ;return ;");
    }

    #[test]
    fn test_missing_semicolon_terminates() {
        let program = parse_clean("let x = 5");
        assert_eq!(program.statements.len(), 1);

        let program = parse_clean("return 5");
        assert_eq!(program.statements.len(), 1);

        let (program, errors) = parse_source("let");
        assert!(program.statements.is_empty());
        assert_matches!(
            errors.as_slice(),
            [ParseError::UnexpectedToken { expected: TokenKind::Ident, actual: TokenKind::Eof, .. }]
        );
    }

    #[test]
    fn test_identifier_expression() {
        let program = parse_clean("foobar;");
        let expression = single_expression(&program);

        assert_matches!(expression, Expression::Identifier(ident) if ident.value == "foobar");
        assert_eq!(expression.token_literal(), "foobar");
    }

    #[test]
    fn test_integer_literal_expression() {
        let program = parse_clean("555;");
        let expression = single_expression(&program);

        assert_matches!(expression, Expression::Integer(int) if int.value == 555);
        assert_eq!(expression.token_literal(), "555");
    }

    #[test]
    fn test_prefix_expressions() {
        let cases = [("!5;", "!", "5"), ("-15;", "-", "15"), ("!foo", "!", "foo")];

        for (source, operator, operand) in cases {
            let program = parse_clean(source);
            let expression = single_expression(&program);

            assert_matches!(expression, Expression::Prefix(prefix)
                if prefix.operator == operator && prefix.right.to_string() == operand);
        }

        assert_eq!(parse_clean("!5").to_string(), "(!5)");
        assert_eq!(parse_clean("-15;").to_string(), "(-15)");
    }

    #[test]
    fn test_infix_expressions() {
        for operator in ["+", "-", "*", "/", ">", "<", "==", "!="] {
            let source = format!("5 {} 5;", operator);
            let program = parse_clean(&source);
            let expression = single_expression(&program);

            assert_matches!(expression, Expression::Infix(infix) if infix.operator == operator);
            assert_eq!(program.to_string(), format!("(5 {} 5)", operator));
        }
    }

    #[test]
    fn test_operator_precedence() {
        let cases = [
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b / c", "(a + (b / c))"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("3 + 4; -5 * 5", "(3 + 4)((-5) * 5)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
            ("3 + 4 * 5 == 3 * 1 + 4 * 5", "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))"),
        ];

        for (source, expected) in cases {
            assert_eq!(parse_clean(source).to_string(), expected, "source: {}", source);
        }
    }

    #[test]
    fn test_illegal_character_has_no_prefix_handler() {
        let (program, errors) = parse_source("@;");

        assert!(program.statements.is_empty());
        assert_matches!(
            errors.as_slice(),
            [ParseError::NoPrefixParseFn { kind: TokenKind::Illegal, .. }]
        );
        assert_eq!(errors[0].to_string(), "no prefix parse function for ILLEGAL");
    }

    #[test]
    fn test_integer_overflow_is_reported() {
        let (program, errors) = parse_source("99999999999999999999;");

        assert!(program.statements.is_empty());
        assert_matches!(
            &errors[..],
            [ParseError::IntegerConversion { literal, .. }] if literal == "99999999999999999999"
        );
    }

    #[test]
    fn test_missing_operand_drops_expression() {
        let (program, errors) = parse_source("1 +");

        assert!(program.statements.is_empty());
        assert_matches!(
            errors.as_slice(),
            [ParseError::NoPrefixParseFn { kind: TokenKind::Eof, .. }]
        );
    }

    #[test]
    fn test_repeated_semicolons_are_absorbed() {
        let program = parse_clean("a;;; b");
        assert_eq!(program.statements.len(), 2);
        assert_eq!(program.to_string(), "ab");
    }

    #[test]
    fn test_error_spans_point_at_offending_token() {
        let (_, errors) = parse_source("let x = 1;\nlet = 2;");

        let span = errors[0].span();
        assert_eq!(span.start.line, 2);
        assert_eq!(span.start.column, 5);
        assert_eq!(span.slice("let x = 1;\nlet = 2;"), "=");
    }

    #[test]
    fn test_statement_spans_cover_source() {
        let source = "let total = 10;\n-a * b;";
        let program = parse_clean(source);

        assert_eq!(program.statements[0].span().slice(source), "let total = 10;");
        assert_eq!(program.statements[1].span().slice(source), "-a * b");
    }

    #[test]
    fn test_diagnostics_reach_global_logger() {
        let memory = crate::logging::test_memory_logger();

        let errors = crate::logging::with_source_context(PathBuf::from("diagnostics.mk"), || {
            parse_source("let = 1; @").1
        });
        assert_eq!(errors.len(), 2);

        assert!(memory.has_error_with_code(codes::syntax::UNEXPECTED_TOKEN));
        assert!(memory.has_error_with_code(codes::syntax::NO_PREFIX_PARSE_FN));
        assert!(memory.has_success_with_code(codes::success::AST_CONSTRUCTION_COMPLETE));
        assert!(memory.has_success_with_code(codes::success::TOKENIZATION_COMPLETE));

        parse_source(&format!("{}1;", "-".repeat(MAX_PARSE_DEPTH * 2)));
        assert!(memory.has_error_with_code(codes::syntax::NESTING_TOO_DEEP));
    }

    #[test]
    fn test_deep_prefix_chain_is_reported_not_fatal() {
        let source = format!("{}1; ok;", "-".repeat(20_000));
        let (program, errors) = parse_source(&source);

        assert_matches!(
            errors.as_slice(),
            [ParseError::NestingTooDeep { max_depth, .. }] if *max_depth == MAX_PARSE_DEPTH
        );
        assert_eq!(program.statements.len(), 1);
        assert_eq!(program.to_string(), "ok");
    }

    #[test]
    fn test_long_operator_chain_is_reported_not_fatal() {
        let source = format!("1{}; x;", " + 1".repeat(20_000));
        let (program, errors) = parse_source(&source);

        assert_eq!(errors.len(), 1);
        assert_matches!(errors[0], ParseError::NestingTooDeep { .. });
        assert_eq!(program.to_string(), "x");
    }

    #[test]
    fn test_nesting_up_to_limit_parses() {
        let within = format!("{}1", "!".repeat(MAX_PARSE_DEPTH - 1));
        let program = parse_clean(&within);
        assert_eq!(program.statements.len(), 1);
        assert!(program.to_string().ends_with(&format!("1{}", ")".repeat(MAX_PARSE_DEPTH - 1))));

        let beyond = format!("{}1", "!".repeat(MAX_PARSE_DEPTH));
        let (program, errors) = parse_source(&beyond);
        assert!(program.statements.is_empty());
        assert_matches!(errors.as_slice(), [ParseError::NestingTooDeep { .. }]);
    }

    #[test]
    fn test_depth_resets_between_statements() {
        let statement = format!("{}1;", "-".repeat(MAX_PARSE_DEPTH - 1));
        let program = parse_clean(&statement.repeat(3));
        assert_eq!(program.statements.len(), 3);
    }

    #[test]
    fn test_empty_input() {
        let program = parse_clean("");
        assert!(program.statements.is_empty());
        assert_eq!(program.token_literal(), "");
    }

    #[test]
    fn test_parse_program_records_lexical_metrics() {
        let mut parser = Parser::new(Lexer::new("a + 1;"));
        parser.parse_program();

        assert_eq!(parser.lexical_metrics().total_tokens, 4);
        assert!(parser.errors().is_empty());
    }
}
