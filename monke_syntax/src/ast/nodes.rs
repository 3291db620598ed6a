//! AST node definitions for monke programs
//!
//! Design principles:
//! - Strict tree: every child is owned by exactly one parent through `Box` or `Vec`
//! - Span tracking: every node records the source range it was built from
//! - Round-trippable rendering: `Display` gives a fully parenthesized form
//! - Serde compatible: nodes serialize for tooling and snapshot output

use crate::tokens::Token;
use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Behaviour shared by every node in the tree
pub trait Node: fmt::Display {
    /// Literal text of the token that started this node
    fn token_literal(&self) -> &str;

    fn span(&self) -> Span;
}

// === ROOT ===

/// Root of a parsed source file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl Node for Program {
    fn token_literal(&self) -> &str {
        self.statements
            .first()
            .map(|statement| statement.token_literal())
            .unwrap_or("")
    }

    fn span(&self) -> Span {
        match (self.statements.first(), self.statements.last()) {
            (Some(first), Some(last)) => first.span().merge(last.span()),
            _ => Span::dummy(),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}

// === STATEMENTS ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Let(LetStatement),
    Return(ReturnStatement),
    Expression(ExpressionStatement),
}

impl Node for Statement {
    fn token_literal(&self) -> &str {
        match self {
            Statement::Let(s) => s.token_literal(),
            Statement::Return(s) => s.token_literal(),
            Statement::Expression(s) => s.token_literal(),
        }
    }

    fn span(&self) -> Span {
        match self {
            Statement::Let(s) => s.span,
            Statement::Return(s) => s.span,
            Statement::Expression(s) => s.span,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let(s) => write!(f, "{}", s),
            Statement::Return(s) => write!(f, "{}", s),
            Statement::Expression(s) => write!(f, "{}", s),
        }
    }
}

/// `let <name> = <value>;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetStatement {
    pub token: Token,
    pub name: Identifier,
    /// Bound value; the parser does not parse initializers yet
    pub value: Option<Expression>,
    pub span: Span,
}

impl Node for LetStatement {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }

    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for LetStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} = ", self.token_literal(), self.name)?;
        if let Some(value) = &self.value {
            write!(f, "{}", value)?;
        }
        f.write_str(";")
    }
}

/// `return <value>;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStatement {
    pub token: Token,
    pub value: Option<Expression>,
    pub span: Span,
}

impl Node for ReturnStatement {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }

    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for ReturnStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.token_literal())?;
        if let Some(value) = &self.value {
            write!(f, "{}", value)?;
        }
        f.write_str(";")
    }
}

/// A bare expression used as a statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionStatement {
    /// First token of the expression
    pub token: Token,
    pub expression: Expression,
    pub span: Span,
}

impl Node for ExpressionStatement {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }

    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for ExpressionStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}

// === EXPRESSIONS ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Identifier(Identifier),
    Integer(IntegerLiteral),
    Prefix(PrefixExpression),
    Infix(InfixExpression),
}

impl Node for Expression {
    fn token_literal(&self) -> &str {
        match self {
            Expression::Identifier(e) => e.token_literal(),
            Expression::Integer(e) => e.token_literal(),
            Expression::Prefix(e) => e.token_literal(),
            Expression::Infix(e) => e.token_literal(),
        }
    }

    fn span(&self) -> Span {
        match self {
            Expression::Identifier(e) => e.span,
            Expression::Integer(e) => e.span,
            Expression::Prefix(e) => e.span,
            Expression::Infix(e) => e.span,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(e) => write!(f, "{}", e),
            Expression::Integer(e) => write!(f, "{}", e),
            Expression::Prefix(e) => write!(f, "{}", e),
            Expression::Infix(e) => write!(f, "{}", e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub token: Token,
    pub value: String,
    pub span: Span,
}

impl Node for Identifier {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }

    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegerLiteral {
    pub token: Token,
    pub value: i64,
    pub span: Span,
}

impl Node for IntegerLiteral {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }

    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for IntegerLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token.literal)
    }
}

/// `<operator><right>`, rendered `(<operator><right>)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixExpression {
    pub token: Token,
    pub operator: String,
    pub right: Box<Expression>,
    pub span: Span,
}

impl Node for PrefixExpression {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }

    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for PrefixExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}{})", self.operator, self.right)
    }
}

/// `<left> <operator> <right>`, rendered `(<left> <operator> <right>)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfixExpression {
    /// The operator token
    pub token: Token,
    pub left: Box<Expression>,
    pub operator: String,
    pub right: Box<Expression>,
    pub span: Span,
}

impl Node for InfixExpression {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }

    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for InfixExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.left, self.operator, self.right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenKind;

    fn ident(name: &str) -> Identifier {
        Identifier {
            token: Token::new(TokenKind::Ident, name),
            value: name.to_string(),
            span: Span::dummy(),
        }
    }

    fn int(value: i64) -> Expression {
        Expression::Integer(IntegerLiteral {
            token: Token::new(TokenKind::Int, value.to_string()),
            value,
            span: Span::dummy(),
        })
    }

    #[test]
    fn test_let_statement_rendering() {
        let program = Program::new(vec![Statement::Let(LetStatement {
            token: Token::new(TokenKind::Let, "let"),
            name: ident("myVar"),
            value: Some(Expression::Identifier(ident("anotherVar"))),
            span: Span::dummy(),
        })]);

        assert_eq!(program.to_string(), "let myVar = anotherVar;");
        assert_eq!(program.token_literal(), "let");
    }

    #[test]
    fn test_statements_without_values() {
        let let_stmt = LetStatement {
            token: Token::new(TokenKind::Let, "let"),
            name: ident("x"),
            value: None,
            span: Span::dummy(),
        };
        let return_stmt = ReturnStatement {
            token: Token::new(TokenKind::Return, "return"),
            value: None,
            span: Span::dummy(),
        };

        assert_eq!(let_stmt.to_string(), "let x = ;");
        assert_eq!(return_stmt.to_string(), "return ;");
    }

    #[test]
    fn test_nested_expression_rendering() {
        let negated = Expression::Prefix(PrefixExpression {
            token: Token::new(TokenKind::Minus, "-"),
            operator: "-".to_string(),
            right: Box::new(Expression::Identifier(ident("a"))),
            span: Span::dummy(),
        });
        let product = InfixExpression {
            token: Token::new(TokenKind::Asterisk, "*"),
            left: Box::new(negated),
            operator: "*".to_string(),
            right: Box::new(int(5)),
            span: Span::dummy(),
        };

        assert_eq!(product.to_string(), "((-a) * 5)");
        assert_eq!(product.token_literal(), "*");
    }

    #[test]
    fn test_empty_program() {
        let program = Program::default();
        assert_eq!(program.token_literal(), "");
        assert_eq!(program.to_string(), "");
        assert!(program.is_empty());
    }

    #[test]
    fn test_program_serializes_to_json() {
        let program = Program::new(vec![Statement::Expression(ExpressionStatement {
            token: Token::new(TokenKind::Int, "7"),
            expression: int(7),
            span: Span::dummy(),
        })]);

        let json = serde_json::to_string(&program).expect("serialize program");
        let back: Program = serde_json::from_str(&json).expect("deserialize program");
        assert_eq!(back, program);
    }
}
