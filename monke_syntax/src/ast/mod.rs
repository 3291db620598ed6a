//! Abstract syntax tree produced by the parser

pub mod nodes;

pub use nodes::{
    Expression, ExpressionStatement, Identifier, InfixExpression, IntegerLiteral, LetStatement,
    Node, PrefixExpression, Program, ReturnStatement, Statement,
};
