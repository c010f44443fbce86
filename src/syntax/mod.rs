//! Syntax for the Art language: AST node types and the grammar that
//! produces them.

pub mod ast;
pub mod grammar;

pub use ast::{AstNode, BinOp, Expr, WithSpan};
