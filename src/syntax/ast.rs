//! AST types for the Art language.
//!
//! Nodes form a closed tagged union, built bottom-up by the grammar and
//! owned exclusively by the tree that contains them. Every node carries the
//! span of the source text that produced it.

use serde::Serialize;

use crate::diagnostics::Span;

/// Wrapper carrying source span information with any value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithSpan<T> {
    pub value: T,
    pub span: Span,
}

impl<T> WithSpan<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }
}

/// Canonical AST node type.
pub type AstNode = WithSpan<Expr>;

/// Arithmetic operator symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(BinOp::Add),
            "-" => Some(BinOp::Sub),
            "*" => Some(BinOp::Mul),
            "/" => Some(BinOp::Div),
            _ => None,
        }
    }
}

/// The closed union of Art AST node kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    /// Single-quoted string literal content (no escape processing).
    Str(String),
    Number(f64),
    /// A variable reference, or the name at a binding site.
    Name(String),
    Operator(BinOp),
    /// Wrapper produced by the `value` production.
    Value(Box<AstNode>),
    /// Strictly binary operation; chains are nested left-associatively by
    /// the grammar, with no precedence.
    Operation {
        left: Box<AstNode>,
        op: Box<AstNode>,
        right: Box<AstNode>,
    },
    /// User-defined value mapper: ordered parameter names and an operation
    /// body.
    Mapper {
        params: Vec<AstNode>,
        body: Box<AstNode>,
    },
    Attribute {
        name: String,
        value: Box<AstNode>,
    },
    /// Ordered attribute nodes; duplicate names later in the list override
    /// earlier ones at resolution time.
    AttributeList(Vec<AstNode>),
    /// Ordered command nodes.
    Block(Vec<AstNode>),
    Object {
        name: Box<AstNode>,
        attributes: Box<AstNode>,
        block: Box<AstNode>,
    },
    Command {
        name: String,
        args: Box<AstNode>,
    },
    /// Command-specific positional argument payload.
    Args(Vec<AstNode>),
}

impl Expr {
    /// The tag name of this node kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Str(_) => "string",
            Expr::Number(_) => "number",
            Expr::Name(_) => "var-name",
            Expr::Operator(_) => "operator",
            Expr::Value(_) => "value",
            Expr::Operation { .. } => "operation",
            Expr::Mapper { .. } => "mapper",
            Expr::Attribute { .. } => "attribute",
            Expr::AttributeList(_) => "attribute-list",
            Expr::Block(_) => "block",
            Expr::Object { .. } => "object",
            Expr::Command { .. } => "command",
            Expr::Args(_) => "args",
        }
    }

    /// Source-shaped rendering, for debugging and test assertions.
    pub fn pretty(&self) -> String {
        match self {
            Expr::Str(s) => format!("'{s}'"),
            Expr::Number(n) => n.to_string(),
            Expr::Name(n) => n.clone(),
            Expr::Operator(op) => op.symbol().to_string(),
            Expr::Value(inner) => inner.value.pretty(),
            Expr::Operation { left, op, right } => format!(
                "({} {} {})",
                left.value.pretty(),
                op.value.pretty(),
                right.value.pretty()
            ),
            Expr::Mapper { params, body } => {
                let params = params
                    .iter()
                    .map(|p| p.value.pretty())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("({params}) => {}", body.value.pretty())
            }
            Expr::Attribute { name, value } => format!("{name}: {}", value.value.pretty()),
            Expr::AttributeList(attrs) => {
                let attrs = attrs
                    .iter()
                    .map(|a| a.value.pretty())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("({attrs})")
            }
            Expr::Block(commands) => {
                let commands = commands
                    .iter()
                    .map(|c| c.value.pretty())
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("{{ {commands} }}")
            }
            Expr::Object {
                name,
                attributes,
                block,
            } => format!(
                "{}{}{}",
                name.value.pretty(),
                attributes.value.pretty(),
                block.value.pretty()
            ),
            Expr::Command { name, args } => format!("{name} {}", args.value.pretty()),
            Expr::Args(items) => items
                .iter()
                .map(|a| a.value.pretty())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}
