//! The Art grammar, built entirely from the combinator library.
//!
//! Rules are constructed once behind `Lazy` cells and referenced through
//! `recursive` thunks where the grammar refers to itself (values nest
//! mappers, blocks nest command lists). The public accessors hand out cheap
//! clones of the shared rules.
//!
//! Two commands exist: `def name value` and `draw object`. A bare object is
//! an implicit `draw`. Any other explicit keyword (letters followed by
//! whitespace) is a grammar-level failure naming the keyword — there is no
//! fallback to an implicit draw once a keyword head has matched.

use once_cell::sync::Lazy;

use crate::diagnostics::Span;
use crate::do_parse;
use crate::parser::combinators::{
    any_of_string, between, character, choice, digits, end_of_input, everything_until, letters,
    literal, many, many1, optional_whitespace, possibly, recursive, regex_match, sep_by, take_left,
    take_right, whitespace,
};
use crate::parser::{fail, ParseError, Parser};
use crate::syntax::ast::{AstNode, BinOp, Expr, WithSpan};

fn parenthesized<A: 'static>(inner: Parser<A>) -> Parser<A> {
    between(character('('), character(')'), inner)
}

fn braced<A: 'static>(inner: Parser<A>) -> Parser<A> {
    between(character('{'), character('}'), inner)
}

fn angled<A: 'static>(inner: Parser<A>) -> Parser<A> {
    between(character('<'), character('>'), inner)
}

/// Comma with optional whitespace on both sides.
fn comma_separator() -> Parser<char> {
    between(optional_whitespace(), optional_whitespace(), character(','))
}

/// Angle-bracket-quoted free-form name, or identifier-style
/// letter-then-alphanumerics.
static VAR_NAME: Lazy<Parser<AstNode>> = Lazy::new(|| {
    choice(vec![
        angled(
            many(choice(vec![
                letters(),
                digits(),
                any_of_string("$#- ").map(|c| c.to_string()),
            ]))
            .map(|parts| parts.concat()),
        ),
        regex_match("^[A-Za-z][A-Za-z0-9]*"),
    ])
    .map_with_span(|name, span| WithSpan::new(Expr::Name(name), span))
});

/// Digits with an optional fractional part.
static NUMBER: Lazy<Parser<AstNode>> = Lazy::new(|| {
    do_parse!(
        let whole = digits();
        let frac = possibly(take_right(character('.'), digits()));
        yield match frac {
            Some(frac) => format!("{whole}.{frac}"),
            None => whole,
        }
    )
    .map_with_span(|text, span| {
        // digit runs always parse as f64
        WithSpan::new(Expr::Number(text.parse().unwrap()), span)
    })
});

/// Single-quote delimited, no escape processing: the content is everything
/// up to the next quote.
static STRING: Lazy<Parser<AstNode>> = Lazy::new(|| {
    between(
        character('\''),
        character('\''),
        everything_until(character('\'')),
    )
    .map_with_span(|content, span| WithSpan::new(Expr::Str(content), span))
});

static OPERATOR: Lazy<Parser<AstNode>> = Lazy::new(|| {
    choice(vec![
        literal("+"),
        literal("-"),
        literal("*"),
        literal("/"),
    ])
    .map_with_span(|symbol, span| {
        let op = match symbol {
            "+" => BinOp::Add,
            "-" => BinOp::Sub,
            "*" => BinOp::Mul,
            "/" => BinOp::Div,
            other => unreachable!("operator choice is closed, got {other:?}"),
        };
        WithSpan::new(Expr::Operator(op), span)
    })
});

/// Nested mapper, number, string, or variable name — tried in that order.
static VALUE: Lazy<Parser<AstNode>> = Lazy::new(|| {
    choice(vec![
        recursive(|| MAPPER.clone()),
        NUMBER.clone(),
        STRING.clone(),
        VAR_NAME.clone(),
    ])
    .map_with_span(|node, span| WithSpan::new(Expr::Value(Box::new(node)), span))
});

/// A value followed by one or more `operator value` pairs, folded left into
/// nested strictly-binary operation nodes: `2 + 3 * 1` is `((2 + 3) * 1)`.
/// Flat left-to-right, no precedence.
static OPERATION: Lazy<Parser<AstNode>> = Lazy::new(|| {
    do_parse!(
        let first = VALUE.clone();
        let rest = many1(do_parse!(
            optional_whitespace();
            let op = OPERATOR.clone();
            optional_whitespace();
            let right = VALUE.clone();
            yield (op, right)
        ));
        yield fold_operation(first, rest)
    )
});

fn fold_operation(first: AstNode, rest: Vec<(AstNode, AstNode)>) -> AstNode {
    rest.into_iter().fold(first, |left, (op, right)| {
        let span = left.span.merge(right.span);
        WithSpan::new(
            Expr::Operation {
                left: Box::new(left),
                op: Box::new(op),
                right: Box::new(right),
            },
            span,
        )
    })
}

/// One parameter name, or a parenthesized comma-separated list, then `=>`
/// and an operation body.
static MAPPER: Lazy<Parser<AstNode>> = Lazy::new(|| {
    do_parse!(
        let params = choice(vec![
            VAR_NAME.clone().map(|name| vec![name]),
            parenthesized(sep_by(comma_separator(), VAR_NAME.clone())),
        ]);
        optional_whitespace();
        literal("=>");
        optional_whitespace();
        let body = OPERATION.clone();
        yield (params, body)
    )
    .map_with_span(|(params, body), span| {
        WithSpan::new(
            Expr::Mapper {
                params,
                body: Box::new(body),
            },
            span,
        )
    })
});

/// `name : value`, where the value position also admits an operation chain.
static ATTRIBUTE: Lazy<Parser<AstNode>> = Lazy::new(|| {
    do_parse!(
        let name = letters();
        optional_whitespace();
        literal(":");
        optional_whitespace();
        let value = choice(vec![OPERATION.clone(), VALUE.clone()]);
        yield (name, value)
    )
    .map_with_span(|(name, value), span| {
        WithSpan::new(
            Expr::Attribute {
                name,
                value: Box::new(value),
            },
            span,
        )
    })
});

static ATTRIBUTE_LIST: Lazy<Parser<AstNode>> = Lazy::new(|| {
    parenthesized(sep_by(comma_separator(), ATTRIBUTE.clone()))
        .map_with_span(|attributes, span| WithSpan::new(Expr::AttributeList(attributes), span))
});

static BLOCK: Lazy<Parser<AstNode>> = Lazy::new(|| {
    braced(take_left(
        recursive(|| COMMAND_LIST.clone()),
        optional_whitespace(),
    ))
    .map_with_span(|commands, span| WithSpan::new(Expr::Block(commands), span))
});

/// Name, optional attribute list, optional block. Absent parts become empty
/// nodes.
static OBJECT: Lazy<Parser<AstNode>> = Lazy::new(|| {
    do_parse!(
        let name = VAR_NAME.clone();
        optional_whitespace();
        let attributes = possibly(ATTRIBUTE_LIST.clone());
        optional_whitespace();
        let block = possibly(BLOCK.clone());
        yield build_object(name, attributes, block)
    )
});

fn build_object(name: AstNode, attributes: Option<AstNode>, block: Option<AstNode>) -> AstNode {
    let empty = Span::new(name.span.end, name.span.end);
    let attributes = attributes.unwrap_or_else(|| WithSpan::new(Expr::AttributeList(Vec::new()), empty));
    let block = block.unwrap_or_else(|| WithSpan::new(Expr::Block(Vec::new()), empty));
    let span = name.span.merge(attributes.span).merge(block.span);
    WithSpan::new(
        Expr::Object {
            name: Box::new(name),
            attributes: Box::new(attributes),
            block: Box::new(block),
        },
        span,
    )
}

/// `def` arguments: a name, whitespace, and the value to bind. The value
/// admits a mapper, an object, a number, or a string; bare names parse as
/// attribute-less objects.
static DEF_ARGS: Lazy<Parser<AstNode>> = Lazy::new(|| {
    do_parse!(
        let name = VAR_NAME.clone();
        whitespace();
        let value = DEF_VALUE.clone();
        yield (name, value)
    )
    .map_with_span(|(name, value), span| WithSpan::new(Expr::Args(vec![name, value]), span))
});

static DEF_VALUE: Lazy<Parser<AstNode>> = Lazy::new(|| {
    choice(vec![
        recursive(|| MAPPER.clone()),
        OBJECT.clone(),
        NUMBER.clone(),
        STRING.clone(),
    ])
});

/// `draw` arguments: the object to render.
static DRAW_ARGS: Lazy<Parser<AstNode>> = Lazy::new(|| {
    OBJECT
        .clone()
        .map_with_span(|object, span| WithSpan::new(Expr::Args(vec![object]), span))
});

/// Head of a command: either an explicit keyword or the arguments of an
/// implicit draw.
#[derive(Clone)]
enum CommandHead {
    Keyword(String),
    Implicit(AstNode),
}

static COMMAND: Lazy<Parser<AstNode>> = Lazy::new(|| {
    choice(vec![
        take_left(letters(), whitespace()).map(CommandHead::Keyword),
        DRAW_ARGS.clone().map(CommandHead::Implicit),
    ])
    .chain(|head| match head {
        CommandHead::Implicit(args) => {
            let span = args.span;
            Parser::of(WithSpan::new(
                Expr::Command {
                    name: "draw".to_string(),
                    args: Box::new(args),
                },
                span,
            ))
        }
        CommandHead::Keyword(keyword) => keyword_args(keyword),
    })
    .map_with_span(|command, span| WithSpan::new(command.value, span))
});

fn keyword_args(keyword: String) -> Parser<AstNode> {
    let args_parser = match keyword.as_str() {
        "def" => DEF_ARGS.clone(),
        "draw" => DRAW_ARGS.clone(),
        _ => {
            return fail(ParseError::Message(format!(
                "unrecognized command '{keyword}'"
            )))
        }
    };
    args_parser.map(move |args| {
        let span = args.span;
        WithSpan::new(
            Expr::Command {
                name: keyword.clone(),
                args: Box::new(args),
            },
            span,
        )
    })
}

static COMMAND_LIST: Lazy<Parser<Vec<AstNode>>> =
    Lazy::new(|| many(take_right(optional_whitespace(), COMMAND.clone())));

// ---------------------------------------------------------------------------
// Public accessors
// ---------------------------------------------------------------------------

pub fn variable_name() -> Parser<AstNode> {
    VAR_NAME.clone()
}

pub fn number() -> Parser<AstNode> {
    NUMBER.clone()
}

pub fn string_literal() -> Parser<AstNode> {
    STRING.clone()
}

pub fn operator() -> Parser<AstNode> {
    OPERATOR.clone()
}

pub fn value() -> Parser<AstNode> {
    VALUE.clone()
}

pub fn operation() -> Parser<AstNode> {
    OPERATION.clone()
}

pub fn mapper() -> Parser<AstNode> {
    MAPPER.clone()
}

pub fn attribute() -> Parser<AstNode> {
    ATTRIBUTE.clone()
}

pub fn attribute_list() -> Parser<AstNode> {
    ATTRIBUTE_LIST.clone()
}

pub fn block() -> Parser<AstNode> {
    BLOCK.clone()
}

pub fn object() -> Parser<AstNode> {
    OBJECT.clone()
}

pub fn command() -> Parser<AstNode> {
    COMMAND.clone()
}

/// The bare command-list rule, without end-of-input anchoring.
pub fn command_list() -> Parser<Vec<AstNode>> {
    COMMAND_LIST.clone()
}

/// The grammar entry point: a command list anchored to consume the whole
/// input, so trailing garbage is a syntax error rather than a silently
/// truncated parse.
///
/// When input remains, the command rule is re-tried as a choice alternative
/// so the furthest-progress tie-break reports the command's own failure
/// (say, an unrecognized keyword) instead of a bare end-of-input mismatch.
pub fn program() -> Parser<Vec<AstNode>> {
    do_parse!(
        let commands = COMMAND_LIST.clone();
        optional_whitespace();
        choice(vec![end_of_input(), COMMAND.clone().map(|_| ())]);
        yield commands
    )
}
