//! Tests for the Art grammar productions.

use art::parser::Parser;
use art::syntax::grammar;
use art::{AstNode, BinOp, Expr};

fn parsed(p: Parser<AstNode>, input: &str) -> AstNode {
    p.run(input)
        .unwrap_or_else(|e| panic!("parse of {input:?} failed: {}", e.error))
        .result
}

/// Unwraps the `value` production's wrapper node.
fn unwrapped(node: AstNode) -> Expr {
    match node.value {
        Expr::Value(inner) => inner.value,
        other => other,
    }
}

fn command_parts(node: AstNode) -> (String, Vec<AstNode>) {
    match node.value {
        Expr::Command { name, args } => match args.value {
            Expr::Args(items) => (name, items),
            other => panic!("expected args, got {}", other.kind_name()),
        },
        other => panic!("expected a command, got {}", other.kind_name()),
    }
}

// ---------------------------------------------------------------------------
// Leaf productions
// ---------------------------------------------------------------------------

#[test]
fn identifier_variable_names_are_letter_then_alphanumerics() {
    let ok = grammar::variable_name().run("circle9 rest").unwrap();
    assert_eq!(ok.result.value, Expr::Name("circle9".to_string()));
    assert_eq!(ok.index, 7);

    assert!(grammar::variable_name().run("9circle").is_err());
}

#[test]
fn angled_variable_names_admit_free_form_content() {
    let node = parsed(grammar::variable_name(), "<my name$2>");
    assert_eq!(node.value, Expr::Name("my name$2".to_string()));
}

#[test]
fn variable_name_spans_cover_the_consumed_text() {
    let node = parsed(grammar::variable_name(), "abc");
    assert_eq!((node.span.start, node.span.end), (0, 3));
}

#[test]
fn numbers_take_an_optional_fractional_part() {
    assert_eq!(
        parsed(grammar::number(), "42").value,
        Expr::Number(42.0)
    );
    assert_eq!(
        parsed(grammar::number(), "3.25").value,
        Expr::Number(3.25)
    );

    // a bare trailing dot is not part of the number
    let ok = grammar::number().run("3.").unwrap();
    assert_eq!(ok.result.value, Expr::Number(3.0));
    assert_eq!(ok.index, 1);
}

#[test]
fn strings_are_single_quoted_with_no_escapes() {
    assert_eq!(
        parsed(grammar::string_literal(), "'hello world'").value,
        Expr::Str("hello world".to_string())
    );
    assert!(grammar::string_literal().run("'unterminated").is_err());
}

#[test]
fn operators_are_the_four_arithmetic_symbols() {
    for (text, op) in [
        ("+", BinOp::Add),
        ("-", BinOp::Sub),
        ("*", BinOp::Mul),
        ("/", BinOp::Div),
    ] {
        assert_eq!(parsed(grammar::operator(), text).value, Expr::Operator(op));
    }
    assert!(grammar::operator().run("%").is_err());
}

#[test]
fn value_tries_mapper_then_number_then_string_then_name() {
    assert!(matches!(
        unwrapped(parsed(grammar::value(), "x => x + 1")),
        Expr::Mapper { .. }
    ));
    assert!(matches!(
        unwrapped(parsed(grammar::value(), "5")),
        Expr::Number(_)
    ));
    assert!(matches!(
        unwrapped(parsed(grammar::value(), "'s'")),
        Expr::Str(_)
    ));
    assert!(matches!(
        unwrapped(parsed(grammar::value(), "foo")),
        Expr::Name(_)
    ));
}

// ---------------------------------------------------------------------------
// Operations and mappers
// ---------------------------------------------------------------------------

#[test]
fn operation_chains_fold_left_with_no_precedence() {
    let node = parsed(grammar::operation(), "2 + 3 * 1");
    assert_eq!(node.value.pretty(), "((2 + 3) * 1)");
}

#[test]
fn operation_is_strictly_binary_per_step() {
    let node = parsed(grammar::operation(), "4 / 2");
    assert_eq!(node.value.pretty(), "(4 / 2)");
}

#[test]
fn operation_requires_at_least_one_operator() {
    assert!(grammar::operation().run("5").is_err());
}

#[test]
fn mapper_takes_one_name_or_a_parenthesized_list() {
    let single = parsed(grammar::mapper(), "x => x * 2");
    match single.value {
        Expr::Mapper { params, .. } => assert_eq!(params.len(), 1),
        other => panic!("expected a mapper, got {}", other.kind_name()),
    }

    let multi = parsed(grammar::mapper(), "(a, b) => a + b");
    match multi.value {
        Expr::Mapper { params, body } => {
            assert_eq!(params.len(), 2);
            assert_eq!(body.value.pretty(), "(a + b)");
        }
        other => panic!("expected a mapper, got {}", other.kind_name()),
    }
}

// ---------------------------------------------------------------------------
// Attributes, blocks, objects
// ---------------------------------------------------------------------------

#[test]
fn attribute_value_admits_an_operation_chain() {
    let plain = parsed(grammar::attribute(), "r: 5");
    match plain.value {
        Expr::Attribute { name, value } => {
            assert_eq!(name, "r");
            assert!(matches!(unwrapped(*value), Expr::Number(_)));
        }
        other => panic!("expected an attribute, got {}", other.kind_name()),
    }

    let computed = parsed(grammar::attribute(), "w: 2 + 3");
    match computed.value {
        Expr::Attribute { value, .. } => {
            assert!(matches!(value.value, Expr::Operation { .. }));
        }
        other => panic!("expected an attribute, got {}", other.kind_name()),
    }
}

#[test]
fn attribute_lists_are_parenthesized_and_comma_separated() {
    let node = parsed(grammar::attribute_list(), "(r: 5, fill: 'red')");
    match node.value {
        Expr::AttributeList(attrs) => assert_eq!(attrs.len(), 2),
        other => panic!("expected an attribute list, got {}", other.kind_name()),
    }

    let empty = parsed(grammar::attribute_list(), "()");
    assert_eq!(empty.value, Expr::AttributeList(Vec::new()));

    // a malformed attribute after a valid one is an error, not truncation
    assert!(grammar::attribute_list().run("(r: 5, 6)").is_err());
}

#[test]
fn blocks_nest_recursively() {
    let node = parsed(grammar::block(), "{ draw circle { draw box } }");
    match node.value {
        Expr::Block(commands) => assert_eq!(commands.len(), 1),
        other => panic!("expected a block, got {}", other.kind_name()),
    }

    assert_eq!(parsed(grammar::block(), "{}").value, Expr::Block(Vec::new()));
}

#[test]
fn objects_default_missing_attributes_and_block_to_empty() {
    let bare = parsed(grammar::object(), "circle");
    match bare.value {
        Expr::Object {
            name,
            attributes,
            block,
        } => {
            assert_eq!(name.value, Expr::Name("circle".to_string()));
            assert_eq!(attributes.value, Expr::AttributeList(Vec::new()));
            assert_eq!(block.value, Expr::Block(Vec::new()));
        }
        other => panic!("expected an object, got {}", other.kind_name()),
    }

    let full = parsed(grammar::object(), "circle(r: 5) { draw box }");
    match full.value {
        Expr::Object {
            attributes, block, ..
        } => {
            assert!(matches!(attributes.value, Expr::AttributeList(ref a) if a.len() == 1));
            assert!(matches!(block.value, Expr::Block(ref c) if c.len() == 1));
        }
        other => panic!("expected an object, got {}", other.kind_name()),
    }
}

// ---------------------------------------------------------------------------
// Commands and the program entry point
// ---------------------------------------------------------------------------

#[test]
fn def_takes_a_name_and_a_general_value() {
    let (name, args) = command_parts(parsed(grammar::command(), "def x 5"));
    assert_eq!(name, "def");
    assert_eq!(args.len(), 2);
    assert_eq!(args[0].value, Expr::Name("x".to_string()));
    assert_eq!(args[1].value, Expr::Number(5.0));

    let (_, args) = command_parts(parsed(grammar::command(), "def base circle(r: 5)"));
    assert!(matches!(args[1].value, Expr::Object { .. }));

    let (_, args) = command_parts(parsed(grammar::command(), "def f x => x + 1"));
    assert!(matches!(args[1].value, Expr::Mapper { .. }));
}

#[test]
fn a_bare_object_is_an_implicit_draw() {
    let (name, args) = command_parts(parsed(grammar::command(), "circle(r: 5)"));
    assert_eq!(name, "draw");
    assert_eq!(args.len(), 1);
    assert!(matches!(args[0].value, Expr::Object { .. }));
}

#[test]
fn explicit_draw_matches_the_implicit_form() {
    let explicit = parsed(grammar::command(), "draw circle(r: 5)");
    let implicit = parsed(grammar::command(), "circle(r: 5)");
    let (explicit_name, explicit_args) = command_parts(explicit);
    let (implicit_name, implicit_args) = command_parts(implicit);
    assert_eq!(explicit_name, implicit_name);
    // same argument shape either way; spans differ with the keyword
    assert_eq!(
        explicit_args[0].value.pretty(),
        implicit_args[0].value.pretty()
    );
}

#[test]
fn unrecognized_keywords_fail_naming_the_keyword() {
    let err = grammar::program().run("blam foo").unwrap_err();
    assert!(err.error.to_string().contains("blam"), "got: {}", err.error);
}

#[test]
fn a_keyword_head_does_not_fall_back_to_an_implicit_draw() {
    // "box toy" parses a keyword head "box", which is not a command
    let err = grammar::program().run("box toy").unwrap_err();
    assert!(err.error.to_string().contains("box"));
}

#[test]
fn program_skips_whitespace_between_commands() {
    let ok = grammar::program().run("  def x 5\n  draw box(w: x)  ").unwrap();
    assert_eq!(ok.result.len(), 2);
}

#[test]
fn program_is_anchored_to_end_of_input() {
    assert!(grammar::program().run("draw circle }").is_err());
    // a stray top-level block is not a command
    assert!(grammar::program().run("{ def x 5 } draw box(w: x)").is_err());
}

#[test]
fn empty_input_is_an_empty_program() {
    assert_eq!(grammar::program().run("").unwrap().result.len(), 0);
    assert_eq!(grammar::program().run("   ").unwrap().result.len(), 0);
}
