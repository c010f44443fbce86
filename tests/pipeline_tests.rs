//! End-to-end pipeline tests: source text through grammar and resolver to
//! rendered output.

mod common;

use art::{execute, interpret, parse, ErrorType, Renderer, SceneNode, Value};
use common::{num, TreeRenderer};
use serde_json::json;

/// Renders scene nodes into plain JSON trees.
struct JsonRenderer;

impl Renderer for JsonRenderer {
    type Element = serde_json::Value;

    fn render(&mut self, node: SceneNode<serde_json::Value>) -> serde_json::Value {
        let attributes: Vec<serde_json::Value> = node
            .attributes
            .iter()
            .map(|(name, value)| json!([name, attribute_json(value)]))
            .collect();
        json!({
            "name": node.name,
            "attributes": attributes,
            "children": node.block,
        })
    }
}

fn attribute_json(value: &Value<serde_json::Value>) -> serde_json::Value {
    match value {
        Value::Absent => serde_json::Value::Null,
        Value::Number(n) => json!(n),
        Value::Str(s) => json!(s),
        Value::Scene(node) => json!(node.name),
    }
}

#[test]
fn round_trip_with_a_structural_noop_renderer() {
    // parsing and resolving with a renderer that returns its input
    // unchanged yields exactly one entry {circle, [r: 5], []}
    let mut renderer = TreeRenderer::new();
    let out = execute("draw circle(r: 5) {}", &mut renderer).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].name, "circle");
    assert_eq!(out[0].attributes, vec![("r".to_string(), num(5.0))]);
    assert!(out[0].children.is_empty());
    assert_eq!(renderer.render_count, 1);
}

#[test]
fn a_full_scene_renders_through_json() {
    let source = "\
        def unit 4 \
        def base circle(r: unit, fill: 'grey') \
        draw base(r: old => old * 2) \
        draw frame { draw base draw box(w: unit + 1 * 3) }";
    let mut renderer = JsonRenderer;
    let out = execute(source, &mut renderer).unwrap();

    assert_eq!(
        out,
        vec![
            // overriding r moves it behind the untouched inherited fill:
            // de-duplication keeps the last occurrence in arrival order
            json!({
                "name": "circle",
                "attributes": [["fill", "grey"], ["r", 8.0]],
                "children": [],
            }),
            json!({
                "name": "frame",
                "attributes": [],
                "children": [
                    {
                        "name": "circle",
                        "attributes": [["r", 4.0], ["fill", "grey"]],
                        "children": [],
                    },
                    {
                        "name": "box",
                        // (unit + 1) * 3, evaluated flat left-to-right
                        "attributes": [["w", 15.0]],
                        "children": [],
                    },
                ],
            }),
        ]
    );
}

#[test]
fn parse_then_interpret_matches_execute() {
    let source = "def x 2 draw box(w: x * 3)";
    let commands = parse(source).unwrap();

    let mut direct = TreeRenderer::new();
    let via_interpret = interpret(&commands, &mut direct).unwrap();

    let mut combined = TreeRenderer::new();
    let via_execute = execute(source, &mut combined).unwrap();

    assert_eq!(via_interpret, via_execute);
}

#[test]
fn syntax_failures_surface_position_and_expectation() {
    let mut renderer = TreeRenderer::new();
    let err = execute("draw circle(r 5)", &mut renderer).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Syntax);
    assert!(err.span().is_some());
}

#[test]
fn no_rendered_output_escapes_a_failing_program() {
    // the first command renders through the capability, but the failing
    // second command discards the accumulated output list
    let mut renderer = TreeRenderer::new();
    let result = execute("draw a draw box(w: 'x' + 1)", &mut renderer).unwrap_err();
    assert_eq!(result.error_type(), ErrorType::TypeError);
    assert_eq!(renderer.render_count, 1);
}

#[test]
fn resolution_errors_from_execute_carry_the_source() {
    let err = execute("def x 5 def x 6", &mut TreeRenderer::new()).unwrap_err();
    // renders with a source snippet, not just a message
    let report = format!("{:?}", miette::Report::new(err));
    assert!(report.contains("def x 6") || report.contains("unbound"));
}

#[test]
fn empty_source_renders_nothing() {
    let mut renderer = TreeRenderer::new();
    let out = execute("", &mut renderer).unwrap();
    assert!(out.is_empty());
    assert_eq!(renderer.render_count, 0);
}
