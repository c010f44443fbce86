//! Shared test renderers.
#![allow(dead_code)]

use art::{Renderer, SceneNode, Value};

/// A structural no-op renderer: `render` returns its input unchanged as a
/// plain tree, so tests can assert on exactly what the resolver produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub name: String,
    pub attributes: Vec<(String, Value<Rendered>)>,
    pub children: Vec<Rendered>,
}

pub struct TreeRenderer {
    pub render_count: usize,
}

impl TreeRenderer {
    pub fn new() -> Self {
        Self { render_count: 0 }
    }
}

impl Renderer for TreeRenderer {
    type Element = Rendered;

    fn render(&mut self, node: SceneNode<Rendered>) -> Rendered {
        self.render_count += 1;
        Rendered {
            name: node.name,
            attributes: node.attributes,
            children: node.block,
        }
    }
}

pub fn num(n: f64) -> Value<Rendered> {
    Value::Number(n)
}

pub fn text(s: &str) -> Value<Rendered> {
    Value::Str(s.to_string())
}
