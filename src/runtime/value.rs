//! Resolved values, scene nodes, and the renderer capability.
//!
//! Everything here is generic over `T`, the renderer's element type: the
//! core never inspects a rendered element, it only threads elements through
//! block lists and scene-node children.

use serde::Serialize;

/// A value produced by resolving an AST node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value<T> {
    /// Marker for a name that did not resolve. Not an error: unresolved
    /// names only fail at sites that explicitly require a binding.
    Absent,
    Number(f64),
    Str(String),
    Scene(SceneNode<T>),
}

impl<T> Value<T> {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Scene(_) => "object",
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }
}

/// The renderer-agnostic output of object resolution: a literal name, the
/// resolved attribute list in order, and the already-rendered child
/// elements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneNode<T> {
    pub name: String,
    pub attributes: Vec<(String, Value<T>)>,
    pub block: Vec<T>,
}

/// The single capability the resolver consumes. `draw` hands a fully
/// resolved scene node to `render`; the returned element flows back into the
/// enclosing block's output list.
pub trait Renderer {
    type Element: Clone;

    fn render(&mut self, node: SceneNode<Self::Element>) -> Self::Element;
}
