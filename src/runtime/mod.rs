//! Runtime for the Art language: resolved values, lexical scopes, and the
//! tree-walking resolver.

pub mod resolver;
pub mod scope;
pub mod value;

pub use resolver::{resolve_program, Context};
pub use scope::Scope;
pub use value::{Renderer, SceneNode, Value};
