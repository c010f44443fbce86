//! Art: a parser-combinator engine and resolver for the Art declarative
//! drawing language.
//!
//! The crate is two stages. The [`parser`] module is a generic, reusable
//! combinator library: a stateful parsing monad with positional error
//! reporting, usable independently of Art. The [`syntax`] and [`runtime`]
//! modules build on it: the Art grammar produces a tagged AST, and the
//! resolver walks that tree — lexical scoping, closure-style mappers,
//! attribute inheritance — into renderer-agnostic scene nodes.
//!
//! Rendering itself is a capability the caller supplies (the [`Renderer`]
//! trait); the engine never inspects rendered elements, it only threads
//! them through block lists.
//!
//! ```
//! use art::{execute, Renderer, SceneNode};
//!
//! struct Count(usize);
//! impl Renderer for Count {
//!     type Element = ();
//!     fn render(&mut self, _node: SceneNode<()>) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let mut renderer = Count(0);
//! let rendered = execute("draw circle(r: 5)", &mut renderer).unwrap();
//! assert_eq!(rendered.len(), 1);
//! assert_eq!(renderer.0, 1);
//! ```

pub mod diagnostics;
pub mod engine;
pub mod parser;
pub mod runtime;
pub mod syntax;

pub use diagnostics::{ArtError, ErrorContext, ErrorType, Span};
pub use engine::{execute, interpret, parse};
pub use parser::{ParseError, ParseFailure, ParseState, ParseSuccess, Parser};
pub use runtime::{Renderer, SceneNode, Value};
pub use syntax::{AstNode, BinOp, Expr, WithSpan};
