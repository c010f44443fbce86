//! Pipeline entry points: source text to AST, AST to rendered elements.

use crate::diagnostics::{to_error_source, ArtError, ErrorContext, Span};
use crate::runtime::resolver;
use crate::runtime::value::Renderer;
use crate::syntax::ast::AstNode;
use crate::syntax::grammar;

/// Parses Art source into its command-list AST. Renderer-independent.
pub fn parse(source: &str) -> Result<Vec<AstNode>, ArtError> {
    match grammar::program().run(source) {
        Ok(success) => Ok(success.result),
        Err(failure) => {
            let span = if failure.index < source.len() {
                Span::at(failure.index)
            } else {
                Span::new(source.len().saturating_sub(1), source.len())
            };
            Err(ArtError::syntax(
                failure.error.to_string(),
                ErrorContext::with_source_and_span(to_error_source("source", source), span),
            ))
        }
    }
}

/// Resolves a parsed command list against a renderer capability, returning
/// the rendered elements in command order. The first resolution error
/// aborts; no partial output is returned.
pub fn interpret<R: Renderer>(
    commands: &[AstNode],
    renderer: &mut R,
) -> Result<Vec<R::Element>, ArtError> {
    resolver::resolve_program(commands, renderer)
}

/// Parses and resolves in one step, attaching the source text to any
/// resolution error so diagnostics can point into it.
pub fn execute<R: Renderer>(
    source: &str,
    renderer: &mut R,
) -> Result<Vec<R::Element>, ArtError> {
    let commands = parse(source)?;
    interpret(&commands, renderer)
        .map_err(|error| error.with_source(to_error_source("source", source)))
}
