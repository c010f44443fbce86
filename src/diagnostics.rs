//! Unified, `miette`-based diagnostics for the Art engine.
//!
//! Every failure surfaced by the pipeline is an [`ArtError`]: syntax errors
//! from the grammar stage, resolution and type errors from the resolver, and
//! internal-consistency errors that should be unreachable from well-formed
//! input. Construction goes through the `ArtError::syntax` / `resolve` /
//! `type_error` / `internal` helpers, which take an [`ErrorContext`] carrying
//! whatever source, span, and help information is available at the failure
//! site.

use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use serde::Serialize;
use thiserror::Error;

pub type SourceArc = Arc<NamedSource<String>>;

/// A byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A single-position span, for cursor-style error locations.
    pub fn at(index: usize) -> Self {
        Self {
            start: index,
            end: index + 1,
        }
    }

    /// The smallest span covering both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        let len = if span.end > span.start {
            span.end - span.start
        } else {
            1
        };
        miette::SourceSpan::new(span.start.into(), len)
    }
}

/// Type-safe classification of an [`ArtError`], for callers (and tests) that
/// dispatch on the failure stage rather than the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// Grammar/combinator failures: position-tagged, expected-construct info.
    Syntax,
    /// Resolver failures: structural or scoping violations.
    Resolve,
    /// Operand type mismatches during arithmetic evaluation.
    TypeError,
    /// Internal engine errors.
    Internal,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Syntax => "Syntax",
            ErrorType::Resolve => "Resolve",
            ErrorType::TypeError => "TypeError",
            ErrorType::Internal => "Internal",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Minimal, composable error context for diagnostics.
#[derive(Debug, Default)]
pub struct ErrorContext {
    /// The source text this error points into (if available).
    pub source: Option<SourceArc>,
    /// The primary span for this error (if any).
    pub span: Option<Span>,
    /// An optional help message.
    pub help: Option<String>,
}

impl ErrorContext {
    /// An empty context (no source, span, or help).
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_span(span: Span) -> Self {
        Self {
            span: Some(span),
            ..Self::default()
        }
    }

    pub fn with_source_and_span(source: SourceArc, span: Span) -> Self {
        Self {
            source: Some(source),
            span: Some(span),
            help: None,
        }
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// Unified error type for all Art engine failure modes.
#[derive(Debug, Error)]
pub enum ArtError {
    #[error("syntax error: {message}")]
    Syntax { message: String, ctx: ErrorContext },
    #[error("resolution error: {message}")]
    Resolve { message: String, ctx: ErrorContext },
    #[error("type error: {message}")]
    TypeError { message: String, ctx: ErrorContext },
    #[error("internal error: {message}")]
    Internal { message: String, ctx: ErrorContext },
}

impl ArtError {
    pub fn syntax(message: impl Into<String>, ctx: ErrorContext) -> Self {
        ArtError::Syntax {
            message: message.into(),
            ctx,
        }
    }

    pub fn resolve(message: impl Into<String>, ctx: ErrorContext) -> Self {
        ArtError::Resolve {
            message: message.into(),
            ctx,
        }
    }

    pub fn type_error(message: impl Into<String>, ctx: ErrorContext) -> Self {
        ArtError::TypeError {
            message: message.into(),
            ctx,
        }
    }

    pub fn internal(message: impl Into<String>, ctx: ErrorContext) -> Self {
        ArtError::Internal {
            message: message.into(),
            ctx,
        }
    }

    fn get_ctx(&self) -> &ErrorContext {
        match self {
            ArtError::Syntax { ctx, .. } => ctx,
            ArtError::Resolve { ctx, .. } => ctx,
            ArtError::TypeError { ctx, .. } => ctx,
            ArtError::Internal { ctx, .. } => ctx,
        }
    }

    fn get_ctx_mut(&mut self) -> &mut ErrorContext {
        match self {
            ArtError::Syntax { ctx, .. } => ctx,
            ArtError::Resolve { ctx, .. } => ctx,
            ArtError::TypeError { ctx, .. } => ctx,
            ArtError::Internal { ctx, .. } => ctx,
        }
    }

    fn message(&self) -> &str {
        match self {
            ArtError::Syntax { message, .. } => message,
            ArtError::Resolve { message, .. } => message,
            ArtError::TypeError { message, .. } => message,
            ArtError::Internal { message, .. } => message,
        }
    }

    /// Returns the type-safe classification for this error.
    pub fn error_type(&self) -> ErrorType {
        match self {
            ArtError::Syntax { .. } => ErrorType::Syntax,
            ArtError::Resolve { .. } => ErrorType::Resolve,
            ArtError::TypeError { .. } => ErrorType::TypeError,
            ArtError::Internal { .. } => ErrorType::Internal,
        }
    }

    /// Attaches source text to an error raised somewhere that had only a
    /// span. Errors that already carry a source keep it.
    pub fn with_source(mut self, source: SourceArc) -> Self {
        let ctx = self.get_ctx_mut();
        if ctx.source.is_none() {
            ctx.source = Some(source);
        }
        self
    }

    pub fn span(&self) -> Option<Span> {
        self.get_ctx().span
    }
}

impl Diagnostic for ArtError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let code = match self.error_type() {
            ErrorType::Syntax => "art::syntax",
            ErrorType::Resolve => "art::resolve",
            ErrorType::TypeError => "art::type",
            ErrorType::Internal => "art::internal",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.get_ctx()
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.get_ctx()
            .source
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.get_ctx().span?;
        let label = LabeledSpan::new(
            Some(self.message().to_string()),
            span.start,
            span.len().max(1),
        );
        Some(Box::new(std::iter::once(label)))
    }
}

/// Converts a source string into a `SourceArc` for use in error contexts.
pub fn to_error_source(name: impl AsRef<str>, source: impl AsRef<str>) -> SourceArc {
    Arc::new(NamedSource::new(name.as_ref(), source.as_ref().to_string()))
}
