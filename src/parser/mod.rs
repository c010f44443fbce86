//! The parsing monad: an opaque, composable step function from parse state
//! to parse state, with sequencing, result transformation, and error
//! transformation.
//!
//! A [`Parser`] is constructed once (typically at grammar-definition time)
//! and invoked many times against different inputs. Parsers hold no shared
//! mutable state and never retain a reference to any particular
//! [`ParseState`], so one parser value can be used concurrently from
//! multiple threads against independent inputs.
//!
//! The default error payload is [`ParseError`]; the whole module stays
//! generic over the payload type so callers can substitute their own and
//! rewrite payloads with [`Parser::error_map`] / [`Parser::error_chain`].

pub mod combinators;
pub mod state;

pub use state::{Failure, ParseFailure, ParseState, ParseSuccess, Step};

use std::sync::Arc;

use thiserror::Error;

use crate::diagnostics::Span;

/// Default error payload produced by the built-in matchers. Positions travel
/// with the failure state, not inside the payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected {expected}, got '{found}'")]
    Expected { expected: String, found: String },
    #[error("expected {expected}, but got end of input")]
    UnexpectedEnd { expected: String },
    #[error("expected at least one match in '{combinator}'")]
    ExpectedAtLeastOne { combinator: &'static str },
    #[error("matched '{found}' from the exception parser")]
    ExcludedMatch { found: String },
    #[error("expected end of input, got '{found}'")]
    ExpectedEnd { found: String },
    #[error("{0}")]
    Message(String),
}

impl ParseError {
    pub(crate) fn expected(expected: impl Into<String>, found: impl Into<String>) -> Self {
        ParseError::Expected {
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub(crate) fn unexpected_end(expected: impl Into<String>) -> Self {
        ParseError::UnexpectedEnd {
            expected: expected.into(),
        }
    }
}

/// A composable parsing step: `ParseState -> ParseState`, with the
/// success/error split encoded as a [`Step`] result.
pub struct Parser<A, S = (), E = ParseError> {
    f: Arc<dyn Fn(ParseState<S>) -> Step<A, S, E> + Send + Sync>,
}

impl<A, S, E> Clone for Parser<A, S, E> {
    fn clone(&self) -> Self {
        Self { f: self.f.clone() }
    }
}

impl<A, S, E> Parser<A, S, E>
where
    A: 'static,
    S: 'static,
    E: 'static,
{
    pub fn new(f: impl Fn(ParseState<S>) -> Step<A, S, E> + Send + Sync + 'static) -> Self {
        Self { f: Arc::new(f) }
    }

    /// Applies this parser to a state. This is the primitive every
    /// combinator is built from; library users only need it to write their
    /// own combinators (or via the `do_parse!` macro, which threads state
    /// through `apply` calls).
    pub fn apply(&self, state: ParseState<S>) -> Step<A, S, E> {
        (self.f)(state)
    }

    /// Runs against a fresh state over `target`.
    pub fn run(&self, target: &str) -> Result<ParseSuccess<A, S>, ParseFailure<E, S>>
    where
        S: Default,
    {
        self.run_with_data(target, S::default())
    }

    /// Runs against a fresh state carrying `data` as the side-channel
    /// payload.
    pub fn run_with_data(
        &self,
        target: &str,
        data: S,
    ) -> Result<ParseSuccess<A, S>, ParseFailure<E, S>> {
        match self.apply(ParseState::new(target, data)) {
            Ok((state, result)) => Ok(ParseSuccess {
                result,
                index: state.index,
                data: state.data,
            }),
            Err(Failure { error, state }) => Err(ParseFailure {
                error,
                index: state.index,
                data: state.data,
            }),
        }
    }

    /// Runs and hands the outcome to the matching continuation.
    pub fn fork<T>(
        &self,
        target: &str,
        on_error: impl FnOnce(ParseFailure<E, S>) -> T,
        on_success: impl FnOnce(ParseSuccess<A, S>) -> T,
    ) -> T
    where
        S: Default,
    {
        match self.run(target) {
            Ok(success) => on_success(success),
            Err(failure) => on_error(failure),
        }
    }

    /// Transforms the result of a successful parse. The cursor is untouched.
    pub fn map<B: 'static>(&self, f: impl Fn(A) -> B + Send + Sync + 'static) -> Parser<B, S, E> {
        let p = self.f.clone();
        Parser::new(move |state| {
            let (next, value) = p(state)?;
            Ok((next, f(value)))
        })
    }

    /// Like [`Parser::map`], additionally handing `f` the span of input this
    /// parser consumed.
    pub fn map_with_span<B: 'static>(
        &self,
        f: impl Fn(A, Span) -> B + Send + Sync + 'static,
    ) -> Parser<B, S, E> {
        let p = self.f.clone();
        Parser::new(move |state| {
            let start = state.index;
            let (next, value) = p(state)?;
            let span = Span::new(start, next.index);
            Ok((next, f(value, span)))
        })
    }

    /// Monadic bind: on success, feeds the result to `f` and runs the
    /// returned parser against the advanced state; on failure,
    /// short-circuits with the failed state unchanged.
    pub fn chain<B: 'static>(
        &self,
        f: impl Fn(A) -> Parser<B, S, E> + Send + Sync + 'static,
    ) -> Parser<B, S, E> {
        let p = self.f.clone();
        Parser::new(move |state| {
            let (next, value) = p(state)?;
            f(value).apply(next)
        })
    }

    /// Maps the error payload of a failed parse, given `(error, index,
    /// &data)`. Success states pass through untouched.
    pub fn error_map<F: 'static>(
        &self,
        f: impl Fn(E, usize, &S) -> F + Send + Sync + 'static,
    ) -> Parser<A, S, F> {
        let p = self.f.clone();
        Parser::new(move |state| match p(state) {
            Ok(ok) => Ok(ok),
            Err(Failure { error, state }) => {
                let error = f(error, state.index, &state.data);
                Err(Failure { error, state })
            }
        })
    }

    /// Error recovery: on failure, `f` receives `(error, index, &data)` and
    /// returns a parser that is run against the failure's state with the
    /// error discharged.
    pub fn error_chain<F: 'static>(
        &self,
        f: impl Fn(E, usize, &S) -> Parser<A, S, F> + Send + Sync + 'static,
    ) -> Parser<A, S, F> {
        let p = self.f.clone();
        Parser::new(move |state| match p(state) {
            Ok(ok) => Ok(ok),
            Err(Failure { error, state }) => f(error, state.index, &state.data).apply(state),
        })
    }

    /// The identity element of sequencing: always succeeds with `value`
    /// without consuming input.
    pub fn of(value: A) -> Self
    where
        A: Clone + Send + Sync,
    {
        Parser::new(move |state| Ok((state, value.clone())))
    }
}

/// Alias for [`Parser::of`], matching the combinator-library vocabulary.
pub fn succeed_with<A, S, E>(value: A) -> Parser<A, S, E>
where
    A: Clone + Send + Sync + 'static,
    S: 'static,
    E: 'static,
{
    Parser::of(value)
}

/// Always fails with `error` without consuming input.
pub fn fail<A, S, E>(error: E) -> Parser<A, S, E>
where
    A: 'static,
    S: 'static,
    E: Clone + Send + Sync + 'static,
{
    Parser::new(move |state| Err(Failure::new(error.clone(), state)))
}

/// Succeeds with the current side-channel payload as its result.
pub fn get_data<S, E>() -> Parser<S, S, E>
where
    S: Clone + Send + Sync + 'static,
    E: 'static,
{
    Parser::new(|state: ParseState<S>| {
        let data = state.data.clone();
        Ok((state, data))
    })
}

/// Replaces the side-channel payload, succeeding with the new payload.
pub fn set_data<S, E>(data: S) -> Parser<S, S, E>
where
    S: Clone + Send + Sync + 'static,
    E: 'static,
{
    Parser::new(move |state| {
        let state = state.with_data(data.clone());
        let result = state.data.clone();
        Ok((state, result))
    })
}

/// Applies a pure function to the side-channel payload.
pub fn map_data<S, E>(f: impl Fn(S) -> S + Send + Sync + 'static) -> Parser<S, S, E>
where
    S: Clone + Send + Sync + 'static,
    E: 'static,
{
    Parser::new(move |state| {
        let state = state.map_data(&f);
        let result = state.data.clone();
        Ok((state, result))
    })
}

/// Runs `parser` with the side-channel payload seeded to `data`.
pub fn with_data<A, S, E>(parser: Parser<A, S, E>, data: S) -> Parser<A, S, E>
where
    A: 'static,
    S: Clone + Send + Sync + 'static,
    E: 'static,
{
    Parser::new(move |state| parser.apply(state.with_data(data.clone())))
}

/// The cooperative sequencing form: a chain of dependent parsing steps
/// written as a single-threaded procedure. Each step applies a parser to
/// the threaded state; `let name = parser;` binds its result for later
/// steps; the form ends with `yield expr`, wrapping `expr` as the final
/// result. Execution is strictly sequential and synchronous, and a step
/// that is not a parser fails to compile.
///
/// ```ignore
/// let keyword_then_body = do_parse!(
///     let keyword = letters();
///     whitespace();
///     let body = digits();
///     yield (keyword, body)
/// );
/// ```
#[macro_export]
macro_rules! do_parse {
    ($($steps:tt)+) => {
        $crate::parser::Parser::new(move |__state| $crate::do_parse_steps!(__state; $($steps)+))
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! do_parse_steps {
    ($state:ident; yield $e:expr) => {
        ::std::result::Result::Ok(($state, $e))
    };
    ($state:ident; let $var:pat = $p:expr; $($rest:tt)+) => {{
        let ($state, $var) = ($p).apply($state)?;
        $crate::do_parse_steps!($state; $($rest)+)
    }};
    ($state:ident; $p:expr; $($rest:tt)+) => {{
        let ($state, _) = ($p).apply($state)?;
        $crate::do_parse_steps!($state; $($rest)+)
    }};
}
