//! Parse state and the pure update primitives threaded through every
//! parsing step.
//!
//! The success/error duality of a parse step is encoded in the type system:
//! a step returns `Ok((state, result))` or `Err(Failure { error, state })`,
//! so a state is never simultaneously carrying a meaningful result and a
//! meaningful error. Every primitive here consumes a state and produces a
//! new one; nothing is mutated in place across combinator boundaries.

use std::sync::Arc;

/// The value threaded through every parsing step: the immutable input
/// buffer, the cursor offset into it, and an arbitrary caller-supplied
/// side-channel payload.
#[derive(Debug, Clone)]
pub struct ParseState<S> {
    target: Arc<str>,
    /// Byte offset of the cursor. Monotonic non-decreasing across a
    /// successful step; rewound only by explicit backtracking combinators.
    pub index: usize,
    /// Side-channel data, independent of parse progress.
    pub data: S,
}

impl<S> ParseState<S> {
    pub fn new(target: impl Into<Arc<str>>, data: S) -> Self {
        Self {
            target: target.into(),
            index: 0,
            data,
        }
    }

    /// The full input buffer.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The unconsumed input from the cursor onward.
    pub fn remaining(&self) -> &str {
        &self.target[self.index..]
    }

    pub fn at_end(&self) -> bool {
        self.index >= self.target.len()
    }

    /// The character at the cursor, if any.
    pub fn current_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Advances the cursor by `n` bytes. Callers advance by whole
    /// characters, so the cursor stays on a char boundary.
    pub fn advance(mut self, n: usize) -> Self {
        self.index += n;
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Replaces the side-channel payload, possibly changing its type.
    pub fn with_data<T>(self, data: T) -> ParseState<T> {
        ParseState {
            target: self.target,
            index: self.index,
            data,
        }
    }

    pub fn map_data<T>(self, f: impl FnOnce(S) -> T) -> ParseState<T> {
        ParseState {
            target: self.target,
            index: self.index,
            data: f(self.data),
        }
    }
}

/// A failed parse step: the error payload plus the state at the point of
/// failure. Atomic matchers fail with the cursor where they started;
/// composite parsers propagate the failure of the element that failed, so
/// the state's index records how far the attempt got (which is what the
/// `choice` furthest-progress tie-break compares).
#[derive(Debug, Clone)]
pub struct Failure<E, S> {
    pub error: E,
    pub state: ParseState<S>,
}

impl<E, S> Failure<E, S> {
    pub fn new(error: E, state: ParseState<S>) -> Self {
        Self { error, state }
    }
}

/// The outcome of applying a parser to a state.
pub type Step<A, S, E> = Result<(ParseState<S>, A), Failure<E, S>>;

/// The public result of a successful top-level parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseSuccess<A, S> {
    pub result: A,
    /// Final cursor position.
    pub index: usize,
    pub data: S,
}

/// The public result of a failed top-level parse. `data` is the side-channel
/// payload as it stood at the failure, threaded through regardless of
/// outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseFailure<E, S> {
    pub error: E,
    /// Cursor position the failing attempt reached.
    pub index: usize,
    pub data: S,
}
