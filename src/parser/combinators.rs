//! The combinator library: matchers, sequencing, alternation, repetition,
//! and control-flow operators built on the [`Parser`] core.
//!
//! Backtracking combinators (`choice`, `possibly`, `many`, `sep_by`,
//! `look_ahead`) hand each attempt a clone of the starting state, so a
//! failed attempt consumes nothing. That no-progress-on-failure guarantee is
//! what makes repetition terminate: `many` and `sep_by` must never be given
//! an element parser that can succeed without consuming input, which would
//! be a construction-time contract violation (the repetition would spin on
//! one position forever).
//!
//! Most combinators stay generic over the error payload `E`. The ones that
//! fabricate their own errors (`many1`, `sep_by1`, `anything_except`,
//! `everything_until`, `end_of_input`, and the built-in matchers) produce
//! [`ParseError`].

use std::collections::HashMap;

use regex::Regex;

use super::state::Failure;
use super::{ParseError, Parser};

// ---------------------------------------------------------------------------
// Matchers
// ---------------------------------------------------------------------------

/// Consumes exactly one character satisfying `pred`.
pub fn satisfy<S: 'static>(
    expected: impl Into<String>,
    pred: impl Fn(char) -> bool + Send + Sync + 'static,
) -> Parser<char, S> {
    let expected = expected.into();
    Parser::new(move |state| match state.current_char() {
        Some(c) if pred(c) => Ok((state.advance(c.len_utf8()), c)),
        Some(c) => Err(Failure::new(
            ParseError::expected(expected.clone(), c.to_string()),
            state,
        )),
        None => Err(Failure::new(
            ParseError::unexpected_end(expected.clone()),
            state,
        )),
    })
}

/// Consumes exactly the character `expected`.
pub fn character<S: 'static>(expected: char) -> Parser<char, S> {
    satisfy(format!("character '{expected}'"), move |c| c == expected)
}

/// Consumes exactly the string `expected`.
pub fn literal<S: 'static>(expected: &'static str) -> Parser<&'static str, S> {
    assert!(
        !expected.is_empty(),
        "literal must be called with a non-empty string"
    );
    Parser::new(move |state| {
        if state.at_end() {
            return Err(Failure::new(
                ParseError::unexpected_end(format!("string '{expected}'")),
                state,
            ));
        }
        if state.remaining().starts_with(expected) {
            Ok((state.advance(expected.len()), expected))
        } else {
            let found: String = state
                .remaining()
                .chars()
                .take(expected.chars().count())
                .collect();
            Err(Failure::new(
                ParseError::expected(format!("string '{expected}'"), found),
                state,
            ))
        }
    })
}

/// Matches an anchored pattern against the remaining input, consuming the
/// match. The pattern must be anchored to the current position with `^`;
/// anything else is a construction-time usage error and panics.
pub fn regex_match<S: 'static>(pattern: &str) -> Parser<String, S> {
    assert!(
        pattern.starts_with('^'),
        "regex parsers must be anchored with a leading '^', got {pattern:?}"
    );
    let re = Regex::new(pattern).unwrap_or_else(|e| panic!("invalid regex {pattern:?}: {e}"));
    Parser::new(move |state| {
        if state.at_end() {
            return Err(Failure::new(
                ParseError::unexpected_end(format!("input matching '{re}'")),
                state,
            ));
        }
        let hit = re
            .find(state.remaining())
            .map(|m| (m.end(), m.as_str().to_owned()));
        match hit {
            Some((end, text)) => Ok((state.advance(end), text)),
            None => {
                let found: String = state.remaining().chars().take(8).collect();
                Err(Failure::new(
                    ParseError::expected(format!("input matching '{re}'"), found),
                    state,
                ))
            }
        }
    })
}

pub fn digit<S: 'static>() -> Parser<char, S> {
    satisfy("digit", |c| c.is_ascii_digit())
}

pub fn digits<S: Clone + 'static>() -> Parser<String, S> {
    many1(digit())
        .map(|cs| cs.into_iter().collect())
        .error_map(|_, _, _| ParseError::Message("expected digits".to_string()))
}

pub fn letter<S: 'static>() -> Parser<char, S> {
    satisfy("letter", |c| c.is_ascii_alphabetic())
}

pub fn letters<S: Clone + 'static>() -> Parser<String, S> {
    many1(letter())
        .map(|cs| cs.into_iter().collect())
        .error_map(|_, _, _| ParseError::Message("expected letters".to_string()))
}

/// Consumes one character contained in `chars`.
pub fn any_of_string<S: 'static>(chars: &'static str) -> Parser<char, S> {
    satisfy(format!("any of \"{chars}\""), move |c| chars.contains(c))
}

pub fn whitespace<S: Clone + 'static>() -> Parser<String, S> {
    many1(any_of_string(" \n\t\r"))
        .map(|cs| cs.into_iter().collect())
        .error_map(|_, _, _| ParseError::Message("expected whitespace".to_string()))
}

pub fn optional_whitespace<S: Clone + 'static>() -> Parser<String, S> {
    many(any_of_string(" \n\t\r")).map(|cs| cs.into_iter().collect())
}

// ---------------------------------------------------------------------------
// Sequencing and alternation
// ---------------------------------------------------------------------------

/// Runs the parsers in order against a single advancing cursor. Fails at the
/// first failing element, propagating that failure's state.
pub fn sequence_of<A, S, E>(parsers: Vec<Parser<A, S, E>>) -> Parser<Vec<A>, S, E>
where
    A: 'static,
    S: 'static,
    E: 'static,
{
    Parser::new(move |state| {
        let mut results = Vec::with_capacity(parsers.len());
        let mut state = state;
        for parser in &parsers {
            let (next, value) = parser.apply(state)?;
            state = next;
            results.push(value);
        }
        Ok((state, results))
    })
}

/// Like [`sequence_of`], but returns a mapping from the supplied labels to
/// the per-element results.
pub fn named_sequence_of<A, S, E>(
    parsers: Vec<(&'static str, Parser<A, S, E>)>,
) -> Parser<HashMap<&'static str, A>, S, E>
where
    A: 'static,
    S: 'static,
    E: 'static,
{
    Parser::new(move |state| {
        let mut results = HashMap::with_capacity(parsers.len());
        let mut state = state;
        for (label, parser) in &parsers {
            let (next, value) = parser.apply(state)?;
            state = next;
            results.insert(*label, value);
        }
        Ok((state, results))
    })
}

/// Tries the parsers in listed order against the same starting state,
/// returning the first success. On total failure, returns the failure whose
/// cursor got furthest (the first-listed wins ties), approximating the most
/// informative error.
pub fn choice<A, S, E>(parsers: Vec<Parser<A, S, E>>) -> Parser<A, S, E>
where
    A: 'static,
    S: Clone + 'static,
    E: 'static,
{
    assert!(!parsers.is_empty(), "choice requires at least one alternative");
    Parser::new(move |state| {
        let mut best: Option<Failure<E, S>> = None;
        for parser in &parsers {
            match parser.apply(state.clone()) {
                Ok(ok) => return Ok(ok),
                Err(failure) => {
                    if best
                        .as_ref()
                        .map_or(true, |b| failure.state.index > b.state.index)
                    {
                        best = Some(failure);
                    }
                }
            }
        }
        Err(best.expect("choice has at least one alternative"))
    })
}

// ---------------------------------------------------------------------------
// Repetition
// ---------------------------------------------------------------------------

/// Repeats `parser` until it fails or the cursor reaches end of input.
/// Always succeeds; the failing final attempt is discarded and leaves the
/// returned state untouched.
pub fn many<A, S, E>(parser: Parser<A, S, E>) -> Parser<Vec<A>, S, E>
where
    A: 'static,
    S: Clone + 'static,
    E: 'static,
{
    Parser::new(move |state| {
        let mut results = Vec::new();
        let mut state = state;
        loop {
            match parser.apply(state.clone()) {
                Ok((next, value)) => {
                    state = next;
                    results.push(value);
                    if state.at_end() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
        Ok((state, results))
    })
}

/// Like [`many`], but fails if zero elements were collected.
pub fn many1<A, S>(parser: Parser<A, S>) -> Parser<Vec<A>, S>
where
    A: 'static,
    S: Clone + 'static,
{
    let inner = many(parser);
    Parser::new(move |state| {
        let (state, results) = inner.apply(state)?;
        if results.is_empty() {
            Err(Failure::new(
                ParseError::ExpectedAtLeastOne {
                    combinator: "many1",
                },
                state,
            ))
        } else {
            Ok((state, results))
        }
    })
}

/// Alternates `value` and `separator`. A value failure with zero results so
/// far succeeds with an empty list at the original position; a value failure
/// after one or more results propagates as an error — partial progress is an
/// error, not a silently truncated list.
pub fn sep_by<A, B, S, E>(separator: Parser<B, S, E>, value: Parser<A, S, E>) -> Parser<Vec<A>, S, E>
where
    A: 'static,
    B: 'static,
    S: Clone + 'static,
    E: 'static,
{
    Parser::new(move |state| {
        let original = state.clone();
        let mut results = Vec::new();
        let mut state = state;
        loop {
            match value.apply(state.clone()) {
                Err(failure) => {
                    if results.is_empty() {
                        return Ok((original, results));
                    }
                    return Err(failure);
                }
                Ok((after_value, v)) => {
                    results.push(v);
                    match separator.apply(after_value.clone()) {
                        Err(_) => return Ok((after_value, results)),
                        Ok((after_separator, _)) => state = after_separator,
                    }
                }
            }
        }
    })
}

/// Like [`sep_by`], but additionally rejects a zero-length result.
pub fn sep_by1<A, B, S>(separator: Parser<B, S>, value: Parser<A, S>) -> Parser<Vec<A>, S>
where
    A: 'static,
    B: 'static,
    S: Clone + 'static,
{
    let inner = sep_by(separator, value);
    Parser::new(move |state| {
        let (state, results) = inner.apply(state)?;
        if results.is_empty() {
            Err(Failure::new(
                ParseError::ExpectedAtLeastOne {
                    combinator: "sep_by1",
                },
                state,
            ))
        } else {
            Ok((state, results))
        }
    })
}

// ---------------------------------------------------------------------------
// Bracketing and projection
// ---------------------------------------------------------------------------

/// Succeeds only if `left`, `inner`, `right` all succeed in order, yielding
/// `inner`'s result.
pub fn between<L, R, A, S, E>(
    left: Parser<L, S, E>,
    right: Parser<R, S, E>,
    inner: Parser<A, S, E>,
) -> Parser<A, S, E>
where
    L: 'static,
    R: 'static,
    A: 'static,
    S: 'static,
    E: 'static,
{
    Parser::new(move |state| {
        let (state, _) = left.apply(state)?;
        let (state, value) = inner.apply(state)?;
        let (state, _) = right.apply(state)?;
        Ok((state, value))
    })
}

/// Runs both parsers in order, keeping the left result.
pub fn take_left<A, B, S, E>(left: Parser<A, S, E>, right: Parser<B, S, E>) -> Parser<A, S, E>
where
    A: 'static,
    B: 'static,
    S: 'static,
    E: 'static,
{
    Parser::new(move |state| {
        let (state, value) = left.apply(state)?;
        let (state, _) = right.apply(state)?;
        Ok((state, value))
    })
}

/// Runs both parsers in order, keeping the right result.
pub fn take_right<A, B, S, E>(left: Parser<A, S, E>, right: Parser<B, S, E>) -> Parser<B, S, E>
where
    A: 'static,
    B: 'static,
    S: 'static,
    E: 'static,
{
    Parser::new(move |state| {
        let (state, _) = left.apply(state)?;
        right.apply(state)
    })
}

// ---------------------------------------------------------------------------
// Control flow
// ---------------------------------------------------------------------------

/// Runs `parser` and, on success, rewinds the cursor to the pre-attempt
/// position while keeping the parsed result. Failures propagate.
pub fn look_ahead<A, S, E>(parser: Parser<A, S, E>) -> Parser<A, S, E>
where
    A: 'static,
    S: Clone + 'static,
    E: 'static,
{
    Parser::new(move |state| {
        let (_, value) = parser.apply(state.clone())?;
        Ok((state, value))
    })
}

/// On success of `parser`, behaves identically (wrapped in `Some`); on
/// failure, succeeds with `None` at the original position. The inner
/// failure is never propagated.
pub fn possibly<A, S, E>(parser: Parser<A, S, E>) -> Parser<Option<A>, S, E>
where
    A: 'static,
    S: Clone + 'static,
    E: 'static,
{
    Parser::new(move |state| match parser.apply(state.clone()) {
        Ok((next, value)) => Ok((next, Some(value))),
        Err(_) => Ok((state, None)),
    })
}

/// Consumes exactly one character, but only if `guard` does not match at the
/// current position; otherwise fails naming the guard's match.
pub fn anything_except<G, S>(guard: Parser<G, S>) -> Parser<char, S>
where
    G: std::fmt::Display + 'static,
    S: Clone + 'static,
{
    Parser::new(move |state| match guard.apply(state.clone()) {
        Ok((_, matched)) => Err(Failure::new(
            ParseError::ExcludedMatch {
                found: matched.to_string(),
            },
            state,
        )),
        Err(_) => match state.current_char() {
            Some(c) => Ok((state.advance(c.len_utf8()), c)),
            None => Err(Failure::new(
                ParseError::unexpected_end("any character"),
                state,
            )),
        },
    })
}

/// Consumes characters one at a time until `terminator` matches (the
/// terminator itself is left unconsumed), returning the consumed text.
/// Reaching end of input before the terminator is an error.
pub fn everything_until<T, S>(terminator: Parser<T, S>) -> Parser<String, S>
where
    T: 'static,
    S: Clone + 'static,
{
    Parser::new(move |state| {
        let mut consumed = String::new();
        let mut state = state;
        loop {
            match terminator.apply(state.clone()) {
                Ok(_) => return Ok((state, consumed)),
                Err(_) => match state.current_char() {
                    Some(c) => {
                        consumed.push(c);
                        state = state.advance(c.len_utf8());
                    }
                    None => {
                        return Err(Failure::new(
                            ParseError::unexpected_end("a terminator before end of input"),
                            state,
                        ))
                    }
                },
            }
        }
    })
}

/// Succeeds with no result only if the cursor is exactly at the end of the
/// target.
pub fn end_of_input<S: 'static>() -> Parser<(), S> {
    Parser::new(|state| {
        if state.at_end() {
            Ok((state, ()))
        } else {
            let found = state
                .current_char()
                .map(|c| c.to_string())
                .unwrap_or_default();
            Err(Failure::new(ParseError::ExpectedEnd { found }, state))
        }
    })
}

/// Defers resolution of a grammar rule to invocation time via a
/// zero-argument supplier, enabling self- and mutually-referential rules.
pub fn recursive<A, S, E>(thunk: impl Fn() -> Parser<A, S, E> + Send + Sync + 'static) -> Parser<A, S, E>
where
    A: 'static,
    S: 'static,
    E: 'static,
{
    Parser::new(move |state| thunk().apply(state))
}
