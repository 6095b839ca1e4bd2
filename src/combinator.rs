//! Parser combinators over a threaded scan [`State`].
//!
//! Every parser in this crate is a [`Parser<T>`]: a shared, immutable wrapper
//! around a pure function
//!
//! ```text
//! (&State, &Env) ──▶ Option<(T, State)>
//!                     │
//!                     ├─ Some: value + the state after the match
//!                     └─ None: no match; the caller still owns its state
//! ```
//!
//! Failure is a return value, never a panic, so alternatives can simply be
//! retried from the state they were given. There is no memoization: each
//! alternative of a [`choice`] re-scans from the same starting state.
//!
//! ## State
//!
//! [`State`] pairs the plain text produced so far with the unconsumed input
//! (`rest`). Matching advances `rest`; only the rules that emit entities
//! append text, which is why [`Parser::then`] hands the post-match state to
//! its callback.
//!
//! The produced text lives in one buffer shared by every state of a run.
//! A state only records how much of that buffer is its own, so advancing
//! never copies text. Appending from a state first cuts the buffer back to
//! that state's length, which discards whatever an abandoned alternative
//! wrote after it.
//!
//! ## Recursion
//!
//! Recursive grammars are written as ordinary `fn` items wrapped with
//! [`Parser::new`]; the combinator graph itself never contains a cycle.
//! [`nested`] bounds how deep such recursion may go. Running into the bound
//! is recorded on the run (see [`State::take_too_deep`]) so a caller can
//! reject a match that a deeper branch was cut out of.

use crate::Env;
use crate::entity::utf16_len;
use regex::Regex;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Maximum nesting depth accepted by [`nested`].
pub const MAX_EXPR_DEPTH: u16 = 64;

/// Output shared by all states of one run.
#[derive(Debug, Default)]
struct Output {
    text: RefCell<String>,
    too_deep: Cell<bool>,
}

/// Scan state threaded through every parser.
///
/// Cloning copies two counters and a reference count, never the text.
#[derive(Debug, Clone)]
pub struct State<'s> {
    out: Rc<Output>,
    /// Bytes of the shared buffer that belong to this state.
    text_len: usize,
    /// The same prefix measured in UTF-16 code units.
    units: usize,
    /// Unconsumed remainder of the source.
    pub rest: &'s str,
    /// Current recursion depth (see [`nested`]).
    pub depth: u16,
}

impl<'s> State<'s> {
    /// Start of a parse: nothing consumed yet.
    pub fn new(source: &'s str) -> Self {
        State { out: Rc::default(), text_len: 0, units: 0, rest: source, depth: 0 }
    }

    /// Length of the accumulated text in UTF-16 code units.
    ///
    /// Entity offsets are counted in the same unit, so a rule's `start` is
    /// simply `state.offset()`.
    pub fn offset(&self) -> usize {
        self.units
    }

    /// Copy of the accumulated text.
    pub fn text(&self) -> String {
        self.out.text.borrow()[..self.text_len].to_string()
    }

    /// Append `s` to the accumulated text.
    pub fn append(mut self, s: &str) -> Self {
        {
            let mut text = self.out.text.borrow_mut();
            text.truncate(self.text_len);
            text.push_str(s);
            self.text_len = text.len();
        }
        self.units += utf16_len(s);
        self
    }

    /// Drop the first `len` bytes of the remainder, keeping the accumulated text.
    ///
    /// `len` must fall on a char boundary of `rest`.
    pub fn advance(&self, len: usize) -> Self {
        State { rest: &self.rest[len..], ..self.clone() }
    }

    /// Source text consumed between `earlier` and `self`.
    ///
    /// `self.rest` must be a suffix of `earlier.rest`.
    pub fn consumed_since(&self, earlier: &State<'s>) -> &'s str {
        let rest = earlier.rest;
        &rest[..rest.len().saturating_sub(self.rest.len())]
    }

    /// This state with its recursion depth replaced.
    pub fn at_depth(&self, depth: u16) -> Self {
        State { depth, ..self.clone() }
    }

    /// Record that the depth bound was hit during this run.
    pub fn mark_too_deep(&self) {
        self.out.too_deep.set(true);
    }

    /// Whether the depth bound was hit since the last call, clearing the flag.
    pub fn take_too_deep(&self) -> bool {
        self.out.too_deep.replace(false)
    }
}

type StepFn<T> = dyn for<'s> Fn(&State<'s>, &Env) -> Option<(T, State<'s>)> + Send + Sync;

/// A parser producing values of type `T`.
///
/// Cloning is cheap (reference counted), and parsers are `Send + Sync` so a
/// compiled grammar can live in a process-wide static.
pub struct Parser<T> {
    step: Arc<StepFn<T>>,
}

impl<T> Clone for Parser<T> {
    fn clone(&self) -> Self {
        Parser { step: Arc::clone(&self.step) }
    }
}

impl<T> fmt::Debug for Parser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser").field("step", &"<function>").finish()
    }
}

impl<T: 'static> Parser<T> {
    /// Wrap a step function (closure or `fn` item) as a parser.
    pub fn new<F>(f: F) -> Self
    where
        F: for<'s> Fn(&State<'s>, &Env) -> Option<(T, State<'s>)> + Send + Sync + 'static,
    {
        Parser { step: Arc::new(f) }
    }

    /// Run the parser against `state`.
    pub fn run<'s>(&self, state: &State<'s>, env: &Env) -> Option<(T, State<'s>)> {
        (self.step)(state, env)
    }

    /// Transform the success value. Failure propagates unchanged.
    pub fn map<U: 'static, F>(self, f: F) -> Parser<U>
    where
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        Parser::new(move |state, env| self.run(state, env).map(|(x, next)| (f(x), next)))
    }

    /// Like [`Parser::map`], but `f` also sees the state right after the match
    /// and the `Env`, and may itself reject the match.
    ///
    /// The state handed to `f` has `rest` advanced while its text is still
    /// the text accumulated *before* this parser ran, so entity offsets are
    /// simply `state.offset()`:
    ///
    /// ```text
    /// regex("**bold**").then(|m, state, _| {
    ///     start = state.offset()            // offset into the output text
    ///     state.append(m.group(1))          // splice "bold"
    /// })
    /// ```
    pub fn then<U: 'static, F>(self, f: F) -> Parser<U>
    where
        F: for<'s> Fn(T, State<'s>, &Env) -> Option<(U, State<'s>)> + Send + Sync + 'static,
    {
        Parser::new(move |state, env| {
            let (x, next) = self.run(state, env)?;
            f(x, next, env)
        })
    }

    /// Sequence with `p2`, keeping this parser's value.
    pub fn skip<U: 'static>(self, p2: Parser<U>) -> Parser<T> {
        Parser::new(move |state, env| {
            let (x, s1) = self.run(state, env)?;
            let (_, s2) = p2.run(&s1, env)?;
            Some((x, s2))
        })
    }

    /// Sequence with `p2`, keeping `p2`'s value.
    pub fn with<U: 'static>(self, p2: Parser<U>) -> Parser<U> {
        Parser::new(move |state, env| {
            let (_, s1) = self.run(state, env)?;
            p2.run(&s1, env)
        })
    }

    /// Sequence with `p2`, keeping both values.
    pub fn and<U: 'static>(self, p2: Parser<U>) -> Parser<(T, U)> {
        Parser::new(move |state, env| {
            let (x1, s1) = self.run(state, env)?;
            let (x2, s2) = p2.run(&s1, env)?;
            Some(((x1, x2), s2))
        })
    }
}

/// Optional construct: on failure succeed with `None` and the unchanged state.
pub fn maybe<T: 'static>(p: Parser<T>) -> Parser<Option<T>> {
    Parser::new(move |state, env| match p.run(state, env) {
        Some((x, next)) => Some((Some(x), next)),
        None => Some((None, state.clone())),
    })
}

/// Repeat `p` until it fails. Never fails itself.
///
/// A success that consumes no input also ends the repetition (and is not
/// collected), so `many` always terminates.
pub fn many<T: 'static>(p: Parser<T>) -> Parser<Vec<T>> {
    Parser::new(move |state, env| {
        let mut xs = Vec::new();
        let mut current = state.clone();
        while let Some((x, next)) = p.run(&current, env) {
            if next.rest.len() == current.rest.len() {
                break;
            }
            xs.push(x);
            current = next;
        }
        Some((xs, current))
    })
}

/// Ordered alternation: the first alternative that succeeds wins.
pub fn choice<T: 'static>(parsers: Vec<Parser<T>>) -> Parser<T> {
    Parser::new(move |state, env| parsers.iter().find_map(|p| p.run(state, env)))
}

/// Run `p` one recursion level deeper.
///
/// Fails without running `p` once the depth reaches [`MAX_EXPR_DEPTH`], and
/// marks the run as too deep. The depth of the returned state is restored to
/// the caller's.
pub fn nested<T: 'static>(p: Parser<T>) -> Parser<T> {
    Parser::new(move |state, env| {
        if state.depth >= MAX_EXPR_DEPTH {
            state.mark_too_deep();
            return None;
        }
        let (x, next) = p.run(&state.at_depth(state.depth + 1), env)?;
        Some((x, next.at_depth(state.depth)))
    })
}

/// Capture groups of a successful [`regex`] match, owned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexMatch {
    groups: Vec<String>,
}

impl RegexMatch {
    /// The whole match (group 0).
    pub fn whole(&self) -> &str {
        self.group(0)
    }

    /// Capture group `idx`; an unmatched or missing group is `""`.
    pub fn group(&self, idx: usize) -> &str {
        self.groups.get(idx).map(String::as_str).unwrap_or("")
    }
}

/// Anchored match of `re` against the remainder only.
///
/// Patterns are expected to start with `^`; a match that does not begin at
/// the start of the remainder is treated as a failure either way.
pub fn regex(re: &'static Regex) -> Parser<RegexMatch> {
    Parser::new(move |state, _env| {
        let caps = re.captures(state.rest)?;
        let whole = caps.get(0)?;
        if whole.start() != 0 {
            return None;
        }
        let groups = caps.iter().map(|g| g.map(|m| m.as_str().to_string()).unwrap_or_default()).collect();
        Some((RegexMatch { groups }, state.advance(whole.end())))
    })
}

/// Zero or more whitespace characters.
///
/// The set is the one chat clients use: U+FEFF counts, U+0085 does not.
pub fn whitespace() -> Parser<()> {
    regex(regex!(r"^[\s\x{FEFF}--\x{85}]*")).map(|_| ())
}
