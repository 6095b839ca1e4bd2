//! Error types.
//!
//! Parsing itself never fails (malformed markup degrades to plain text), so
//! the only errors are evaluation results and invariant checks on stored
//! entity lists.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an expression could not be evaluated.
///
/// These are surfaced to readers as an "invalid expression" marker; none of
/// them aborts rendering of the surrounding message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("arithmetic overflow")]
    Overflow,

    #[error("a die must have at least one face")]
    ZeroFace,

    #[error("too many dice: {counter} (at most {max})")]
    TooManyDice {
        /// Requested number of dice.
        counter: u32,
        /// Upper bound accepted by the evaluator.
        max: u32,
    },

    #[error("expression nested deeper than {max} levels")]
    TooDeep {
        /// Deepest level accepted below the root.
        max: usize,
    },
}

/// A violation of the entity coverage invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CoverageError {
    #[error("entity {index} starts at {found}, leaving {expected}..{found} uncovered")]
    Gap { index: usize, expected: usize, found: usize },

    #[error("entity {index} starts at {found}, overlapping the previous entity ending at {expected}")]
    Overlap { index: usize, expected: usize, found: usize },

    #[error("entity {index} ends at {end}, past the end of the text ({len})")]
    OutOfBounds { index: usize, end: usize, len: usize },

    #[error("entity {index} ends at {at}, between the halves of a surrogate pair")]
    NotCharBoundary { index: usize, at: usize },

    #[error("entities cover {covered} of {len} code units")]
    Uncovered { covered: usize, len: usize },
}
