//! Chat markup parsing and deterministic dice evaluation.
//!
//! [`parse`] turns a raw chat message into plain text plus [`Entity`] ranges
//! (bold, links, dice/arithmetic expressions). [`evaluate`] rolls an
//! [`ExprNode`] from a seeded [`Rng`], so every client that stores the same
//! seed with a message sees the same results.
//!
//! ```text
//! "**hi** roll 1d20+3"
//!     │ parse
//!     v
//! text: "hi roll 1d20+3"
//! entities: [Strong 0+2, Text 2+6, Expr 8+6 (1d20 + 3)]
//!     │ evaluate_entities(seed)
//!     v
//! "1d20=10+3=13"
//! ```

#[macro_use]
mod macros;
mod api;
pub mod combinator;
mod engine;
mod entity;
mod error;
mod eval;
mod export;
mod expr;
mod rules;

#[cfg(test)]
mod fuzz_tests;

pub use api::{
    DEFAULT_FACE, Env, ParseDetails, ParseResult, ParseResultVerbose, UsernameResolver, parse, parse_verbose_with,
    parse_with,
};
pub use combinator::MAX_EXPR_DEPTH;
pub use entity::{Entity, EntityKind};
pub use error::{CoverageError, EvalError};
pub use eval::{
    EvaluatedNode, MAX_DICE_COUNTER, MAX_EVAL_DEPTH, MULBERRY_INCREMENT, Rng, Seed, evaluate, evaluate_seeded,
    rejection_threshold,
};
pub use export::{ExportEntity, ExprOutcome, evaluate_entities};
pub use expr::{ExprNode, Operator, node_to_text};

/// A top-level grammar rule: one alternative of the entity choice.
///
/// Rules run in list order at every position; the first that matches wins.
#[derive(Debug)]
pub(crate) struct Rule {
    pub name: &'static str,
    /// Input features of which at least one must be present for the rule to
    /// run. Empty means always run.
    pub buckets: engine::BucketMask,
    /// Disabled when `Env::parse_expr` is off.
    pub expression: bool,
    pub parser: combinator::Parser<Entity>,
}
