//! Deterministic expression evaluation.
//!
//! [`evaluate`] is a pure function of the expression tree and the sequence of
//! draws taken from the [`Rng`]. The draw order is part of the contract
//! between independent evaluators:
//!
//! ```text
//! Binary{op, l, r} ──▶ evaluate l completely, then r
//! Roll{counter, face} ──▶ counter accepted samples, one after another
//! Num ──▶ no draws
//! ```
//!
//! Reordering any of this changes results for stored messages.
//!
//! ## Numeric policy
//!
//! Values are `i64`. `+`, `-` and `×` are exact and report overflow; `÷`
//! rounds toward negative infinity (`-7 ÷ 2 = -4`). Every failure is an
//! [`EvalError`] value.

#[path = "eval/rng.rs"]
mod rng;

pub use rng::{MULBERRY_INCREMENT, Rng, Seed, rejection_threshold};

use crate::error::EvalError;
use crate::expr::{ExprNode, Operator};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest dice counter a single roll may request.
pub const MAX_DICE_COUNTER: u32 = 64;

/// Deepest level (below the root) the evaluator descends to.
pub const MAX_EVAL_DEPTH: usize = 64;

/// An expression tree with every node resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EvaluatedNode {
    Num { value: i64 },
    Roll { counter: u32, face: u32, values: Vec<i64>, value: i64 },
    Binary { op: Operator, l: Box<EvaluatedNode>, r: Box<EvaluatedNode>, value: i64 },
}

impl EvaluatedNode {
    pub fn value(&self) -> i64 {
        match self {
            EvaluatedNode::Num { value }
            | EvaluatedNode::Roll { value, .. }
            | EvaluatedNode::Binary { value, .. } => *value,
        }
    }
}

/// Display string showing every intermediate result:
///
/// ```text
/// 3d6     ──▶ 3d6=[1, 5, 1]=7
/// 1d20+3  ──▶ 1d20=10+3=13
/// ```
impl fmt::Display for EvaluatedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluatedNode::Num { value } => write!(f, "{value}"),
            EvaluatedNode::Roll { counter, face, values, value } => {
                write!(f, "{counter}d{face}")?;
                if values.len() > 1 {
                    let joined: Vec<String> = values.iter().map(i64::to_string).collect();
                    write!(f, "=[{}]", joined.join(", "))?;
                }
                write!(f, "={value}")
            }
            EvaluatedNode::Binary { op, l, r, value } => write!(f, "{l}{op}{r}={value}"),
        }
    }
}

/// Evaluate `node`, drawing dice from `rng`.
pub fn evaluate(node: &ExprNode, rng: &mut Rng) -> Result<EvaluatedNode, EvalError> {
    evaluate_at(node, rng, 0)
}

/// Evaluate `node` with a fresh generator for `seed`.
pub fn evaluate_seeded(node: &ExprNode, seed: Seed) -> Result<EvaluatedNode, EvalError> {
    evaluate(node, &mut Rng::new(seed))
}

fn evaluate_at(node: &ExprNode, rng: &mut Rng, layer: usize) -> Result<EvaluatedNode, EvalError> {
    if layer > MAX_EVAL_DEPTH {
        return Err(EvalError::TooDeep { max: MAX_EVAL_DEPTH });
    }
    match node {
        ExprNode::Num { value } => Ok(EvaluatedNode::Num { value: *value }),
        ExprNode::Roll { counter, face } => {
            let (counter, face) = (*counter, *face);
            if counter > MAX_DICE_COUNTER {
                return Err(EvalError::TooManyDice { counter, max: MAX_DICE_COUNTER });
            }
            if face == 0 {
                return Err(EvalError::ZeroFace);
            }
            let mut values = Vec::with_capacity(counter as usize);
            for _ in 0..counter {
                let x = rng.roll(face).ok_or(EvalError::ZeroFace)?;
                values.push(i64::from(x));
            }
            let value = values.iter().sum();
            Ok(EvaluatedNode::Roll { counter, face, values, value })
        }
        ExprNode::Binary { op, l, r } => {
            let l = evaluate_at(l, rng, layer + 1)?;
            let r = evaluate_at(r, rng, layer + 1)?;
            let value = apply(*op, l.value(), r.value())?;
            Ok(EvaluatedNode::Binary { op: *op, l: Box::new(l), r: Box::new(r), value })
        }
    }
}

fn apply(op: Operator, a: i64, b: i64) -> Result<i64, EvalError> {
    match op {
        Operator::Add => a.checked_add(b).ok_or(EvalError::Overflow),
        Operator::Sub => a.checked_sub(b).ok_or(EvalError::Overflow),
        Operator::Mul => a.checked_mul(b).ok_or(EvalError::Overflow),
        Operator::Div => floor_div(a, b),
    }
}

fn floor_div(a: i64, b: i64) -> Result<i64, EvalError> {
    if b == 0 {
        return Err(EvalError::DivisionByZero);
    }
    let q = a.checked_div(b).ok_or(EvalError::Overflow)?;
    if a % b != 0 && (a < 0) != (b < 0) { Ok(q - 1) } else { Ok(q) }
}
