//! Dice and arithmetic expressions.

pub(crate) mod grammar;
pub(crate) mod rules;
