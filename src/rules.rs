//! Grammar rules, grouped by family.
//!
//! Each family exposes `rules::get()` returning its rules in priority order;
//! [`get`] concatenates the families into the full priority list the engine
//! runs. `span` must come last: it matches any non-empty input.

pub(crate) mod expr;
pub(crate) mod markup;
pub(crate) mod text;

use crate::Rule;

/// Every rule, highest priority first.
pub(crate) fn get() -> Vec<Rule> {
    let mut rules = markup::rules::get();
    rules.extend(expr::rules::get());
    rules.extend(text::rules::get());
    rules
}
