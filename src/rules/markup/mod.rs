//! Inline markup: `**strong**`, `[title](url)` links and bare URLs.

pub(crate) mod rules;
