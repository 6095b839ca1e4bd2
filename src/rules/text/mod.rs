//! Plain text fallback.

pub(crate) mod rules;

#[cfg(test)]
mod tests;
