use crate::engine;
use crate::entity::{check_coverage, utf16_len};
use crate::{CoverageError, Entity, EntityKind, Rule};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

static DEFAULT_RULES: Lazy<Vec<Rule>> = Lazy::new(crate::rules::get);

/// Default number of faces for `d` and `Nd` rolls.
pub const DEFAULT_FACE: u32 = 20;

/// Maps a display name to a user id.
pub type UsernameResolver = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Per-call parsing configuration.
#[derive(Clone)]
pub struct Env {
    /// Faces of a roll written without a face count (`d`, `3d`).
    pub default_face: u32,
    /// Recognize dice and arithmetic. Off for out-of-game chat, where digits
    /// stay plain text.
    pub parse_expr: bool,
    /// Optional username lookup. Not used by the current grammar.
    pub username_resolver: Option<UsernameResolver>,
}

impl Default for Env {
    fn default() -> Self {
        Env { default_face: DEFAULT_FACE, parse_expr: true, username_resolver: None }
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Env")
            .field("default_face", &self.default_face)
            .field("parse_expr", &self.parse_expr)
            .field("username_resolver", &self.username_resolver.as_ref().map(|_| "<function>"))
            .finish()
    }
}

impl Env {
    pub fn with_default_face(mut self, face: u32) -> Self {
        self.default_face = face;
        self
    }

    pub fn with_parse_expr(mut self, parse_expr: bool) -> Self {
        self.parse_expr = parse_expr;
        self
    }

    pub fn with_username_resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.username_resolver = Some(Arc::new(resolver));
        self
    }

    /// Resolve `name` through the configured resolver; `None` without one.
    pub fn resolve_username(&self, name: &str) -> Option<String> {
        self.username_resolver.as_ref().and_then(|resolve| resolve(name))
    }
}

/// Result from [`parse`] and [`parse_with`].
///
/// Entities cover `text` exactly: in order, without gaps or overlaps, never
/// splitting a character. Offsets count UTF-16 code units of `text`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParseResult {
    /// Displayed text, markup markers removed.
    pub text: String,
    pub entities: Vec<Entity>,
}

impl ParseResult {
    /// Rebuild a result from storage.
    ///
    /// Messages stored before entities existed have a text and no entities;
    /// those get a single `Text` entity over the whole text.
    pub fn from_stored(text: impl Into<String>, entities: Vec<Entity>) -> Self {
        let text = text.into();
        let entities = if entities.is_empty() && !text.is_empty() {
            vec![Entity::Text { start: 0, offset: utf16_len(&text) }]
        } else {
            entities
        };
        ParseResult { text, entities }
    }

    /// Verify that the entities cover `text` exactly.
    pub fn check_coverage(&self) -> Result<(), CoverageError> {
        check_coverage(&self.text, &self.entities)
    }
}

/// Additional details returned by [`parse_verbose_with`].
#[derive(Debug, Clone)]
pub struct ParseDetails {
    /// Total elapsed time.
    pub total: Duration,
    /// Time spent in the grammar loop.
    pub grammar: Duration,
    /// Names of rules that were active for this input.
    pub active_rules: Vec<String>,
    /// Entities before adjacent `Text` merging.
    pub raw_entities: usize,
    /// Final entities per kind, zero counts omitted.
    pub entity_counts: Vec<(EntityKind, usize)>,
}

/// Result from [`parse_verbose_with`].
#[derive(Debug, Clone)]
pub struct ParseResultVerbose {
    pub result: ParseResult,
    pub elapsed: Duration,
    pub details: ParseDetails,
}

/// Parse `source` with the default [`Env`].
///
/// # Example
/// ```
/// use boluo_markup::{Entity, parse};
///
/// let out = parse("**hi** there");
/// assert_eq!(out.text, "hi there");
/// assert_eq!(out.entities[0], Entity::Strong { start: 0, offset: 2 });
/// ```
pub fn parse(source: &str) -> ParseResult {
    parse_with(source, &Env::default())
}

/// Parse `source` with `env`.
pub fn parse_with(source: &str, env: &Env) -> ParseResult {
    let (text, entities) = engine::Parser::new(source, &DEFAULT_RULES, env).run();
    ParseResult { text, entities }
}

/// Parse `source` with `env` and return timing and rule details as well.
pub fn parse_verbose_with(source: &str, env: &Env) -> ParseResultVerbose {
    let parser = engine::Parser::new(source, &DEFAULT_RULES, env);
    let active_rules = parser.active_rule_names().into_iter().map(str::to_string).collect();

    let run = parser.run_with_metrics();
    let entity_counts = run.entity_counts();

    let details = ParseDetails {
        total: run.metrics.total,
        grammar: run.metrics.grammar,
        active_rules,
        raw_entities: run.metrics.raw_entities,
        entity_counts,
    };

    ParseResultVerbose {
        result: ParseResult { text: run.text, entities: run.entities },
        elapsed: run.metrics.total,
        details,
    }
}
