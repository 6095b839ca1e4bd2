//! Engine run metrics.
//!
//! Collected on every run (they are a handful of counters and two
//! `Instant`s) and surfaced only through `parse_verbose_with`.

use crate::{Entity, EntityKind};
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub(crate) struct RunMetrics {
    /// Total elapsed time for [`super::Parser::run_with_metrics`].
    pub total: Duration,
    /// Time spent in the grammar loop (excludes scan and reduction).
    pub grammar: Duration,
    /// Entities produced by the grammar before `Text` merging.
    pub raw_entities: usize,
}

/// Parser output bundled with timing information.
#[derive(Debug, Clone)]
pub(crate) struct RunResult {
    /// Plain text accumulated by the rules.
    pub text: String,
    /// Reduced entities.
    pub entities: Vec<Entity>,
    pub metrics: RunMetrics,
}

impl RunResult {
    /// Count of reduced entities per kind, in `EntityKind` order, zero counts omitted.
    pub fn entity_counts(&self) -> Vec<(EntityKind, usize)> {
        let mut counts: Vec<(EntityKind, usize)> = Vec::new();
        let mut kinds: Vec<EntityKind> = self.entities.iter().map(Entity::kind).collect();
        kinds.sort();
        for kind in kinds {
            match counts.last_mut() {
                Some((last, n)) if *last == kind => *n += 1,
                _ => counts.push((kind, 1)),
            }
        }
        counts
    }
}
