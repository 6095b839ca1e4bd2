//! Parsing engine.
//!
//! The grammar itself lives in `src/rules/**`; this module decides which
//! rules take part in a run, drives them over the input and post-processes
//! their output.
//!
//! ## How the parts work together
//!
//! ```text
//! rules (all, priority order) ──┐
//!                               │  CompiledRules::new        (compiled_rules.rs)
//!                               └──────────────┬───────────
//!                                              │
//! input ── TriggerInfo::scan ──────────────────┼─ drop rules whose buckets are
//!          (trigger.rs)                        │  absent from the whole input
//!                                              v
//!                              Parser::run (parser.rs)
//!                                many(choice(active rules))
//!                                              │
//!                                              v
//!                              merge_text_entities (reduce.rs)
//!                                              │
//!                                              v
//!                                 (text, Vec<Entity>)
//! ```
//!
//! Gating never changes output: a rule that needs, say, `**` cannot match at
//! any position of an input that contains no `**`, and the surviving rules
//! keep their relative priority.
//!
//! ## Responsibilities by module
//!
//! - `compiled_rules.rs`: `BucketMask` and the per-run rule selection.
//! - `trigger.rs`: the one-pass input scan producing a `BucketMask`.
//! - `parser.rs`: runs the selected rules to the end of the input.
//! - `reduce.rs`: merges adjacent `Text` entities.
//! - `metrics.rs`: timing and counts for verbose runs.

#[path = "engine/compiled_rules.rs"]
mod compiled_rules;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/parser.rs"]
mod parser;
#[path = "engine/reduce.rs"]
mod reduce;
#[path = "engine/trigger.rs"]
mod trigger;

pub(crate) use compiled_rules::BucketMask;
pub(crate) use parser::Parser;
