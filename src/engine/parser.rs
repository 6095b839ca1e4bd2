//! Top-level parse loop.
//!
//! For one input:
//!
//! ```text
//! (0) trigger scan        -> BucketMask
//! (1) rule selection      -> active rules, priority order kept
//! (2) many(choice(active)) over the whole input
//! (3) leftover check      -> unreachable while `span` is active
//! (4) merge_text_entities
//! ```
//!
//! Output is a pure function of the input, the rule list and the `Env`.
//!
//! ## Debugging
//!
//! A `debug!` event per run lists the bucket mask and the active rules; run
//! with a `tracing` subscriber at `debug` level for the `boluo_markup` target
//! to see it.

use super::compiled_rules::{BucketMask, CompiledRules};
use super::metrics::{RunMetrics, RunResult};
use super::reduce::merge_text_entities;
use super::trigger::TriggerInfo;
use crate::combinator::{self, State, choice, many};
use crate::entity::utf16_len;
use crate::{Entity, Env, Rule};
use std::time::Instant;

/// Runs a rule list over one input.
///
/// Usage: `Parser::new(input, &rules, &env).run_with_metrics()`.
#[derive(Debug)]
pub(crate) struct Parser<'a> {
    input: &'a str,
    env: &'a Env,
    buckets: BucketMask,
    /// Rules that survived gating, in priority order.
    active: Vec<&'a Rule>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(input: &'a str, rules: &'a [Rule], env: &'a Env) -> Self {
        let trigger = TriggerInfo::scan(input);
        let active = CompiledRules::new(rules).select(trigger.buckets, env);
        Parser { input, env, buckets: trigger.buckets, active }
    }

    /// Names of the rules active for this input, in priority order.
    pub(crate) fn active_rule_names(&self) -> Vec<&'static str> {
        self.active.iter().map(|r| r.name).collect()
    }

    pub(crate) fn run(&self) -> (String, Vec<Entity>) {
        let run = self.run_with_metrics();
        (run.text, run.entities)
    }

    pub(crate) fn run_with_metrics(&self) -> RunResult {
        let start = Instant::now();
        let mut metrics = RunMetrics::default();

        if self.input.is_empty() {
            metrics.total = start.elapsed();
            return RunResult { text: String::new(), entities: Vec::new(), metrics };
        }

        tracing::debug!(
            buckets = ?self.buckets,
            active = ?self.active_rule_names(),
            len = self.input.len(),
            "parsing message"
        );

        let entity: combinator::Parser<Entity> = choice(self.active.iter().map(|r| r.parser.clone()).collect());
        let grammar_start = Instant::now();
        let (mut entities, mut state) = match many(entity).run(&State::new(self.input), self.env) {
            Some(done) => done,
            None => (Vec::new(), State::new(self.input)),
        };
        metrics.grammar = grammar_start.elapsed();

        if !state.rest.is_empty() {
            tracing::error!(
                consumed = self.input.len() - state.rest.len(),
                len = self.input.len(),
                "text rules stopped before the end of input; keeping the rest as plain text"
            );
            entities.push(Entity::Text { start: state.offset(), offset: utf16_len(state.rest) });
            let rest = state.rest;
            state = state.advance(rest.len()).append(rest);
        }

        metrics.raw_entities = entities.len();
        let entities = merge_text_entities(entities);
        metrics.total = start.elapsed();

        RunResult { text: state.text(), entities, metrics }
    }
}
