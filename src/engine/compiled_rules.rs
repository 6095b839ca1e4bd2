//! Rule metadata and per-run selection.
//!
//! Each rule declares the coarse input features (`BucketMask` bits) it cannot
//! match without. Selection keeps a rule when
//!
//! - it declares no buckets (always on), or
//! - the input has **at least one** of its buckets,
//!
//! and, for expression rules, when `Env::parse_expr` is set.
//!
//! ## Extension points
//!
//! Adding a new bucket:
//!   1. Add a `BucketMask` bit.
//!   2. Teach `TriggerInfo::scan` (in `trigger.rs`) to detect it.
//!   3. Declare it on the rules that need it (`rule!{ buckets: ... }`).
//!
//! ## Invariants
//!
//! - `CompiledRules::rules` keeps the priority order of the slice it was built
//!   from, and `select` never reorders.
//! - A bucket may only be required by a rule if every possible match of that
//!   rule implies the bucket is present in the input.

use crate::{Env, Rule};

bitflags::bitflags! {
    /// Coarse buckets for fast input classification.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub(crate) struct BucketMask: u32 {
        /// An ASCII digit somewhere in the input.
        const HAS_DIGITS      = 1 << 0;
        /// A `**` pair opener.
        const HAS_DOUBLE_STAR = 1 << 1;
        /// Both `[` and `](`.
        const HAS_LINK_SYNTAX = 1 << 2;
        /// `http://` or `https://`.
        const HAS_URL_SCHEME  = 1 << 3;
        /// A lowercase `d` (dice notation).
        const HAS_DICE        = 1 << 4;
    }
}

/// Per-rule metadata copied out of the `Rule` list.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RuleMeta {
    pub buckets: BucketMask,
    pub expression: bool,
}

impl RuleMeta {
    fn admits(&self, buckets: BucketMask, env: &Env) -> bool {
        if self.expression && !env.parse_expr {
            return false;
        }
        self.buckets.is_empty() || buckets.intersects(self.buckets)
    }
}

/// Rule set with its metadata, ready for selection.
#[derive(Debug)]
pub(crate) struct CompiledRules<'a> {
    pub rules: Vec<&'a Rule>,
    pub metas: Vec<RuleMeta>,
}

impl<'a> CompiledRules<'a> {
    /// Compile `rules`, keeping their order.
    pub fn new(rules: &'a [Rule]) -> Self {
        let rules: Vec<&Rule> = rules.iter().collect();
        let metas = rules
            .iter()
            .map(|r| RuleMeta { buckets: r.buckets, expression: r.expression })
            .collect();
        CompiledRules { rules, metas }
    }

    /// Rules that can match somewhere in an input with `buckets`, in priority order.
    pub fn select(&self, buckets: BucketMask, env: &Env) -> Vec<&'a Rule> {
        self.rules.iter().zip(&self.metas).filter(|(_, meta)| meta.admits(buckets, env)).map(|(r, _)| *r).collect()
    }
}
