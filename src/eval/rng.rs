//! The deterministic random source shared by every evaluator.
//!
//! This file *is* the interoperability contract: any other implementation
//! (client renderer, export tool, server-side verifier) must reproduce it bit
//! for bit, or independent viewers will disagree about dice results.
//!
//! ## Generator
//!
//! mulberry32 in counter form. The k-th raw draw (k = 1, 2, …) of a seed is
//! a pure function of `(seed, k)`, all arithmetic mod 2³²:
//!
//! ```text
//! a   = seed + k · 0x6D2B79F5
//! t   = (a ^ (a >> 15)) · (a | 1)
//! t   = (t + ((t ^ (t >> 7)) · (t | 61))) ^ t
//! out = t ^ (t >> 14)
//! ```
//!
//! This matches the usual iterative JavaScript `mulberry32(seed)` draw for
//! draw. Seed 12345 starts 4207900869, 1317490944, 2079646450.
//!
//! ## Range mapping
//!
//! A die with `face ≥ 1` sides uses rejection sampling against
//! `T(face) = floor(2³² / face) · face`:
//!
//! ```text
//! x = next draw
//! x <  T(face) ──▶ x mod face + 1
//! x >= T(face) ──▶ discard x, draw again (the discarded draw still counts)
//! ```

use serde::{Deserialize, Serialize};

/// Weyl increment applied per draw.
pub const MULBERRY_INCREMENT: u32 = 0x6D2B79F5;

/// Per-message seed, minted once by the messaging layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seed(pub u32);

impl Seed {
    /// Seed from its stored 4-byte form, most significant byte first.
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Seed(u32::from_be_bytes(bytes))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for Seed {
    fn from(value: u32) -> Self {
        Seed(value)
    }
}

/// Explicit generator state: the seed plus the number of raw draws taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rng {
    seed: u32,
    draws: u32,
}

impl Rng {
    pub fn new(seed: Seed) -> Self {
        Rng { seed: seed.0, draws: 0 }
    }

    pub fn seed(&self) -> Seed {
        Seed(self.seed)
    }

    /// Raw draws taken so far, rejected ones included (wraps at 2³²).
    pub fn draws(&self) -> u32 {
        self.draws
    }

    /// Next raw 32-bit draw.
    pub fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.wrapping_add(1);
        mulberry32(self.seed.wrapping_add(self.draws.wrapping_mul(MULBERRY_INCREMENT)))
    }

    /// Uniform sample in `[1, face]`; `None` when `face` is 0.
    pub fn roll(&mut self, face: u32) -> Option<u32> {
        if face == 0 {
            return None;
        }
        loop {
            let x = self.next_u32();
            match map_draw(x, face) {
                Some(value) => return Some(value),
                None => tracing::trace!(draw = x, face, "rejected draw"),
            }
        }
    }
}

fn mulberry32(a: u32) -> u32 {
    let mut t = (a ^ (a >> 15)).wrapping_mul(a | 1);
    t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61)) ^ t;
    t ^ (t >> 14)
}

/// Rejection threshold `floor(2³² / face) · face` for `face ≥ 1`.
pub fn rejection_threshold(face: u32) -> u64 {
    let face = u64::from(face.max(1));
    (1u64 << 32) / face * face
}

/// Map one raw draw into `[1, face]`, or `None` if it must be rejected.
pub(crate) fn map_draw(x: u32, face: u32) -> Option<u32> {
    if u64::from(x) < rejection_threshold(face) { Some(x % face + 1) } else { None }
}
