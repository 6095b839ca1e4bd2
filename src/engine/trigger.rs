//! Trigger scanning (input pre-classification).
//!
//! One cheap pass over the raw input produces a `BucketMask` used to skip
//! rules that cannot match anywhere in it.
//!
//! ## Design notes
//!
//! - The scan may report false positives (a `[` that never becomes a link);
//!   the rule still has to match for real. It must never report a false
//!   negative, or a rule that could have matched would be skipped and the
//!   output would change.
//! - Keep every check a plain substring or byte test.

use super::compiled_rules::BucketMask;

/// Input characteristics detected from the raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TriggerInfo {
    pub buckets: BucketMask,
}

impl TriggerInfo {
    /// Scan `input` for coarse buckets.
    pub fn scan(input: &str) -> Self {
        let mut buckets = BucketMask::empty();

        if input.bytes().any(|b| b.is_ascii_digit()) {
            buckets |= BucketMask::HAS_DIGITS;
        }
        if input.contains("**") {
            buckets |= BucketMask::HAS_DOUBLE_STAR;
        }
        if input.contains('[') && input.contains("](") {
            buckets |= BucketMask::HAS_LINK_SYNTAX;
        }
        if input.contains("http://") || input.contains("https://") {
            buckets |= BucketMask::HAS_URL_SCHEME;
        }
        if input.contains('d') {
            buckets |= BucketMask::HAS_DICE;
        }

        TriggerInfo { buckets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_detects_each_bucket() {
        let cases: Vec<(&str, BucketMask)> = vec![
            ("hello", BucketMask::empty()),
            ("a 7", BucketMask::HAS_DIGITS),
            ("**x**", BucketMask::HAS_DOUBLE_STAR),
            ("[t](u)", BucketMask::HAS_LINK_SYNTAX),
            ("[t] (u)", BucketMask::empty()),
            ("see https://a.io", BucketMask::HAS_URL_SCHEME),
            ("roll d", BucketMask::HAS_DICE),
            ("1d20", BucketMask::HAS_DIGITS | BucketMask::HAS_DICE),
        ];
        for (input, expected) in cases {
            assert_eq!(TriggerInfo::scan(input).buckets, expected, "input {input:?}");
        }
    }

    #[test]
    fn digits_are_ascii_only() {
        assert_eq!(TriggerInfo::scan("٣").buckets, BucketMask::empty());
    }
}
