/// Compile a regex literal once and hand out a `&'static Regex`.
///
/// Every grammar pattern is a literal, so a failure here is a bug in the
/// pattern itself and surfaces the first time the rule runs.
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Build a top-level [`crate::Rule`].
///
/// ```text
/// rule! {
///     name: "strong",
///     buckets: BucketMask::HAS_DOUBLE_STAR,
///     parser: strong(),
/// }
/// ```
///
/// `buckets` defaults to empty (always active) and `expression` to `false`.
macro_rules! rule {
    (
        name: $name:expr
        $(, buckets: $buckets:expr)?
        $(, expression: $expression:expr)?
        , parser: $parser:expr
        $(,)?
    ) => {{
        $crate::Rule {
            name: $name,
            buckets: { $crate::engine::BucketMask::empty() $(| $buckets)? },
            expression: { false $(|| $expression)? },
            parser: $parser,
        }
    }};
}
