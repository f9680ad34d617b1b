#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Build a structural table entry: a canonical tag and its anchored matcher.
#[macro_export]
macro_rules! format_rule {
    ($tag:ident, $pat:literal $(,)?) => {
        $crate::engine::FormatRule { tag: $crate::FormatTag::$tag, matcher: $crate::regex!($pat) }
    };
}
