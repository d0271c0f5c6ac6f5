//! Query text canonicalization

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex pattern"));

/// Canonicalize raw query text for substring matching
///
/// Lower-cases, trims, drops `?`, `!` and `.`, then collapses whitespace runs
/// to a single space. Total over any input, including the empty string.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped: String = lowered
        .trim()
        .chars()
        .filter(|c| !matches!(c, '?' | '!' | '.'))
        .collect();

    WHITESPACE_RUN.replace_all(&stripped, " ").into_owned()
}
