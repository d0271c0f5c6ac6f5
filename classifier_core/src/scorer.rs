//! Weighted keyword/phrase scoring of normalized text against one rule

use crate::types::{PatternRule, ScoreBreakdown};

/// Points per matched phrase
pub const PHRASE_WEIGHT: usize = 30;
/// Points per matched keyword
pub const KEYWORD_WEIGHT: usize = 10;
/// Upper bound of any score
pub const MAX_SCORE: usize = 100;

/// Score `normalized_text` against `rule`
///
/// 1. Required terms gate → 0 unless every one is present
/// 2. Keywords and phrases count by plain substring containment
/// 3. `phrases * 30 + keywords * 10`, capped at 100
///
/// Matching is not token-boundary aware: a keyword inside a longer word counts.
pub fn score(normalized_text: &str, rule: &PatternRule) -> ScoreBreakdown {
    if !rule
        .required_terms
        .iter()
        .all(|term| normalized_text.contains(term.as_str()))
    {
        return ScoreBreakdown::zero();
    }

    let matched_keywords = matches_in(normalized_text, &rule.keywords);
    let matched_phrases = matches_in(normalized_text, &rule.phrases);

    let raw = matched_phrases.len() * PHRASE_WEIGHT + matched_keywords.len() * KEYWORD_WEIGHT;

    ScoreBreakdown {
        // Clamped to MAX_SCORE first, so the narrowing cannot truncate
        score: raw.min(MAX_SCORE) as u8,
        matched_keywords,
        matched_phrases,
    }
}

fn matches_in(text: &str, terms: &[String]) -> Vec<String> {
    terms
        .iter()
        .filter(|term| text.contains(term.as_str()))
        .cloned()
        .collect()
}
