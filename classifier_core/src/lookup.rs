//! Static lookups for canned questions and UI labels

use crate::types::Intent;
use ahash::AHashMap;
use std::sync::LazyLock;

/// A canned question offered by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestedQuestion {
    pub id: &'static str,
    pub text: &'static str,
    pub intent: Intent,
}

const SUGGESTED_QUESTIONS: [SuggestedQuestion; 5] = [
    SuggestedQuestion {
        id: "why-cholesterol-rising",
        text: "Why is her cholesterol rising?",
        intent: Intent::Mechanism,
    },
    SuggestedQuestion {
        id: "best-intervention",
        text: "What is the best intervention for her?",
        intent: Intent::Comprehensive,
    },
    SuggestedQuestion {
        id: "should-prescribe-statin",
        text: "Should I prescribe a statin?",
        intent: Intent::BinaryDecision,
    },
    SuggestedQuestion {
        id: "hrt-vs-statin",
        text: "Compare HRT versus statin for this patient",
        intent: Intent::HeadToHead,
    },
    SuggestedQuestion {
        id: "supplement-safety",
        text: "Are her non-prescription supplements safe?",
        intent: Intent::SupplementSafetyAssessment,
    },
];

static SUGGESTED_BY_ID: LazyLock<AHashMap<&'static str, Intent>> = LazyLock::new(|| {
    SUGGESTED_QUESTIONS
        .iter()
        .map(|question| (question.id, question.intent))
        .collect()
});

pub fn suggested_questions() -> &'static [SuggestedQuestion] {
    &SUGGESTED_QUESTIONS
}

/// Map a canned question id straight to its intent, skipping scoring
///
/// Surrounding whitespace on `id` is ignored, since ids arrive from UI
/// attributes. Unrecognized ids map to `Comprehensive`.
pub fn intent_for_suggested_id(id: &str) -> Intent {
    SUGGESTED_BY_ID
        .get(id.trim())
        .copied()
        .unwrap_or(Intent::Comprehensive)
}

/// Whether `value` is one of the intent identifiers
pub fn is_supported_intent(value: &str) -> bool {
    value.parse::<Intent>().is_ok()
}

pub fn display_name(intent: Intent) -> &'static str {
    match intent {
        Intent::Mechanism => "Mechanism Explanation",
        Intent::Comprehensive => "Comprehensive Comparison",
        Intent::BinaryDecision => "Prescribing Decision",
        Intent::HeadToHead => "Head-to-Head Comparison",
        Intent::SupplementSafetyAssessment => "Supplement Safety Assessment",
        Intent::Unknown => "Unknown",
    }
}

/// Label for an intent identifier; anything unrecognized is `"Unknown"`
pub fn display_name_for(value: &str) -> &'static str {
    value
        .parse::<Intent>()
        .map(display_name)
        .unwrap_or_else(|_| display_name(Intent::Unknown))
}
