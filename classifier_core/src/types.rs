//! Core data types for classification results

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of query intents
///
/// Each intent selects a different downstream presentation. `Unknown` is never
/// scored; it is only returned for input that is not a usable string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Mechanism,
    Comprehensive,
    BinaryDecision,
    HeadToHead,
    SupplementSafetyAssessment,
    Unknown,
}

impl Intent {
    /// Every variant, `Unknown` last
    pub const ALL: [Intent; 6] = [
        Intent::Mechanism,
        Intent::Comprehensive,
        Intent::BinaryDecision,
        Intent::HeadToHead,
        Intent::SupplementSafetyAssessment,
        Intent::Unknown,
    ];

    /// Intents that may carry a pattern rule, in built-in declaration order
    pub const SCORABLE: [Intent; 5] = [
        Intent::Mechanism,
        Intent::Comprehensive,
        Intent::BinaryDecision,
        Intent::HeadToHead,
        Intent::SupplementSafetyAssessment,
    ];

    /// Stable wire identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Mechanism => "mechanism",
            Intent::Comprehensive => "comprehensive",
            Intent::BinaryDecision => "binary_decision",
            Intent::HeadToHead => "head_to_head",
            Intent::SupplementSafetyAssessment => "supplement_safety_assessment",
            Intent::Unknown => "unknown",
        }
    }

    pub fn is_scorable(&self) -> bool {
        !matches!(self, Intent::Unknown)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the intent identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnrecognizedIntent(pub String);

impl fmt::Display for UnrecognizedIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized intent: {:?}", self.0)
    }
}

impl std::error::Error for UnrecognizedIntent {}

impl FromStr for Intent {
    type Err = UnrecognizedIntent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .iter()
            .copied()
            .find(|intent| intent.as_str() == s)
            .ok_or_else(|| UnrecognizedIntent(s.to_string()))
    }
}

/// Keyword, phrase and gating configuration for one intent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternRule {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub phrases: Vec<String>,
    /// All of these must appear in the text or the rule scores zero
    #[serde(default)]
    pub required_terms: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl PatternRule {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phrases = phrases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_required_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_terms = terms.into_iter().map(Into::into).collect();
        self
    }
}

/// Score of one rule against one normalized text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScoreBreakdown {
    pub score: u8,
    pub matched_keywords: Vec<String>,
    pub matched_phrases: Vec<String>,
}

impl ScoreBreakdown {
    pub fn zero() -> Self {
        Self::default()
    }
}

/// One row of the diagnostic score table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentScore {
    #[serde(rename = "type")]
    pub intent: Intent,
    pub score: u8,
}

/// Output of a single classification call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    #[serde(rename = "type")]
    pub intent: Intent,
    pub confidence: u8,
    pub original_query: String,
    pub matched_keywords: Vec<String>,
    pub matched_phrases: Vec<String>,
    pub description: String,
    pub fallback: bool,
    /// Per-intent scores, highest first; empty only for invalid input
    pub all_scores: Vec<IntentScore>,
}

pub const INVALID_INPUT_DESCRIPTION: &str = "Invalid query input";
pub const FALLBACK_DESCRIPTION: &str =
    "No strong match found, defaulting to comprehensive comparison";

/// Fallback text naming the intent actually returned
fn fallback_description(intent: Intent) -> String {
    match intent {
        Intent::Comprehensive => FALLBACK_DESCRIPTION.to_string(),
        other => format!(
            "No strong match found, defaulting to {}",
            crate::lookup::display_name(other).to_lowercase()
        ),
    }
}

impl ClassificationResult {
    pub fn invalid_input() -> Self {
        Self {
            intent: Intent::Unknown,
            confidence: 0,
            original_query: String::new(),
            matched_keywords: Vec::new(),
            matched_phrases: Vec::new(),
            description: INVALID_INPUT_DESCRIPTION.to_string(),
            fallback: false,
            all_scores: Vec::new(),
        }
    }

    pub fn fallback(
        intent: Intent,
        confidence: u8,
        original_query: String,
        all_scores: Vec<IntentScore>,
    ) -> Self {
        Self {
            intent,
            confidence,
            original_query,
            matched_keywords: Vec::new(),
            matched_phrases: Vec::new(),
            description: fallback_description(intent),
            fallback: true,
            all_scores,
        }
    }

    pub fn matched(
        intent: Intent,
        breakdown: ScoreBreakdown,
        original_query: String,
        description: String,
        all_scores: Vec<IntentScore>,
    ) -> Self {
        Self {
            intent,
            confidence: breakdown.score.min(100),
            original_query,
            matched_keywords: breakdown.matched_keywords,
            matched_phrases: breakdown.matched_phrases,
            description,
            fallback: false,
            all_scores,
        }
    }

    /// Render as the camelCase JSON object consumed by the presentation layer
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
