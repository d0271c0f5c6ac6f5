//! Ordered intent → rule table
//!
//! Declaration order is significant: when two intents tie on score, the one
//! declared first wins. The table is read-only once built and is shared by
//! every classification call.

use crate::error::RegistryError;
use crate::normalize::normalize;
use crate::types::{Intent, PatternRule};
use ahash::AHashSet;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRegistry {
    rows: Vec<(Intent, PatternRule)>,
}

/// One entry of a JSON registry document
#[derive(Debug, Deserialize)]
struct RegistryRow {
    #[serde(rename = "type")]
    intent: Intent,
    #[serde(flatten)]
    rule: PatternRule,
}

impl PatternRegistry {
    /// The built-in clinical question table
    pub fn builtin() -> Self {
        Self {
            rows: builtin_rows(),
        }
    }

    /// Build a registry from ordered rows
    ///
    /// Terms are normalized the same way query text is. Fails on a row for
    /// `Unknown`, a repeated intent, or an empty term. Does not require every
    /// intent to be present; see [`PatternRegistry::require_complete`].
    pub fn from_rows<I>(rows: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (Intent, PatternRule)>,
    {
        let mut seen = AHashSet::new();
        let mut validated = Vec::new();

        for (intent, rule) in rows {
            if !intent.is_scorable() {
                return Err(RegistryError::UnscorableIntent(intent));
            }
            if !seen.insert(intent) {
                return Err(RegistryError::DuplicateIntent(intent));
            }

            let rule = PatternRule {
                keywords: normalize_terms(intent, "keyword", rule.keywords)?,
                phrases: normalize_terms(intent, "phrase", rule.phrases)?,
                required_terms: normalize_terms(intent, "required term", rule.required_terms)?,
                description: rule.description,
            };
            validated.push((intent, rule));
        }

        Ok(Self { rows: validated })
    }

    /// Load an ordered JSON array of `{"type", "keywords", "phrases", "requiredTerms", "description"}`
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let rows: Vec<RegistryRow> = serde_json::from_str(json)?;
        Self::from_rows(rows.into_iter().map(|row| (row.intent, row.rule)))
    }

    /// Check that every scorable intent has a rule
    pub fn require_complete(&self) -> Result<(), RegistryError> {
        for intent in Intent::SCORABLE {
            if self.rule(intent).is_none() {
                return Err(RegistryError::MissingIntent(intent));
            }
        }
        Ok(())
    }

    pub fn rule(&self, intent: Intent) -> Option<&PatternRule> {
        self.rows
            .iter()
            .find(|(candidate, _)| *candidate == intent)
            .map(|(_, rule)| rule)
    }

    /// Rows in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (Intent, &PatternRule)> {
        self.rows.iter().map(|(intent, rule)| (*intent, rule))
    }

    pub fn intents(&self) -> impl Iterator<Item = Intent> + '_ {
        self.rows.iter().map(|(intent, _)| *intent)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize_terms(
    intent: Intent,
    field: &'static str,
    terms: Vec<String>,
) -> Result<Vec<String>, RegistryError> {
    terms
        .into_iter()
        .map(|term| {
            let term = normalize(&term);
            if term.trim().is_empty() {
                Err(RegistryError::EmptyTerm { intent, field })
            } else {
                Ok(term)
            }
        })
        .collect()
}

fn builtin_rows() -> Vec<(Intent, PatternRule)> {
    vec![
        (
            Intent::Mechanism,
            PatternRule::new("Explains the physiological mechanism behind the patient's findings")
                .with_keywords([
                    "why",
                    "cause",
                    "causing",
                    "rising",
                    "reason",
                    "mechanism",
                    "driving",
                    "underlying",
                    "explain",
                    "elevated",
                    "increase",
                    "pathophysiology",
                ])
                .with_phrases([
                    "root cause",
                    "why is",
                    "why are",
                    "what is causing",
                    "what's causing",
                    "what is driving",
                    "reason for",
                    "explain why",
                    "underlying cause",
                ]),
        ),
        (
            Intent::Comprehensive,
            PatternRule::new("Compares every relevant intervention side by side")
                .with_keywords([
                    "best",
                    "intervention",
                    "options",
                    "treatment",
                    "approach",
                    "strategy",
                    "management",
                    "overall",
                    "comprehensive",
                    "plan",
                ])
                .with_phrases([
                    "best intervention",
                    "compare all",
                    "all options",
                    "treatment options",
                    "what are the options",
                    "best approach",
                    "management plan",
                ]),
        ),
        (
            Intent::BinaryDecision,
            PatternRule::new("Gives a yes/no recommendation on starting a statin")
                .with_keywords([
                    "should",
                    "prescribe",
                    "appropriate",
                    "start",
                    "initiate",
                    "indicated",
                    "recommend",
                    "candidate",
                ])
                .with_phrases([
                    "should i prescribe",
                    "should i start",
                    "should she start",
                    "should she take",
                    "is it appropriate",
                    "is a statin indicated",
                ])
                .with_required_terms(["statin"]),
        ),
        (
            Intent::HeadToHead,
            PatternRule::new("Contrasts HRT and statin therapy head to head")
                .with_keywords([
                    "compare",
                    "versus",
                    "vs",
                    "better",
                    "comparison",
                    "difference",
                    "against",
                    "which",
                ])
                .with_phrases([
                    "compare hrt",
                    "hrt versus statin",
                    "hrt vs statin",
                    "statin versus hrt",
                    "statin vs hrt",
                    "hrt or statin",
                    "statin or hrt",
                    "hrt compared to statin",
                ])
                .with_required_terms(["hrt", "statin"]),
        ),
        (
            Intent::SupplementSafetyAssessment,
            PatternRule::new("Assesses safety and interactions of non-prescription supplements")
                .with_keywords([
                    "supplement",
                    "otc",
                    "herbal",
                    "vitamin",
                    "over-the-counter",
                    "remedy",
                    "natural",
                    "fish oil",
                    "red yeast rice",
                    "black cohosh",
                    "interaction",
                ])
                .with_phrases([
                    "non-prescription supplements",
                    "over the counter",
                    "herbal remedies",
                    "natural remedies",
                    "supplement safety",
                    "is it safe to take",
                    "drug interactions",
                ]),
        ),
    ]
}
