//! Intent classifier - scores a query against every registry rule and picks a winner

use crate::error::ConfigError;
use crate::normalize::normalize;
use crate::registry::PatternRegistry;
use crate::scorer::score;
use crate::types::{ClassificationResult, Intent, IntentScore, ScoreBreakdown};
use serde::Deserialize;
use std::sync::{Arc, LazyLock};
use tracing::{debug, trace};

/// Top scores below this are not trusted and trigger the fallback
pub const CONFIDENCE_THRESHOLD: u8 = 10;
/// Intent returned when no rule clears the threshold
pub const FALLBACK_INTENT: Intent = Intent::Comprehensive;
/// Confidence reported with the fallback intent
pub const FALLBACK_CONFIDENCE: u8 = 50;

/// Threshold and fallback policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassifierConfig {
    pub confidence_threshold: u8,
    pub fallback_intent: Intent,
    pub fallback_confidence: u8,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: CONFIDENCE_THRESHOLD,
            fallback_intent: FALLBACK_INTENT,
            fallback_confidence: FALLBACK_CONFIDENCE,
        }
    }
}

impl ClassifierConfig {
    /// Parse a (possibly partial) JSON config; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fallback_intent.is_scorable() {
            return Err(ConfigError::UnscorableFallback(self.fallback_intent));
        }
        if self.fallback_confidence > 100 {
            return Err(ConfigError::ConfidenceOutOfRange(self.fallback_confidence));
        }
        // Scores never exceed 100, so a higher threshold would reject every match
        if self.confidence_threshold > 100 {
            return Err(ConfigError::ThresholdOutOfRange(self.confidence_threshold));
        }
        Ok(())
    }
}

/// Rule-based query classifier
///
/// Holds no mutable state; clones share the same registry and every call is
/// independent, so one instance can serve any number of threads.
#[derive(Debug, Clone)]
pub struct Classifier {
    registry: Arc<PatternRegistry>,
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(registry: PatternRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            config: ClassifierConfig::default(),
        }
    }

    pub fn with_config(registry: PatternRegistry, config: ClassifierConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            registry: Arc::new(registry),
            config,
        })
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify a query; `None` stands for a missing or non-string input
    pub fn classify(&self, query: Option<&str>) -> ClassificationResult {
        match query {
            Some(text) => self.classify_str(text),
            None => {
                debug!("Invalid query input, classifying as unknown");
                ClassificationResult::invalid_input()
            }
        }
    }

    pub fn classify_str(&self, query: &str) -> ClassificationResult {
        let scored = self.rank(&normalize(query));
        let all_scores: Vec<IntentScore> = scored
            .iter()
            .map(|(intent, breakdown)| IntentScore {
                intent: *intent,
                score: breakdown.score,
            })
            .collect();

        let top = scored
            .into_iter()
            .next()
            .filter(|(_, breakdown)| breakdown.score >= self.config.confidence_threshold);

        let result = match top {
            Some((intent, breakdown)) => {
                let description = self
                    .registry
                    .rule(intent)
                    .map(|rule| rule.description.clone())
                    .unwrap_or_default();
                ClassificationResult::matched(intent, breakdown, query.to_string(), description, all_scores)
            }
            None => ClassificationResult::fallback(
                self.config.fallback_intent,
                self.config.fallback_confidence,
                query.to_string(),
                all_scores,
            ),
        };

        debug!(
            intent = %result.intent,
            confidence = result.confidence,
            fallback = result.fallback,
            "Classified query"
        );
        result
    }

    /// Sorted score table for a raw query
    pub fn score_all(&self, query: &str) -> Vec<IntentScore> {
        self.rank(&normalize(query))
            .into_iter()
            .map(|(intent, breakdown)| IntentScore {
                intent,
                score: breakdown.score,
            })
            .collect()
    }

    /// Score every rule, highest first; equal scores keep declaration order
    fn rank(&self, normalized: &str) -> Vec<(Intent, ScoreBreakdown)> {
        let mut scored: Vec<(Intent, ScoreBreakdown)> = self
            .registry
            .iter()
            .map(|(intent, rule)| {
                let breakdown = score(normalized, rule);
                trace!(intent = %intent, score = breakdown.score, "Scored rule");
                (intent, breakdown)
            })
            .collect();

        // sort_by is stable, which is what makes declaration order the tie-break
        scored.sort_by(|a, b| b.1.score.cmp(&a.1.score));
        scored
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(PatternRegistry::builtin())
    }
}

static DEFAULT_CLASSIFIER: LazyLock<Classifier> = LazyLock::new(Classifier::default);

/// Classify with the built-in registry and default policy
pub fn classify(query: Option<&str>) -> ClassificationResult {
    DEFAULT_CLASSIFIER.classify(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PatternRule, FALLBACK_DESCRIPTION, INVALID_INPUT_DESCRIPTION};
    use proptest::prelude::*;
    use std::thread;

    fn score_of(result: &ClassificationResult, intent: Intent) -> u8 {
        result
            .all_scores
            .iter()
            .find(|row| row.intent == intent)
            .map(|row| row.score)
            .expect("intent missing from score table")
    }

    #[test]
    fn test_invalid_input() {
        let result = classify(None);
        assert_eq!(result.intent, Intent::Unknown);
        assert_eq!(result.confidence, 0);
        assert_eq!(result.description, INVALID_INPUT_DESCRIPTION);
        assert!(result.matched_keywords.is_empty());
        assert!(result.matched_phrases.is_empty());
        assert!(!result.fallback);
    }

    #[test]
    fn test_head_to_head() {
        let result = classify(Some("Compare HRT versus statin for this patient"));
        assert_eq!(result.intent, Intent::HeadToHead);
        assert!(!result.fallback);
        assert_eq!(result.confidence, 80);
        assert_eq!(result.matched_phrases, vec!["compare hrt", "hrt versus statin"]);
        assert_eq!(result.matched_keywords, vec!["compare", "versus"]);
        assert_eq!(result.original_query, "Compare HRT versus statin for this patient");
        assert_eq!(result.description, "Contrasts HRT and statin therapy head to head");
    }

    #[test]
    fn test_binary_decision() {
        let result = classify(Some("Should I prescribe a statin?"));
        assert_eq!(result.intent, Intent::BinaryDecision);
        assert_eq!(result.confidence, 50);
        assert_eq!(result.matched_phrases, vec!["should i prescribe"]);
        assert_eq!(score_of(&result, Intent::HeadToHead), 0);
    }

    #[test]
    fn test_mechanism() {
        let result = classify(Some("Why is her cholesterol rising?"));
        assert_eq!(result.intent, Intent::Mechanism);
        assert_eq!(result.confidence, 50);
        assert_eq!(result.matched_keywords, vec!["why", "rising"]);
        assert_eq!(result.matched_phrases, vec!["why is"]);
    }

    #[test]
    fn test_required_term_gate() {
        let result = classify(Some(
            "should I prescribe something appropriate to start or initiate if indicated, \
             and would you recommend this candidate",
        ));
        assert_ne!(result.intent, Intent::BinaryDecision);
        assert_eq!(score_of(&result, Intent::BinaryDecision), 0);
    }

    #[test]
    fn test_single_phrase_scores_thirty() {
        let result = classify(Some("Compare all"));
        assert_eq!(result.intent, Intent::Comprehensive);
        assert_eq!(result.confidence, 30);
        assert!(!result.fallback);
        assert!(result.matched_keywords.is_empty());
    }

    #[test]
    fn test_confidence_is_clamped() {
        let registry = PatternRegistry::builtin();
        let rule = registry.rule(Intent::SupplementSafetyAssessment).unwrap();
        let query = rule
            .keywords
            .iter()
            .chain(rule.phrases.iter())
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");

        let result = classify(Some(&query));
        assert_eq!(result.intent, Intent::SupplementSafetyAssessment);
        assert_eq!(result.confidence, 100);
        assert!(result.all_scores.iter().all(|row| row.score <= 100));
    }

    #[test]
    fn test_fallback() {
        let result = classify(Some("xyzzy plugh"));
        assert_eq!(result.intent, Intent::Comprehensive);
        assert_eq!(result.confidence, 50);
        assert!(result.fallback);
        assert_eq!(result.description, FALLBACK_DESCRIPTION);
        assert!(result.matched_keywords.is_empty());
        assert_eq!(result.all_scores.len(), Intent::SCORABLE.len());
        assert!(result.all_scores.iter().all(|row| row.score == 0));
    }

    #[test]
    fn test_empty_string_falls_back() {
        let result = classify(Some(""));
        assert_eq!(result.intent, Intent::Comprehensive);
        assert!(result.fallback);
        assert_eq!(result.original_query, "");
    }

    #[test]
    fn test_tie_goes_to_first_declared() {
        let tied = |description: &str| PatternRule::new(description).with_keywords(["dose"]);
        let classifier = Classifier::new(
            PatternRegistry::from_rows([
                (Intent::SupplementSafetyAssessment, tied("first")),
                (Intent::Mechanism, tied("second")),
            ])
            .unwrap(),
        );

        let result = classifier.classify_str("what dose");
        assert_eq!(result.intent, Intent::SupplementSafetyAssessment);
        assert_eq!(result.description, "first");
        assert_eq!(
            result.all_scores,
            vec![
                IntentScore { intent: Intent::SupplementSafetyAssessment, score: 10 },
                IntentScore { intent: Intent::Mechanism, score: 10 },
            ]
        );
    }

    #[test]
    fn test_scores_sorted_descending() {
        let scores = Classifier::default().score_all("Compare HRT versus statin for this patient");
        assert_eq!(scores[0].intent, Intent::HeadToHead);
        assert!(scores.windows(2).all(|pair| pair[0].score >= pair[1].score));
        // zero-score rows keep declaration order
        let zeros: Vec<Intent> = scores.iter().filter(|row| row.score == 0).map(|row| row.intent).collect();
        assert_eq!(
            zeros,
            vec![
                Intent::Mechanism,
                Intent::Comprehensive,
                Intent::BinaryDecision,
                Intent::SupplementSafetyAssessment,
            ]
        );
    }

    #[test]
    fn test_custom_threshold() {
        let config = ClassifierConfig::from_json(r#"{"confidenceThreshold": 60}"#).unwrap();
        assert_eq!(config.fallback_intent, Intent::Comprehensive);
        assert_eq!(config.fallback_confidence, 50);

        let classifier = Classifier::with_config(PatternRegistry::builtin(), config).unwrap();
        let result = classifier.classify_str("Why is her cholesterol rising?");
        assert!(result.fallback);
        assert_eq!(result.intent, Intent::Comprehensive);
        assert_eq!(result.all_scores[0].intent, Intent::Mechanism);
    }

    #[test]
    fn test_config_validation() {
        assert!(matches!(
            ClassifierConfig::from_json(r#"{"fallbackIntent": "unknown"}"#),
            Err(ConfigError::UnscorableFallback(Intent::Unknown))
        ));
        assert!(matches!(
            ClassifierConfig::from_json(r#"{"fallbackConfidence": 101}"#),
            Err(ConfigError::ConfidenceOutOfRange(101))
        ));
        assert!(matches!(
            ClassifierConfig::from_json(r#"{"confidenceThreshold": 250}"#),
            Err(ConfigError::ThresholdOutOfRange(250))
        ));
        assert!(ClassifierConfig::from_json(r#"{"confidenceThreshold": 100}"#).is_ok());
        assert!(matches!(ClassifierConfig::from_json(r#""strict""#), Err(ConfigError::Parse(_))));

        let config = ClassifierConfig {
            confidence_threshold: 101,
            ..ClassifierConfig::default()
        };
        assert!(matches!(
            Classifier::with_config(PatternRegistry::builtin(), config),
            Err(ConfigError::ThresholdOutOfRange(101))
        ));
    }

    #[test]
    fn test_custom_fallback_intent_describes_itself() {
        let config = ClassifierConfig::from_json(
            r#"{"fallbackIntent": "mechanism", "confidenceThreshold": 100}"#,
        )
        .unwrap();
        let classifier = Classifier::with_config(PatternRegistry::builtin(), config).unwrap();

        let result = classifier.classify_str("Compare HRT versus statin for this patient");
        assert!(result.fallback);
        assert_eq!(result.intent, Intent::Mechanism);
        assert_eq!(result.confidence, FALLBACK_CONFIDENCE);
        assert_ne!(result.description, FALLBACK_DESCRIPTION);
        assert!(result.description.contains("mechanism"));
    }

    #[test]
    fn test_concurrent_callers_agree() {
        let classifier = Arc::new(Classifier::default());
        let expected = classifier.classify_str("Should I prescribe a statin?");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let classifier = Arc::clone(&classifier);
                thread::spawn(move || classifier.classify_str("Should I prescribe a statin?"))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }

    proptest! {
        #[test]
        fn prop_classify_is_total(query in any::<String>()) {
            let result = classify(Some(&query));
            prop_assert!(result.confidence <= 100);
            prop_assert_ne!(result.intent, Intent::Unknown);
            prop_assert_eq!(result.all_scores.len(), Intent::SCORABLE.len());
            prop_assert_eq!(&result.original_query, &query);
            if result.fallback {
                prop_assert_eq!(result.confidence, FALLBACK_CONFIDENCE);
            } else {
                prop_assert!(result.confidence >= CONFIDENCE_THRESHOLD);
            }
        }

        #[test]
        fn prop_classify_is_deterministic(query in "[a-z ?!.]{0,60}") {
            prop_assert_eq!(classify(Some(&query)), classify(Some(&query)));
        }
    }
}
