//! Multi-intent stage classification.
//!
//! Deterministic rule cascade, no model involved. The evaluation order is
//! fixed:
//! 1. Hard stops (bounce, out-of-office, hostile, negative)
//! 2. Confusion pre-check
//! 3. Contradiction guard
//! 4. Negated interest / soft decline
//! 5. Negated-ok trap
//! 6. Compound whole-message questions
//! 7. Pattern sweep ranked by `STAGE_PRECEDENCE`
//! 8. Pricing failsafe and override

use tracing::debug;

use super::negation::{
    contradiction_shape, has_contradiction, NegationDetector, INTEREST_TOKENS,
};
use super::patterns::{
    is_negated_ok, is_pricing, is_soft_decline, match_compound_question, match_hard_stop,
    matches_stage, PRICING_OVERRIDE_EXEMPT, STAGE_PRECEDENCE,
};
use super::stage::{MultiIntent, Stage};
use super::tokenizer::normalize;
use crate::config::EngineConfig;

/// Stages tested by the sweep, in the order they are tried.
const SWEEP_STAGES: [Stage; 6] = [
    Stage::Scheduling,
    Stage::Pricing,
    Stage::Proof,
    Stage::Identity,
    Stage::Scope,
    Stage::Confusion,
];

/// Rule-based reply classifier.
#[derive(Debug, Clone, Copy)]
pub struct StageClassifier {
    negation: NegationDetector,
    contradiction_window: usize,
}

impl Default for StageClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl StageClassifier {
    /// Create a classifier with the default windows.
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    /// Create a classifier using the windows from `config`.
    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            negation: NegationDetector::new(config.negation_window, config.raw_lookback_chars),
            contradiction_window: config.contradiction_window,
        }
    }

    /// Classify an inbound reply.
    pub fn classify(&self, text: &str) -> MultiIntent {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return MultiIntent::terminal(Stage::Unknown, "empty_input", false);
        }

        if let Some(stage) = match_hard_stop(&normalized) {
            debug!(stage = %stage, "Hard stop matched");
            return MultiIntent::terminal(stage, format!("hard_stop:{}", stage.label()), false);
        }

        let is_confusion = matches_stage(Stage::Confusion, &normalized);

        if !is_confusion && has_contradiction(&normalized, self.contradiction_window) {
            if let Some(shape) = contradiction_shape(&normalized) {
                debug!(shape, "Contradiction guard committed to NEGATIVE");
                return MultiIntent::terminal(
                    Stage::Negative,
                    format!("contradiction:{}", shape),
                    true,
                );
            }
        }

        let negation_detected = self.negation.is_negated(&normalized, INTEREST_TOKENS);
        if negation_detected && is_soft_decline(&normalized) {
            debug!("Negated interest with soft decline");
            return MultiIntent::terminal(Stage::Negative, "negated_interest:soft_decline", true);
        }

        if !is_confusion && is_negated_ok(&normalized) {
            debug!("Negated-ok trap matched");
            return MultiIntent::terminal(Stage::Negative, "negated_ok", negation_detected);
        }

        if let Some(question) = match_compound_question(&normalized) {
            debug!(question = question.name, "Compound question matched");
            return MultiIntent {
                primary: question.primary,
                secondary: question.secondary.to_vec(),
                signals: vec![format!("compound:{}", question.name)],
                negation_detected,
            };
        }

        let mut candidates = Vec::new();
        let mut signals = Vec::new();
        if negation_detected {
            signals.push("negated_interest".to_string());
        }

        for stage in SWEEP_STAGES {
            if matches_stage(stage, &normalized) {
                candidates.push(stage);
                signals.push(format!("pattern:{}", stage.label()));
            }
        }
        if !negation_detected && matches_stage(Stage::Interest, &normalized) {
            candidates.push(Stage::Interest);
            signals.push(format!("pattern:{}", Stage::Interest.label()));
        }

        let pricing = is_pricing(&normalized);

        if candidates.is_empty() {
            if pricing {
                signals.push("pricing_failsafe".to_string());
                return MultiIntent {
                    primary: Stage::Pricing,
                    secondary: Vec::new(),
                    signals,
                    negation_detected,
                };
            }
            return MultiIntent {
                primary: Stage::Unknown,
                secondary: Vec::new(),
                signals,
                negation_detected,
            };
        }

        let mut ranked = rank_by_precedence(&candidates);
        let mut primary = ranked.remove(0);
        let mut secondary = ranked;

        if pricing && !PRICING_OVERRIDE_EXEMPT.contains(&primary) {
            debug!(demoted = %primary, "Pricing override");
            secondary.retain(|s| *s != Stage::Pricing);
            secondary.insert(0, primary);
            primary = Stage::Pricing;
            signals.push("pricing_override".to_string());
        }

        MultiIntent {
            primary,
            secondary,
            signals,
            negation_detected,
        }
    }
}

/// Order candidates by `STAGE_PRECEDENCE`, dropping duplicates.
pub fn rank_by_precedence(candidates: &[Stage]) -> Vec<Stage> {
    STAGE_PRECEDENCE
        .into_iter()
        .filter(|stage| candidates.contains(stage))
        .collect()
}

/// Classify a reply with the default configuration.
pub fn classify_multi_intent(text: &str) -> MultiIntent {
    StageClassifier::new().classify(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_unknown() {
        for text in ["", "   ", "\n\t"] {
            let result = classify_multi_intent(text);
            assert_eq!(result.primary, Stage::Unknown);
            assert!(result.secondary.is_empty());
        }
    }

    #[test]
    fn test_rank_by_precedence() {
        let ranked = rank_by_precedence(&[Stage::Confusion, Stage::Interest, Stage::Pricing, Stage::Pricing]);
        assert_eq!(ranked, vec![Stage::Pricing, Stage::Interest, Stage::Confusion]);
    }

    #[test]
    fn test_scheduling_with_interest() {
        let result = classify_multi_intent("Yes, let's set up a call next week");
        assert_eq!(result.primary, Stage::Scheduling);
        assert_eq!(result.secondary, vec![Stage::Interest]);
        assert!(!result.negation_detected);
    }

    #[test]
    fn test_pricing_override_demotes_identity() {
        let result = classify_multi_intent("Who are you and what's the catch?");
        assert_eq!(result.primary, Stage::Pricing);
        assert_eq!(result.secondary, vec![Stage::Identity]);
        assert!(result.signals.iter().any(|s| s == "pricing_override"));
    }

    #[test]
    fn test_override_leaves_scheduling_alone() {
        let result = classify_multi_intent("How much is it? Free tomorrow at 3pm");
        assert_eq!(result.primary, Stage::Scheduling);
        assert!(result.secondary.contains(&Stage::Pricing));
    }

    #[test]
    fn test_negated_interest_suppresses_interest_pattern() {
        let result = classify_multi_intent("Never said yes to anything");
        assert!(result.negation_detected);
        assert!(!result.has_stage(Stage::Interest));
    }

    #[test]
    fn test_custom_window_changes_contradiction_reach() {
        let config = EngineConfig {
            contradiction_window: 1,
            ..EngineConfig::default()
        };
        let narrow = StageClassifier::with_config(&config);
        let text = "ok, whatever you say, honestly though not ok with me";
        assert_eq!(classify_multi_intent(text).primary, Stage::Negative);
        // window of one still finds "not" next to the second "ok"
        assert_eq!(narrow.classify(text).primary, Stage::Negative);
    }
}
