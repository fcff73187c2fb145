//! Gold Corpus Tests
//!
//! Curated replies with human-verified stages. The classifier must stay at
//! or above the accuracy threshold on this set.

use crate::brain::negation::{NegationDetector, INTEREST_TOKENS};
use crate::brain::{classify_multi_intent, Stage};

/// Minimum share of the corpus that must classify correctly.
const MIN_ACCURACY: f64 = 0.95;

const GOLD_CORPUS: &[(&str, Stage)] = &[
    ("Delivery Status Notification (Failure)", Stage::Bounce),
    ("Mail delivery failed: returning message to sender", Stage::Bounce),
    ("Address not found. Your message wasn't delivered", Stage::Bounce),
    ("I am out of the office until Monday with limited access to email.", Stage::Ooo),
    ("Automatic reply: on vacation until the 14th", Stage::Ooo),
    ("I'm on parental leave and will be back in March", Stage::Ooo),
    ("Stop spamming me", Stage::Hostile),
    ("This is a scam.", Stage::Hostile),
    ("Get lost.", Stage::Hostile),
    ("Not interested, thanks.", Stage::Negative),
    ("Please remove me from your list", Stage::Negative),
    ("No thanks, we're all set.", Stage::Negative),
    ("We'll pass on this one.", Stage::Negative),
    ("Unsubscribe", Stage::Negative),
    ("i don't think i'm open to this", Stage::Negative),
    ("ok but I'm not ok with this", Stage::Negative),
    ("I'm not interested at this point", Stage::Negative),
    ("Sure, but honestly not sure this is for us.", Stage::Negative),
    ("Yes, let's set up a call next week", Stage::Scheduling),
    ("Tuesday at 2pm works for me", Stage::Scheduling),
    ("Send me a calendar link", Stage::Scheduling),
    ("How much is it? Free tomorrow at 3pm", Stage::Scheduling),
    ("price?", Stage::Pricing),
    ("pricing", Stage::Pricing),
    ("cost?", Stage::Pricing),
    ("fee?", Stage::Pricing),
    ("paid?", Stage::Pricing),
    ("commission?", Stage::Pricing),
    ("what's in it for you?", Stage::Pricing),
    ("How do you get paid?", Stage::Pricing),
    ("Who are you and what's the catch?", Stage::Pricing),
    ("What are your fees?", Stage::Pricing),
    ("Do you have any case studies?", Stage::Proof),
    ("Can you share some references?", Stage::Proof),
    ("Who else have you worked with?", Stage::Proof),
    ("Who is this?", Stage::Identity),
    ("How did you get my email?", Stage::Identity),
    ("why me?", Stage::Identity),
    ("What exactly do you do?", Stage::Scope),
    ("How does this work?", Stage::Scope),
    ("what is this exactly?", Stage::Scope),
    ("Sounds good, tell me more", Stage::Interest),
    ("Yes, I'm interested", Stage::Interest),
    ("Sure, happy to learn more", Stage::Interest),
    ("not sure what you mean", Stage::Confusion),
    ("Maybe", Stage::Confusion),
    ("I'm confused, what is this about?", Stage::Confusion),
    ("Huh?", Stage::Confusion),
    ("Thanks", Stage::Unknown),
    ("", Stage::Unknown),
];

/// (text, interest token negated?)
const NEGATION_CORPUS: &[(&str, bool)] = &[
    ("i am not interested", true),
    ("i don't think i'm open to this", true),
    ("never been open to outside help", true),
    ("can't say i'm interested", true),
    ("not only interested, excited", false),
    ("yes, happy to chat", false),
    ("no problem, sounds good", false),
    ("interested? not at all", false),
];

#[cfg(test)]
mod accuracy_tests {
    use super::*;

    #[test]
    fn test_gold_corpus_accuracy() {
        let mut misses = Vec::new();
        for (text, expected) in GOLD_CORPUS {
            let actual = classify_multi_intent(text).primary;
            if actual != *expected {
                misses.push(format!("'{}': expected {}, got {}", text, expected, actual));
            }
        }

        let total = GOLD_CORPUS.len() as f64;
        let accuracy = (total - misses.len() as f64) / total;
        assert!(
            accuracy >= MIN_ACCURACY,
            "Accuracy {:.1}% below threshold, misses: {:#?}",
            accuracy * 100.0,
            misses
        );
    }

    #[test]
    fn test_corpus_covers_every_stage() {
        for stage in Stage::ALL {
            assert!(
                GOLD_CORPUS.iter().any(|(_, s)| *s == stage),
                "No gold example for {}",
                stage
            );
        }
    }
}

#[cfg(test)]
mod negation_path_tests {
    use super::*;

    fn token_path() -> NegationDetector {
        // zero raw lookback disables the raw-prefix check
        NegationDetector::new(8, 0)
    }

    fn raw_path() -> NegationDetector {
        // zero token window disables the token-window check
        NegationDetector::new(0, 50)
    }

    #[test]
    fn test_combined_paths_match_corpus() {
        let both = NegationDetector::default();
        for (text, expected) in NEGATION_CORPUS {
            assert_eq!(both.is_negated(text, INTEREST_TOKENS), *expected, "'{}'", text);
        }
    }

    #[test]
    fn test_combined_is_union_of_paths() {
        let both = NegationDetector::default();
        for (text, _) in NEGATION_CORPUS {
            let union =
                token_path().is_negated(text, INTEREST_TOKENS) || raw_path().is_negated(text, INTEREST_TOKENS);
            assert_eq!(both.is_negated(text, INTEREST_TOKENS), union, "'{}'", text);
        }
    }

    #[test]
    fn test_paths_have_different_coverage() {
        // split contractions defeat the token window; the raw prefix keeps them
        let text = "can't say i'm interested";
        assert!(!token_path().is_negated(text, INTEREST_TOKENS));
        assert!(raw_path().is_negated(text, INTEREST_TOKENS));

        let agreeing = NEGATION_CORPUS
            .iter()
            .filter(|(text, _)| {
                token_path().is_negated(text, INTEREST_TOKENS) == raw_path().is_negated(text, INTEREST_TOKENS)
            })
            .count();
        assert!(agreeing < NEGATION_CORPUS.len());
    }
}
