//! Negation detection.
//!
//! Two independent checks decide whether an intent token is negated:
//! a token-window lookback and a raw-character lookback. The raw check exists
//! because tokenization splits contractions (`don't` -> `don`, `t`) and strips
//! punctuation adjacent to negators.
//!
//! The window algorithms here take token slices and predicates only; the
//! vocabulary lives in the constant tables and can be swapped freely.

use regex::Regex;
use std::sync::LazyLock;

use super::tokenizer::{find_word, normalize, tokenize};
use crate::config::{DEFAULT_CONTRADICTION_WINDOW, DEFAULT_NEGATION_WINDOW, DEFAULT_RAW_LOOKBACK_CHARS};

/// Phrases that negate an intent token appearing after them.
pub const NEGATORS: &[&str] = &[
    "not",
    "no",
    "don't",
    "dont",
    "can't",
    "cant",
    "cannot",
    "won't",
    "wont",
    "never",
    "isn't",
    "aren't",
    "doesn't",
    "wouldn't",
    "i don't think",
    "rather not",
    "not really",
];

/// Phrases containing a negator that do not negate what follows.
pub const NEGATION_EXCEPTIONS: &[&str] = &[
    "not only",
    "not just",
    "no problem",
    "no worries",
    "no rush",
    "no hurry",
];

/// Interest tokens whose negation flags the reply (multi-word allowed).
pub const INTEREST_TOKENS: &[&str] = &[
    "interested",
    "sure",
    "yes",
    "open to",
    "happy to",
    "sounds good",
];

/// Single-token interest words used by the contradiction guard.
pub const CONTRADICTION_INTEREST_WORDS: &[&str] = &[
    "interested", "sure", "yes", "ok", "okay", "open", "happy", "sounds", "good",
];

/// Single-token negations used by the contradiction guard.
pub const CONTRADICTION_NEGATION_WORDS: &[&str] = &[
    "not", "no", "don't", "dont", "can't", "cant", "never", "won't", "wont",
];

/// Contraction heads left behind when the tokenizer splits `xxx't`.
const CONTRACTION_HEADS: &[&str] = &["don", "can", "won", "doesn", "isn", "aren", "wouldn", "didn"];

static NEGATOR_RE: LazyLock<Regex> = LazyLock::new(|| word_alternation(NEGATORS));

static EXCEPTION_RE: LazyLock<Regex> = LazyLock::new(|| word_alternation(NEGATION_EXCEPTIONS));

/// Explicit shapes required before a windowed contradiction becomes a refusal.
static CONTRADICTION_SHAPES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    vec![
        (
            "ok_then_not_ok",
            Regex::new(r"\bok(?:ay)?\b.*\bnot ok(?:ay)?\b").expect("Invalid regex: ok/not ok shape"),
        ),
        (
            "sure_then_not_sure",
            Regex::new(r"\bsure\b.*\bnot sure\b").expect("Invalid regex: sure/not sure shape"),
        ),
        (
            "yes_then_no",
            Regex::new(r"\byes\b.*\bno\b").expect("Invalid regex: yes/no shape"),
        ),
    ]
});

fn word_alternation(words: &[&str]) -> Regex {
    let body = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{})\b", body)).expect("Invalid regex: word alternation")
}

/// Remove phrases like `not only` so their negator is not counted.
pub fn strip_exceptions(text: &str) -> String {
    EXCEPTION_RE.replace_all(text, " ").into_owned()
}

/// Whether a lowercase fragment contains a negator outside the exceptions.
pub fn contains_negator(fragment: &str) -> bool {
    NEGATOR_RE.is_match(&strip_exceptions(fragment))
}

/// Start indices of every contiguous occurrence of `phrase` in `tokens`.
pub fn phrase_positions(tokens: &[String], phrase: &[String]) -> Vec<usize> {
    if phrase.is_empty() || phrase.len() > tokens.len() {
        return Vec::new();
    }
    tokens
        .windows(phrase.len())
        .enumerate()
        .filter(|(_, window)| *window == phrase)
        .map(|(i, _)| i)
        .collect()
}

/// Join up to `window` tokens before `end` and test them with `is_negating`.
pub fn negator_in_window<F>(tokens: &[String], end: usize, window: usize, is_negating: F) -> bool
where
    F: Fn(&str) -> bool,
{
    let end = end.min(tokens.len());
    let start = end.saturating_sub(window);
    if start == end {
        return false;
    }
    is_negating(&tokens[start..end].join(" "))
}

/// Whether any anchor position lies within `window` tokens of a negation position.
pub fn anchor_near_negation(anchors: &[usize], negations: &[usize], window: usize) -> bool {
    anchors
        .iter()
        .any(|&a| negations.iter().any(|&n| a.abs_diff(n) <= window))
}

/// Positions of tokens matching `words`.
pub fn word_positions(tokens: &[String], words: &[&str]) -> Vec<usize> {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| words.contains(&t.as_str()))
        .map(|(i, _)| i)
        .collect()
}

/// Negation positions, counting split contractions (`don` followed by `t`).
fn negation_positions(tokens: &[String], words: &[&str]) -> Vec<usize> {
    tokens
        .iter()
        .enumerate()
        .filter(|(i, t)| {
            words.contains(&t.as_str())
                || (CONTRACTION_HEADS.contains(&t.as_str())
                    && tokens.get(i + 1).is_some_and(|next| next == "t"))
        })
        .map(|(i, _)| i)
        .collect()
}

/// Negation detector with configurable lookback sizes.
#[derive(Debug, Clone, Copy)]
pub struct NegationDetector {
    window: usize,
    raw_lookback_chars: usize,
}

impl Default for NegationDetector {
    fn default() -> Self {
        Self::new(DEFAULT_NEGATION_WINDOW, DEFAULT_RAW_LOOKBACK_CHARS)
    }
}

impl NegationDetector {
    pub fn new(window: usize, raw_lookback_chars: usize) -> Self {
        Self {
            window,
            raw_lookback_chars,
        }
    }

    /// Whether any of `intent_tokens` appears negated in `text`.
    pub fn is_negated(&self, text: &str, intent_tokens: &[&str]) -> bool {
        let lowered = normalize(text);
        if lowered.is_empty() {
            return false;
        }
        let tokens = tokenize(&lowered);

        intent_tokens.iter().any(|intent| {
            self.token_window_negated(&tokens, intent) || self.raw_prefix_negated(&lowered, intent)
        })
    }

    fn token_window_negated(&self, tokens: &[String], intent: &str) -> bool {
        let phrase = tokenize(intent);
        phrase_positions(tokens, &phrase)
            .into_iter()
            .any(|start| negator_in_window(tokens, start, self.window, contains_negator))
    }

    fn raw_prefix_negated(&self, lowered: &str, intent: &str) -> bool {
        let needle = intent.to_lowercase();
        let Some(start) = find_word(lowered, &needle) else {
            return false;
        };
        let prefix = &lowered[..start];
        let from = if self.raw_lookback_chars == 0 {
            start
        } else {
            prefix
                .char_indices()
                .rev()
                .nth(self.raw_lookback_chars - 1)
                .map_or(0, |(i, _)| i)
        };
        contains_negator(&prefix[from..])
    }
}

/// Whether any intent token is negated, using the default lookbacks.
pub fn has_negated_intent(text: &str, intent_tokens: &[&str]) -> bool {
    NegationDetector::default().is_negated(text, intent_tokens)
}

/// Whether an interest word sits within `window_size` tokens of a negation.
///
/// This is a gate only: callers must also see a [`contradiction_shape`]
/// before treating the reply as a refusal.
pub fn has_contradiction(text: &str, window_size: usize) -> bool {
    let cleaned = strip_exceptions(&normalize(text));
    let tokens = tokenize(&cleaned);
    let anchors = word_positions(&tokens, CONTRADICTION_INTEREST_WORDS);
    if anchors.is_empty() {
        return false;
    }
    let negations = negation_positions(&tokens, CONTRADICTION_NEGATION_WORDS);
    anchor_near_negation(&anchors, &negations, window_size)
}

/// [`has_contradiction`] with the default window of 12 tokens.
pub fn has_default_contradiction(text: &str) -> bool {
    has_contradiction(text, DEFAULT_CONTRADICTION_WINDOW)
}

/// Name of the explicit contradiction shape present in `text`, if any.
pub fn contradiction_shape(text: &str) -> Option<&'static str> {
    let cleaned = strip_exceptions(&normalize(text));
    CONTRADICTION_SHAPES
        .iter()
        .find(|(_, re)| re.is_match(&cleaned))
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        tokenize(s)
    }

    #[test]
    fn test_phrase_positions() {
        let tokens = toks("open to it, really open to it");
        assert_eq!(phrase_positions(&tokens, &toks("open to")), vec![0, 4]);
        assert!(phrase_positions(&tokens, &[]).is_empty());
    }

    #[test]
    fn test_negator_in_window_is_bounded() {
        let tokens = toks("not a b c d e f g h interested");
        // "not" sits nine tokens back, outside an eight-token window
        assert!(!negator_in_window(&tokens, 9, 8, contains_negator));
        assert!(negator_in_window(&tokens, 9, 9, contains_negator));
        assert!(!negator_in_window(&tokens, 0, 8, contains_negator));
    }

    #[test]
    fn test_token_window_catches_plain_not() {
        assert!(has_negated_intent("I am not interested right now", &["interested"]));
        assert!(has_negated_intent("Never been open to outside help", &["open to"]));
    }

    #[test]
    fn test_raw_check_catches_contractions() {
        // tokens lose the apostrophe, the raw prefix keeps it
        assert!(has_negated_intent("I don't think I'm open to this", &["open to"]));
        assert!(has_negated_intent("We won't be happy to do that", &["happy to"]));
    }

    #[test]
    fn test_exceptions_are_not_negations() {
        assert!(!has_negated_intent("Not only interested, excited", &["interested"]));
        assert!(!has_negated_intent("No problem, sounds good", &["sounds good"]));
        assert!(!has_negated_intent("Yes, happy to chat", INTEREST_TOKENS));
    }

    #[test]
    fn test_raw_lookback_is_bounded() {
        let text = format!("no. {} sure", "x".repeat(80));
        let detector = NegationDetector::new(1, 50);
        assert!(!detector.is_negated(&text, &["sure"]));
    }

    #[test]
    fn test_empty_text_is_not_negated() {
        assert!(!has_negated_intent("", INTEREST_TOKENS));
        assert!(!has_negated_intent("interested", &[]));
    }

    #[test]
    fn test_contradiction_window() {
        assert!(has_default_contradiction("ok but I'm not ok with this"));
        assert!(has_default_contradiction("Sure, but honestly I don't have time"));
        assert!(!has_default_contradiction("Sounds good, talk soon"));
        assert!(!has_contradiction("yes a b c d e f not", 3));
    }

    #[test]
    fn test_contradiction_shapes() {
        assert_eq!(contradiction_shape("ok but I'm not ok with this"), Some("ok_then_not_ok"));
        assert_eq!(contradiction_shape("sure... actually not sure"), Some("sure_then_not_sure"));
        assert_eq!(contradiction_shape("yes, I mean no"), Some("yes_then_no"));
        assert_eq!(contradiction_shape("yes, I'm not surprised this works"), None);
        assert_eq!(contradiction_shape("yes, no problem at all"), None);
        assert_eq!(contradiction_shape("Yes, no rush on my side"), None);
        assert_eq!(contradiction_shape("yes, no hurry"), None);
    }
}
