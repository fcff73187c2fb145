//! AnchorPack assembly.
//!
//! Turns an [`OutboundFrame`] into caller-facing phrases: a prospect label, a
//! pain sentence, a one-line summary and a quality tier. Grammar repair fails
//! closed: a pain sentence that cannot be repaired is emitted empty.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, warn};

use super::frame::{FrameExtractor, OfferType, OutboundFrame};
use super::negation::NEGATORS;
use super::tokenizer::{fold_quotes, truncate_words};
use crate::config::EngineConfig;

/// Canonical next step; policy, not extracted.
pub const CALL_FIRST_OFFER_SENTENCE: &str =
    "Happy to start with a quick 10-15 minute call to see if an intro makes sense.";

/// Label used when nothing usable was extracted.
pub const GENERIC_PROSPECT_LABEL: &str = "the folks i mentioned";

/// Summary used when neither audience nor pain survived.
pub const FALLBACK_SUMMARY: &str = "my earlier note about a possible intro";

/// Subjects a pain sentence may begin with.
pub const PAIN_SUBJECTS: &[&str] = &["they", "these", "the", "timing"];

/// Quality tier of an anchor pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorQuality {
    Good,
    Partial,
    Fallback,
}

impl AnchorQuality {
    pub fn label(&self) -> &'static str {
        match self {
            AnchorQuality::Good => "good",
            AnchorQuality::Partial => "partial",
            AnchorQuality::Fallback => "fallback",
        }
    }
}

/// `score >= 8` good, `score >= 4` partial, otherwise fallback.
pub fn quality_for_score(score: u32) -> AnchorQuality {
    if score >= 8 {
        AnchorQuality::Good
    } else if score >= 4 {
        AnchorQuality::Partial
    } else {
        AnchorQuality::Fallback
    }
}

/// Extracted anchor for the composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorPack {
    pub prospect_label: String,
    pub pain_sentence: String,
    pub offer_sentence: String,
    pub outbound_summary: String,
    pub quality: AnchorQuality,
    pub missing: Vec<String>,
}

impl AnchorPack {
    /// The pack returned for missing or too-short outbound text.
    pub fn fallback() -> Self {
        Self {
            prospect_label: GENERIC_PROSPECT_LABEL.to_string(),
            pain_sentence: String::new(),
            offer_sentence: CALL_FIRST_OFFER_SENTENCE.to_string(),
            outbound_summary: FALLBACK_SUMMARY.to_string(),
            quality: AnchorQuality::Fallback,
            missing: ["audience", "pain", "provider", "offer"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Leading articles and quantifiers removed from labels.
static LEADING_QUANTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:the|a|an|some|a few|few|many|several|all|any|most|your|our|their|these|those|other)\s+",
    )
    .expect("Invalid regex: leading quantifier")
});

/// Relative-clause and verb triggers that end a label.
static VERB_CLAUSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:who|that|which|when|whose|are|is|were|lose|loses|losing|lost|struggle|struggles|struggling|waste|wastes|wasting|miss|misses|missing|risk|risks|risking)\b",
    )
    .expect("Invalid regex: verb clause boundary")
});

static TRAILING_CONNECTOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+(?:and|or|with|for|to|of|in|at|across|inside)$")
        .expect("Invalid regex: trailing connector")
});

static LOSS_CUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:lose|loses|losing|lost|waste|wastes|wasting|miss|misses|missing|risk|risks|slip|slips|delay|delays|stall|stalls|fall through|falls through)\b",
    )
    .expect("Invalid regex: loss cue")
});

/// Unconjugated verb after `are`; such a sentence is discarded.
static BROKEN_PAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bare\s+(?:lose|waste|struggle|miss|risk)\b").expect("Invalid regex: broken pain shape")
});

/// Targeted rewrites applied to every pain sentence.
static PAIN_REPAIRS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)\bare lose\b", "are losing"),
        (r"(?i)\bare waste\b", "are wasting"),
        (r"(?i)\bare struggle\b", "are struggling"),
        (r"(?i)\bare miss\b", "are missing"),
        (r"(?i)\bare risk\b", "are risking"),
        (r"(?i)\bthey're they\b", "they're"),
        (r"(?i)\bthey are they\b", "they are"),
        (r"(?i)\bthey they\b", "they"),
        (r"(?i)^they is\b", "they are"),
        (r"(?i)^they was\b", "they were"),
        (r"(?i)^they doesn't\b", "they don't"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("Invalid regex: pain repair"),
            replacement,
        )
    })
    .collect()
});

/// Verbs a clause may start with when its subject was dropped.
const BARE_VERBS: &[&str] = &[
    "lose", "struggle", "waste", "miss", "risk", "can't", "cannot", "can", "don't", "do",
    "need", "want", "spend", "have", "are", "get", "find", "end", "leave", "hit", "face",
    "juggle", "deal", "wait", "burn", "run", "stall", "slip", "chase", "lack", "sit", "watch",
    "fall", "worry", "wonder", "feel", "take", "sell", "try", "keep",
];

/// `-ing` openers that take `they are`.
const ING_OPENERS: &[&str] = &["losing", "struggling", "wasting", "missing", "risking", "leaving", "chasing"];

/// Third-person forms rewritten after a substituted `they`.
const THIRD_PERSON: &[(&str, &str)] = &[
    ("loses", "lose"),
    ("struggles", "struggle"),
    ("wastes", "waste"),
    ("misses", "miss"),
    ("risks", "risk"),
    ("needs", "need"),
    ("wants", "want"),
    ("spends", "spend"),
    ("has", "have"),
    ("gets", "get"),
    ("finds", "find"),
    ("faces", "face"),
    ("runs", "run"),
    ("stalls", "stall"),
    ("slips", "slip"),
    ("lacks", "lack"),
    ("chases", "chase"),
    ("takes", "take"),
    ("sells", "sell"),
    ("tries", "try"),
    ("keeps", "keep"),
    ("feels", "feel"),
    ("worries", "worry"),
    ("is", "are"),
    ("was", "were"),
    ("doesn't", "don't"),
];

/// First-person openers; such clauses describe the sender, not the prospect.
const SENDER_OPENERS: &[&str] = &["i", "we", "you", "i've", "we've", "i'm", "we're", "you're"];

const POSSESSIVES: &[&str] = &["their", "his", "her", "its", "our", "your"];

/// Adverbs kept in front of the verb when a noun subject is replaced by `they`.
const LEADING_ADVERBS: &[&str] = &[
    "never", "rarely", "seldom", "barely", "hardly", "not", "still", "often", "usually",
];

fn lower_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
        .to_lowercase()
}

fn is_verb(word: &str) -> bool {
    let w = lower_word(word);
    BARE_VERBS.contains(&w.as_str()) || THIRD_PERSON.iter().any(|(third, _)| *third == w)
}

fn starts_with_subject(sentence: &str) -> bool {
    let first = sentence
        .split_whitespace()
        .next()
        .map(lower_word)
        .unwrap_or_default();
    PAIN_SUBJECTS.iter().any(|s| {
        first == *s || (*s == "they" && matches!(first.as_str(), "they're" | "they've" | "they'll"))
    })
}

/// Lowercase the first letter unless the word looks like an acronym (`CFOs`).
fn soften_first_word(text: &str) -> String {
    let mut words = text.split_whitespace();
    let Some(first) = words.next() else {
        return String::new();
    };
    let rest: Vec<&str> = words.collect();
    let keep_case = first.chars().skip(1).any(|c| c.is_uppercase());
    let first = if keep_case {
        first.to_string()
    } else {
        first.to_lowercase()
    };
    std::iter::once(first.as_str())
        .chain(rest)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reduce an audience phrase to a clean noun phrase, or `None`.
pub fn clean_label_phrase(phrase: &str, max_words: usize) -> Option<String> {
    let mut text = phrase
        .trim()
        .trim_end_matches(|c: char| !c.is_alphanumeric())
        .to_string();

    while let Some(end) = LEADING_QUANTIFIER_RE.find(&text).map(|m| m.end()) {
        text = text[end..].to_string();
    }
    if let Some(cut) = VERB_CLAUSE_RE.find(&text).map(|m| m.start()) {
        text.truncate(cut);
    }
    let mut text = truncate_words(&text, max_words);
    while let Some(cut) = TRAILING_CONNECTOR_RE.find(&text).map(|m| m.start()) {
        text.truncate(cut);
    }
    let text = soften_first_word(text.trim());

    if text.chars().filter(|c| c.is_alphanumeric()).count() < 3 {
        return None;
    }
    Some(text)
}

/// `the <phrase> i mentioned`, else a provider-based label, else the generic one.
pub fn build_prospect_label(frame: &OutboundFrame, max_words: usize) -> String {
    if let Some(phrase) = frame
        .audience_phrase
        .as_deref()
        .and_then(|p| clean_label_phrase(p, max_words))
    {
        return format!("the {} i mentioned", phrase);
    }
    if let Some(provider) = frame.provider_name.as_deref() {
        return format!("the teams {} works with", provider);
    }
    GENERIC_PROSPECT_LABEL.to_string()
}

/// Give a clause a permitted subject, or `None` when it has no usable shape.
fn with_subject(clause: &str) -> Option<String> {
    let words: Vec<&str> = clause.split_whitespace().collect();
    let first = lower_word(words.first()?);

    if first == "when" {
        let rewritten = if LOSS_CUE_RE.is_match(clause) {
            format!("they lose time {}", clause)
        } else {
            format!("timing matters {}", clause)
        };
        return Some(rewritten);
    }
    if starts_with_subject(clause) {
        return Some(clause.to_string());
    }
    if SENDER_OPENERS.contains(&first.as_str()) {
        return None;
    }
    if ING_OPENERS.contains(&first.as_str()) {
        return Some(format!("they are {}", clause));
    }
    if BARE_VERBS.contains(&first.as_str()) {
        return Some(format!("they {}", clause));
    }
    if POSSESSIVES.contains(&first.as_str()) && words.len() > 1 {
        return Some(format!("the {}", words[1..].join(" ")));
    }

    // Noun-phrase subject: replace it with "they" when a verb follows soon.
    let verb_at = words
        .iter()
        .enumerate()
        .skip(1)
        .take(3)
        .find(|(_, w)| is_verb(w))
        .map(|(i, _)| i)?;
    let skipped: Vec<String> = words[..verb_at].iter().map(|w| lower_word(w)).collect();
    let verb = lower_word(words[verb_at]);
    let verb = THIRD_PERSON
        .iter()
        .find(|(third, _)| *third == verb)
        .map_or(verb.clone(), |(_, plural)| plural.to_string());
    let rest = words[verb_at + 1..].join(" ");

    // Negators ahead of the verb must survive the subject swap.
    let adverbs_from = skipped
        .iter()
        .rposition(|w| !LEADING_ADVERBS.contains(&w.as_str()))
        .map_or(0, |i| i + 1);
    let (subject, adverbs) = skipped.split_at(adverbs_from);
    if subject.iter().any(|w| {
        NEGATORS.contains(&w.as_str()) || LEADING_ADVERBS.contains(&w.as_str()) || w.ends_with("n't")
    }) {
        return None;
    }
    let lead = adverbs.join(" ");
    let sentence = [lead.as_str(), verb.as_str(), rest.as_str()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    Some(format!("they {}", sentence))
}

/// Build a grammatical pain sentence from a clause; empty when unrepairable.
pub fn build_pain_sentence(clause: &str) -> String {
    let cleaned = fold_quotes(clause)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(|c: char| matches!(c, '.' | '!' | '?' | ',' | ';' | ':'))
        .to_string();
    let cleaned = soften_first_word(&cleaned);
    if cleaned.is_empty() {
        return String::new();
    }

    let Some(mut sentence) = with_subject(&cleaned) else {
        debug!(clause = %cleaned, "Pain clause has no usable subject, discarded");
        return String::new();
    };

    for (re, replacement) in PAIN_REPAIRS.iter() {
        sentence = re.replace_all(&sentence, *replacement).into_owned();
    }

    if BROKEN_PAIN_RE.is_match(&sentence) || !starts_with_subject(&sentence) {
        warn!(sentence = %sentence, "Pain sentence still malformed after repair, discarded");
        return String::new();
    }
    if sentence.split_whitespace().count() < 3 {
        return String::new();
    }
    sentence
}

fn build_summary(label: &str, pain: &str, has_audience: bool, max_words: usize) -> String {
    let summary = match (has_audience, pain.is_empty()) {
        (true, false) => format!("{}: {}", label, truncate_words(pain, 10)),
        (true, true) => label.to_string(),
        (false, false) => format!("{}: {}", GENERIC_PROSPECT_LABEL, truncate_words(pain, 10)),
        (false, true) => FALLBACK_SUMMARY.to_string(),
    };
    truncate_words(&summary, max_words)
}

fn missing_fields(frame: &OutboundFrame) -> Vec<String> {
    let mut missing = Vec::new();
    if frame.audience_phrase.is_none() {
        missing.push("audience".to_string());
    }
    if frame.pain_clause.is_none() {
        missing.push("pain".to_string());
    }
    if frame.provider_name.is_none() {
        missing.push("provider".to_string());
    }
    if frame.offer_type == OfferType::Unknown {
        missing.push("offer".to_string());
    }
    missing
}

/// Builds anchor packs from outbound messages.
#[derive(Debug, Clone, Copy)]
pub struct AnchorExtractor {
    frames: FrameExtractor,
    min_outbound_chars: usize,
    label_max_words: usize,
    summary_max_words: usize,
}

impl Default for AnchorExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl AnchorExtractor {
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            frames: FrameExtractor::with_config(config),
            min_outbound_chars: config.min_outbound_chars,
            label_max_words: config.label_max_words,
            summary_max_words: config.summary_max_words,
        }
    }

    /// Build the anchor pack for an outbound message.
    pub fn build(&self, outbound: Option<&str>) -> AnchorPack {
        let text = outbound.map(str::trim).unwrap_or_default();
        if text.chars().count() < self.min_outbound_chars {
            debug!(len = text.len(), "Outbound too short, using fallback anchor");
            return AnchorPack::fallback();
        }

        let frame = self.frames.extract(text);
        self.assemble(&frame)
    }

    /// Assemble the caller-facing pack from an extracted frame.
    pub fn assemble(&self, frame: &OutboundFrame) -> AnchorPack {
        let prospect_label = build_prospect_label(frame, self.label_max_words);
        let pain_sentence = frame
            .pain_clause
            .as_deref()
            .map(build_pain_sentence)
            .unwrap_or_default();
        let has_audience = prospect_label != GENERIC_PROSPECT_LABEL;
        let outbound_summary = build_summary(
            &prospect_label,
            &pain_sentence,
            has_audience,
            self.summary_max_words,
        );

        AnchorPack {
            prospect_label,
            pain_sentence,
            offer_sentence: CALL_FIRST_OFFER_SENTENCE.to_string(),
            outbound_summary,
            quality: quality_for_score(frame.score),
            missing: missing_fields(frame),
        }
    }
}

/// Build an anchor pack with the default configuration.
pub fn build_anchor_pack(outbound: &str) -> AnchorPack {
    AnchorExtractor::new().build(Some(outbound))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_tiers() {
        assert_eq!(quality_for_score(11), AnchorQuality::Good);
        assert_eq!(quality_for_score(8), AnchorQuality::Good);
        assert_eq!(quality_for_score(7), AnchorQuality::Partial);
        assert_eq!(quality_for_score(4), AnchorQuality::Partial);
        assert_eq!(quality_for_score(3), AnchorQuality::Fallback);
    }

    #[test]
    fn test_missing_outbound_is_fallback() {
        let extractor = AnchorExtractor::new();
        assert_eq!(extractor.build(None), AnchorPack::fallback());
        assert_eq!(extractor.build(Some("   Quick ping   ")), AnchorPack::fallback());
    }

    #[test]
    fn test_label_cleanup() {
        assert_eq!(
            clean_label_phrase("a few founders who lose deals", 10).as_deref(),
            Some("founders")
        );
        assert_eq!(
            clean_label_phrase("the CFOs at mid-market firms", 10).as_deref(),
            Some("CFOs at mid-market firms")
        );
        assert_eq!(
            clean_label_phrase("Owners of clinics that struggle", 10).as_deref(),
            Some("owners of clinics")
        );
        assert_eq!(
            clean_label_phrase("one two three four five six seven eight nine ten eleven", 4).as_deref(),
            Some("one two three four")
        );
        assert!(clean_label_phrase("those who lose", 10).is_none());
    }

    #[test]
    fn test_pain_sentence_subjects() {
        assert_eq!(
            build_pain_sentence("can't find good exit options."),
            "they can't find good exit options"
        );
        assert_eq!(
            build_pain_sentence("Founders lose weeks chasing buyers"),
            "they lose weeks chasing buyers"
        );
        assert_eq!(
            build_pain_sentence("Most of them loses two weeks every close"),
            "they lose two weeks every close"
        );
        assert_eq!(
            build_pain_sentence("The team struggles with reporting"),
            "the team struggles with reporting"
        );
        assert_eq!(
            build_pain_sentence("losing patients to DSOs"),
            "they are losing patients to DSOs"
        );
    }

    #[test]
    fn test_when_rewrites() {
        assert_eq!(
            build_pain_sentence("when deals slip past quarter end"),
            "they lose time when deals slip past quarter end"
        );
        assert_eq!(
            build_pain_sentence("When the market turns"),
            "timing matters when the market turns"
        );
    }

    #[test]
    fn test_targeted_repairs() {
        assert_eq!(build_pain_sentence("they are lose deals"), "they are losing deals");
        assert_eq!(build_pain_sentence("are waste hours on intake"), "they are wasting hours on intake");
        assert_eq!(build_pain_sentence("they're they busy all quarter"), "they're busy all quarter");
    }

    #[test]
    fn test_negators_survive_subject_swap() {
        assert_eq!(
            build_pain_sentence("never have time to plan an exit"),
            "they never have time to plan an exit"
        );
        assert_eq!(
            build_pain_sentence("Owners rarely has a buyer lined up"),
            "they rarely have a buyer lined up"
        );
        assert_eq!(
            build_pain_sentence("can\u{2019}t find good exit options"),
            "they can't find good exit options"
        );
        // a negator mixed into the noun phrase cannot be placed safely
        assert_eq!(build_pain_sentence("no owners have time"), "");
    }

    #[test]
    fn test_unrepairable_is_discarded() {
        assert_eq!(build_pain_sentence("Exit options"), "");
        assert_eq!(build_pain_sentence("I think this matters"), "");
        assert_eq!(build_pain_sentence(""), "");
        assert_eq!(build_pain_sentence("lose"), "");
    }

    #[test]
    fn test_summary_is_capped() {
        let pain = "they lose time every single quarter on the same avoidable reconciliation problems again and again";
        let summary = build_summary("the founders at private companies i mentioned", pain, true, 18);
        // seven label words plus ten pain words
        assert_eq!(summary.split_whitespace().count(), 17);
        let summary = build_summary("the founders at private companies i mentioned", pain, true, 8);
        assert_eq!(summary.split_whitespace().count(), 8);
        assert_eq!(build_summary(GENERIC_PROSPECT_LABEL, "", false, 18), FALLBACK_SUMMARY);
    }
}
