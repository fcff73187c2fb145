//! Outbound frame extraction.
//!
//! Mines the original outbound message for who it was about (audience), what
//! hurts them (pain), who the provider is and what was offered. Pattern
//! extraction takes priority; cue-scored clause mining fills the gaps.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

use super::tokenizer::{find_word, fold_quotes};
use crate::config::EngineConfig;

/// Kind of next step the outbound message proposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferType {
    Intro,
    Call,
    Details,
    Unknown,
}

/// Which extractor produced a frame field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionSource {
    NoticedPattern,
    RolePattern,
    VerbObjectPattern,
    ForObjectPattern,
    KnowAFewPattern,
    OutcomePattern,
    OfferKeywords,
    ClauseMining,
}

/// Provenance of each frame field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameEvidence {
    pub provider_source: Option<ExtractionSource>,
    pub audience_source: Option<ExtractionSource>,
    pub pain_source: Option<ExtractionSource>,
    pub outcome_source: Option<ExtractionSource>,
    pub offer_source: Option<ExtractionSource>,
}

/// Intermediate extraction result for one outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundFrame {
    pub provider_name: Option<String>,
    pub audience_phrase: Option<String>,
    pub pain_clause: Option<String>,
    pub desired_outcome: Option<String>,
    pub offer_type: OfferType,
    pub evidence: FrameEvidence,
    pub raw: String,
    /// Additive signal strength, only meaningful relative to the tier thresholds
    pub score: u32,
}

impl OutboundFrame {
    /// `4·audience + 4·pain + 2·offer + 1·provider`
    pub fn compute_score(&self) -> u32 {
        let mut score = 0;
        if self.audience_phrase.is_some() {
            score += 4;
        }
        if self.pain_clause.is_some() {
            score += 4;
        }
        if self.offer_type != OfferType::Unknown {
            score += 2;
        }
        if self.provider_name.is_some() {
            score += 1;
        }
        score
    }
}

/// Role nouns that mark an audience.
const ROLE_NOUNS: &[&str] = &[
    "founders", "owners", "ceos", "cfos", "ctos", "coos", "cmos", "vps", "directors",
    "executives", "partners", "advisors", "advisers", "leaders", "managers", "operators",
    "investors", "physicians", "doctors", "clinicians", "dentists", "practices", "clinics",
    "agencies", "firms", "companies", "startups", "businesses", "teams", "recruiters",
    "engineers", "marketers", "buyers", "sellers", "families", "landlords", "brokers",
];

const AUDIENCE_CONNECTORS: &[&str] = &["for", "with", "helps", "serves", "works with"];

const PAIN_CUES: &[&str] = &[
    "lose", "losing", "lost", "struggle", "struggles", "struggling", "waste", "wasting",
    "miss", "missing", "risk", "can't", "cannot", "stuck", "hard to", "behind", "delays",
    "overwhelmed", "burned", "churn", "pressure", "deadline", "deadlines", "slow", "stall",
];

const OUTCOME_CUES: &[&str] = &[
    "grow", "scale", "exit", "sell", "close", "save", "faster", "win", "hire", "raise",
];

const OFFER_CUES: &[&str] = &[
    "intro", "introduce", "connect", "chat", "call", "minutes", "quick", "worth",
];

/// Words that end an audience phrase when they follow the head noun.
const PHRASE_BREAK_WORDS: &[&str] = &[
    "who", "that", "which", "where", "when", "whose", "because", "so", "but", "while", "to",
    "by", "through", "via", "cut", "cuts", "reduce", "reduces", "grow", "grows", "save",
    "saves", "find", "finds", "lose", "loses", "losing", "hire", "close", "sell", "scale",
    "build", "run", "manage", "get", "gets", "struggle", "struggling", "waste", "wasting",
    "miss", "missing", "risk", "are", "is", "were", "was", "can", "can't", "cannot", "need",
    "needs", "want", "wants", "spend", "spends", "have", "has", "i", "we", "you", "they",
];

/// Words dropped from the front of an audience phrase.
const LEADING_STRIP_WORDS: &[&str] = &[
    "helps", "help", "helping", "serves", "serve", "serving", "works", "work", "working",
    "with", "for", "noticed", "and", "we", "i", "advise", "advises", "advising", "support",
    "supports", "supporting", "coach", "coaches", "coaching", "represent", "represents",
    "back", "backs", "meet", "met", "know", "see", "saw", "like", "the", "a", "an",
];

/// First words that disqualify a `for X` object.
const FOR_OBJECT_REJECT: &[&str] = &[
    "a", "an", "you", "your", "yours", "me", "us", "it", "this", "that", "now", "free",
    "sure", "example", "instance", "the", "any", "some", "more", "years", "months", "weeks",
    "days", "what", "how", "coffee", "reaching", "them", "him", "her",
];

/// Capitalized words that are not the start of a provider name.
const NON_NAME_WORDS: &[&str] = &[
    "That", "The", "This", "These", "Those", "Your", "You", "Our", "We", "It", "Their", "How",
    "A", "An", "I", "My",
];

static CLAUSE_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.;\n\u{2014}\u{2013}-]").expect("Invalid regex: clause split"));

static ROLE_AT_RE: LazyLock<Regex> = LazyLock::new(|| {
    let roles = ROLE_NOUNS.join("|");
    Regex::new(&format!(
        r"(?i)\b((?:[a-z][\w-]*\s+)?(?:{})\s+(?:at|of|in|inside|across|running)\s+[^.,;:!?\n\u{{2014}}\u{{2013}}]+)",
        roles
    ))
    .expect("Invalid regex: role at location")
});

static VERB_OBJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:helps|helping|works with|working with|serves|serving)\s+([^.,;:!?\n\u{2014}\u{2013}]+)",
    )
    .expect("Invalid regex: verb object")
});

static FOR_OBJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bfor\s+([^.,;:!?\n\u{2014}\u{2013}]+)").expect("Invalid regex: for object")
});

static KNOW_A_FEW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bi know (?:a few|a couple(?: of)?|several|some|many|a handful|plenty)(?:\s+[a-z][\w-]*)?\s+(?:who|that)\s+([^.!?;\n\u{2014}\u{2013}]+)",
    )
    .expect("Invalid regex: know a few")
});

static PROVIDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b[Nn]oticed\s+((?:[A-Z][\w&'.-]*\s+){0,4}?[A-Z][\w&'.-]*)\s+(?:helps|works|serves)\b",
    )
    .expect("Invalid regex: provider")
});

static OUTCOME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:so (?:that )?(?:they|you) can|helping them|to help them)\s+([^.,;!?\n\u{2014}\u{2013}]+)",
    )
    .expect("Invalid regex: outcome")
});

static INTRO_OFFER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:intro|intros|introduce|introducing|introduction|connect you|connecting you|put you in touch|route you|pass you along)\b",
    )
    .expect("Invalid regex: intro offer")
});

static CALL_OFFER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\b(?:call|chat|quick conversation|hop on|zoom)\b|\b10\s?(?:-|\u{2013}|to)\s?15\b|\b(?:10|15)[ -]?min(?:ute)?s?\b)",
    )
    .expect("Invalid regex: call offer")
});

static DETAILS_OFFER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:send (?:over |you )?(?:some |more )?(?:info|details|information|a deck|an overview|a one-pager)|more info)\b",
    )
    .expect("Invalid regex: details offer")
});

/// A clause of the outbound message with its cue scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinedClause {
    pub text: String,
    pub audience: usize,
    pub pain: usize,
    pub offer: usize,
}

/// Best clause per purpose, if any cleared the threshold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClauseWinners {
    pub audience: Option<String>,
    pub pain: Option<String>,
    pub offer: Option<String>,
}

fn count_cues(lowered: &str, cues: &[&str]) -> usize {
    cues.iter()
        .filter(|cue| find_word(lowered, cue).is_some())
        .count()
}

/// Split the outbound text into scored clauses (clauses under 6 chars dropped).
pub fn mine_clauses(text: &str) -> Vec<MinedClause> {
    CLAUSE_SPLIT_RE
        .split(text)
        .map(str::trim)
        .filter(|clause| clause.chars().count() >= 6)
        .map(|clause| {
            let lowered = clause.to_lowercase();
            MinedClause {
                text: clause.to_string(),
                audience: 2 * count_cues(&lowered, ROLE_NOUNS)
                    + count_cues(&lowered, AUDIENCE_CONNECTORS),
                pain: count_cues(&lowered, PAIN_CUES) + count_cues(&lowered, OUTCOME_CUES),
                offer: count_cues(&lowered, OFFER_CUES),
            }
        })
        .collect()
}

/// Highest-scoring clause per purpose; ties keep the earliest clause.
pub fn best_clauses(clauses: &[MinedClause], min_score: usize) -> ClauseWinners {
    fn pick(clauses: &[MinedClause], min_score: usize, key: fn(&MinedClause) -> usize) -> Option<String> {
        let mut best: Option<&MinedClause> = None;
        for clause in clauses {
            let score = key(clause);
            if score >= min_score && best.map_or(true, |b| score > key(b)) {
                best = Some(clause);
            }
        }
        best.map(|c| c.text.clone())
    }

    ClauseWinners {
        audience: pick(clauses, min_score, |c| c.audience),
        pain: pick(clauses, min_score, |c| c.pain),
        offer: pick(clauses, min_score, |c| c.offer),
    }
}

fn bare_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'' && c != '-')
        .to_lowercase()
}

/// Clean an audience candidate: drop leading connectors, cut at the first
/// break word after the head noun, and bound its length.
fn clean_phrase(raw: &str, min_chars: usize, max_chars: usize) -> Option<String> {
    let mut words: Vec<&str> = raw.split_whitespace().collect();
    while words
        .first()
        .is_some_and(|w| LEADING_STRIP_WORDS.contains(&bare_word(w).as_str()))
    {
        words.remove(0);
    }
    if let Some(cut) = words
        .iter()
        .skip(1)
        .position(|w| PHRASE_BREAK_WORDS.contains(&bare_word(w).as_str()))
    {
        words.truncate(cut + 1);
    }

    let mut phrase = String::new();
    for word in words {
        let next_len = phrase.len() + word.len() + usize::from(!phrase.is_empty());
        if next_len > max_chars {
            break;
        }
        if !phrase.is_empty() {
            phrase.push(' ');
        }
        phrase.push_str(word);
    }
    let phrase = phrase
        .trim_end_matches(|c: char| !c.is_alphanumeric())
        .to_string();

    if phrase.chars().count() < min_chars {
        return None;
    }
    Some(phrase)
}

fn first_word_is(text: &str, list: &[&str]) -> bool {
    text.split_whitespace()
        .next()
        .is_some_and(|w| list.contains(&bare_word(w).as_str()))
}

/// Frame extractor with configurable bounds.
#[derive(Debug, Clone, Copy)]
pub struct FrameExtractor {
    min_clause_score: usize,
    phrase_min_chars: usize,
    phrase_max_chars: usize,
}

impl Default for FrameExtractor {
    fn default() -> Self {
        Self::with_config(&EngineConfig::default())
    }
}

impl FrameExtractor {
    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            min_clause_score: config.min_clause_score,
            phrase_min_chars: config.phrase_min_chars,
            phrase_max_chars: config.phrase_max_chars,
        }
    }

    /// Audience phrase from role-at-location, verb-object, then `for X` shapes.
    pub fn extract_audience(&self, text: &str) -> Option<(String, ExtractionSource)> {
        let clean = |raw: &str| clean_phrase(raw, self.phrase_min_chars, self.phrase_max_chars);

        let role = ROLE_AT_RE
            .captures_iter(text)
            .filter_map(|c| c.get(1))
            .find_map(|m| clean(m.as_str()));
        if let Some(phrase) = role {
            return Some((phrase, ExtractionSource::RolePattern));
        }

        let object = VERB_OBJECT_RE
            .captures_iter(text)
            .filter_map(|c| c.get(1))
            .find_map(|m| clean(m.as_str()));
        if let Some(phrase) = object {
            return Some((phrase, ExtractionSource::VerbObjectPattern));
        }

        FOR_OBJECT_RE
            .captures_iter(text)
            .filter_map(|c| c.get(1))
            .filter(|m| !first_word_is(m.as_str(), FOR_OBJECT_REJECT))
            .filter(|m| !m.as_str().chars().any(|c| c.is_ascii_digit()))
            .find_map(|m| clean(m.as_str()))
            .map(|phrase| (phrase, ExtractionSource::ForObjectPattern))
    }

    /// Pain clause (and audience from the preceding sentence) from "I know a few who ...".
    pub fn extract_know_a_few(&self, text: &str) -> Option<(String, Option<String>)> {
        let caps = KNOW_A_FEW_RE.captures(text)?;
        let whole = caps.get(0)?;
        let pain = caps.get(1)?.as_str().trim().to_string();
        if pain.chars().count() < self.phrase_min_chars {
            return None;
        }

        let preceding = text[..whole.start()]
            .split(['.', '!', '?', '\n', '\u{2014}', '\u{2013}'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .last()
            .and_then(|sentence| self.extract_audience(sentence))
            .map(|(phrase, _)| phrase);

        Some((pain, preceding))
    }

    /// Provider name from "Noticed <Proper Noun> helps|works|serves".
    pub fn extract_provider(&self, text: &str) -> Option<String> {
        PROVIDER_RE
            .captures_iter(text)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .find(|name| {
                name.split_whitespace()
                    .next()
                    .is_some_and(|first| !NON_NAME_WORDS.contains(&first))
            })
    }

    /// Desired outcome from "so they can ..." shapes.
    pub fn extract_outcome(&self, text: &str) -> Option<String> {
        OUTCOME_RE
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| {
                let len = s.chars().count();
                len >= self.phrase_min_chars && len <= self.phrase_max_chars
            })
    }

    /// Build the frame for an outbound message.
    pub fn extract(&self, text: &str) -> OutboundFrame {
        // Extractor tables are written with ASCII apostrophes
        let raw = fold_quotes(text.trim());
        let clauses = best_clauses(&mine_clauses(&raw), self.min_clause_score);
        let mut evidence = FrameEvidence::default();

        let provider_name = self.extract_provider(&raw);
        if provider_name.is_some() {
            evidence.provider_source = Some(ExtractionSource::NoticedPattern);
        }

        let mut audience_phrase = None;
        if let Some((phrase, source)) = self.extract_audience(&raw) {
            audience_phrase = Some(phrase);
            evidence.audience_source = Some(source);
        }

        let mut pain_clause = None;
        if let Some((pain, preceding_audience)) = self.extract_know_a_few(&raw) {
            pain_clause = Some(pain);
            evidence.pain_source = Some(ExtractionSource::KnowAFewPattern);
            if audience_phrase.is_none() {
                if let Some(phrase) = preceding_audience {
                    audience_phrase = Some(phrase);
                    evidence.audience_source = Some(ExtractionSource::KnowAFewPattern);
                }
            }
        }

        if audience_phrase.is_none() {
            if let Some(clause) = clauses.audience.as_deref() {
                audience_phrase = clean_phrase(clause, self.phrase_min_chars, self.phrase_max_chars);
                if audience_phrase.is_some() {
                    evidence.audience_source = Some(ExtractionSource::ClauseMining);
                }
            }
        }
        if pain_clause.is_none() {
            if let Some(clause) = clauses.pain {
                pain_clause = Some(clause);
                evidence.pain_source = Some(ExtractionSource::ClauseMining);
            }
        }

        let desired_outcome = self.extract_outcome(&raw);
        if desired_outcome.is_some() {
            evidence.outcome_source = Some(ExtractionSource::OutcomePattern);
        }

        let offer_type = classify_offer(&raw);
        if offer_type != OfferType::Unknown {
            evidence.offer_source = Some(ExtractionSource::OfferKeywords);
        }

        let mut frame = OutboundFrame {
            provider_name,
            audience_phrase,
            pain_clause,
            desired_outcome,
            offer_type,
            evidence,
            raw,
            score: 0,
        };
        frame.score = frame.compute_score();

        debug!(
            score = frame.score,
            offer = ?frame.offer_type,
            has_audience = frame.audience_phrase.is_some(),
            has_pain = frame.pain_clause.is_some(),
            "Outbound frame extracted"
        );
        frame
    }
}

/// Offer type in fixed order: intro, call, details, unknown.
pub fn classify_offer(text: &str) -> OfferType {
    if INTRO_OFFER_RE.is_match(text) {
        OfferType::Intro
    } else if CALL_OFFER_RE.is_match(text) {
        OfferType::Call
    } else if DETAILS_OFFER_RE.is_match(text) {
        OfferType::Details
    } else {
        OfferType::Unknown
    }
}

/// Extract the frame for an outbound message with default bounds.
pub fn extract_outbound_frame(text: &str) -> OutboundFrame {
    FrameExtractor::default().extract(text)
}
