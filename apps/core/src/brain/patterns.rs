//! Stage pattern tables.
//!
//! Ordering in these tables is business policy: hard stops are checked in
//! `HARD_STOP_ORDER`, sweep matches are ranked by `STAGE_PRECEDENCE`.
//! All patterns run against normalized (lowercase, ASCII-quoted) text.

use regex::Regex;
use std::sync::LazyLock;

use super::stage::Stage;

/// Order in which terminal stages are checked.
pub const HARD_STOP_ORDER: [Stage; 4] = [Stage::Bounce, Stage::Ooo, Stage::Hostile, Stage::Negative];

/// Ranking of sweep candidates; the first present becomes primary.
pub const STAGE_PRECEDENCE: [Stage; 7] = [
    Stage::Scheduling,
    Stage::Pricing,
    Stage::Proof,
    Stage::Identity,
    Stage::Scope,
    Stage::Interest,
    Stage::Confusion,
];

/// Stages the pricing override never displaces.
pub const PRICING_OVERRIDE_EXEMPT: [Stage; 2] = [Stage::Scheduling, Stage::Pricing];

static BOUNCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:delivery (?:has )?failed|delivery status notification|undeliverable|address not found|mailbox (?:unavailable|full|not found)|mail delivery (?:subsystem|failed)|could not be delivered|message not delivered|recipient address rejected|no such user|user unknown|mailer-daemon|returned mail)\b",
    )
    .expect("Invalid regex: bounce pattern")
});

static OOO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:out of (?:the )?office|ooo|on vacation|on holiday|on annual leave|on leave|parental leave|maternity leave|paternity leave|away from (?:the office|my desk)|limited access to (?:my )?email|automatic reply|auto-?reply|i will be back on|i'll be back on|returning on)\b",
    )
    .expect("Invalid regex: out-of-office pattern")
});

static HOSTILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:fuck\w*|f\*+k\w*|shit\w*|scam\w*|spammers?|piss off|go away|leave me alone|stop spamming|harass\w*|report(?:ing)? you|idiots?|screw you|get lost|how dare)\b",
    )
    .expect("Invalid regex: hostile pattern")
});

static NEGATIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:not interested|no interest|no thanks|no,? thank you|unsubscribe|remove me|take me off|stop (?:emailing|contacting|messaging|reaching out)|do not (?:contact|email)|don't (?:contact|email)|not a (?:good )?fit|not for (?:us|me)|we'll pass|i'll pass|pass on this|not looking|no need|not at this time|not right now|please stop|opt me out|not relevant)\b",
    )
    .expect("Invalid regex: negative pattern")
});

static SCHEDULING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:schedule|calendar|calendly|book a (?:call|time|meeting|slot)|set up (?:a )?(?:call|time|meeting)|what time|when works|when are you free|availability|available|next week|this week|tomorrow|monday|tuesday|wednesday|thursday|friday|\d{1,2}(?::\d{2})?\s?(?:am|pm)|send (?:me )?(?:a |an |some )?(?:link|invite|times)|let's talk|hop on a call|jump on a call)\b",
    )
    .expect("Invalid regex: scheduling pattern")
});

static PRICING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:price|prices|pricing|cost|costs|fee|fees|rate|rates|how much|budget|charge|charges|commission|paid|payment|retainer|quote)\b",
    )
    .expect("Invalid regex: pricing pattern")
});

static PROOF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:case stud(?:y|ies)|references?|testimonials?|proof|examples?|track record|results|who else|worked with|clients you|prove|evidence|success stor(?:y|ies))\b",
    )
    .expect("Invalid regex: proof pattern")
});

static IDENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:who are you|who is this|who's this|what company|which company|who do you (?:work for|represent)|what firm|how did you (?:get|find)|where did you (?:get|find)|are you a (?:bot|recruiter|broker)|is this (?:spam|automated|a bot))\b",
    )
    .expect("Invalid regex: identity pattern")
});

static SCOPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:what exactly|what do you do|what does (?:that|this) involve|how does (?:it|this|that) work|what's involved|what kind of|scope|which (?:services|industries)|do you (?:also|only|cover|handle)|who is this for|what would you need|what's the process)\b",
    )
    .expect("Invalid regex: scope pattern")
});

static INTEREST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:interested|sounds good|sounds great|sure|yes|yeah|yep|open to|happy to|let's do it|i'm in|tell me more|love to|would like to|keen|definitely|ok|okay|go ahead)\b",
    )
    .expect("Invalid regex: interest pattern")
});

static CONFUSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:\b(?:not sure what|not sure i understand|what do you mean|what does that mean|confused|confusing|don't understand|do not understand|didn't understand|unclear|what is this about|what's this about)\b|^(?:maybe|huh|what)[.!?]*$)",
    )
    .expect("Invalid regex: confusion pattern")
});

static SOFT_DECLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:i don't think|not really|prefer not|rather not)\b")
        .expect("Invalid regex: soft decline pattern")
});

static NEGATED_OK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:(?:i'm|i am) )?not (?:ok|okay)\b").expect("Invalid regex: negated ok pattern")
});

static NOT_SURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bnot sure\b").expect("Invalid regex: not sure pattern")
});

static NOT_SURE_CONFUSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bnot sure (?:what|i understand)\b").expect("Invalid regex: not sure confusion pattern")
});

static TERSE_PRICING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:price|prices|pricing|cost|costs|fee|fees|paid|commission|rate|rates|budget|how much)\s*\?*$",
    )
    .expect("Invalid regex: terse pricing pattern")
});

static EMBEDDED_PRICING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:how much|what does (?:it|this|that) cost|what's the cost|what do you charge|how do you (?:get paid|make money|charge)|how are you paid|what's your (?:fee|rate|cut)|what are your (?:fees|rates)|is there a (?:fee|cost|charge)|what's the catch|what's in it for you|who pays)\b",
    )
    .expect("Invalid regex: embedded pricing pattern")
});

/// Whole-message questions that carry two intents at once.
static COMPOUND_QUESTIONS: LazyLock<Vec<CompoundQuestion>> = LazyLock::new(|| {
    vec![
        CompoundQuestion::new(
            "whats_in_it_for_you",
            r"^what'?s in it for you\??$",
            Stage::Pricing,
            &[Stage::Identity],
        ),
        CompoundQuestion::new(
            "how_do_you_make_money",
            r"^how do you (?:make money|get paid)\??$",
            Stage::Pricing,
            &[Stage::Identity],
        ),
        CompoundQuestion::new(
            "who_pays_you",
            r"^who pays you\??$",
            Stage::Pricing,
            &[Stage::Identity],
        ),
        CompoundQuestion::new(
            "why_me",
            r"^why me\??$",
            Stage::Identity,
            &[Stage::Scope],
        ),
        CompoundQuestion::new(
            "what_is_this_exactly",
            r"^what is this exactly\??$",
            Stage::Scope,
            &[Stage::Identity],
        ),
    ]
});

/// A whole-message compound question and the stages it maps to.
pub struct CompoundQuestion {
    pub name: &'static str,
    pattern: Regex,
    pub primary: Stage,
    pub secondary: &'static [Stage],
}

impl CompoundQuestion {
    fn new(name: &'static str, pattern: &str, primary: Stage, secondary: &'static [Stage]) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("Invalid regex: compound question"),
            primary,
            secondary,
        }
    }
}

/// Pattern for a stage, if the stage has one.
pub fn stage_pattern(stage: Stage) -> Option<&'static Regex> {
    let re: &'static Regex = match stage {
        Stage::Bounce => &*BOUNCE_RE,
        Stage::Ooo => &*OOO_RE,
        Stage::Hostile => &*HOSTILE_RE,
        Stage::Negative => &*NEGATIVE_RE,
        Stage::Scheduling => &*SCHEDULING_RE,
        Stage::Pricing => &*PRICING_RE,
        Stage::Proof => &*PROOF_RE,
        Stage::Identity => &*IDENTITY_RE,
        Stage::Scope => &*SCOPE_RE,
        Stage::Interest => &*INTEREST_RE,
        Stage::Confusion => &*CONFUSION_RE,
        Stage::Unknown => return None,
    };
    Some(re)
}

/// Whether the stage's pattern matches the normalized text.
pub fn matches_stage(stage: Stage, normalized: &str) -> bool {
    stage_pattern(stage).is_some_and(|re| re.is_match(normalized))
}

/// First hard stop whose pattern matches, in `HARD_STOP_ORDER`.
pub fn match_hard_stop(normalized: &str) -> Option<Stage> {
    HARD_STOP_ORDER
        .into_iter()
        .find(|stage| matches_stage(*stage, normalized))
}

/// Explicit soft-decline phrasing (`i don't think`, `rather not`, ...).
pub fn is_soft_decline(normalized: &str) -> bool {
    SOFT_DECLINE_RE.is_match(normalized)
}

/// `not ok`, `i'm not ok`, or a bare `not sure` that is not a confusion phrase.
pub fn is_negated_ok(normalized: &str) -> bool {
    if NEGATED_OK_RE.is_match(normalized) {
        return true;
    }
    NOT_SURE_RE.is_match(normalized) && !NOT_SURE_CONFUSION_RE.is_match(normalized)
}

/// Compound question matching the entire message.
pub fn match_compound_question(normalized: &str) -> Option<&'static CompoundQuestion> {
    COMPOUND_QUESTIONS
        .iter()
        .find(|q| q.pattern.is_match(normalized))
}

/// Pricing failsafe: terse single-word queries or embedded pricing phrases.
///
/// Accepts raw text; normalization happens here.
pub fn is_pricing(text: &str) -> bool {
    let normalized = super::tokenizer::normalize(text);
    if normalized.is_empty() {
        return false;
    }
    TERSE_PRICING_RE.is_match(&normalized) || EMBEDDED_PRICING_RE.is_match(&normalized)
}
