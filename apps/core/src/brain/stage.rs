//! Stage taxonomy and the multi-intent classification result.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Conversational stage of an inbound reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    /// Delivery failure (mailer-daemon, unknown recipient)
    Bounce,
    /// Out of office / auto-reply
    Ooo,
    /// Explicit refusal
    Negative,
    /// Abuse or threats
    Hostile,
    /// Wants to find a time
    Scheduling,
    /// Asks about cost, fees, how the sender gets paid
    Pricing,
    /// Asks for references, case studies, track record
    Proof,
    /// Asks who the sender is
    Identity,
    /// Asks what exactly is being offered
    Scope,
    /// Positive engagement
    Interest,
    /// Does not understand the message
    Confusion,
    /// Nothing matched
    Unknown,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Stage {
    pub const ALL: [Stage; 12] = [
        Stage::Bounce,
        Stage::Ooo,
        Stage::Negative,
        Stage::Hostile,
        Stage::Scheduling,
        Stage::Pricing,
        Stage::Proof,
        Stage::Identity,
        Stage::Scope,
        Stage::Interest,
        Stage::Confusion,
        Stage::Unknown,
    ];

    /// Wire name of the stage
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Bounce => "BOUNCE",
            Stage::Ooo => "OOO",
            Stage::Negative => "NEGATIVE",
            Stage::Hostile => "HOSTILE",
            Stage::Scheduling => "SCHEDULING",
            Stage::Pricing => "PRICING",
            Stage::Proof => "PROOF",
            Stage::Identity => "IDENTITY",
            Stage::Scope => "SCOPE",
            Stage::Interest => "INTEREST",
            Stage::Confusion => "CONFUSION",
            Stage::Unknown => "UNKNOWN",
        }
    }

    /// Terminal stages short-circuit classification and never carry secondaries.
    pub fn is_hard_stop(&self) -> bool {
        matches!(
            self,
            Stage::Bounce | Stage::Ooo | Stage::Hostile | Stage::Negative
        )
    }
}

/// Error returned when parsing an unknown stage name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stage: {0}")]
pub struct ParseStageError(pub String);

impl FromStr for Stage {
    type Err = ParseStageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Stage::ALL
            .iter()
            .copied()
            .find(|stage| stage.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseStageError(wanted.to_string()))
    }
}

/// Result of classifying one reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiIntent {
    /// Winning stage
    pub primary: Stage,
    /// Additional matched stages, in precedence order
    pub secondary: Vec<Stage>,
    /// Diagnostic trail of the rules that fired
    pub signals: Vec<String>,
    /// Whether an interest token was found negated
    pub negation_detected: bool,
}

impl Default for MultiIntent {
    fn default() -> Self {
        Self {
            primary: Stage::Unknown,
            secondary: Vec::new(),
            signals: Vec::new(),
            negation_detected: false,
        }
    }
}

impl MultiIntent {
    /// A terminal result carrying a single signal and no secondaries.
    pub(crate) fn terminal(stage: Stage, signal: impl Into<String>, negation_detected: bool) -> Self {
        Self {
            primary: stage,
            secondary: Vec::new(),
            signals: vec![signal.into()],
            negation_detected,
        }
    }

    /// True when `stage` is the primary or one of the secondaries.
    pub fn has_stage(&self, stage: Stage) -> bool {
        self.primary == stage || self.secondary.contains(&stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_labels_round_trip() {
        for stage in Stage::ALL {
            assert_eq!(stage.label().parse::<Stage>(), Ok(stage));
        }
        assert_eq!("pricing".parse::<Stage>(), Ok(Stage::Pricing));
        assert!("maybe".parse::<Stage>().is_err());
    }

    #[test]
    fn test_stage_serializes_as_wire_name() {
        let json = serde_json::to_string(&Stage::Ooo).unwrap();
        assert_eq!(json, "\"OOO\"");
        let json = serde_json::to_string(&Stage::Scheduling).unwrap();
        assert_eq!(json, "\"SCHEDULING\"");
    }

    #[test]
    fn test_hard_stops() {
        let stops: Vec<Stage> = Stage::ALL.into_iter().filter(|s| s.is_hard_stop()).collect();
        assert_eq!(
            stops,
            vec![Stage::Bounce, Stage::Ooo, Stage::Negative, Stage::Hostile]
        );
    }

    #[test]
    fn test_default_multi_intent_is_unknown() {
        let intent = MultiIntent::default();
        assert_eq!(intent.primary, Stage::Unknown);
        assert!(intent.secondary.is_empty());
        assert!(!intent.has_stage(Stage::Pricing));
    }
}
