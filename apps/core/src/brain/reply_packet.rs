//! Reply Packet - Output structure for one analyzed reply.
//!
//! Bundles the stage classification of the reply with the anchor pack built
//! from the outbound message it answers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::anchor::AnchorPack;
use super::stage::{MultiIntent, Stage};
use crate::error::AppResult;

/// Complete result of analyzing one reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyPacket {
    /// Unique id for correlating logs and telemetry
    pub id: Uuid,

    /// Reply body after quoted history was stripped
    pub reply: String,

    /// Stage classification
    pub intent: MultiIntent,

    /// Anchor extracted from the outbound message
    pub anchor: AnchorPack,

    /// Processing time in microseconds
    pub latency_us: u64,

    /// Timestamp of analysis
    pub timestamp: DateTime<Utc>,
}

impl ReplyPacket {
    /// Create a packet with an `UNKNOWN` intent and a fallback anchor
    pub fn new(reply: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            reply,
            intent: MultiIntent::default(),
            anchor: AnchorPack::fallback(),
            latency_us: 0,
            timestamp: Utc::now(),
        }
    }

    /// Whether the reply ends the conversation
    pub fn is_hard_stop(&self) -> bool {
        self.intent.primary.is_hard_stop()
    }

    /// Whether the classifier gave up
    pub fn is_unknown(&self) -> bool {
        self.intent.primary == Stage::Unknown
    }

    /// Get a summary for logging
    pub fn summary(&self) -> String {
        let secondary = self
            .intent
            .secondary
            .iter()
            .map(Stage::label)
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "Stage: {} [{}], Negated: {}, Anchor: {}, Latency: {}us",
            self.intent.primary,
            secondary,
            if self.intent.negation_detected { "yes" } else { "no" },
            self.anchor.quality.label(),
            self.latency_us
        )
    }

    /// Serialize to JSON for shipping to collaborators
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::anchor::AnchorQuality;

    #[test]
    fn test_reply_packet_creation() {
        let packet = ReplyPacket::new("test reply".to_string());

        assert_eq!(packet.reply, "test reply");
        assert!(packet.is_unknown());
        assert!(!packet.is_hard_stop());
        assert_eq!(packet.anchor.quality, AnchorQuality::Fallback);
    }

    #[test]
    fn test_summary() {
        let mut packet = ReplyPacket::new("test".to_string());
        packet.intent.primary = Stage::Pricing;
        packet.intent.secondary = vec![Stage::Identity];
        let summary = packet.summary();

        assert!(summary.contains("Stage: PRICING [IDENTITY]"));
        assert!(summary.contains("Negated: no"));
        assert!(summary.contains("Anchor: fallback"));
    }

    #[test]
    fn test_json_uses_wire_names() {
        let mut packet = ReplyPacket::new("Who pays you?".to_string());
        packet.intent.primary = Stage::Pricing;
        let json = packet.to_json().unwrap();

        assert!(json.contains("\"primary\":\"PRICING\""));
        assert!(json.contains("\"quality\":\"fallback\""));

        let back: ReplyPacket = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, packet.id);
        assert_eq!(back.intent, packet.intent);
    }
}
