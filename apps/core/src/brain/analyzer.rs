//! Reply Analyzer - Main orchestrator for the brain module.
//!
//! Runs both pipelines for one reply: stage classification of the reply body
//! and anchor extraction from the outbound message it answers.

use chrono::Utc;
use std::time::Instant;
use tracing::info;

use super::anchor::AnchorExtractor;
use super::classifier::StageClassifier;
use super::reply_packet::ReplyPacket;
use crate::config::EngineConfig;

/// Strip quoted history from an email reply body.
///
/// Drops lines starting with `>` and everything from an `On ... wrote:`
/// attribution or an `--- Original Message ---` separator onwards.
pub fn strip_quoted_text(body: &str) -> String {
    let mut kept = Vec::new();

    for line in body.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with('>') {
            continue;
        }
        if trimmed.starts_with("On ") && trimmed.ends_with("wrote:") {
            break;
        }
        if trimmed.starts_with("---") && trimmed.contains("Original Message") {
            break;
        }

        kept.push(line);
    }

    while kept.last().is_some_and(|l| l.trim().is_empty()) {
        kept.pop();
    }

    kept.join("\n")
}

/// Main analyzer that orchestrates classification and anchor extraction
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplyAnalyzer {
    classifier: StageClassifier,
    anchors: AnchorExtractor,
}

impl ReplyAnalyzer {
    /// Create a new analyzer with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer using the tunables from `config`
    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            classifier: StageClassifier::with_config(config),
            anchors: AnchorExtractor::with_config(config),
        }
    }

    /// Analyze a reply and the outbound message it answers
    pub fn analyze(&self, reply: &str, outbound: Option<&str>) -> ReplyPacket {
        let start = Instant::now();

        let mut packet = ReplyPacket::new(strip_quoted_text(reply));

        // 1. Classify the reply body
        packet.intent = self.classifier.classify(&packet.reply);

        // 2. Anchor on the outbound message
        packet.anchor = self.anchors.build(outbound);

        // 3. Set timing
        packet.latency_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        packet.timestamp = Utc::now();

        info!(
            id = %packet.id,
            stage = %packet.intent.primary,
            secondary = packet.intent.secondary.len(),
            negation = packet.intent.negation_detected,
            anchor = packet.anchor.quality.label(),
            latency_us = packet.latency_us,
            "Reply analyzed"
        );

        packet
    }
}
