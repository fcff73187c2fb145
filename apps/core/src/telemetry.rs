//! Telemetry Module
//!
//! Tracing subscriber setup and the per-reply telemetry record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::brain::anchor::AnchorQuality;
use crate::brain::forbidden::has_forbidden_pattern;
use crate::brain::reply_packet::ReplyPacket;
use crate::brain::stage::Stage;
use crate::error::AppResult;

/// Engine version stamped on every telemetry record
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the global tracing subscriber.
///
/// Filter comes from `RUST_LOG`, defaulting to `info`. Returns `false` when a
/// subscriber was already installed.
pub fn init_tracing(json: bool) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = Registry::default().with(filter);

    let result = if json {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .try_init()
    } else {
        registry.with(fmt::layer().pretty().with_target(false)).try_init()
    };
    result.is_ok()
}

/// One telemetry row per analyzed reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub version: String,
    pub stage_primary: Stage,
    pub stage_secondary: Vec<Stage>,
    pub negation_detected: bool,
    pub anchor_quality: AnchorQuality,
    /// Signals recorded when the classifier fell through to UNKNOWN
    pub unknown_triggers: Vec<String>,
    /// Forbidden rule hit by the composed reply, if any
    pub forbid_triggered: Option<String>,
    pub latency_ms: f64,
    pub timestamp: DateTime<Utc>,
}

impl TelemetryRecord {
    /// Build a record from a packet and the reply text composed from it.
    pub fn from_packet(packet: &ReplyPacket, composed_reply: Option<&str>) -> Self {
        let unknown_triggers = if packet.intent.primary == Stage::Unknown {
            packet.intent.signals.clone()
        } else {
            Vec::new()
        };

        Self {
            version: ENGINE_VERSION.to_string(),
            stage_primary: packet.intent.primary,
            stage_secondary: packet.intent.secondary.clone(),
            negation_detected: packet.intent.negation_detected,
            anchor_quality: packet.anchor.quality,
            unknown_triggers,
            forbid_triggered: composed_reply
                .and_then(has_forbidden_pattern)
                .map(str::to_string),
            latency_ms: packet.latency_us as f64 / 1000.0,
            timestamp: packet.timestamp,
        }
    }

    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
