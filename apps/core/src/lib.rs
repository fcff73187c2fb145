//! Deterministic reply stage classification and outbound anchor extraction.
//!
//! Two independent pipelines, both pure and total:
//! - reply text to [`MultiIntent`] via [`classify_multi_intent`]
//! - outbound text to [`AnchorPack`] via [`build_anchor_pack`]
//!
//! [`ReplyAnalyzer`] runs both for one reply and returns a [`ReplyPacket`].

pub mod brain;
pub mod config;
pub mod error;
pub mod telemetry;

#[cfg(test)]
mod tests;

pub use brain::{
    build_anchor_pack, classify_multi_intent, extract_outbound_frame, has_contradiction,
    has_forbidden_pattern, has_negated_intent, is_pricing, strip_quoted_text, tokenize,
    AnchorExtractor, AnchorPack, AnchorQuality, MultiIntent, OutboundFrame, ReplyAnalyzer,
    ReplyPacket, Stage, StageClassifier,
};
pub use config::EngineConfig;
pub use error::{AppError, AppResult};
pub use telemetry::{init_tracing, TelemetryRecord, ENGINE_VERSION};
