//! # Brain Module
//!
//! Deterministic, non-ML analysis of cold-outreach replies.
//!
//! ## Components
//! - `tokenizer`: Lowercase tokenization and normalization
//! - `negation`: Token-window and raw-prefix negation checks, contradiction guard
//! - `patterns`: Stage regex tables, hard-stop order, compound questions
//! - `classifier`: Multi-intent stage classification cascade
//! - `frame`: Outbound frame extraction (clause mining + phrase extractors)
//! - `anchor`: AnchorPack assembly with grammar repair
//! - `forbidden`: Forbidden pattern validator for composed text
//! - `reply_packet`: Output data structure
//! - `analyzer`: Main orchestrator

pub mod analyzer;
pub mod anchor;
pub mod classifier;
pub mod forbidden;
pub mod frame;
pub mod negation;
pub mod patterns;
pub mod reply_packet;
pub mod stage;
pub mod tokenizer;

// Re-export main types for convenience
pub use analyzer::{strip_quoted_text, ReplyAnalyzer};
pub use anchor::{
    build_anchor_pack, AnchorExtractor, AnchorPack, AnchorQuality, CALL_FIRST_OFFER_SENTENCE,
};
pub use classifier::{classify_multi_intent, StageClassifier};
pub use forbidden::has_forbidden_pattern;
pub use frame::{extract_outbound_frame, FrameEvidence, OfferType, OutboundFrame};
pub use negation::{has_contradiction, has_negated_intent, NegationDetector};
pub use patterns::is_pricing;
pub use reply_packet::ReplyPacket;
pub use stage::{MultiIntent, ParseStageError, Stage};
pub use tokenizer::tokenize;
