//! Test Module
//!
//! Cross-module test suite for the reply stage engine.
//!
//! ## Test Categories
//! - `classifier_tests`: Cascade order, pricing failsafe, negation, contradiction
//! - `anchor_tests`: AnchorPack extraction and grammar repair over outbound messages
//! - `gold_corpus_tests`: Accuracy threshold on a curated reply set, negation paths
//! - `analyzer_tests`: Full reply workflow and telemetry

mod gold_corpus_tests;
