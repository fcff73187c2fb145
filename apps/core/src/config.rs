//! Engine configuration.
//!
//! Every tunable defaults to the value the rule tables were authored against.
//! Overrides come from `REPLYSTAGE_*` environment variables (optionally via a
//! `.env` file) and are range-checked before use.

use serde::{Deserialize, Serialize};
use std::env;
use tracing::debug;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Tokens scanned backwards from an intent token when looking for a negator.
pub const DEFAULT_NEGATION_WINDOW: usize = 8;
/// Raw characters scanned before the first occurrence of an intent token.
pub const DEFAULT_RAW_LOOKBACK_CHARS: usize = 50;
/// Tokens on either side of an interest word checked by the contradiction guard.
pub const DEFAULT_CONTRADICTION_WINDOW: usize = 12;
/// Minimum cue score for a mined clause to be used.
pub const DEFAULT_MIN_CLAUSE_SCORE: usize = 2;
/// Outbound messages shorter than this produce the fallback anchor.
pub const DEFAULT_MIN_OUTBOUND_CHARS: usize = 20;
pub const DEFAULT_LABEL_MAX_WORDS: usize = 10;
pub const DEFAULT_SUMMARY_MAX_WORDS: usize = 18;
pub const DEFAULT_PHRASE_MIN_CHARS: usize = 5;
pub const DEFAULT_PHRASE_MAX_CHARS: usize = 60;

/// Tunables shared by the stage classifier and the anchor extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct EngineConfig {
    #[validate(range(min = 1, max = 32))]
    pub negation_window: usize,
    #[validate(range(min = 1, max = 500))]
    pub raw_lookback_chars: usize,
    #[validate(range(min = 1, max = 64))]
    pub contradiction_window: usize,
    #[validate(range(min = 1, max = 20))]
    pub min_clause_score: usize,
    #[validate(range(min = 1, max = 1000))]
    pub min_outbound_chars: usize,
    #[validate(range(min = 1, max = 40))]
    pub label_max_words: usize,
    #[validate(range(min = 4, max = 60))]
    pub summary_max_words: usize,
    #[validate(range(min = 1, max = 60))]
    pub phrase_min_chars: usize,
    #[validate(range(min = 10, max = 200))]
    pub phrase_max_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            negation_window: DEFAULT_NEGATION_WINDOW,
            raw_lookback_chars: DEFAULT_RAW_LOOKBACK_CHARS,
            contradiction_window: DEFAULT_CONTRADICTION_WINDOW,
            min_clause_score: DEFAULT_MIN_CLAUSE_SCORE,
            min_outbound_chars: DEFAULT_MIN_OUTBOUND_CHARS,
            label_max_words: DEFAULT_LABEL_MAX_WORDS,
            summary_max_words: DEFAULT_SUMMARY_MAX_WORDS,
            phrase_min_chars: DEFAULT_PHRASE_MIN_CHARS,
            phrase_max_chars: DEFAULT_PHRASE_MAX_CHARS,
        }
    }
}

impl EngineConfig {
    /// Load the configuration from the environment.
    ///
    /// A `.env` file in the working directory is read first if present.
    /// Unset variables keep their defaults.
    pub fn from_env() -> AppResult<Self> {
        dotenv::dotenv().ok();

        let defaults = Self::default();
        let config = Self {
            negation_window: read_var("REPLYSTAGE_NEGATION_WINDOW", defaults.negation_window)?,
            raw_lookback_chars: read_var(
                "REPLYSTAGE_RAW_LOOKBACK_CHARS",
                defaults.raw_lookback_chars,
            )?,
            contradiction_window: read_var(
                "REPLYSTAGE_CONTRADICTION_WINDOW",
                defaults.contradiction_window,
            )?,
            min_clause_score: read_var("REPLYSTAGE_MIN_CLAUSE_SCORE", defaults.min_clause_score)?,
            min_outbound_chars: read_var(
                "REPLYSTAGE_MIN_OUTBOUND_CHARS",
                defaults.min_outbound_chars,
            )?,
            label_max_words: read_var("REPLYSTAGE_LABEL_MAX_WORDS", defaults.label_max_words)?,
            summary_max_words: read_var(
                "REPLYSTAGE_SUMMARY_MAX_WORDS",
                defaults.summary_max_words,
            )?,
            phrase_min_chars: read_var("REPLYSTAGE_PHRASE_MIN_CHARS", defaults.phrase_min_chars)?,
            phrase_max_chars: read_var("REPLYSTAGE_PHRASE_MAX_CHARS", defaults.phrase_max_chars)?,
        };

        config.check()?;
        debug!(?config, "Engine configuration loaded");
        Ok(config)
    }

    /// Validate field ranges and cross-field constraints.
    pub fn check(&self) -> AppResult<()> {
        self.validate()?;
        if self.phrase_min_chars >= self.phrase_max_chars {
            return Err(AppError::Validation(format!(
                "phrase_min_chars ({}) must be below phrase_max_chars ({})",
                self.phrase_min_chars, self.phrase_max_chars
            )));
        }
        Ok(())
    }
}

fn read_var(name: &str, default: usize) -> AppResult<usize> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|e| AppError::Config(format!("{}: {}", name, e))),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(env::VarError::NotUnicode(_)) => {
            Err(AppError::Config(format!("{} is not valid unicode", name)))
        }
    }
}
