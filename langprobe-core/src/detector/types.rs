//! Detector state and constants.

use std::sync::Arc;

use langprobe_types::{DetectorConfig, LanguageScore};

use crate::analyzer::normalizer::{TextCleaner, TextNormalizer};
use crate::detector::random::{RandomSource, StdRandom};
use crate::store::ProbabilityTable;

/// Standard deviation of the per-trial alpha jitter.
pub const ALPHA_WIDTH: f64 = 0.05;

/// Upper bound on updates per trial.
pub const ITERATION_LIMIT: usize = 1_000;

/// Candidates at or below this probability are dropped from results.
pub const PROB_THRESHOLD: f64 = 0.1;

/// A trial stops once one language exceeds this probability.
pub const CONV_THRESHOLD: f64 = 0.99999;

/// Divides alpha into the additive smoothing term.
pub const BASE_FREQ: f64 = 10_000.0;

/// The vector is renormalized and checked for convergence every this many
/// updates.
pub const CHECK_INTERVAL: usize = 5;

pub(crate) enum DetectorState {
    Accumulating,
    Classified(Vec<LanguageScore>),
}

/// Single-use language detector.
///
/// Obtained from [`ProfileStore::new_detector`]. Text is appended, then the
/// first call to [`Detector::detect`] or [`Detector::get_probabilities`]
/// runs the classification and memoizes the ranking. Appending more text
/// afterwards discards the memoized ranking.
///
/// A detector owns mutable state and must not be shared between callers;
/// create one per request.
///
/// [`ProfileStore::new_detector`]: crate::store::ProfileStore::new_detector
pub struct Detector {
    pub(crate) table: Arc<ProbabilityTable>,
    pub(crate) normalizer: Arc<TextNormalizer>,
    pub(crate) cleaner: Arc<TextCleaner>,
    pub(crate) config: DetectorConfig,
    pub(crate) text: String,
    /// Length of `text` in characters.
    pub(crate) text_chars: usize,
    pub(crate) prior: Option<Vec<f64>>,
    pub(crate) random: Box<dyn RandomSource>,
    pub(crate) state: DetectorState,
}

impl Detector {
    pub(crate) fn new(
        table: Arc<ProbabilityTable>,
        normalizer: Arc<TextNormalizer>,
        cleaner: Arc<TextCleaner>,
        config: DetectorConfig,
    ) -> Self {
        Self {
            table,
            normalizer,
            cleaner,
            config,
            text: String::new(),
            text_chars: 0,
            prior: None,
            random: Box::new(StdRandom::new(config.seed)),
            state: DetectorState::Accumulating,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Text buffered so far, after masking and normalization.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` once a ranking has been computed and memoized.
    pub fn is_classified(&self) -> bool {
        matches!(self.state, DetectorState::Classified(_))
    }

    #[inline]
    pub(crate) fn invalidate(&mut self) {
        self.state = DetectorState::Accumulating;
    }
}
