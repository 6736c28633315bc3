//! Public API for configuring the store and creating detectors.

use std::sync::Arc;

use langprobe_types::{DetectorConfig, LangProbeError, Result, UNKNOWN_LANG};

use crate::analyzer::normalizer::{ScriptFolding, TextNormalizer};
use crate::detector::Detector;
use crate::store::types::{ProbabilityTable, ProfileStore};

impl ProfileStore {
    /// Creates a detector bound to the shared table.
    ///
    /// # Errors
    ///
    /// Returns `LangProbeError::NoProfilesLoaded` if the store is empty.
    pub fn new_detector(&self) -> Result<Detector> {
        if self.is_empty() {
            return Err(LangProbeError::NoProfilesLoaded);
        }
        Ok(Detector::new(
            Arc::clone(&self.table),
            Arc::clone(&self.normalizer),
            Arc::clone(&self.cleaner),
            self.config,
        ))
    }

    /// Fixes the seed of every detector created from now on.
    pub fn set_seed(&mut self, seed: u64) {
        self.config.seed = Some(seed);
    }

    /// Seed handed to new detectors, if any.
    pub fn seed(&self) -> Option<u64> {
        self.config.seed
    }

    /// Replaces the configuration handed to new detectors.
    #[must_use]
    pub fn with_config(mut self, config: DetectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Configuration handed to new detectors.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Replaces the character folding table used by new detectors.
    #[must_use]
    pub fn with_folding(mut self, folding: ScriptFolding) -> Self {
        self.normalizer = Arc::new(TextNormalizer::new(folding));
        self
    }

    /// Normalizer shared with detectors, also usable for training.
    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Languages in load order. Slot `i` of every table row belongs to
    /// `languages()[i]`.
    pub fn languages(&self) -> &[String] {
        self.table.languages()
    }

    /// The shared probability table.
    pub fn table(&self) -> &ProbabilityTable {
        &self.table
    }

    /// Detects the language of `text` with a fresh detector.
    ///
    /// Text without usable features yields [`UNKNOWN_LANG`] instead of an
    /// error, which is what a per-field caller wants.
    ///
    /// # Errors
    ///
    /// Returns `LangProbeError::NoProfilesLoaded` if the store is empty.
    pub fn detect(&self, text: &str) -> Result<String> {
        let mut detector = self.new_detector()?;
        detector.append(text);
        match detector.detect() {
            Err(LangProbeError::NoFeatures) => Ok(UNKNOWN_LANG.to_string()),
            other => other,
        }
    }
}
