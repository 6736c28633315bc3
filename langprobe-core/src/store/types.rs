//! Store types and the shared probability table.

use std::sync::Arc;

use langprobe_types::{DetectorConfig, Gram};
use rustc_hash::FxHashMap;

use crate::analyzer::normalizer::{TextCleaner, TextNormalizer};

/// Gram → per-language probability table.
///
/// Rows live in one contiguous row-major buffer with a stride of
/// `languages.len()`; slot `i` of every row belongs to `languages[i]`.
/// Built once by the store and read-only afterwards.
#[derive(Debug, Default)]
pub struct ProbabilityTable {
    pub(crate) languages: Vec<String>,
    pub(crate) rows: FxHashMap<Gram, u32>,
    pub(crate) probs: Vec<f64>,
}

impl ProbabilityTable {
    /// Languages in load order.
    #[inline(always)]
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Number of languages, which is also the length of every row.
    #[inline(always)]
    pub fn language_count(&self) -> usize {
        self.languages.len()
    }

    /// Number of distinct grams.
    #[inline(always)]
    pub fn gram_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if `gram` has a row.
    #[inline]
    pub fn contains(&self, gram: Gram) -> bool {
        self.rows.contains_key(&gram)
    }

    /// Row index of `gram`.
    #[inline]
    pub fn row_index(&self, gram: Gram) -> Option<u32> {
        self.rows.get(&gram).copied()
    }

    /// Per-language probabilities of `gram`.
    #[inline]
    pub fn row(&self, gram: Gram) -> Option<&[f64]> {
        self.row_index(gram).map(|i| self.row_at(i))
    }

    /// Row by index, as returned by [`Self::row_index`].
    #[inline(always)]
    pub fn row_at(&self, index: u32) -> &[f64] {
        let stride = self.language_count();
        let start = index as usize * stride;
        &self.probs[start..start + stride]
    }
}

/// Loaded language profiles and the factory for [`Detector`]s.
///
/// The probability table is shared through an `Arc`, so a store is cheap to
/// clone and safe to use from many threads; each detector it hands out
/// is single-use and owned by one caller.
///
/// [`Detector`]: crate::detector::Detector
#[derive(Debug, Clone)]
pub struct ProfileStore {
    pub(crate) table: Arc<ProbabilityTable>,
    pub(crate) normalizer: Arc<TextNormalizer>,
    pub(crate) cleaner: Arc<TextCleaner>,
    pub(crate) config: DetectorConfig,
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::with_table(ProbabilityTable::default())
    }
}

impl ProfileStore {
    pub(crate) fn with_table(table: ProbabilityTable) -> Self {
        Self {
            table: Arc::new(table),
            normalizer: Arc::new(TextNormalizer::default()),
            cleaner: Arc::new(TextCleaner::new()),
            config: DetectorConfig::default(),
        }
    }

    /// Number of loaded languages.
    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.language_count()
    }

    /// Returns `true` if no profile is loaded.
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.languages.is_empty()
    }
}
