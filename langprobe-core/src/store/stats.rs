//! Store statistics.

use crate::store::types::ProfileStore;

/// A snapshot of store statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of loaded languages.
    pub num_languages: usize,
    /// Number of distinct grams in the table.
    pub num_grams: usize,
}

impl ProfileStore {
    /// Returns store statistics.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            num_languages: self.table.language_count(),
            num_grams: self.table.gram_count(),
        }
    }
}

impl StoreStats {
    /// Returns approximate table memory usage in bytes.
    pub fn memory_usage_bytes(&self) -> usize {
        let rows = self.num_grams * (std::mem::size_of::<u64>() + std::mem::size_of::<u32>());
        let probs = self.num_grams * self.num_languages * std::mem::size_of::<f64>();
        rows + probs
    }
}

impl core::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} languages, {} grams, ~{} KiB",
            self.num_languages,
            self.num_grams,
            self.memory_usage_bytes() / 1024
        )
    }
}
