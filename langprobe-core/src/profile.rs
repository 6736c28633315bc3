//! Per-language n-gram frequency profiles.
//!
//! A profile is either trained from sample text with [`LanguageProfile::update`]
//! or read from its JSON record:
//!
//! ```json
//! { "name": "en", "freq": { "a": 3, " a": 2, "ab": 1 }, "n_words": [3, 3, 0] }
//! ```
//!
//! `n_words[L - 1]` is the total count of grams of length `L`, the
//! denominator used when a profile is folded into the probability table.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use langprobe_types::{Gram, LangProbeError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::analyzer::ngram::extract_ngrams;
use crate::analyzer::normalizer::TextNormalizer;

const MINIMUM_FREQ: u64 = 2;
const LESS_FREQ_RATIO: u64 = 100_000;

#[derive(Serialize, Deserialize)]
struct ProfileRecord {
    name: String,
    freq: BTreeMap<String, u64>,
    n_words: Vec<u64>,
}

/// N-gram frequency table for one language.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageProfile {
    name: String,
    freq: FxHashMap<Gram, u64>,
    n_words: [u64; Gram::MAX_LEN],
}

impl LanguageProfile {
    /// Creates an empty profile for training.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Language name. Empty for an unnamed profile.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Count recorded for `gram`, zero if absent.
    pub fn freq(&self, gram: Gram) -> u64 {
        self.freq.get(&gram).copied().unwrap_or(0)
    }

    /// Count recorded for a gram given as text, zero if absent or not a gram.
    pub fn freq_of(&self, gram: &str) -> u64 {
        Gram::parse(gram).map_or(0, |g| self.freq(g))
    }

    /// Total count of grams with `len` characters.
    pub fn total_of_len(&self, len: usize) -> u64 {
        match len {
            1..=Gram::MAX_LEN => self.n_words[len - 1],
            _ => 0,
        }
    }

    /// Per-length totals, unigrams first.
    pub fn n_words(&self) -> [u64; Gram::MAX_LEN] {
        self.n_words
    }

    /// Iterates over every gram and its count.
    pub fn grams(&self) -> impl Iterator<Item = (Gram, u64)> + '_ {
        self.freq.iter().map(|(&g, &c)| (g, c))
    }

    /// Number of distinct grams.
    pub fn len(&self) -> usize {
        self.freq.len()
    }

    /// Returns `true` if the profile holds no grams.
    pub fn is_empty(&self) -> bool {
        self.freq.is_empty()
    }

    /// Counts one occurrence of `gram`.
    ///
    /// Ignored when the profile has no name.
    pub fn add(&mut self, gram: Gram) {
        if self.name.is_empty() {
            return;
        }
        let len = gram.len();
        if !(1..=Gram::MAX_LEN).contains(&len) {
            return;
        }
        self.n_words[len - 1] += 1;
        *self.freq.entry(gram).or_insert(0) += 1;
    }

    /// Counts one occurrence of a gram given as text. Strings that are not
    /// 1 to 3 characters long are ignored.
    pub fn add_str(&mut self, gram: &str) {
        if let Some(gram) = Gram::parse(gram) {
            self.add(gram);
        }
    }

    /// Adds every 1..=3 gram of `text` to the profile.
    pub fn update(&mut self, normalizer: &TextNormalizer, text: &str) {
        let text = normalizer.normalize(text);
        extract_ngrams(normalizer.folding(), &text, |gram| self.add(gram));
    }

    /// Prunes rare grams and, for profiles that are not mostly Latin, every
    /// gram containing an ASCII letter.
    ///
    /// Run once after training.
    pub fn omit_less_freq(&mut self) {
        if self.name.is_empty() {
            return;
        }
        let threshold = (self.n_words[0] / LESS_FREQ_RATIO).max(MINIMUM_FREQ);

        let n_words = &mut self.n_words;
        let mut roman = 0u64;
        self.freq.retain(|gram, &mut count| {
            if count <= threshold {
                n_words[gram.len() - 1] = n_words[gram.len() - 1].saturating_sub(count);
                return false;
            }
            if gram.len() == 1 && gram.contains_ascii_letter() {
                roman += count;
            }
            true
        });

        if roman < n_words[0] / 3 {
            let before = self.freq.len();
            self.freq.retain(|gram, &mut count| {
                if gram.contains_ascii_letter() {
                    n_words[gram.len() - 1] = n_words[gram.len() - 1].saturating_sub(count);
                    return false;
                }
                true
            });
            log::debug!(
                "profile '{}': dropped {} latin grams",
                self.name,
                before - self.freq.len()
            );
        }
    }

    /// Parses a profile record from JSON text.
    ///
    /// `source_name` labels errors.
    pub fn from_json_str(source_name: &str, json: &str) -> Result<Self> {
        Self::from_json_slice(source_name, json.as_bytes())
    }

    /// Parses a profile record from raw JSON bytes. Invalid UTF-8 is a
    /// format error.
    pub fn from_json_slice(source_name: &str, json: &[u8]) -> Result<Self> {
        let record: ProfileRecord =
            serde_json::from_slice(json).map_err(|e| format_error(source_name, e.to_string()))?;
        Self::from_record(source_name, record)
    }

    /// Reads a profile record from `reader`.
    ///
    /// I/O failures map to [`LangProbeError::ProfileLoad`], malformed
    /// content to [`LangProbeError::ProfileFormat`].
    pub fn from_reader<R: Read>(source_name: &str, mut reader: R) -> Result<Self> {
        let mut json = Vec::new();
        reader
            .read_to_end(&mut json)
            .map_err(|source| LangProbeError::ProfileLoad {
                source_name: source_name.to_string(),
                source,
            })?;
        Self::from_json_slice(source_name, &json)
    }

    /// Writes the profile as a JSON record, grams sorted.
    pub fn to_writer<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        let record = ProfileRecord {
            name: self.name.clone(),
            freq: self
                .freq
                .iter()
                .map(|(g, &c)| (g.to_string(), c))
                .collect(),
            n_words: self.n_words.to_vec(),
        };
        serde_json::to_writer(writer, &record)
    }

    fn from_record(source_name: &str, record: ProfileRecord) -> Result<Self> {
        if record.name.is_empty() {
            return Err(format_error(source_name, "missing language name".into()));
        }
        let n_words: [u64; Gram::MAX_LEN] = record.n_words.as_slice().try_into().map_err(|_| {
            format_error(
                source_name,
                format!("n_words must have {} entries, got {}", Gram::MAX_LEN, record.n_words.len()),
            )
        })?;

        let mut freq = FxHashMap::with_capacity_and_hasher(record.freq.len(), Default::default());
        for (key, count) in record.freq {
            let gram = Gram::parse(&key)
                .ok_or_else(|| format_error(source_name, format!("invalid gram {key:?}")))?;
            if n_words[gram.len() - 1] == 0 {
                return Err(format_error(
                    source_name,
                    format!("gram {key:?} has no length-{} total", gram.len()),
                ));
            }
            freq.insert(gram, count);
        }

        Ok(Self {
            name: record.name,
            freq,
            n_words,
        })
    }
}

fn format_error(source_name: &str, reason: String) -> LangProbeError {
    LangProbeError::ProfileFormat {
        source_name: source_name.to_string(),
        reason,
    }
}
