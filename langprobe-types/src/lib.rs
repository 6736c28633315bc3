//! Core types shared across the langprobe crates.
//!
//! Keeping these in a separate crate lets the engine, the CLI and any
//! embedding integration agree on the same result records, configuration
//! and error taxonomy without depending on the engine itself.

#![warn(missing_docs)]

use core::fmt;

use serde::{Deserialize, Serialize};

/// Language identifier returned when no candidate is probable enough.
pub const UNKNOWN_LANG: &str = "unknown";

/// A character n-gram of 1 to 3 characters, packed into a `u64`.
///
/// Each character occupies a 21-bit slot holding `char as u32 + 1`, with the
/// first character in the most significant occupied slot. A zero slot is
/// empty, so grams of different lengths never collide:
///
/// ```text
/// len 1: [ 0 ][ 0 ][c0]
/// len 2: [ 0 ][c0][c1]
/// len 3: [c0][c1][c2]
/// ```
///
/// The packed form is `Copy`, hashes without allocation and works as a
/// table key directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Gram(u64);

impl Gram {
    /// Longest gram length in characters.
    pub const MAX_LEN: usize = 3;

    const SLOT_BITS: u32 = 21;
    const SLOT_MASK: u64 = (1 << Self::SLOT_BITS) - 1;

    /// Packs 1 to 3 characters. Returns `None` for any other length.
    #[inline]
    pub fn from_chars(chars: &[char]) -> Option<Self> {
        if chars.is_empty() || chars.len() > Self::MAX_LEN {
            return None;
        }
        let packed = chars
            .iter()
            .fold(0u64, |acc, &c| (acc << Self::SLOT_BITS) | (c as u64 + 1));
        Some(Self(packed))
    }

    /// Parses a string of 1 to 3 characters into a gram.
    pub fn parse(s: &str) -> Option<Self> {
        let mut buf = ['\0'; Self::MAX_LEN];
        let mut len = 0;
        for c in s.chars() {
            if len == Self::MAX_LEN {
                return None;
            }
            buf[len] = c;
            len += 1;
        }
        Self::from_chars(&buf[..len])
    }

    /// Number of characters in the gram (1..=3).
    #[inline]
    pub const fn len(self) -> usize {
        if self.0 >> (2 * Self::SLOT_BITS) != 0 {
            3
        } else if self.0 >> Self::SLOT_BITS != 0 {
            2
        } else if self.0 != 0 {
            1
        } else {
            0
        }
    }

    /// Always `false` for grams built through the constructors.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the characters from first to last.
    pub fn chars(self) -> impl Iterator<Item = char> {
        let len = self.len();
        (0..len).rev().filter_map(move |slot| {
            let raw = (self.0 >> (slot as u32 * Self::SLOT_BITS)) & Self::SLOT_MASK;
            char::from_u32(raw as u32 - 1)
        })
    }

    /// Returns `true` if any character is an ASCII letter.
    #[inline]
    pub fn contains_ascii_letter(self) -> bool {
        self.chars().any(|c| c.is_ascii_alphabetic())
    }
}

impl fmt::Display for Gram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.chars() {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// One ranked detection candidate.
///
/// Lists of scores are ordered by probability, highest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageScore {
    /// Language identifier, as named by its profile.
    pub lang: String,
    /// Estimated probability in `(0.1, 1.0]`.
    pub prob: f64,
}

impl LanguageScore {
    /// Creates a new score.
    pub fn new(lang: impl Into<String>, prob: f64) -> Self {
        Self {
            lang: lang.into(),
            prob,
        }
    }
}

impl fmt::Display for LanguageScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:.5}", self.lang, self.prob)
    }
}

/// Detector configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Additive smoothing constant. Default: 0.5 (expected likelihood estimate).
    pub alpha: f64,
    /// Maximum number of characters buffered for detection. Default: 10000.
    pub max_text_length: usize,
    /// Number of independent randomized trials averaged. Default: 7.
    ///
    /// Zero is treated as one; every classification runs at least one trial.
    pub trial_count: usize,
    /// Seed for reproducible trials. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            max_text_length: 10_000,
            trial_count: 7,
            seed: None,
        }
    }
}

impl DetectorConfig {
    /// Default configuration with a fixed seed, for reproducible output.
    pub const fn seeded(seed: u64) -> Self {
        Self {
            alpha: 0.5,
            max_text_length: 10_000,
            trial_count: 7,
            seed: Some(seed),
        }
    }

    /// Configuration tuned for short field values such as titles.
    pub const fn short_text() -> Self {
        Self {
            alpha: 0.5,
            max_text_length: 1_000,
            trial_count: 7,
            seed: None,
        }
    }
}

/// Errors raised while loading profiles or detecting languages.
#[derive(Debug, thiserror::Error)]
pub enum LangProbeError {
    /// A profile source could not be read.
    #[error("can't open profile '{source_name}'")]
    ProfileLoad {
        /// File name or label of the failing source.
        source_name: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A profile source was read but its content is malformed.
    #[error("profile format error in '{source_name}': {reason}")]
    ProfileFormat {
        /// File name or label of the failing source.
        source_name: String,
        /// What was wrong with the content.
        reason: String,
    },
    /// Two profiles share the same language name.
    #[error("duplicate language profile '{name}'")]
    DuplicateLanguage {
        /// The repeated name.
        name: String,
    },
    /// A detector was requested from a store without profiles.
    #[error("no language profiles loaded")]
    NoProfilesLoaded,
    /// Prior weights were negative, not a number, or all zero.
    #[error("invalid prior: {reason}")]
    InvalidPrior {
        /// Which constraint was violated.
        reason: &'static str,
    },
    /// The text contains no n-gram known to any profile.
    #[error("no features in text")]
    NoFeatures,
    /// Reading detection text from a reader failed.
    #[error("failed to read text")]
    TextRead(#[source] std::io::Error),
}

/// Result alias using [`LangProbeError`].
pub type Result<T, E = LangProbeError> = core::result::Result<T, E>;
