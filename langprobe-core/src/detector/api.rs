//! Public API for feeding text and reading results.

use std::io::{self, Read};

use langprobe_types::{LangProbeError, LanguageScore, Result, UNKNOWN_LANG};

use crate::detector::random::RandomSource;
use crate::detector::types::{Detector, DetectorState};

impl Detector {
    /// Sets the smoothing constant for the next classification.
    pub fn set_alpha(&mut self, alpha: f64) {
        self.config.alpha = alpha;
        self.invalidate();
    }

    /// Caps the buffered text at `max_text_length` characters.
    ///
    /// Text already buffered is kept.
    pub fn set_max_text_length(&mut self, max_text_length: usize) {
        self.config.max_text_length = max_text_length;
    }

    /// Sets the initial language distribution for every trial.
    ///
    /// Weights for languages that are not loaded are ignored; loaded
    /// languages without a weight get zero. The weights are normalized to
    /// sum to one.
    ///
    /// # Errors
    ///
    /// Returns `LangProbeError::InvalidPrior` if a weight is negative or not
    /// a number, or if the weights of loaded languages sum to zero.
    pub fn set_prior<I, S>(&mut self, weights: I) -> Result<()>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let languages = self.table.languages();
        let mut prior = vec![0.0; languages.len()];
        for (lang, weight) in weights {
            if weight.is_nan() || weight < 0.0 {
                return Err(LangProbeError::InvalidPrior {
                    reason: "prior probability must be non-negative",
                });
            }
            if let Some(index) = languages.iter().position(|l| l == lang.as_ref()) {
                prior[index] = weight;
            }
        }

        let sum: f64 = prior.iter().sum();
        if !(sum > 0.0) || !sum.is_finite() {
            return Err(LangProbeError::InvalidPrior {
                reason: "at least one prior probability must be non-zero",
            });
        }
        for p in &mut prior {
            *p /= sum;
        }

        self.prior = Some(prior);
        self.invalidate();
        Ok(())
    }

    /// Normalized prior, in language order, if one is set.
    pub fn prior(&self) -> Option<&[f64]> {
        self.prior.as_deref()
    }

    /// Replaces the source of randomness used by the trials.
    pub fn set_random_source(&mut self, random: impl RandomSource + 'static) {
        self.random = Box::new(random);
        self.invalidate();
    }

    /// Appends text to the detection buffer.
    ///
    /// URLs and e-mail addresses are replaced by a space, Vietnamese tone
    /// marks are composed and runs of spaces collapse to one. Text past
    /// the configured maximum length is dropped.
    pub fn append(&mut self, text: &str) {
        self.invalidate();

        let masked = self.cleaner.mask(text);
        let normalized = self.normalizer.normalize(&masked);

        let max = self.config.max_text_length;
        let mut prev = self.text.chars().next_back();
        for c in normalized.chars() {
            if self.text_chars >= max {
                break;
            }
            if c != ' ' || prev != Some(' ') {
                self.text.push(c);
                self.text_chars += 1;
            }
            prev = Some(c);
        }
    }

    /// Reads UTF-8 text from `reader` and appends it, until the buffer is
    /// full or the reader is exhausted.
    ///
    /// # Errors
    ///
    /// Returns `LangProbeError::TextRead` on I/O failure or invalid UTF-8.
    pub fn append_reader<R: Read>(&mut self, mut reader: R) -> Result<()> {
        let mut buf = vec![0u8; (self.config.max_text_length / 2).max(64)];
        let mut pending: Vec<u8> = Vec::new();

        while self.text_chars < self.config.max_text_length {
            let read = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(LangProbeError::TextRead(e)),
            };
            pending.extend_from_slice(&buf[..read]);

            // A chunk may end inside a multi-byte character; carry the tail.
            let valid = match std::str::from_utf8(&pending) {
                Ok(s) => s.len(),
                Err(e) if e.error_len().is_none() => e.valid_up_to(),
                Err(e) => {
                    return Err(LangProbeError::TextRead(io::Error::new(
                        io::ErrorKind::InvalidData,
                        e,
                    )))
                }
            };
            let rest = pending.split_off(valid);
            if let Ok(text) = std::str::from_utf8(&pending) {
                self.append(text);
            }
            pending = rest;
        }

        if !pending.is_empty() && self.text_chars < self.config.max_text_length {
            return Err(LangProbeError::TextRead(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "text ends inside a UTF-8 sequence",
            )));
        }
        Ok(())
    }

    /// Most probable language, or [`UNKNOWN_LANG`] if no candidate clears
    /// the probability threshold.
    ///
    /// # Errors
    ///
    /// Returns `LangProbeError::NoFeatures` if the text holds no known gram.
    pub fn detect(&mut self) -> Result<String> {
        let ranked = self.get_probabilities()?;
        Ok(ranked
            .into_iter()
            .next()
            .map_or_else(|| UNKNOWN_LANG.to_string(), |s| s.lang))
    }

    /// Ranked candidates with probability above 0.1, highest first.
    ///
    /// The first call classifies the buffered text; later calls return the
    /// same ranking until more text is appended.
    ///
    /// # Errors
    ///
    /// Returns `LangProbeError::NoFeatures` if the text holds no known gram.
    pub fn get_probabilities(&mut self) -> Result<Vec<LanguageScore>> {
        if let DetectorState::Classified(ranked) = &self.state {
            return Ok(ranked.clone());
        }
        let ranked = self.classify()?;
        self.state = DetectorState::Classified(ranked.clone());
        Ok(ranked)
    }
}
