//! Classification algorithm.
//!
//! Each trial starts from the prior (or a uniform vector), then repeatedly
//! draws a random feature and multiplies every language's probability by
//! that gram's smoothed likelihood, renormalizing every few draws until
//! one language dominates or the iteration cap is hit. Trials run with a
//! jittered alpha and are averaged.

use std::borrow::Cow;

use langprobe_types::{LangProbeError, LanguageScore, Result};

use crate::analyzer::ngram::extract_ngrams;
use crate::detector::scoring::{normalize_prob, rank, update_lang_prob};
use crate::detector::types::{
    Detector, ALPHA_WIDTH, BASE_FREQ, CHECK_INTERVAL, CONV_THRESHOLD, ITERATION_LIMIT,
};

/// Removes ASCII letters from text written mostly in another script.
///
/// Letters count as Latin; code points from U+0300 up, outside Latin
/// Extended Additional, count as non-Latin. Latin letters are dropped when
/// they are fewer than half the non-Latin characters.
pub(crate) fn strip_minor_latin(text: &str) -> Cow<'_, str> {
    let mut latin = 0usize;
    let mut non_latin = 0usize;
    for c in text.chars() {
        if c.is_ascii_alphabetic() {
            latin += 1;
        } else if c >= '\u{0300}' && !('\u{1E00}'..='\u{1EFF}').contains(&c) {
            non_latin += 1;
        }
    }

    if latin * 2 < non_latin {
        Cow::Owned(text.chars().filter(|c| !c.is_ascii_alphabetic()).collect())
    } else {
        Cow::Borrowed(text)
    }
}

impl Detector {
    /// Row indices of every known gram in `text`, in order, with repeats.
    pub(crate) fn extract_features(&self, text: &str) -> Vec<u32> {
        let mut features = Vec::new();
        extract_ngrams(self.normalizer.folding(), text, |gram| {
            if let Some(row) = self.table.row_index(gram) {
                features.push(row);
            }
        });
        features
    }

    fn initial_probabilities(&self) -> Vec<f64> {
        match &self.prior {
            Some(prior) => prior.clone(),
            None => {
                let n = self.table.language_count();
                vec![1.0 / n as f64; n]
            }
        }
    }

    /// Runs the full classification over the buffered text.
    pub(crate) fn classify(&mut self) -> Result<Vec<LanguageScore>> {
        let cleaned = strip_minor_latin(&self.text);
        let features = self.extract_features(&cleaned);
        if features.is_empty() {
            return Err(LangProbeError::NoFeatures);
        }

        let trials = self.config.trial_count.max(1);
        let mut langprob = vec![0.0; self.table.language_count()];

        for trial in 0..trials {
            let mut prob = self.initial_probabilities();
            let alpha = self.config.alpha + self.random.next_gaussian() * ALPHA_WIDTH;
            let weight = alpha / BASE_FREQ;

            let mut i = 0usize;
            loop {
                let r = self.random.next_index(features.len());
                update_lang_prob(&mut prob, self.table.row_at(features[r]), weight);
                if i % CHECK_INTERVAL == 0
                    && (normalize_prob(&mut prob) > CONV_THRESHOLD || i >= ITERATION_LIMIT)
                {
                    break;
                }
                i += 1;
            }

            if log::log_enabled!(log::Level::Trace) {
                let ranked = rank(&prob, self.table.languages());
                log::trace!("trial {trial} ({i} updates, alpha {alpha:.4}): {ranked:?}");
            }

            for (acc, p) in langprob.iter_mut().zip(&prob) {
                *acc += p / trials as f64;
            }
        }

        Ok(rank(&langprob, self.table.languages()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin_stripped_from_mostly_japanese() {
        assert_eq!(strip_minor_latin("ああああa"), "ああああ");
    }

    #[test]
    fn latin_kept_when_balanced() {
        assert!(matches!(strip_minor_latin("ああab"), Cow::Borrowed(_)));
        assert!(matches!(strip_minor_latin("hello"), Cow::Borrowed(_)));
    }

    #[test]
    fn vietnamese_letters_count_as_latin() {
        // U+1EA1 and friends are Latin Extended Additional
        assert!(matches!(strip_minor_latin("ạạạạa"), Cow::Borrowed(_)));
    }

    #[test]
    fn only_ascii_letters_are_removed() {
        assert_eq!(strip_minor_latin("ab 12 あいうえおか"), " 12 あいうえおか");
    }
}
