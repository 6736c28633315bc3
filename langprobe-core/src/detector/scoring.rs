//! Probability vector updates and ranking.

use langprobe_types::LanguageScore;

use crate::detector::types::PROB_THRESHOLD;

/// Multiplies every language's probability by its smoothed gram likelihood.
#[inline(always)]
pub(crate) fn update_lang_prob(prob: &mut [f64], row: &[f64], weight: f64) {
    debug_assert_eq!(prob.len(), row.len());
    for (p, &likelihood) in prob.iter_mut().zip(row) {
        *p *= weight + likelihood;
    }
}

/// Rescales `prob` to sum to one and returns its largest entry.
///
/// # Panics
///
/// Panics if the entries do not sum to a positive number. The additive
/// smoothing term keeps every entry positive, so this means the table or
/// the configuration is broken.
#[inline]
pub(crate) fn normalize_prob(prob: &mut [f64]) -> f64 {
    let sum: f64 = prob.iter().sum();
    assert!(sum > 0.0, "probability vector collapsed (sum = {sum})");

    let mut max = 0.0;
    for p in prob.iter_mut() {
        *p /= sum;
        if *p > max {
            max = *p;
        }
    }
    max
}

/// Candidates above [`PROB_THRESHOLD`], highest first.
///
/// The sort is stable, so equal scores keep language-list order.
pub(crate) fn rank(prob: &[f64], languages: &[String]) -> Vec<LanguageScore> {
    let mut list: Vec<LanguageScore> = prob
        .iter()
        .zip(languages)
        .filter(|(&p, _)| p > PROB_THRESHOLD)
        .map(|(&p, lang)| LanguageScore::new(lang.as_str(), p))
        .collect();
    list.sort_by(|a, b| b.prob.total_cmp(&a.prob));
    list
}
