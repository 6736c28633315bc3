//! Per-request language detection.
//!
//! A [`Detector`] accumulates text, then classifies it once with a
//! randomized estimate and memoizes the ranking. Randomness is drawn
//! through the [`RandomSource`] trait so that seeded or scripted sources
//! can replace OS entropy.

mod api;
mod classify;
mod random;
mod scoring;
mod types;

pub use random::{RandomSource, StdRandom};
pub use types::{
    Detector, ALPHA_WIDTH, BASE_FREQ, CHECK_INTERVAL, CONV_THRESHOLD, ITERATION_LIMIT,
    PROB_THRESHOLD,
};
