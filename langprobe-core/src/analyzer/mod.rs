//! Text analysis pipeline.
//!
//! This module provides the text processing components:
//! - **Normalizer**: Vietnamese composition, per-character script folding
//!   and URL/e-mail masking
//! - **NGram**: Sliding 1..=3 character window producing classification
//!   features

pub mod ngram;
pub mod normalizer;

pub use ngram::{extract_ngrams, NGramWindow};
pub use normalizer::{ScriptFolding, TextCleaner, TextNormalizer, VietnameseComposer};
