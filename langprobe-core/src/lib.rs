//! Character n-gram language identification.
//!
//! Profiles of 1 to 3 character grams are loaded into a [`ProfileStore`],
//! which compiles them into one shared probability table. Each request
//! gets its own [`Detector`] from the store:
//!
//! ```no_run
//! use langprobe_core::ProfileStore;
//!
//! let store = ProfileStore::load_dir("profiles")?;
//! let mut detector = store.new_detector()?;
//! detector.append("Das ist ein kleiner Test.");
//! println!("{}", detector.detect()?);
//! # Ok::<(), langprobe_core::LangProbeError>(())
//! ```

pub mod analyzer;
pub mod detector;
pub mod profile;
pub mod store;

pub use detector::{Detector, RandomSource, StdRandom};
pub use profile::LanguageProfile;
pub use store::{ProbabilityTable, ProfileStore, StoreStats};

pub use langprobe_types::{
    DetectorConfig, Gram, LangProbeError, LanguageScore, Result, UNKNOWN_LANG,
};
