//! Profile storage and the shared probability table.
//!
//! Layout:
//! - Every gram maps to a row index in an `FxHashMap`
//! - Rows are stored in a single contiguous `Vec<f64>`, one slot per
//!   language, so a detector update touches one cache-friendly slice
//!
//! Threading:
//! - [`ProfileStore`] is immutable once built and `Send + Sync`; the table
//!   sits behind an `Arc` shared by every detector the store creates.

mod api;
mod builder;
mod stats;
mod types;

pub use stats::StoreStats;
pub use types::{ProbabilityTable, ProfileStore};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::LanguageProfile;
    use langprobe_types::{Gram, LangProbeError, UNKNOWN_LANG};
    use std::fs;

    fn profile(name: &str, tokens: &str) -> LanguageProfile {
        let mut p = LanguageProfile::new(name);
        for t in tokens.split(' ') {
            p.add_str(t);
        }
        p
    }

    fn three_languages() -> ProfileStore {
        ProfileStore::from_profiles([
            profile("en", "a a a b b c c d e"),
            profile("fr", "a b b c c c d d d"),
            profile("ja", "あ あ あ い う え え"),
        ])
        .expect("distinct names")
    }

    fn write_profile(dir: &std::path::Path, file: &str, p: &LanguageProfile) {
        let f = fs::File::create(dir.join(file)).expect("create profile file");
        p.to_writer(f).expect("write profile");
    }

    #[test]
    fn languages_in_load_order() {
        let store = three_languages();
        assert_eq!(store.languages(), ["en", "fr", "ja"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn every_row_has_one_slot_per_language() {
        let store = three_languages();
        let table = store.table();
        assert_eq!(table.gram_count(), 9);
        for (&gram, _) in &table.rows {
            assert_eq!(table.row(gram).map(<[f64]>::len), Some(3));
        }
    }

    #[test]
    fn relative_frequencies() {
        let store = three_languages();
        let a = store.table().row(Gram::parse("a").expect("gram")).expect("row");
        assert_eq!(a, [3.0 / 9.0, 1.0 / 9.0, 0.0]);
        let e = store.table().row(Gram::parse("え").expect("gram")).expect("row");
        assert_eq!(e, [0.0, 0.0, 2.0 / 7.0]);
        assert!(store.table().row(Gram::parse("z").expect("gram")).is_none());
        assert!(store.table().contains(Gram::parse("え").expect("gram")));
        assert!(!store.table().contains(Gram::parse("z").expect("gram")));
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = ProfileStore::from_profiles([profile("en", "a"), profile("en", "b")])
            .expect_err("duplicate");
        assert!(matches!(err, LangProbeError::DuplicateLanguage { ref name } if name == "en"));
    }

    #[test]
    fn empty_store_has_no_detector() {
        let store = ProfileStore::default();
        assert!(store.is_empty());
        assert!(matches!(
            store.new_detector(),
            Err(LangProbeError::NoProfilesLoaded)
        ));
        assert!(matches!(
            store.detect("hello"),
            Err(LangProbeError::NoProfilesLoaded)
        ));
    }

    #[test]
    fn seed_propagates_to_detectors() {
        let mut store = three_languages();
        assert_eq!(store.seed(), None);
        store.set_seed(42);
        assert_eq!(store.seed(), Some(42));
        let detector = store.new_detector().expect("profiles loaded");
        assert_eq!(detector.config().seed, Some(42));
    }

    #[test]
    fn detect_maps_missing_features_to_unknown() {
        let store = three_languages();
        assert_eq!(store.detect("1234 !!").expect("loaded"), UNKNOWN_LANG);
        assert_eq!(store.detect("a").expect("loaded"), "en");
    }

    #[test]
    fn load_dir_skips_hidden_and_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_profile(dir.path(), "fr", &profile("fr", "a b b"));
        write_profile(dir.path(), "en", &profile("en", "a a b"));
        write_profile(dir.path(), ".hidden", &profile("xx", "a"));
        fs::create_dir(dir.path().join("nested")).expect("mkdir");

        let store = ProfileStore::load_dir(dir.path()).expect("valid dir");
        assert_eq!(store.languages(), ["en", "fr"]);
    }

    #[test]
    fn load_dir_duplicate_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_profile(dir.path(), "en", &profile("en", "a"));
        write_profile(dir.path(), "en-copy", &profile("en", "b"));

        let err = ProfileStore::load_dir(dir.path()).expect_err("duplicate");
        assert!(matches!(err, LangProbeError::DuplicateLanguage { .. }));
    }

    #[test]
    fn load_dir_missing_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = ProfileStore::load_dir(dir.path().join("absent")).expect_err("missing");
        assert!(matches!(err, LangProbeError::ProfileLoad { .. }));
    }

    #[test]
    fn load_dir_aborts_on_malformed_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_profile(dir.path(), "en", &profile("en", "a"));
        fs::write(dir.path().join("zz"), "{ broken").expect("write");

        let err = ProfileStore::load_dir(dir.path()).expect_err("malformed");
        assert!(matches!(err, LangProbeError::ProfileFormat { ref source_name, .. } if source_name == "zz"));
    }

    #[test]
    fn load_bundle_by_code() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_profile(dir.path(), "en", &profile("en", "a"));
        write_profile(dir.path(), "fr", &profile("fr", "b"));

        let store = ProfileStore::load_bundle(dir.path(), &["fr", "en"]).expect("bundle");
        assert_eq!(store.languages(), ["fr", "en"]);

        let err = ProfileStore::load_bundle(dir.path(), &["de"]).expect_err("absent");
        assert!(matches!(err, LangProbeError::ProfileLoad { ref source_name, .. } if source_name == "profiles/de"));
    }

    #[test]
    fn load_readers_in_order() {
        let mut en = Vec::new();
        profile("en", "a").to_writer(&mut en).expect("write");
        let mut ja = Vec::new();
        profile("ja", "あ").to_writer(&mut ja).expect("write");

        let store = ProfileStore::load_readers([("ja", ja.as_slice()), ("en", en.as_slice())])
            .expect("readers");
        assert_eq!(store.languages(), ["ja", "en"]);
    }

    #[test]
    fn stats_display() {
        let stats = three_languages().stats();
        assert_eq!(stats.num_languages, 3);
        assert_eq!(stats.num_grams, 9);
        assert!(stats.to_string().starts_with("3 languages, 9 grams"));
    }
}
