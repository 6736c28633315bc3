use std::error::Error;
use std::io;

use langprobe_types::{DetectorConfig, LangProbeError, LanguageScore};

#[test]
fn partial_config_keeps_defaults() {
    let config: DetectorConfig = serde_json::from_str(r#"{ "max_text_length": 200 }"#).unwrap();
    assert_eq!(config.max_text_length, 200);
    assert_eq!(config.alpha, 0.5);
    assert_eq!(config.trial_count, 7);
    assert_eq!(config.seed, None);
}

#[test]
fn seeded_preset_matches_default_otherwise() {
    let seeded = DetectorConfig::seeded(9);
    assert_eq!(seeded.seed, Some(9));
    assert_eq!(
        DetectorConfig {
            seed: None,
            ..seeded
        },
        DetectorConfig::default()
    );
}

#[test]
fn score_serializes_as_record() {
    let json = serde_json::to_string(&LanguageScore::new("fr", 0.75)).unwrap();
    assert_eq!(json, r#"{"lang":"fr","prob":0.75}"#);
}

#[test]
fn load_error_keeps_io_source() {
    let err = LangProbeError::ProfileLoad {
        source_name: "profiles/de".into(),
        source: io::Error::new(io::ErrorKind::NotFound, "missing"),
    };
    assert_eq!(err.to_string(), "can't open profile 'profiles/de'");
    assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("missing"));
}
