//! Profile loading and table construction.
//!
//! Every source is parsed before the table is built. A single failing
//! source aborts the whole load, so a store never holds a partial table.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use langprobe_types::{LangProbeError, Result};
use rustc_hash::FxHashMap;

use crate::profile::LanguageProfile;
use crate::store::types::{ProbabilityTable, ProfileStore};

impl ProbabilityTable {
    /// Folds `profiles` into a table. Profile order becomes language order.
    ///
    /// # Errors
    ///
    /// Returns `LangProbeError::DuplicateLanguage` if two profiles share a name.
    pub fn build(profiles: &[LanguageProfile]) -> Result<Self> {
        let stride = profiles.len();
        let mut languages: Vec<String> = Vec::with_capacity(stride);
        let mut rows = FxHashMap::default();
        let mut probs: Vec<f64> = Vec::new();

        for (index, profile) in profiles.iter().enumerate() {
            let name = profile.name();
            if languages.iter().any(|l| l == name) {
                return Err(LangProbeError::DuplicateLanguage {
                    name: name.to_string(),
                });
            }
            languages.push(name.to_string());

            for (gram, count) in profile.grams() {
                let total = profile.total_of_len(gram.len());
                if total == 0 {
                    continue;
                }
                let row = *rows.entry(gram).or_insert_with(|| {
                    let row = probs.len() / stride;
                    probs.resize(probs.len() + stride, 0.0);
                    row as u32
                });
                probs[row as usize * stride + index] = count as f64 / total as f64;
            }
            log::debug!("loaded profile '{}' ({} grams)", name, profile.len());
        }

        Ok(Self {
            languages,
            rows,
            probs,
        })
    }
}

impl ProfileStore {
    /// Builds a store from already parsed or freshly trained profiles.
    ///
    /// # Errors
    ///
    /// Returns `LangProbeError::DuplicateLanguage` if two profiles share a name.
    pub fn from_profiles(profiles: impl IntoIterator<Item = LanguageProfile>) -> Result<Self> {
        let profiles: Vec<LanguageProfile> = profiles.into_iter().collect();
        let table = ProbabilityTable::build(&profiles)?;
        log::info!(
            "profile store ready: {} languages, {} grams",
            table.language_count(),
            table.gram_count()
        );
        Ok(Self::with_table(table))
    }

    /// Loads one profile per `(label, reader)` pair, in iteration order.
    ///
    /// The label names the source in errors.
    pub fn load_readers<I, S, R>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, R)>,
        S: AsRef<str>,
        R: Read,
    {
        let profiles = sources
            .into_iter()
            .map(|(label, reader)| LanguageProfile::from_reader(label.as_ref(), reader))
            .collect::<Result<Vec<_>>>()?;
        Self::from_profiles(profiles)
    }

    /// Loads every profile file in `dir`.
    ///
    /// Hidden entries and anything that is not a file are skipped. Files
    /// are loaded in file-name order, which fixes the language order.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|source| LangProbeError::ProfileLoad {
            source_name: dir.display().to_string(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| LangProbeError::ProfileLoad {
                source_name: dir.display().to_string(),
                source,
            })?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();
            if file_name.starts_with('.') || !path.is_file() {
                continue;
            }
            files.push((file_name, path));
        }
        files.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        let profiles = files
            .iter()
            .map(|(file_name, path)| open_profile(file_name, path))
            .collect::<Result<Vec<_>>>()?;
        Self::from_profiles(profiles)
    }

    /// Loads the profiles named by `langs` from a bundle directory holding
    /// one file per language code, in the order given.
    pub fn load_bundle<S: AsRef<str>>(root: impl AsRef<Path>, langs: &[S]) -> Result<Self> {
        let root = root.as_ref();
        let profiles = langs
            .iter()
            .map(|lang| {
                let lang = lang.as_ref();
                open_profile(&format!("profiles/{lang}"), &root.join(lang))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_profiles(profiles)
    }
}

fn open_profile(source_name: &str, path: &Path) -> Result<LanguageProfile> {
    let file = File::open(path).map_err(|source| LangProbeError::ProfileLoad {
        source_name: source_name.to_string(),
        source,
    })?;
    LanguageProfile::from_reader(source_name, BufReader::new(file))
}
