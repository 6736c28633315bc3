//! Command line front end for the language detector.
//!
//! ```bash
//! # Detect the language of a file, or of stdin when no file is given
//! langprobe detect --profiles profiles/ article.txt
//! echo "Das ist ein Test" | langprobe detect --profiles profiles/ --all
//!
//! # Show what a profile directory contains
//! langprobe languages --profiles profiles/
//!
//! # Train a profile from plain text, one sample per line
//! langprobe train --name de --output profiles/de corpus/de/*.txt
//! ```
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` to see each
//! profile as it loads or `RUST_LOG=trace` for per-trial results.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;

use langprobe_core::analyzer::{ScriptFolding, TextNormalizer};
use langprobe_core::{DetectorConfig, LangProbeError, LanguageProfile, ProfileStore, UNKNOWN_LANG};

#[derive(Parser)]
#[command(name = "langprobe")]
#[command(author, version, about = "Character n-gram language detection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Folding table (JSON) replacing the built-in defaults
    #[arg(long, global = true)]
    folding: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the language of a file or of stdin
    Detect {
        /// Directory holding one profile file per language
        #[arg(short, long)]
        profiles: PathBuf,

        /// Detector settings (JSON); missing fields keep their defaults
        #[arg(long)]
        config: Option<PathBuf>,

        /// Tune for short values such as titles (1000 character buffer)
        #[arg(long, conflicts_with = "config")]
        short: bool,

        /// Fix the random seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Print every ranked candidate instead of the best one
        #[arg(long)]
        all: bool,

        /// Input file; stdin when omitted
        file: Option<PathBuf>,
    },

    /// List the languages of a profile directory in load order
    Languages {
        /// Directory holding one profile file per language
        #[arg(short, long)]
        profiles: PathBuf,
    },

    /// Build a profile from corpus text
    Train {
        /// Language code recorded in the profile
        #[arg(short, long)]
        name: String,

        /// Where to write the profile
        #[arg(short, long)]
        output: PathBuf,

        /// Keep rare grams instead of pruning them
        #[arg(long)]
        no_prune: bool,

        /// Corpus files, one sample per line
        #[arg(required = true)]
        corpus: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let folding = match &cli.folding {
        Some(path) => Some(read_folding(path)?),
        None => None,
    };

    match cli.command {
        Commands::Detect {
            profiles,
            config,
            short,
            seed,
            all,
            file,
        } => {
            let mut config = match config {
                Some(path) => read_config(&path)?,
                None if short => DetectorConfig::short_text(),
                None => DetectorConfig::default(),
            };
            if seed.is_some() {
                config.seed = seed;
            }
            let store = open_store(&profiles, folding)?.with_config(config);
            run_detect(&store, file.as_deref(), all)
        }
        Commands::Languages { profiles } => {
            let store = open_store(&profiles, folding)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for lang in store.languages() {
                writeln!(out, "{lang}")?;
            }
            writeln!(out, "# {}", store.stats())?;
            Ok(())
        }
        Commands::Train {
            name,
            output,
            no_prune,
            corpus,
        } => run_train(&name, &output, &corpus, no_prune, folding.unwrap_or_default()),
    }
}

fn read_folding(path: &Path) -> Result<ScriptFolding> {
    let file = File::open(path)
        .with_context(|| format!("failed to open folding table {}", path.display()))?;
    ScriptFolding::from_reader(BufReader::new(file))
        .with_context(|| format!("invalid folding table {}", path.display()))
}

fn read_config(path: &Path) -> Result<DetectorConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn open_store(dir: &Path, folding: Option<ScriptFolding>) -> Result<ProfileStore> {
    let store = ProfileStore::load_dir(dir)
        .with_context(|| format!("failed to load profiles from {}", dir.display()))?;
    if store.is_empty() {
        bail!("no profiles found in {}", dir.display());
    }
    Ok(match folding {
        Some(folding) => store.with_folding(folding),
        None => store,
    })
}

fn run_detect(store: &ProfileStore, file: Option<&Path>, all: bool) -> Result<()> {
    let mut detector = store.new_detector()?;
    match file {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            detector
                .append_reader(BufReader::new(file))
                .with_context(|| format!("failed to read {}", path.display()))?;
        }
        None => detector
            .append_reader(io::stdin().lock())
            .context("failed to read stdin")?,
    }

    let ranked = match detector.get_probabilities() {
        Ok(ranked) => ranked,
        Err(LangProbeError::NoFeatures) => {
            log::info!("input has no usable features");
            Vec::new()
        }
        Err(e) => return Err(e.into()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if ranked.is_empty() {
        writeln!(out, "{UNKNOWN_LANG}")?;
    } else if all {
        for score in &ranked {
            writeln!(out, "{score}")?;
        }
    } else {
        writeln!(out, "{}", ranked[0].lang)?;
    }
    Ok(())
}

fn run_train(
    name: &str,
    output: &Path,
    corpus: &[PathBuf],
    no_prune: bool,
    folding: ScriptFolding,
) -> Result<()> {
    let normalizer = TextNormalizer::new(folding);
    let mut profile = LanguageProfile::new(name);

    for path in corpus {
        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let mut lines = 0usize;
        for line in BufReader::new(file).lines() {
            let line = line.with_context(|| format!("failed to read {}", path.display()))?;
            profile.update(&normalizer, &line);
            lines += 1;
        }
        log::debug!("{}: {lines} lines", path.display());
    }

    if profile.is_empty() {
        bail!("corpus for {name} produced no grams");
    }
    if !no_prune {
        profile.omit_less_freq();
    }
    log::info!("profile {name}: {} grams", profile.len());

    let file = File::create(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    profile
        .to_writer(&mut writer)
        .with_context(|| format!("failed to write {}", output.display()))?;
    writer.flush()?;
    Ok(())
}
