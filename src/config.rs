use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::matching::fuzzy::Bands;

/// Default strong band, `(lower, upper]`.
pub const DEFAULT_STRONG_BAND: (f64, f64) = (87.5, 100.0);
/// Default weak band, `(lower, upper]`.
pub const DEFAULT_WEAK_BAND: (f64, f64) = (80.0, 87.5);

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. CLI flags
/// override anything set here.
pub struct Config {
    /// Strong fuzzy band (MENTION_TAGGER_STRONG_BAND, e.g. "87.5,100")
    pub strong_band: (f64, f64),
    /// Weak fuzzy band (MENTION_TAGGER_WEAK_BAND, e.g. "80,87.5")
    pub weak_band: (f64, f64),
    /// Directory of segmented text files, one per work
    pub text_path: PathBuf,
    /// Where the JSON run report is written
    pub report_path: PathBuf,
    /// How many documents to match in parallel
    pub concurrency: usize,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn load() -> Result<Self> {
        let strong_band = match env::var("MENTION_TAGGER_STRONG_BAND") {
            Ok(raw) => parse_band(&raw).context("Invalid MENTION_TAGGER_STRONG_BAND")?,
            Err(_) => DEFAULT_STRONG_BAND,
        };
        let weak_band = match env::var("MENTION_TAGGER_WEAK_BAND") {
            Ok(raw) => parse_band(&raw).context("Invalid MENTION_TAGGER_WEAK_BAND")?,
            Err(_) => DEFAULT_WEAK_BAND,
        };
        let concurrency = match env::var("MENTION_TAGGER_CONCURRENCY") {
            Ok(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid MENTION_TAGGER_CONCURRENCY: {raw}"))?,
            Err(_) => 8,
        };

        Ok(Self {
            strong_band,
            weak_band,
            text_path: env::var("MENTION_TAGGER_TEXT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./text")),
            report_path: env::var("MENTION_TAGGER_REPORT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./output/tagging_metadata.json")),
            concurrency,
        })
    }

    /// Validate the configured bands.
    pub fn bands(&self) -> Result<Bands> {
        Ok(Bands::new(self.strong_band, self.weak_band)?)
    }

    /// Check that the text directory exists before starting a run.
    pub fn require_text_path(&self) -> Result<()> {
        if !self.text_path.is_dir() {
            anyhow::bail!(
                "Text directory not found: {}\n\
                 Pass --text-path or set MENTION_TAGGER_TEXT_PATH in your .env file.",
                self.text_path.display()
            );
        }
        Ok(())
    }

    /// Concurrency must allow at least one document in flight.
    pub fn require_concurrency(&self) -> Result<()> {
        if self.concurrency == 0 {
            anyhow::bail!("Concurrency must be at least 1");
        }
        Ok(())
    }
}

/// Parse a band written as "lower,upper".
pub fn parse_band(raw: &str) -> Result<(f64, f64)> {
    let (lower, upper) = raw
        .split_once(',')
        .with_context(|| format!("expected \"lower,upper\", got \"{raw}\""))?;
    let lower: f64 = lower
        .trim()
        .parse()
        .with_context(|| format!("lower bound is not a number: \"{}\"", lower.trim()))?;
    let upper: f64 = upper
        .trim()
        .parse()
        .with_context(|| format!("upper bound is not a number: \"{}\"", upper.trim()))?;
    Ok((lower, upper))
}
