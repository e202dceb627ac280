use chrono::Datelike;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

// ── Input layout ───────────────────────────────────────────────────────────────

/// Apache structured log, relative to the raw directory.
pub const APACHE_INPUT: &str = "apache/Apache_access.log_structured.csv";
/// OpenSSH structured log, relative to the raw directory.
pub const SSH_INPUT: &str = "ssh/OpenSSH_2k.log_structured.csv";
/// UNSW-NB15 training split, relative to the raw directory.
pub const UNSW_TRAIN_INPUT: &str = "unsw/UNSW_NB15_training-set.csv";
/// UNSW-NB15 testing split, relative to the raw directory.
pub const UNSW_TEST_INPUT: &str = "unsw/UNSW_NB15_testing-set.csv";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Normalize Apache, SSH and UNSW-NB15 logs into one merged dataset
#[derive(Parser, Debug, Clone)]
#[command(
    name = "logprep",
    about = "Normalize Apache, SSH and UNSW-NB15 logs into one merged dataset",
    version
)]
pub struct Settings {
    /// Directory holding the raw input files
    #[arg(long, env = "LOGPREP_RAW_DIR", default_value = "data/raw_logs")]
    pub raw_dir: PathBuf,

    /// Directory the cleaned and merged CSV files are written to
    #[arg(long, env = "LOGPREP_OUTPUT_DIR", default_value = "data/processed")]
    pub output_dir: PathBuf,

    /// Year assumed for SSH timestamps, which carry none (default: current year)
    #[arg(long, value_parser = clap::value_parser!(i32).range(1970..=9999))]
    pub reference_year: Option<i32>,

    /// Read at most this many data rows from each input
    #[arg(long)]
    pub row_limit: Option<usize>,

    /// Write a JSON run summary to this path
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and resolve derived values.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    /// `--debug` overrides the log level.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// The explicit `--reference-year`, or the current local calendar year.
    pub fn effective_reference_year(&self) -> i32 {
        self.reference_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }
}

// ── PipelineConfig ─────────────────────────────────────────────────────────────

/// Everything a single pipeline run needs, with no hidden defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub raw_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Year spliced into SSH timestamps.
    pub reference_year: i32,
    pub row_limit: Option<usize>,
}

impl PipelineConfig {
    pub fn new(
        raw_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        reference_year: i32,
    ) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            output_dir: output_dir.into(),
            reference_year,
            row_limit: None,
        }
    }

    pub fn with_row_limit(mut self, row_limit: Option<usize>) -> Self {
        self.row_limit = row_limit;
        self
    }

    /// Resolve an input path relative to the raw directory.
    pub fn input_path(&self, relative: &str) -> PathBuf {
        self.raw_dir.join(relative)
    }

    /// `<output_dir>/<name>.csv`.
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.csv", name))
    }
}

impl From<&Settings> for PipelineConfig {
    fn from(s: &Settings) -> Self {
        PipelineConfig::new(&s.raw_dir, &s.output_dir, s.effective_reference_year())
            .with_row_limit(s.row_limit)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
