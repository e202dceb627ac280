//! End-to-end cleaning pipeline.
//!
//! Loads the four raw inputs, normalizes and writes each one, then merges
//! Apache, SSH and the UNSW training split into `final_merged.csv`. The UNSW
//! testing split is cleaned but never merged.

use std::path::{Path, PathBuf};

use logprep_core::models::Table;
use logprep_core::settings::{
    PipelineConfig, APACHE_INPUT, SSH_INPUT, UNSW_TEST_INPUT, UNSW_TRAIN_INPUT,
};
use logprep_core::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::merger::SchemaAligner;
use crate::normalizers::{ApacheNormalizer, Normalizer, SshNormalizer, UnswNormalizer};
use crate::reader::{load_table, write_table};

pub const APACHE_OUTPUT: &str = "apache_clean";
pub const SSH_OUTPUT: &str = "ssh_clean";
pub const UNSW_TRAIN_OUTPUT: &str = "unsw_train_clean";
pub const UNSW_TEST_OUTPUT: &str = "unsw_test_clean";
pub const MERGED_OUTPUT: &str = "final_merged";

// ── Public types ──────────────────────────────────────────────────────────────

/// What happened to one output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputReport {
    /// Output name without extension, e.g. `"ssh_clean"`.
    pub name: String,
    /// Rows written, or `None` when the output was skipped.
    pub rows: Option<usize>,
    /// Written file, or `None` when the output was skipped.
    pub path: Option<PathBuf>,
}

impl OutputReport {
    fn written(name: &str, rows: usize, path: PathBuf) -> Self {
        Self {
            name: name.to_string(),
            rows: Some(rows),
            path: Some(path),
        }
    }

    fn skipped(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rows: None,
            path: None,
        }
    }

    pub fn is_written(&self) -> bool {
        self.path.is_some()
    }
}

/// Outcome of one [`run_pipeline`] call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// ISO-8601 timestamp when this summary was generated.
    pub generated_at: String,
    /// Year spliced into SSH timestamps.
    pub reference_year: i32,
    /// One entry per output, in write order, merged output last.
    pub outputs: Vec<OutputReport>,
    /// Wall-clock seconds spent on the whole run.
    pub elapsed_seconds: f64,
}

impl RunSummary {
    pub fn output(&self, name: &str) -> Option<&OutputReport> {
        self.outputs.iter().find(|o| o.name == name)
    }

    pub fn written_count(&self) -> usize {
        self.outputs.iter().filter(|o| o.is_written()).count()
    }

    /// Rows in `final_merged.csv`, or `None` when nothing was merged.
    pub fn merged_rows(&self) -> Option<usize> {
        self.output(MERGED_OUTPUT).and_then(|o| o.rows)
    }

    /// Write the summary as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full cleaning pipeline once.
///
/// 1. Load Apache, SSH, UNSW train and UNSW test from `config.raw_dir`.
/// 2. Normalize each present table and write it right away.
/// 3. Merge Apache + SSH + UNSW train and write the result.
///
/// Missing or malformed inputs are skipped with a log line and excluded from
/// the merge.
///
/// # Errors
/// Returns an error only when an output file cannot be written. Outputs
/// written before the failure stay on disk.
pub fn run_pipeline(config: &PipelineConfig) -> Result<RunSummary> {
    let started = std::time::Instant::now();
    info!("=== starting cleaning pipeline ===");

    // ── Step 1: Load ──────────────────────────────────────────────────────────
    info!("reading Apache...");
    let apache_raw = load_table(&config.input_path(APACHE_INPUT), config.row_limit);
    info!("reading SSH...");
    let ssh_raw = load_table(&config.input_path(SSH_INPUT), config.row_limit);
    info!("reading UNSW training...");
    let unsw_train_raw = load_table(&config.input_path(UNSW_TRAIN_INPUT), config.row_limit);
    info!("reading UNSW testing...");
    let unsw_test_raw = load_table(&config.input_path(UNSW_TEST_INPUT), config.row_limit);

    // ── Step 2: Normalize and write ───────────────────────────────────────────
    let mut outputs = Vec::with_capacity(5);
    let ssh_normalizer = SshNormalizer::new(config.reference_year);

    info!("cleaning Apache...");
    let apache = clean_and_write(
        &ApacheNormalizer,
        apache_raw.as_ref(),
        APACHE_OUTPUT,
        config,
        &mut outputs,
    )?;
    info!("cleaning SSH...");
    let ssh = clean_and_write(
        &ssh_normalizer,
        ssh_raw.as_ref(),
        SSH_OUTPUT,
        config,
        &mut outputs,
    )?;
    info!("cleaning UNSW TRAIN...");
    let unsw_train = clean_and_write(
        &UnswNormalizer,
        unsw_train_raw.as_ref(),
        UNSW_TRAIN_OUTPUT,
        config,
        &mut outputs,
    )?;
    info!("cleaning UNSW TEST...");
    clean_and_write(
        &UnswNormalizer,
        unsw_test_raw.as_ref(),
        UNSW_TEST_OUTPUT,
        config,
        &mut outputs,
    )?;

    // ── Step 3: Merge ─────────────────────────────────────────────────────────
    info!("merging Apache + SSH + UNSW TRAIN...");
    let merged = SchemaAligner::merge(
        [apache.as_ref(), ssh.as_ref(), unsw_train.as_ref()]
            .into_iter()
            .flatten(),
    );
    outputs.push(write_output(merged.as_ref(), MERGED_OUTPUT, config)?);

    info!("=== cleaning pipeline finished ===");

    Ok(RunSummary {
        generated_at: chrono::Utc::now().to_rfc3339(),
        reference_year: config.reference_year,
        outputs,
        elapsed_seconds: started.elapsed().as_secs_f64(),
    })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn clean_and_write(
    normalizer: &dyn Normalizer,
    raw: Option<&Table>,
    name: &str,
    config: &PipelineConfig,
    outputs: &mut Vec<OutputReport>,
) -> Result<Option<Table>> {
    let cleaned = raw.map(|table| normalizer.normalize(table));
    outputs.push(write_output(cleaned.as_ref(), name, config)?);
    Ok(cleaned)
}

fn write_output(
    table: Option<&Table>,
    name: &str,
    config: &PipelineConfig,
) -> Result<OutputReport> {
    let Some(table) = table else {
        return Ok(OutputReport::skipped(name));
    };
    let path = config.output_path(name);
    write_table(table, &path)?;
    info!("[OK] {}", path.display());
    Ok(OutputReport::written(name, table.len(), path))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
