mod bootstrap;

use anyhow::{Context, Result};
use logprep_core::settings::{PipelineConfig, Settings};
use logprep_data::pipeline::run_pipeline;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    let config = PipelineConfig::from(&settings);
    bootstrap::ensure_directories(&config.output_dir, settings.summary.as_deref())?;

    tracing::info!("logprep v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Raw: {}, Output: {}, SSH reference year: {}",
        config.raw_dir.display(),
        config.output_dir.display(),
        config.reference_year
    );

    let summary = run_pipeline(&config).context("cleaning pipeline failed")?;

    tracing::info!(
        "{} of {} outputs written in {:.2}s",
        summary.written_count(),
        summary.outputs.len(),
        summary.elapsed_seconds
    );

    if let Some(path) = &settings.summary {
        summary
            .write_json(path)
            .with_context(|| format!("writing run summary to {}", path.display()))?;
        tracing::info!("[OK] {}", path.display());
    }

    Ok(())
}
