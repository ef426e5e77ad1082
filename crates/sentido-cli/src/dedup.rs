//! `sentido dedup`: drop near-duplicate comments.

use std::path::Path;

use sentido_core::PipelineConfig;
use sentido_dedup::dedup_file;

/// Deduplicate `input` into `output`, printing before/after counts.
///
/// # Errors
///
/// Returns an error if the corpus cannot be read or written, lacks a
/// `texto` column, or the threshold is outside (0, 1].
pub(crate) fn run_dedup(
    config: &PipelineConfig,
    input: Option<&Path>,
    output: Option<&Path>,
    threshold: Option<f32>,
) -> anyhow::Result<()> {
    let input = input.unwrap_or(&config.corpus_path);
    let output = output.unwrap_or(&config.clean_corpus_path);
    let threshold = threshold.unwrap_or(config.dedup_threshold);

    let report = dedup_file(input, output, threshold)?;

    println!("rows before: {}", report.before);
    println!("rows after:  {}", report.after);
    println!("removed:     {} (similarity > {threshold})", report.removed);
    println!("clean corpus written to {}", output.display());
    Ok(())
}
