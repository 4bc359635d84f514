use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::cli::ExtractionMode;
use crate::error::{BatchError, Result};
use crate::model::{EvaluationOutput, JobRecord, ReportLineSet};
use crate::presets::BatchConfig;
use crate::report::{ReportWriter, extract_report_lines};
use crate::scorer::Scorer;
use crate::util::sha256_hex;

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub report_path: PathBuf,
    pub jobs: Vec<JobRecord>,
}

/// Runs every job in order, truncating the aggregate report first and
/// aborting on the first failing job.
///
/// Each raw output is persisted before extraction, so a job that fails on
/// malformed output still leaves its captured text on disk.
pub fn run_batch(
    config: &BatchConfig,
    scores_dir: &Path,
    scorer: &dyn Scorer,
    mode: ExtractionMode,
) -> Result<BatchOutcome> {
    config.validate()?;
    fs::create_dir_all(scores_dir).map_err(|err| BatchError::filesystem(scores_dir, err))?;

    let report_path = config.report_path(scores_dir);
    let report = ReportWriter::create(&report_path)?;

    let mut records = Vec::with_capacity(config.jobs.len());
    for job in &config.jobs {
        info!(
            job = job.run_index,
            result_file = %job.result_file_path.display(),
            "scoring run"
        );

        let output = scorer.score(job)?;

        let raw_output_path = config.raw_output_path(scores_dir, job);
        persist_raw_output(&raw_output_path, &output)?;

        let lines = extract_report_lines(&output, mode, job.run_index)?;
        report.append(&lines)?;

        info!(
            job = job.run_index,
            raw_output = %raw_output_path.display(),
            map = %lines.map,
            "run scored"
        );

        records.push(JobRecord {
            run_index: job.run_index,
            judgment_file: job.judgment_file_path.display().to_string(),
            result_file: job.result_file_path.display().to_string(),
            raw_output_path: raw_output_path.display().to_string(),
            raw_output_sha256: sha256_hex(&output.stdout),
            lines,
        });
    }

    info!(
        report = %report.path().display(),
        jobs = records.len(),
        "batch completed"
    );

    Ok(BatchOutcome {
        report_path,
        jobs: records,
    })
}

/// Rebuilds an aggregate report from raw outputs saved by earlier runs,
/// numbering jobs by their position in `raw_outputs`.
pub fn rebuild_report(
    raw_outputs: &[PathBuf],
    report_path: &Path,
    mode: ExtractionMode,
) -> Result<Vec<ReportLineSet>> {
    if let Some(parent) = report_path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| BatchError::filesystem(parent, err))?;
    }
    let report = ReportWriter::create(report_path)?;

    let mut blocks = Vec::with_capacity(raw_outputs.len());
    for (position, raw_path) in raw_outputs.iter().enumerate() {
        let stdout = fs::read(raw_path).map_err(|err| BatchError::filesystem(raw_path, err))?;
        let lines = extract_report_lines(&EvaluationOutput::new(stdout), mode, position + 1)?;
        report.append(&lines)?;
        blocks.push(lines);
    }

    Ok(blocks)
}

fn persist_raw_output(path: &Path, output: &EvaluationOutput) -> Result<()> {
    fs::write(path, &output.stdout).map_err(|err| BatchError::filesystem(path, err))
}
