use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::Preset;
use crate::error::{BatchError, Result};
use crate::model::{BatchPlan, EvaluationJob};

pub const DEFAULT_EXPERIMENTS_ROOT: &str = "runs/experiments";

const RUN_NAMES: [&str; 5] = [
    "seupd2223-JIHUMING-07_fr_fr",
    "seupd2223-JIHUMING-08_fr_fr_3gram",
    "seupd2223-JIHUMING-09_fr_fr_4gram",
    "seupd2223-JIHUMING-10_fr_fr_5gram",
    "seupd2223-JIHUMING-12_fr_fr_4gram_ner",
];

const JUDGEMENTS_DIR: &str = "longeval-relevance-judgements";

/// One job list plus the names its outputs are written under.
#[derive(Debug, Clone, Serialize)]
pub struct BatchConfig {
    pub tag: String,
    pub report_name: String,
    pub jobs: Vec<EvaluationJob>,
}

impl BatchConfig {
    pub fn report_path(&self, scores_dir: &Path) -> PathBuf {
        scores_dir.join(format!("{}.txt", self.report_name))
    }

    pub fn raw_output_path(&self, scores_dir: &Path, job: &EvaluationJob) -> PathBuf {
        scores_dir.join(format!("output{}{}.txt", self.tag, job.run_index))
    }

    /// Output names must stay inside the scores directory, and the report
    /// must not share a file with any raw output.
    pub fn validate(&self) -> Result<()> {
        check_file_component("tag", &self.tag)?;
        check_file_component("report_name", &self.report_name)?;

        let report_file = format!("{}.txt", self.report_name);
        if let Some(job) = self
            .jobs
            .iter()
            .find(|job| format!("output{}{}.txt", self.tag, job.run_index) == report_file)
        {
            return Err(BatchError::InvalidPlan(format!(
                "report `{report_file}` collides with the raw output of job {}",
                job.run_index
            )));
        }

        Ok(())
    }
}

fn check_file_component(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BatchError::InvalidPlan(format!("{name} must be non-empty")));
    }
    if value.contains(['/', '\\']) || value.contains("..") {
        return Err(BatchError::InvalidPlan(format!(
            "{name} `{value}` must not contain path separators or `..`"
        )));
    }
    Ok(())
}

pub fn preset_config(preset: Preset, experiments_root: &Path) -> BatchConfig {
    let (judgments, suffix) = match preset {
        Preset::All => (experiments_root.join("qrels.txt"), None),
        Preset::ShortTerm => (
            experiments_root.join(JUDGEMENTS_DIR).join("a-short-july.txt"),
            Some("ST"),
        ),
        Preset::LongTerm => (
            experiments_root
                .join(JUDGEMENTS_DIR)
                .join("b-long-september.txt"),
            Some("LT"),
        ),
        Preset::HeldOut => (
            experiments_root.join(JUDGEMENTS_DIR).join("heldout-test.txt"),
            Some("WT"),
        ),
    };

    let jobs = RUN_NAMES
        .iter()
        .enumerate()
        .map(|(position, run_name)| {
            let result_file = match suffix {
                None => experiments_root.join(format!("{run_name}.txt")),
                Some(suffix) => experiments_root
                    .join(run_name)
                    .join(format!("{run_name}.{suffix}")),
            };
            EvaluationJob::new(&judgments, result_file, position + 1)
        })
        .collect();

    BatchConfig {
        tag: preset.tag().to_string(),
        report_name: format!("{}_scores", preset.tag()),
        jobs,
    }
}

pub fn load_plan(path: &Path) -> Result<BatchConfig> {
    let raw = fs::read(path).map_err(|err| BatchError::filesystem(path, err))?;
    let plan: BatchPlan = serde_json::from_slice(&raw)
        .map_err(|err| BatchError::InvalidPlan(format!("{}: {err}", path.display())))?;
    plan_config(plan)
}

pub fn plan_config(plan: BatchPlan) -> Result<BatchConfig> {
    if plan.judgment_file.is_some() && plan.result_files.is_empty() {
        return Err(BatchError::InvalidPlan(
            "judgment_file only applies to result_files; jobs carry their own judgment_file"
                .to_string(),
        ));
    }

    let mut pairs: Vec<(PathBuf, PathBuf)> = Vec::new();
    if !plan.result_files.is_empty() {
        let judgment_file = plan.judgment_file.ok_or_else(|| {
            BatchError::InvalidPlan("result_files requires judgment_file".to_string())
        })?;
        pairs.extend(
            plan.result_files
                .into_iter()
                .map(|result_file| (judgment_file.clone(), result_file)),
        );
    }
    pairs.extend(
        plan.jobs
            .into_iter()
            .map(|job| (job.judgment_file, job.result_file)),
    );

    if pairs.is_empty() {
        return Err(BatchError::InvalidPlan("plan lists no jobs".to_string()));
    }

    let jobs = pairs
        .into_iter()
        .enumerate()
        .map(|(position, (judgment_file, result_file))| {
            EvaluationJob::new(judgment_file, result_file, position + 1)
        })
        .collect();

    let config = BatchConfig {
        tag: plan.tag,
        report_name: plan.report_name,
        jobs,
    };
    config.validate()?;
    Ok(config)
}
