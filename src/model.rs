use std::borrow::Cow;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationJob {
    pub judgment_file_path: PathBuf,
    pub result_file_path: PathBuf,
    pub run_index: usize,
}

impl EvaluationJob {
    pub fn new(
        judgment_file_path: impl Into<PathBuf>,
        result_file_path: impl Into<PathBuf>,
        run_index: usize,
    ) -> Self {
        Self {
            judgment_file_path: judgment_file_path.into(),
            result_file_path: result_file_path.into(),
            run_index,
        }
    }
}

/// Captured stdout of one scorer invocation, kept as the raw bytes the
/// scorer wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationOutput {
    pub stdout: Vec<u8>,
}

impl EvaluationOutput {
    pub fn new(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: stdout.into(),
        }
    }

    /// Lossy decode used only for line extraction; invalid bytes become U+FFFD.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }
}

/// Splits on `\n` only, so a trailing newline yields a final empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLineSet {
    pub title: String,
    pub map: String,
    pub rprec: String,
    pub ndcg: String,
}

impl ReportLineSet {
    pub fn render_block(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}\n",
            self.title, self.map, self.rprec, self.ndcg
        )
    }
}

/// User-supplied job list, either sharing one judgment file or listing pairs.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchPlan {
    pub tag: String,
    pub report_name: String,
    #[serde(default)]
    pub judgment_file: Option<PathBuf>,
    #[serde(default)]
    pub result_files: Vec<PathBuf>,
    #[serde(default)]
    pub jobs: Vec<PlannedJob>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlannedJob {
    pub judgment_file: PathBuf,
    pub result_file: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    pub run_index: usize,
    pub judgment_file: String,
    pub result_file: String,
    pub raw_output_path: String,
    pub raw_output_sha256: String,
    pub lines: ReportLineSet,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub started_at: String,
    pub completed_at: String,
    pub tag: String,
    pub tool_path: String,
    pub tool_version: Option<String>,
    pub measure: String,
    pub extraction_mode: String,
    pub report_path: String,
    pub report_sha256: String,
    pub jobs: Vec<JobRecord>,
}
