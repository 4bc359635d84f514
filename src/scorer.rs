use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::error::{BatchError, Result};
use crate::model::{EvaluationJob, EvaluationOutput};

pub const DEFAULT_TOOL_PATH: &str = "../trec_eval-9.0.7/trec_eval";
pub const DEFAULT_MEASURE: &str = "all_trec";

pub trait Scorer {
    fn command_line(&self, job: &EvaluationJob) -> String;

    fn score(&self, job: &EvaluationJob) -> Result<EvaluationOutput>;
}

#[derive(Debug, Clone)]
pub struct TrecEvalCommand {
    pub tool_path: PathBuf,
    pub measure: String,
}

impl TrecEvalCommand {
    pub fn new(tool_path: impl Into<PathBuf>, measure: impl Into<String>) -> Self {
        Self {
            tool_path: tool_path.into(),
            measure: measure.into(),
        }
    }

    fn build(&self, job: &EvaluationJob) -> Command {
        let mut command = Command::new(&self.tool_path);
        command
            .arg("-m")
            .arg(&self.measure)
            .arg(&job.judgment_file_path)
            .arg(&job.result_file_path);
        command
    }

    /// First non-empty line of `<tool> -v`, if the tool answers at all.
    pub fn version(&self) -> Option<String> {
        let output = Command::new(&self.tool_path).arg("-v").output().ok()?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let source = if stdout.trim().is_empty() {
            stderr.trim()
        } else {
            stdout.trim()
        };

        source
            .lines()
            .next()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.to_string())
    }
}

impl Scorer for TrecEvalCommand {
    fn command_line(&self, job: &EvaluationJob) -> String {
        format!(
            "{} -m {} {} {}",
            self.tool_path.display(),
            self.measure,
            job.judgment_file_path.display(),
            job.result_file_path.display()
        )
    }

    fn score(&self, job: &EvaluationJob) -> Result<EvaluationOutput> {
        let command_line = self.command_line(job);
        debug!(job = job.run_index, command = %command_line, "spawning scorer");

        let output = self
            .build(job)
            .output()
            .map_err(|err| BatchError::ExternalTool {
                run_index: job.run_index,
                command: command_line.clone(),
                reason: format!("failed to spawn: {err}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BatchError::ExternalTool {
                run_index: job.run_index,
                command: command_line,
                reason: format!("exited with {}: {}", output.status, stderr.trim()),
            });
        }

        Ok(EvaluationOutput::new(output.stdout))
    }
}
