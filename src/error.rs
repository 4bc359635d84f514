use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BatchError>;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("scorer failed for job {run_index} ({command}): {reason}")]
    ExternalTool {
        run_index: usize,
        command: String,
        reason: String,
    },

    #[error("malformed scorer output for job {run_index}: {field} missing ({expected})")]
    MalformedOutput {
        run_index: usize,
        field: &'static str,
        expected: String,
    },

    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid batch plan: {0}")]
    InvalidPlan(String),
}

impl BatchError {
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}
