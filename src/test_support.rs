use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::Result;
use crate::model::{EvaluationJob, EvaluationOutput};
use crate::scorer::Scorer;

/// Shell body echoing the result-file argument, then `line1`..`line59`.
pub const PADDED_ECHO_SCRIPT: &str =
    "echo \"$4\"\ni=1\nwhile [ $i -lt 60 ]; do echo \"line$i\"; i=$((i+1)); done";

static SPAWN_LOCK: Mutex<()> = Mutex::new(());

/// Serializes script creation and execution so a freshly written script is
/// never exec'd while another test thread holds a writable descriptor to it.
pub fn spawn_lock() -> MutexGuard<'static, ()> {
    SPAWN_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let _guard = spawn_lock();
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write stub script");
    let mut permissions = fs::metadata(&path).expect("stat stub script").permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(&path, permissions).expect("chmod stub script");
    path
}

/// Output shaped like `trec_eval -m all_trec`: title on line 0, MAP on 5,
/// Rprec on 7, NDCG on 55, filler elsewhere.
pub fn fake_stable_output(title: &str) -> String {
    let mut lines: Vec<String> = (0..60).map(|index| format!("L{index}")).collect();
    lines[0] = title.to_string();
    lines[5] = "MAP-LINE".to_string();
    lines[7] = "RPREC-LINE".to_string();
    lines[55] = "NDCG-LINE".to_string();
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// In-process scorer echoing the job's result path as the title line.
pub struct EchoScorer;

impl Scorer for EchoScorer {
    fn command_line(&self, job: &EvaluationJob) -> String {
        format!("echo {}", job.result_file_path.display())
    }

    fn score(&self, job: &EvaluationJob) -> Result<EvaluationOutput> {
        Ok(EvaluationOutput::new(fake_stable_output(
            &job.result_file_path.display().to_string(),
        )))
    }
}

/// In-process scorer returning the same text for every job.
pub struct FixedScorer(pub String);

impl Scorer for FixedScorer {
    fn command_line(&self, _job: &EvaluationJob) -> String {
        "fixed".to_string()
    }

    fn score(&self, _job: &EvaluationJob) -> Result<EvaluationOutput> {
        Ok(EvaluationOutput::new(self.0.clone()))
    }
}
