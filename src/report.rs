use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::cli::ExtractionMode;
use crate::error::{BatchError, Result};
use crate::model::{EvaluationOutput, ReportLineSet, split_lines};

pub const TITLE_LINE_INDEX: usize = 0;
pub const MAP_LINE_INDEX: usize = 5;
pub const RPREC_LINE_INDEX: usize = 7;
pub const NDCG_LINE_INDEX: usize = 55;

static MEASURE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\S+)\s+(\S+)(?:\s+(.*))?$").expect("measure line regex is valid")
});

struct FieldSpec {
    field: &'static str,
    index: usize,
    label: &'static str,
}

const FIELDS: [FieldSpec; 4] = [
    FieldSpec {
        field: "title",
        index: TITLE_LINE_INDEX,
        label: "runid",
    },
    FieldSpec {
        field: "map",
        index: MAP_LINE_INDEX,
        label: "map",
    },
    FieldSpec {
        field: "rprec",
        index: RPREC_LINE_INDEX,
        label: "Rprec",
    },
    FieldSpec {
        field: "ndcg",
        index: NDCG_LINE_INDEX,
        label: "ndcg",
    },
];

pub fn extract_report_lines(
    output: &EvaluationOutput,
    mode: ExtractionMode,
    run_index: usize,
) -> Result<ReportLineSet> {
    let text = output.text();
    let lines = split_lines(&text);

    let pick = |spec: &FieldSpec| -> Result<String> {
        let line = match mode {
            ExtractionMode::Fixed => line_at(&lines, spec, run_index)?,
            ExtractionMode::Labels => line_with_label(&lines, spec, run_index)?,
            ExtractionMode::LabelsWithFallback => match find_labelled_line(&lines, spec.label) {
                Some(line) => line,
                None => line_at(&lines, spec, run_index)?,
            },
        };
        Ok(line.to_string())
    };

    let [title, map, rprec, ndcg] = &FIELDS;
    Ok(ReportLineSet {
        title: pick(title)?,
        map: pick(map)?,
        rprec: pick(rprec)?,
        ndcg: pick(ndcg)?,
    })
}

fn line_at<'a>(lines: &[&'a str], spec: &FieldSpec, run_index: usize) -> Result<&'a str> {
    lines
        .get(spec.index)
        .copied()
        .ok_or_else(|| BatchError::MalformedOutput {
            run_index,
            field: spec.field,
            expected: format!(
                "line index {} but output has {} lines",
                spec.index,
                lines.len()
            ),
        })
}

fn line_with_label<'a>(lines: &[&'a str], spec: &FieldSpec, run_index: usize) -> Result<&'a str> {
    find_labelled_line(lines, spec.label).ok_or_else(|| BatchError::MalformedOutput {
        run_index,
        field: spec.field,
        expected: format!("a line labelled `{} all`", spec.label),
    })
}

/// Aggregate measure lines look like `map <TAB> all <TAB> 0.1234`; per-query
/// lines carry a query id in the second column and are skipped.
fn find_labelled_line<'a>(lines: &[&'a str], label: &str) -> Option<&'a str> {
    lines.iter().copied().find(|line| {
        MEASURE_LINE
            .captures(line)
            .map(|captures| &captures[1] == label && &captures[2] == "all")
            .unwrap_or(false)
    })
}

/// Append-only handle on the aggregate report, truncated when opened.
pub struct ReportWriter {
    path: PathBuf,
}

impl ReportWriter {
    pub fn create(path: &Path) -> Result<Self> {
        File::create(path).map_err(|err| BatchError::filesystem(path, err))?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn append(&self, lines: &ReportLineSet) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|err| BatchError::filesystem(&self.path, err))?;
        file.write_all(lines.render_block().as_bytes())
            .map_err(|err| BatchError::filesystem(&self.path, err))?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
