use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::presets::DEFAULT_EXPERIMENTS_ROOT;
use crate::scorer::{DEFAULT_MEASURE, DEFAULT_TOOL_PATH};

#[derive(Parser, Debug)]
#[command(
    name = "trecbatch",
    version,
    about = "Batch trec_eval runner and score report extraction"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Run(RunArgs),
    Presets(PresetsArgs),
    Extract(ExtractArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum Preset {
    All,
    ShortTerm,
    LongTerm,
    HeldOut,
}

impl Preset {
    pub fn tag(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::ShortTerm => "ST",
            Self::LongTerm => "LT",
            Self::HeldOut => "WT",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::ShortTerm => "short-term",
            Self::LongTerm => "long-term",
            Self::HeldOut => "held-out",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExtractionMode {
    Fixed,
    Labels,
    LabelsWithFallback,
}

impl ExtractionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Labels => "labels",
            Self::LabelsWithFallback => "labels-with-fallback",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[arg(long, value_enum, default_value_t = Preset::All, conflicts_with = "plan_path")]
    pub preset: Preset,

    #[arg(long)]
    pub plan_path: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_TOOL_PATH)]
    pub tool_path: PathBuf,

    #[arg(long, default_value = DEFAULT_MEASURE)]
    pub measure: String,

    #[arg(long, default_value = DEFAULT_EXPERIMENTS_ROOT)]
    pub experiments_root: PathBuf,

    #[arg(long)]
    pub scores_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ExtractionMode::Fixed)]
    pub extraction: ExtractionMode,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct PresetsArgs {
    #[arg(long, default_value = DEFAULT_EXPERIMENTS_ROOT)]
    pub experiments_root: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(long = "raw-output", required = true)]
    pub raw_outputs: Vec<PathBuf>,

    #[arg(long)]
    pub report_path: PathBuf,

    #[arg(long, value_enum, default_value_t = ExtractionMode::Fixed)]
    pub extraction: ExtractionMode,
}
