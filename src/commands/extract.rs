use anyhow::{Context, Result};
use tracing::info;

use crate::batch::rebuild_report;
use crate::cli::ExtractArgs;

pub fn run(args: ExtractArgs) -> Result<()> {
    info!(
        raw_outputs = args.raw_outputs.len(),
        report = %args.report_path.display(),
        extraction = args.extraction.as_str(),
        "rebuilding report from saved outputs"
    );

    let blocks = rebuild_report(&args.raw_outputs, &args.report_path, args.extraction)
        .with_context(|| format!("failed to rebuild {}", args.report_path.display()))?;

    info!(blocks = blocks.len(), "report rebuilt");
    Ok(())
}
