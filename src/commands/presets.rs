use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use crate::cli::{Preset, PresetsArgs};
use crate::presets::{BatchConfig, preset_config};

#[derive(Debug, Serialize)]
struct PresetListing {
    preset: &'static str,
    #[serde(flatten)]
    config: BatchConfig,
}

pub fn run(args: PresetsArgs) -> Result<()> {
    let listings: Vec<PresetListing> = Preset::value_variants()
        .iter()
        .map(|preset| PresetListing {
            preset: preset.as_str(),
            config: preset_config(*preset, &args.experiments_root),
        })
        .collect();

    let mut output = io::BufWriter::new(io::stdout().lock());
    if args.json {
        serde_json::to_writer_pretty(&mut output, &listings)
            .context("failed to serialize preset listing")?;
        writeln!(output)?;
    } else {
        for listing in &listings {
            writeln!(
                output,
                "{}\ttag={}\treport={}.txt",
                listing.preset, listing.config.tag, listing.config.report_name
            )?;
            for job in &listing.config.jobs {
                writeln!(
                    output,
                    "\t{}.\t{}\t{}",
                    job.run_index,
                    job.judgment_file_path.display(),
                    job.result_file_path.display()
                )?;
            }
        }
    }
    output.flush()?;
    Ok(())
}
