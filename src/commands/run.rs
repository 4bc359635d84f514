use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::batch::run_batch;
use crate::cli::RunArgs;
use crate::model::RunManifest;
use crate::presets::{BatchConfig, load_plan, preset_config};
use crate::scorer::{Scorer, TrecEvalCommand};
use crate::util::{now_utc_string, sha256_file, utc_compact_string, write_json_pretty};

pub fn run(args: RunArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    let config = resolve_config(&args)?;
    let scores_dir = args
        .scores_dir
        .clone()
        .unwrap_or_else(|| args.experiments_root.join("scores"));
    let scorer = TrecEvalCommand::new(&args.tool_path, &args.measure);

    info!(
        run_id = %run_id,
        tag = %config.tag,
        jobs = config.jobs.len(),
        scores_dir = %scores_dir.display(),
        extraction = args.extraction.as_str(),
        "starting batch evaluation"
    );

    if args.dry_run {
        for job in &config.jobs {
            info!(
                job = job.run_index,
                command = %scorer.command_line(job),
                raw_output = %config.raw_output_path(&scores_dir, job).display(),
                "planned run"
            );
        }
        info!(
            report = %config.report_path(&scores_dir).display(),
            "batch dry-run complete"
        );
        return Ok(());
    }

    let outcome = run_batch(&config, &scores_dir, &scorer, args.extraction)
        .with_context(|| format!("batch evaluation `{}` failed", config.tag))?;

    if let Some(manifest_path) = &args.manifest_path {
        let manifest = RunManifest {
            manifest_version: 1,
            run_id,
            started_at,
            completed_at: now_utc_string(),
            tag: config.tag.clone(),
            tool_path: args.tool_path.display().to_string(),
            tool_version: scorer.version(),
            measure: args.measure.clone(),
            extraction_mode: args.extraction.as_str().to_string(),
            report_path: outcome.report_path.display().to_string(),
            report_sha256: sha256_file(&outcome.report_path)?,
            jobs: outcome.jobs,
        };
        write_json_pretty(manifest_path, &manifest)?;
        info!(path = %manifest_path.display(), "wrote run manifest");
    }

    Ok(())
}

fn resolve_config(args: &RunArgs) -> Result<BatchConfig> {
    match &args.plan_path {
        Some(plan_path) => {
            let config = load_plan(plan_path)
                .with_context(|| format!("failed to load plan {}", plan_path.display()))?;
            info!(plan = %plan_path.display(), "using batch plan");
            Ok(config)
        }
        None => {
            info!(preset = args.preset.as_str(), "using preset");
            Ok(preset_config(args.preset, &args.experiments_root))
        }
    }
}
