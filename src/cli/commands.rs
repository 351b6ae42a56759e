//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs;
use std::path::Path;

use log::info;

use crate::cli::ConfigSource;
use crate::error::{PrepError, Result};
use crate::pipeline::{DatasetWalker, OutputPolicy, PipelineConfig, RunSummary};

/// Resolve the configuration from `--config` or `--source`/`--dest`.
pub fn load_config(source: &ConfigSource) -> Result<PipelineConfig> {
    match (&source.config, &source.source, &source.dest) {
        (Some(path), _, _) => {
            info!("Loading configuration: {}", path.display());
            PipelineConfig::load(path)
        }
        (None, Some(src), Some(dst)) => Ok(PipelineConfig::hey_waldo(src, dst)),
        _ => Err(PrepError::config(
            "pass --config <file>, or both --source and --dest",
        )),
    }
}

/// Run the pipeline and print the summary.
pub fn run(
    source: &ConfigSource,
    sequential: bool,
    skip_existing: bool,
    summary_json: Option<&Path>,
) -> Result<RunSummary> {
    let mut config = load_config(source)?;
    if sequential {
        config.parallel = false;
    }
    if skip_existing {
        config.output_policy = OutputPolicy::SkipExisting;
    }

    info!(
        "Preprocessing {} -> {}",
        config.source_root.display(),
        config.destination_root.display()
    );

    let walker = DatasetWalker::new(config)?;
    let summary = walker.run()?;

    print!("{}", summary);

    if let Some(path) = summary_json {
        fs::write(path, summary.to_json()?)?;
        println!("Summary written to: {}", path.display());
    }

    Ok(summary)
}

/// Print every source → destination mapping.
pub fn plan(source: &ConfigSource) -> Result<()> {
    let walker = DatasetWalker::new(load_config(source)?)?;

    for resolved in walker.tiers() {
        println!("tier {}: {}", resolved.tier, resolved.chain.describe());
    }
    println!("{:-<60}", "");

    let planned = walker.plan();
    for file in &planned {
        println!(
            "{} -> {}",
            file.entry.source.display(),
            file.destination.display()
        );
    }

    println!("{:-<60}", "");
    println!("{} files", planned.len());

    Ok(())
}

/// Write the built-in configuration as JSON.
pub fn init_config(path: &Path, source: &Path, dest: &Path) -> Result<()> {
    let config = PipelineConfig::hey_waldo(source, dest);
    config.validate()?;
    config.save(path)?;

    println!("Configuration written: {}", path.display());

    Ok(())
}
