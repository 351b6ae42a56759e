//! Dataset Walker
//!
//! Enumerates the configured (tier, class) directories, pushes every source
//! image through its tier's transform chain and writes the result to the
//! mirrored destination tree. Files are independent: with `parallel` set
//! they are spread over the rayon pool, otherwise processed in order.
//!
//! Decode and write failures are logged and counted; the batch continues.
//! Shape and configuration errors abort the run.

use std::path::PathBuf;

use log::{debug, error, info, warn};
use rayon::prelude::*;

use crate::engine::{list_images, load_image, save_image};
use crate::error::Result;
use crate::pipeline::config::{OutputPolicy, PipelineConfig, ResolvedTier};
use crate::pipeline::paths::{tier_dir, DatasetEntry};
use crate::pipeline::summary::{FileFailure, FileOutcome, RunSummary};

/// A discovered source file and where its output goes
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedFile {
    pub entry: DatasetEntry,
    pub destination: PathBuf,
    /// Index into the walker's resolved tiers
    tier_index: usize,
}

/// Drives the transform pipeline across a dataset
#[derive(Debug, Clone)]
pub struct DatasetWalker {
    config: PipelineConfig,
    tiers: Vec<ResolvedTier>,
}

impl DatasetWalker {
    /// Validate `config` and build every tier's transform chain.
    ///
    /// # Errors
    /// * `Config` - if the configuration is invalid
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let tiers = config.resolve()?;
        Ok(Self { config, tiers })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn tiers(&self) -> &[ResolvedTier] {
        &self.tiers
    }

    /// Enumerate every source file and its destination without touching
    /// any image data. Missing directories contribute nothing.
    pub fn plan(&self) -> Vec<PlannedFile> {
        self.discover().0
    }

    /// Planned files, plus sources whose names cannot be mapped to an output.
    fn discover(&self) -> (Vec<PlannedFile>, Vec<PathBuf>) {
        let mut planned = Vec::new();
        let mut unusable = Vec::new();

        for (tier_index, resolved) in self.tiers.iter().enumerate() {
            for class in resolved.layout.class_slots() {
                let dir = tier_dir(&self.config.source_root, resolved.tier.name(), class);
                let files = list_images(&dir, &self.config.extension);
                if files.is_empty() {
                    debug!("No .{} files in {}", self.config.extension, dir.display());
                }

                for source in files {
                    match DatasetEntry::new(source.clone(), &resolved.tier, class) {
                        Some(entry) => {
                            let destination = entry
                                .output_path(&self.config.destination_root, &self.config.extension);
                            planned.push(PlannedFile {
                                entry,
                                destination,
                                tier_index,
                            });
                        }
                        None => {
                            warn!("Skipping {}: no usable file name", source.display());
                            unusable.push(source);
                        }
                    }
                }
            }
        }

        (planned, unusable)
    }

    /// Process the whole dataset.
    ///
    /// # Errors
    /// * `Shape` / `Config` - on the first pipeline error; per-file decode
    ///   and write errors are reported in the summary instead
    pub fn run(&self) -> Result<RunSummary> {
        let mut summary = RunSummary::start();
        let (planned, unusable) = self.discover();
        info!(
            "Processing {} files across {} tiers ({})",
            planned.len(),
            self.tiers.len(),
            if self.config.parallel { "parallel" } else { "sequential" }
        );
        for resolved in &self.tiers {
            info!("  tier {}: {}", resolved.tier, resolved.chain.describe());
        }

        let outcomes: Vec<FileOutcome> = if self.config.parallel {
            planned.par_iter().map(|file| self.process(file)).collect::<Result<_>>()?
        } else {
            planned.iter().map(|file| self.process(file)).collect::<Result<_>>()?
        };

        for path in unusable {
            summary.record(FileOutcome::Skipped {
                path,
                reason: "no usable file name".to_string(),
            });
        }
        for outcome in outcomes {
            summary.record(outcome);
        }
        let summary = summary.finish();

        info!(
            "Done: {} processed, {} skipped, {} failed",
            summary.processed,
            summary.skipped,
            summary.failed()
        );
        Ok(summary)
    }

    /// Load, transform and save one file.
    ///
    /// Recoverable errors become a `Failed` outcome; anything else is
    /// returned as an error and ends the run.
    fn process(&self, file: &PlannedFile) -> Result<FileOutcome> {
        let source = &file.entry.source;

        if self.config.output_policy == OutputPolicy::SkipExisting && file.destination.exists() {
            debug!("Skipping {}: output exists", source.display());
            return Ok(FileOutcome::Skipped {
                path: source.clone(),
                reason: "output already exists".to_string(),
            });
        }

        let chain = &self.tiers[file.tier_index].chain;
        let result = load_image(source)
            .and_then(|buffer| chain.apply(buffer))
            .and_then(|buffer| save_image(&buffer, &file.destination));

        match result {
            Ok(()) => {
                debug!("{} -> {}", source.display(), file.destination.display());
                Ok(FileOutcome::Written {
                    destination: file.destination.clone(),
                })
            }
            Err(e) if e.is_recoverable() => {
                warn!("Skipping {}: {}", source.display(), e);
                Ok(FileOutcome::Failed(FileFailure::from_error(source.clone(), &e)))
            }
            Err(e) => {
                error!("Aborting at {}: {}", source.display(), e);
                Err(e)
            }
        }
    }
}
