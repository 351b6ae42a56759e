//! Dataset Pipeline Module
//!
//! Drives the transforms across a tiered, labeled dataset:
//! - Tier and class taxonomy
//! - Pipeline configuration
//! - Source discovery and output path mapping
//! - The dataset walker and its run summary

pub mod config;
pub mod paths;
pub mod summary;
pub mod tier;
pub mod walker;

pub use config::{OutputPolicy, PipelineConfig, ResolvedTier, TierConfig, DEFAULT_EXTENSION};
pub use paths::{base_name, output_path, tier_dir, DatasetEntry};
pub use summary::{FileFailure, FileOutcome, RunSummary};
pub use tier::{ClassLabel, Resolution, Tier, TierLayout, TierVariant, ORIGINAL_TIER};
pub use walker::{DatasetWalker, PlannedFile};
