//! Pipeline configuration
//!
//! A `PipelineConfig` names the source and destination roots, the tiers to
//! process and, per tier, the class directories and transform sequence.
//! It is plain data (JSON on disk); `resolve` validates it and turns each
//! tier into a ready-to-run `ResolvedTier`.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};
use crate::pipeline::tier::{ClassLabel, Tier, TierLayout, KNOWN_RESOLUTIONS, ORIGINAL_TIER};
use crate::transform::{TransformChain, TransformStep};

/// Default image file extension
pub const DEFAULT_EXTENSION: &str = "jpg";

/// What to do when an output file already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputPolicy {
    /// Rewrite existing outputs
    #[default]
    Overwrite,
    /// Leave existing outputs alone and count the source as skipped
    SkipExisting,
}

/// One tier to process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Tier directory name, e.g. `128` or `64-gray`
    pub name: String,
    /// Class directories; empty for an undivided tier
    #[serde(default)]
    pub classes: Vec<String>,
    /// Transforms applied in order; empty copies the image through
    #[serde(default)]
    pub steps: Vec<TransformStep>,
}

impl TierConfig {
    /// Tier split into `waldo`/`notwaldo`
    pub fn divided(name: &str, steps: Vec<TransformStep>) -> Self {
        Self {
            name: name.to_string(),
            classes: ClassLabel::ALL
                .iter()
                .map(|c| c.dir_name().to_string())
                .collect(),
            steps,
        }
    }

    /// Tier with files directly under the tier directory
    pub fn undivided(name: &str, steps: Vec<TransformStep>) -> Self {
        Self {
            name: name.to_string(),
            classes: Vec::new(),
            steps,
        }
    }

    /// Validate and materialise this tier.
    ///
    /// # Errors
    /// * `Config` - for an unknown tier or class name, a duplicated class,
    ///   an invalid step, or a denoise step that could receive colour input
    pub fn resolve(&self) -> Result<ResolvedTier> {
        let tier: Tier = self.name.parse()?;

        let layout = if self.classes.is_empty() {
            TierLayout::Undivided
        } else {
            let mut seen = HashSet::new();
            let mut labels = Vec::with_capacity(self.classes.len());
            for name in &self.classes {
                let label: ClassLabel = name.parse()?;
                if !seen.insert(label) {
                    return Err(PrepError::config(format!(
                        "class '{}' listed twice in tier '{}'",
                        name, self.name
                    )));
                }
                labels.push(label);
            }
            TierLayout::Divided(labels)
        };

        // Track whether the buffer is guaranteed single-channel at each step
        let mut grayscale = tier.is_grayscale_variant();
        for step in &self.steps {
            if step.requires_grayscale() && !grayscale {
                return Err(PrepError::config(format!(
                    "tier '{}': denoise requires grayscale input; add a grayscale step before it",
                    self.name
                )));
            }
            if step.produces_grayscale() {
                grayscale = true;
            }
        }

        let chain = TransformChain::from_steps(&self.steps).map_err(|e| match e {
            PrepError::Shape { reason, .. } => PrepError::config(reason),
            other => other,
        })?;

        Ok(ResolvedTier {
            tier,
            layout,
            chain,
        })
    }
}

/// A validated tier ready to run
#[derive(Debug, Clone)]
pub struct ResolvedTier {
    pub tier: Tier,
    pub layout: TierLayout,
    pub chain: TransformChain,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_parallel() -> bool {
    true
}

/// Full pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Root of the source dataset
    pub source_root: PathBuf,
    /// Root of the mirrored output tree
    pub destination_root: PathBuf,
    /// Image file extension to look for and write, without the dot
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default)]
    pub output_policy: OutputPolicy,
    /// Process files on the rayon thread pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    pub tiers: Vec<TierConfig>,
}

impl PipelineConfig {
    /// Create a configuration with no tiers
    pub fn new(source_root: impl Into<PathBuf>, destination_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            destination_root: destination_root.into(),
            extension: default_extension(),
            output_policy: OutputPolicy::default(),
            parallel: default_parallel(),
            tiers: Vec::new(),
        }
    }

    /// The Hey-Waldo layout: 64/128/256 split by class plus the undivided
    /// original images, every tier converted to grayscale.
    pub fn hey_waldo(source_root: impl Into<PathBuf>, destination_root: impl Into<PathBuf>) -> Self {
        let mut config = Self::new(source_root, destination_root);
        for px in KNOWN_RESOLUTIONS {
            config = config.with_tier(TierConfig::divided(
                &px.to_string(),
                vec![TransformStep::Grayscale],
            ));
        }
        config.with_tier(TierConfig::undivided(
            ORIGINAL_TIER,
            vec![TransformStep::Grayscale],
        ))
    }

    /// Add a tier
    pub fn with_tier(mut self, tier: TierConfig) -> Self {
        self.tiers.push(tier);
        self
    }

    /// Replace the step sequence of every tier
    pub fn with_steps(mut self, steps: Vec<TransformStep>) -> Self {
        for tier in &mut self.tiers {
            tier.steps = steps.clone();
        }
        self
    }

    /// Validate every tier and materialise their transform chains.
    ///
    /// # Errors
    /// * `Config` - if any setting is invalid
    pub fn resolve(&self) -> Result<Vec<ResolvedTier>> {
        if self.extension.is_empty() || self.extension.contains(&['.', '/', '\\'][..]) {
            return Err(PrepError::config(format!(
                "extension must be a bare name like 'jpg', got '{}'",
                self.extension
            )));
        }
        if self.source_root == self.destination_root {
            return Err(PrepError::config(
                "destination_root must differ from source_root",
            ));
        }
        if self.tiers.is_empty() {
            return Err(PrepError::config("no tiers configured"));
        }

        let mut names = HashSet::new();
        for tier in &self.tiers {
            if !names.insert(tier.name.as_str()) {
                return Err(PrepError::config(format!(
                    "tier '{}' configured twice",
                    tier.name
                )));
            }
        }

        self.tiers.iter().map(TierConfig::resolve).collect()
    }

    /// Check the configuration without keeping the resolved tiers
    pub fn validate(&self) -> Result<()> {
        self.resolve().map(|_| ())
    }

    /// Load and validate a JSON configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
