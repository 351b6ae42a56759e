//! Dataset taxonomy: resolution tiers and class labels
//!
//! Tier directory names are `64`, `128`, `256` or `original-images`,
//! optionally suffixed `-gray` or `-bw` for preprocessed variants. Class
//! directories are `waldo` and `notwaldo`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

/// Pixel sizes of the cropped tiers
pub const KNOWN_RESOLUTIONS: [u32; 3] = [64, 128, 256];

/// Directory name of the uncropped tier
pub const ORIGINAL_TIER: &str = "original-images";

/// Resolution part of a tier name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// Square crops of the given side length
    Crop(u32),
    /// Full-size source images
    Original,
}

/// Preprocessing variant suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TierVariant {
    /// `-gray`: already converted to grayscale
    Gray,
    /// `-bw`: already binarized
    Bw,
}

impl TierVariant {
    fn suffix(self) -> &'static str {
        match self {
            TierVariant::Gray => "-gray",
            TierVariant::Bw => "-bw",
        }
    }
}

/// A parsed tier directory name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tier {
    name: String,
    resolution: Resolution,
    variant: Option<TierVariant>,
}

impl Tier {
    /// Directory name, as it appears under the source and destination roots
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn variant(&self) -> Option<TierVariant> {
        self.variant
    }

    /// Images in this tier are already single-channel
    pub fn is_grayscale_variant(&self) -> bool {
        self.variant.is_some()
    }
}

impl FromStr for Tier {
    type Err = PrepError;

    fn from_str(name: &str) -> Result<Self> {
        let (base, variant) = [TierVariant::Gray, TierVariant::Bw]
            .into_iter()
            .find_map(|v| name.strip_suffix(v.suffix()).map(|base| (base, Some(v))))
            .unwrap_or((name, None));

        let resolution = match base {
            "original" | ORIGINAL_TIER => Resolution::Original,
            other => match other.parse::<u32>() {
                Ok(px) if KNOWN_RESOLUTIONS.contains(&px) => Resolution::Crop(px),
                _ => {
                    return Err(PrepError::config(format!(
                        "unknown tier '{}' (expected one of 64, 128, 256, {}, optionally suffixed -gray/-bw)",
                        name, ORIGINAL_TIER
                    )))
                }
            },
        };

        Ok(Self {
            name: name.to_string(),
            resolution,
            variant,
        })
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Dataset class label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassLabel {
    Waldo,
    NotWaldo,
}

impl ClassLabel {
    /// Both labels, in directory listing order
    pub const ALL: [ClassLabel; 2] = [ClassLabel::NotWaldo, ClassLabel::Waldo];

    /// Directory name for this class
    pub fn dir_name(self) -> &'static str {
        match self {
            ClassLabel::Waldo => "waldo",
            ClassLabel::NotWaldo => "notwaldo",
        }
    }
}

impl FromStr for ClassLabel {
    type Err = PrepError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "waldo" => Ok(ClassLabel::Waldo),
            "notwaldo" => Ok(ClassLabel::NotWaldo),
            other => Err(PrepError::config(format!(
                "unknown class '{}' (expected 'waldo' or 'notwaldo')",
                other
            ))),
        }
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Directory shape of a tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierLayout {
    /// `root/<tier>/<class>/<file>`
    Divided(Vec<ClassLabel>),
    /// `root/<tier>/<file>`
    Undivided,
}

impl TierLayout {
    /// Class directories to visit; `None` stands for the tier directory itself
    pub fn class_slots(&self) -> Vec<Option<ClassLabel>> {
        match self {
            TierLayout::Divided(classes) => classes.iter().copied().map(Some).collect(),
            TierLayout::Undivided => vec![None],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("64", Resolution::Crop(64), None)]
    #[test_case("128-gray", Resolution::Crop(128), Some(TierVariant::Gray))]
    #[test_case("256-bw", Resolution::Crop(256), Some(TierVariant::Bw))]
    #[test_case("original-images", Resolution::Original, None)]
    #[test_case("original-gray", Resolution::Original, Some(TierVariant::Gray))]
    fn test_parse_tier(name: &str, resolution: Resolution, variant: Option<TierVariant>) {
        let tier: Tier = name.parse().unwrap();
        assert_eq!(tier.name(), name);
        assert_eq!(tier.resolution(), resolution);
        assert_eq!(tier.variant(), variant);
    }

    #[test_case("32" ; "unknown size")]
    #[test_case("64-sepia" ; "unknown suffix")]
    #[test_case("" ; "empty")]
    fn test_unknown_tier(name: &str) {
        let err = name.parse::<Tier>().unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_class_labels() {
        assert_eq!("waldo".parse::<ClassLabel>().unwrap(), ClassLabel::Waldo);
        assert_eq!("notwaldo".parse::<ClassLabel>().unwrap().dir_name(), "notwaldo");
        assert!("wally".parse::<ClassLabel>().is_err());
    }

    #[test]
    fn test_class_slots() {
        assert_eq!(TierLayout::Undivided.class_slots(), vec![None]);
        let divided = TierLayout::Divided(vec![ClassLabel::Waldo]);
        assert_eq!(divided.class_slots(), vec![Some(ClassLabel::Waldo)]);
    }
}
