//! Source discovery and output path mapping

use std::path::{Path, PathBuf};

use crate::pipeline::tier::{ClassLabel, Tier};

/// One source image discovered in the dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetEntry {
    /// Full path of the source file
    pub source: PathBuf,
    /// Tier directory name
    pub tier: String,
    /// Class label, `None` for undivided tiers
    pub class: Option<ClassLabel>,
    /// File name without directory or extension
    pub base_name: String,
}

impl DatasetEntry {
    /// Build an entry for `source`; `None` if it has no usable file stem.
    pub fn new(source: PathBuf, tier: &Tier, class: Option<ClassLabel>) -> Option<Self> {
        let base_name = base_name(&source)?;
        Some(Self {
            source,
            tier: tier.name().to_string(),
            class,
            base_name,
        })
    }

    /// Where this entry's output lands under `destination_root`
    pub fn output_path(&self, destination_root: &Path, extension: &str) -> PathBuf {
        output_path(
            destination_root,
            &self.tier,
            self.class,
            &self.base_name,
            extension,
        )
    }
}

/// Directory holding one (tier, class) slot: `root/<tier>[/<class>]`
pub fn tier_dir(root: &Path, tier: &str, class: Option<ClassLabel>) -> PathBuf {
    let dir = root.join(tier);
    match class {
        Some(class) => dir.join(class.dir_name()),
        None => dir,
    }
}

/// Output file for (tier, class, base name): `root/<tier>[/<class>]/<base>.<ext>`
///
/// A pure function of its arguments, so re-running a pipeline rewrites the
/// same files rather than adding new ones.
pub fn output_path(
    destination_root: &Path,
    tier: &str,
    class: Option<ClassLabel>,
    base_name: &str,
    extension: &str,
) -> PathBuf {
    tier_dir(destination_root, tier, class).join(format!("{}.{}", base_name, extension))
}

/// File name without directory or extension
pub fn base_name(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_divided() {
        let path = output_path(
            Path::new("dst"),
            "64",
            Some(ClassLabel::Waldo),
            "1_0_3",
            "jpg",
        );
        assert_eq!(path, Path::new("dst").join("64").join("waldo").join("1_0_3.jpg"));
    }

    #[test]
    fn test_output_path_undivided() {
        let path = output_path(Path::new("dst"), "original-images", None, "01", "png");
        assert_eq!(path, Path::new("dst").join("original-images").join("01.png"));
    }

    #[test]
    fn test_entry_mirrors_source() {
        let tier: Tier = "128".parse().unwrap();
        let source = Path::new("src")
            .join("128")
            .join("notwaldo")
            .join("5_2_1.jpg");
        let entry = DatasetEntry::new(source, &tier, Some(ClassLabel::NotWaldo)).unwrap();

        assert_eq!(entry.base_name, "5_2_1");
        assert_eq!(
            entry.output_path(Path::new("out"), "jpg"),
            Path::new("out").join("128").join("notwaldo").join("5_2_1.jpg")
        );
    }

    #[test]
    fn test_base_name_strips_only_last_extension() {
        assert_eq!(base_name(Path::new("a/b/c.tar.jpg")).as_deref(), Some("c.tar"));
        assert_eq!(base_name(Path::new("")), None);
    }
}
