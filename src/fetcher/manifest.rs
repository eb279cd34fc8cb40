//! Manifest of images to fetch

use serde::{Deserialize, Serialize};

/// One item to fetch into the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Numeric identifier used in the download URL
    pub id: u32,
    /// Display name used in directory and file names
    pub name: String,
    /// Lowercase slug for the cry download, if any
    #[serde(default)]
    pub cry: Option<String>,
}

impl ManifestEntry {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            cry: None,
        }
    }

    pub fn with_cry(mut self, slug: impl Into<String>) -> Self {
        self.cry = Some(slug.into());
        self
    }

    /// `001_Name`: zero-padded id joined with the display name
    #[must_use]
    pub fn stem(&self) -> String {
        format!("{:03}_{}", self.id, self.name)
    }

    #[must_use]
    pub fn imageset_dir_name(&self) -> String {
        format!("{}.imageset", self.stem())
    }

    #[must_use]
    pub fn image_file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.stem(), extension)
    }
}

impl std::fmt::Display for ManifestEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:03} {}", self.id, self.name)
    }
}

/// Ordered list of entries; order only affects progress output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    #[must_use]
    pub const fn new(entries: Vec<ManifestEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ManifestEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new(vec![
            ManifestEntry::new(1, "妙蛙种子").with_cry("bulbasaur"),
            ManifestEntry::new(4, "小火龙").with_cry("charmander"),
            ManifestEntry::new(6, "喷火龙").with_cry("charizard"),
            ManifestEntry::new(7, "杰尼龟").with_cry("squirtle"),
            ManifestEntry::new(25, "皮卡丘").with_cry("pikachu"),
            ManifestEntry::new(94, "耿鬼").with_cry("gengar"),
            ManifestEntry::new(130, "暴鲤龙").with_cry("gyarados"),
            ManifestEntry::new(143, "卡比兽").with_cry("snorlax"),
            ManifestEntry::new(149, "快龙").with_cry("dragonite"),
            ManifestEntry::new(150, "超梦").with_cry("mewtwo"),
        ])
    }
}

impl From<Vec<ManifestEntry>> for Manifest {
    fn from(entries: Vec<ManifestEntry>) -> Self {
        Self::new(entries)
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a ManifestEntry;
    type IntoIter = std::slice::Iter<'a, ManifestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stem_is_zero_padded() {
        assert_eq!(ManifestEntry::new(1, "A").stem(), "001_A");
        assert_eq!(ManifestEntry::new(25, "皮卡丘").stem(), "025_皮卡丘");
        assert_eq!(ManifestEntry::new(150, "超梦").stem(), "150_超梦");
        // wider ids are not truncated
        assert_eq!(ManifestEntry::new(1010, "X").stem(), "1010_X");
    }

    #[test]
    fn test_derived_names() {
        let entry = ManifestEntry::new(7, "Squirtle");
        assert_eq!(entry.imageset_dir_name(), "007_Squirtle.imageset");
        assert_eq!(entry.image_file_name("png"), "007_Squirtle.png");
        assert_eq!(entry.to_string(), "#007 Squirtle");
    }

    #[test]
    fn test_default_manifest_order() {
        let manifest = Manifest::default();
        let ids: Vec<u32> = manifest.iter().map(|e| e.id).collect();

        assert_eq!(ids, vec![1, 4, 6, 7, 25, 94, 130, 143, 149, 150]);
        assert!(manifest.iter().all(|e| e.cry.is_some()));
    }

    #[test]
    fn test_manifest_deserializes_from_list() {
        let manifest: Manifest =
            serde_json::from_str(r#"[{"id": 1, "name": "A"}, {"id": 2, "name": "B", "cry": "b"}]"#)
                .unwrap();

        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.entries()[0].cry, None);
        assert_eq!(manifest.entries()[1].cry.as_deref(), Some("b"));
    }
}
