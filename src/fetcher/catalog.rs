//! Asset catalog layout and `Contents.json` descriptors

use super::{FetcherError, Manifest, ManifestEntry, Result};
use serde::{Deserialize, Serialize};
use serde_json::ser::{Formatter, PrettyFormatter};
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;
use walkdir::WalkDir;

/// Descriptor file name used by every catalog folder
pub const DESCRIPTOR_FILE: &str = "Contents.json";
const IMAGESET_SUFFIX: &str = ".imageset";

/// Catalog container inside a resolved root
#[derive(Debug, Clone)]
pub struct Catalog {
    container: PathBuf,
}

impl Catalog {
    /// Create the container folder (if needed) and overwrite its descriptor
    pub async fn initialize(root: &Path, container: &str) -> Result<Self> {
        let container = root.join(container);
        tokio::fs::create_dir_all(&container)
            .await
            .map_err(|e| FetcherError::at(&container, e))?;

        let catalog = Self { container };
        write_descriptor(&catalog.descriptor_path(), &CatalogDescriptor::default()).await?;
        debug!("Catalog container ready: {}", catalog.container.display());

        Ok(catalog)
    }

    /// Open an existing container folder without touching it
    pub fn at(container: impl Into<PathBuf>) -> Self {
        Self {
            container: container.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.container
    }

    pub fn descriptor_path(&self) -> PathBuf {
        self.container.join(DESCRIPTOR_FILE)
    }

    pub fn imageset_path(&self, entry: &ManifestEntry) -> PathBuf {
        self.container.join(entry.imageset_dir_name())
    }

    /// Create the entry's `.imageset` folder; succeeds if it already exists
    pub async fn ensure_imageset(&self, entry: &ManifestEntry) -> Result<PathBuf> {
        let dir = self.imageset_path(entry);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| FetcherError::at(&dir, e))?;
        Ok(dir)
    }

    /// Write the entry's image set descriptor referencing `<stem>.<extension>`
    pub async fn write_imageset_descriptor(
        &self,
        entry: &ManifestEntry,
        extension: &str,
    ) -> Result<PathBuf> {
        let path = self.imageset_path(entry).join(DESCRIPTOR_FILE);
        let descriptor = ImageSetDescriptor::single_scale(entry.image_file_name(extension));
        write_descriptor(&path, &descriptor).await?;
        Ok(path)
    }

    /// Report what is on disk for every manifest entry
    pub fn inspect(&self, manifest: &Manifest, extension: &str) -> Vec<ImageSetStatus> {
        manifest
            .iter()
            .map(|entry| {
                let dir = self.imageset_path(entry);
                let image = dir.join(entry.image_file_name(extension));
                ImageSetStatus {
                    entry: entry.clone(),
                    dir_exists: dir.is_dir(),
                    image_bytes: std::fs::metadata(&image)
                        .ok()
                        .filter(|m| m.is_file())
                        .map(|m| m.len()),
                    has_descriptor: dir.join(DESCRIPTOR_FILE).is_file(),
                }
            })
            .collect()
    }

    /// `.imageset` folders in the container that no manifest entry accounts for
    pub fn unlisted_imagesets(&self, manifest: &Manifest) -> Vec<PathBuf> {
        let expected: Vec<String> = manifest.iter().map(ManifestEntry::imageset_dir_name).collect();

        let mut extra: Vec<PathBuf> = WalkDir::new(&self.container)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
            .filter(|e| {
                let name = e.file_name().to_string_lossy();
                name.ends_with(IMAGESET_SUFFIX) && !expected.iter().any(|x| *x == name)
            })
            .map(walkdir::DirEntry::into_path)
            .collect();
        extra.sort();
        extra
    }
}

/// On-disk state of one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSetStatus {
    pub entry: ManifestEntry,
    pub dir_exists: bool,
    /// Size of the image file, `None` when it is missing
    pub image_bytes: Option<u64>,
    pub has_descriptor: bool,
}

impl ImageSetStatus {
    pub const fn is_complete(&self) -> bool {
        self.dir_exists && self.image_bytes.is_some() && self.has_descriptor
    }
}

// Descriptor structures for Xcode asset catalogs

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorInfo {
    pub author: String,
    pub version: u32,
}

impl Default for DescriptorInfo {
    fn default() -> Self {
        Self {
            author: "xcode".to_string(),
            version: 1,
        }
    }
}

/// Folder-level `Contents.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDescriptor {
    pub info: DescriptorInfo,
}

/// One density variant of an image set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageVariant {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub idiom: String,
    pub scale: String,
}

impl ImageVariant {
    fn universal(scale: &str, filename: Option<String>) -> Self {
        Self {
            filename,
            idiom: "universal".to_string(),
            scale: scale.to_string(),
        }
    }
}

/// `.imageset/Contents.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSetDescriptor {
    pub images: Vec<ImageVariant>,
    pub info: DescriptorInfo,
}

impl ImageSetDescriptor {
    /// `1x` backed by `filename`; `2x` and `3x` declared without files
    pub fn single_scale(filename: impl Into<String>) -> Self {
        Self {
            images: vec![
                ImageVariant::universal("1x", Some(filename.into())),
                ImageVariant::universal("2x", None),
                ImageVariant::universal("3x", None),
            ],
            info: DescriptorInfo::default(),
        }
    }
}

/// Serialize a descriptor the way Xcode formats `Contents.json` (`"key" : value`)
pub fn to_xcode_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, XcodeFormatter::default());
    value.serialize(&mut ser)?;
    String::from_utf8(buf)
        .map_err(|e| FetcherError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

async fn write_descriptor<T: Serialize>(path: &Path, descriptor: &T) -> Result<()> {
    let content = to_xcode_json(descriptor)?;

    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| FetcherError::at(path, e))?;
    file.write_all(content.as_bytes())
        .await
        .map_err(|e| FetcherError::at(path, e))?;
    file.flush().await.map_err(|e| FetcherError::at(path, e))?;

    Ok(())
}

/// Two-space pretty printer with a space on both sides of the colon
#[derive(Default)]
struct XcodeFormatter {
    inner: PrettyFormatter<'static>,
}

impl Formatter for XcodeFormatter {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b" : ")
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }
}
