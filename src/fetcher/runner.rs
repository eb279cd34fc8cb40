//! Sequential image fetch loop

use super::{
    Catalog, Downloader, FetcherConfig, ImageSource, Manifest, ManifestEntry, Result, RootResolver,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of processing one manifest entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Image written and descriptor updated
    Downloaded { path: PathBuf, bytes: u64 },
    /// Server returned a non-success status; nothing written
    Skipped { status: u16 },
}

/// Summary of a full run
#[derive(Debug, Default)]
pub struct RunReport {
    /// Catalog container the run wrote into
    pub catalog: PathBuf,
    /// Entries whose image was written
    pub downloaded: Vec<(ManifestEntry, PathBuf)>,
    /// Entries skipped with the status that caused it
    pub skipped: Vec<(ManifestEntry, u16)>,
}

impl RunReport {
    pub fn total(&self) -> usize {
        self.downloaded.len() + self.skipped.len()
    }

    pub fn downloaded_count(&self) -> usize {
        self.downloaded.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// True when no entry was skipped
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    fn record(&mut self, entry: &ManifestEntry, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Downloaded { path, .. } => self.downloaded.push((entry.clone(), path)),
            FetchOutcome::Skipped { status } => self.skipped.push((entry.clone(), status)),
        }
    }
}

/// Drives root resolution, catalog setup and the per-entry downloads
pub struct Runner<S> {
    config: FetcherConfig,
    manifest: Manifest,
    source: S,
}

impl<S: ImageSource> Runner<S> {
    pub fn new(config: FetcherConfig, source: S) -> Self {
        let manifest = config.manifest();
        Self {
            config,
            manifest,
            source,
        }
    }

    pub const fn config(&self) -> &FetcherConfig {
        &self.config
    }

    pub const fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Resolve the root, initialize the catalog and fetch every entry in order.
    ///
    /// Directory creation failures and transport faults abort the run.
    pub async fn run(&self) -> Result<RunReport> {
        let root = RootResolver::new(
            self.config.root_candidates.clone(),
            self.config.fallback_root.clone(),
        )
        .resolve()?;

        self.run_in(&root.path).await
    }

    /// Same as [`Runner::run`] with an already chosen root
    pub async fn run_in(&self, root: &Path) -> Result<RunReport> {
        let catalog = Catalog::initialize(root, &self.config.container).await?;
        self.fetch_all(&catalog).await
    }

    /// Fetch every manifest entry into `catalog`, pausing after each one
    pub async fn fetch_all(&self, catalog: &Catalog) -> Result<RunReport> {
        let mut report = RunReport {
            catalog: catalog.path().to_path_buf(),
            ..RunReport::default()
        };

        info!(
            "Fetching {} images into {}",
            self.manifest.len(),
            catalog.path().display()
        );

        for entry in &self.manifest {
            let outcome = self.fetch_entry(catalog, entry).await?;
            report.record(entry, outcome);

            tokio::time::sleep(self.config.delay()).await;
        }

        info!(
            "Fetch complete: {} downloaded, {} skipped",
            report.downloaded_count(),
            report.skipped_count()
        );

        Ok(report)
    }

    /// Process a single entry: create its image set, download, write descriptor
    pub async fn fetch_entry(
        &self,
        catalog: &Catalog,
        entry: &ManifestEntry,
    ) -> Result<FetchOutcome> {
        let dir = catalog.ensure_imageset(entry).await?;

        info!("Downloading image for {}", entry);
        debug!("Source URL: {}", self.source.url_for(entry));

        let fetched = self.source.fetch(entry).await?;
        if !fetched.is_success() {
            warn!(
                "Failed to download image for {}, status: {}",
                entry, fetched.status
            );
            return Ok(FetchOutcome::Skipped {
                status: fetched.status,
            });
        }

        let path = dir.join(entry.image_file_name(&self.config.image_extension));
        let bytes = Downloader::write_file(&path, &fetched.body).await?;
        catalog
            .write_imageset_descriptor(entry, &self.config.image_extension)
            .await?;

        info!("Downloaded image for {} ({} bytes)", entry, bytes);

        Ok(FetchOutcome::Downloaded { path, bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let mut report = RunReport::default();
        let a = ManifestEntry::new(1, "A");
        let b = ManifestEntry::new(2, "B");

        report.record(
            &a,
            FetchOutcome::Downloaded {
                path: PathBuf::from("001_A.png"),
                bytes: 3,
            },
        );
        report.record(&b, FetchOutcome::Skipped { status: 404 });

        assert_eq!(report.total(), 2);
        assert_eq!(report.downloaded_count(), 1);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.skipped[0], (b, 404));
        assert!(!report.is_complete());
    }
}
