//! Cry audio downloads for manifest entries

use super::{
    CriesConfig, Download, Downloader, FetcherError, HttpClient, Manifest, ManifestEntry, Result,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Result of one cry download
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryOutcome {
    Saved { path: PathBuf, bytes: u64 },
    /// File was already on disk; no request made
    AlreadyPresent { path: PathBuf },
    Rejected { status: u16 },
    /// Transport fault, logged and isolated to this entry
    Failed { reason: String },
    /// Entry has no cry slug
    NoSlug,
}

#[derive(Debug, Default)]
pub struct CryReport {
    pub results: Vec<(ManifestEntry, CryOutcome)>,
}

impl CryReport {
    pub fn saved_count(&self) -> usize {
        self.count(|o| matches!(o, CryOutcome::Saved { .. }))
    }

    pub fn present_count(&self) -> usize {
        self.count(|o| matches!(o, CryOutcome::AlreadyPresent { .. }))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, CryOutcome::Rejected { .. } | CryOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&CryOutcome) -> bool) -> usize {
        self.results.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Downloads `<stem>.mp3` cries into a flat directory
pub struct CryFetcher {
    client: HttpClient,
    config: CriesConfig,
    delay: Duration,
}

impl CryFetcher {
    pub const fn new(client: HttpClient, config: CriesConfig, delay: Duration) -> Self {
        Self {
            client,
            config,
            delay,
        }
    }

    /// URL for a cry slug
    #[must_use]
    pub fn url_for(&self, slug: &str) -> String {
        self.config
            .url_template
            .replace("{slug}", &slug.to_lowercase())
    }

    #[must_use]
    pub fn path_for(&self, entry: &ManifestEntry) -> PathBuf {
        self.config
            .directory
            .join(format!("{}.mp3", entry.stem()))
    }

    /// Download every missing cry in manifest order
    pub async fn fetch_all(&self, manifest: &Manifest) -> Result<CryReport> {
        tokio::fs::create_dir_all(&self.config.directory)
            .await
            .map_err(|e| FetcherError::at(&self.config.directory, e))?;

        info!("Fetching cries into {}", self.config.directory.display());

        let mut report = CryReport::default();
        for entry in manifest {
            let outcome = self.fetch_entry(entry).await?;
            let requested = matches!(
                outcome,
                CryOutcome::Saved { .. } | CryOutcome::Rejected { .. } | CryOutcome::Failed { .. }
            );
            report.results.push((entry.clone(), outcome));

            if requested {
                tokio::time::sleep(self.delay).await;
            }
        }

        info!(
            "Cries complete: {} saved, {} already present, {} failed",
            report.saved_count(),
            report.present_count(),
            report.failed_count()
        );

        Ok(report)
    }

    /// Download one cry unless it is already on disk.
    ///
    /// Only filesystem errors are returned; network problems become outcomes.
    pub async fn fetch_entry(&self, entry: &ManifestEntry) -> Result<CryOutcome> {
        let Some(slug) = entry.cry.as_deref() else {
            return Ok(CryOutcome::NoSlug);
        };

        let path = self.path_for(entry);
        if path.exists() {
            info!("Cry already present: {}", path.display());
            return Ok(CryOutcome::AlreadyPresent { path });
        }

        let url = self.url_for(slug);
        info!("Downloading cry for {} from {}", entry, url);

        match Downloader::download(&self.client, &url, &path).await {
            Ok(Download::Saved { bytes }) => {
                info!("Downloaded cry {} ({} bytes)", path.display(), bytes);
                Ok(CryOutcome::Saved { path, bytes })
            }
            Ok(Download::Rejected { status }) => {
                warn!("Failed to download cry for {}, status: {}", entry, status);
                Ok(CryOutcome::Rejected { status })
            }
            Err(FetcherError::Network(e)) => {
                warn!("Failed to download cry for {}: {}", entry, e);
                Ok(CryOutcome::Failed {
                    reason: e.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }
}
