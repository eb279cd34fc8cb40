mod catalog;
mod cries;
mod downloader;
mod manifest;
mod provider;
mod resolver;
mod runner;
mod settings;


pub use catalog::{Catalog, CatalogDescriptor, ImageSetDescriptor, ImageSetStatus, ImageVariant};
pub use cries::{CryFetcher, CryOutcome, CryReport};
pub use downloader::{Download, Downloader};
pub use manifest::{Manifest, ManifestEntry};
pub use provider::{FetchedImage, HttpClient, HttpImageSource, ImageSource};
pub use resolver::{ResolvedRoot, RootResolver};
pub use runner::{FetchOutcome, RunReport, Runner};
pub use settings::{CriesConfig, FetcherConfig, LogConfig, LogFormat};

use std::path::PathBuf;

/// Fetcher result type
pub type Result<T> = std::result::Result<T, FetcherError>;

/// Fetcher error types
#[derive(Debug, thiserror::Error)]
pub enum FetcherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO error at {}: {source}", path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] ::config::ConfigError),
}

impl FetcherError {
    /// Wrap an IO error with the path it happened on
    pub fn at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Path {
            path: path.into(),
            source,
        }
    }
}

/// Create a runner backed by the HTTP image source for a validated configuration
pub fn create_default_runner(config: FetcherConfig) -> Result<Runner<HttpImageSource>> {
    config.validate()?;
    let client = HttpClient::from_config(&config)?;
    let source = HttpImageSource::new(client, config.url_template.clone());
    Ok(Runner::new(config, source))
}
