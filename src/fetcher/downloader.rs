use super::{FetcherError, HttpClient, Result};
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Outcome of a single download
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Download {
    /// Body written to disk
    Saved { bytes: u64 },
    /// Server answered with a non-success status; nothing written
    Rejected { status: u16 },
}

/// Downloader for catalog assets
pub struct Downloader;

impl Downloader {
    /// Download `url` to `output_path`, overwriting any previous file
    pub async fn download(client: &HttpClient, url: &str, output_path: &Path) -> Result<Download> {
        let fetched = client.get_bytes(url).await?;
        if !fetched.is_success() {
            return Ok(Download::Rejected {
                status: fetched.status,
            });
        }

        let bytes = Self::write_file(output_path, &fetched.body).await?;
        Ok(Download::Saved { bytes })
    }

    /// Write `bytes` verbatim to `output_path`, creating parent directories
    pub async fn write_file(output_path: &Path, bytes: &[u8]) -> Result<u64> {
        if let Some(parent) = output_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| FetcherError::at(parent, e))?;
        }

        let mut file = tokio::fs::File::create(output_path)
            .await
            .map_err(|e| FetcherError::at(output_path, e))?;
        file.write_all(bytes)
            .await
            .map_err(|e| FetcherError::at(output_path, e))?;
        file.flush()
            .await
            .map_err(|e| FetcherError::at(output_path, e))?;

        Ok(bytes.len() as u64)
    }
}
