pub mod http;

pub use http::HttpClient;

use crate::fetcher::{ManifestEntry, Result};
use async_trait::async_trait;

/// Response of a single image request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    /// Numeric HTTP status
    pub status: u16,
    /// Response body, empty unless the status is a success
    pub body: Vec<u8>,
}

impl FetchedImage {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub const fn status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Where the fetch loop gets image bytes from
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// URL requested for `entry`
    fn url_for(&self, entry: &ManifestEntry) -> String;

    /// Issue one request for `entry`.
    ///
    /// A non-success status is returned as data; only transport faults are errors.
    async fn fetch(&self, entry: &ManifestEntry) -> Result<FetchedImage>;
}

/// `ImageSource` that GETs a URL built from a `{id}` template
#[derive(Clone)]
pub struct HttpImageSource {
    client: HttpClient,
    url_template: String,
}

impl HttpImageSource {
    pub fn new(client: HttpClient, url_template: impl Into<String>) -> Self {
        Self {
            client,
            url_template: url_template.into(),
        }
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    fn url_for(&self, entry: &ManifestEntry) -> String {
        self.url_template.replace("{id}", &entry.id.to_string())
    }

    async fn fetch(&self, entry: &ManifestEntry) -> Result<FetchedImage> {
        self.client.get_bytes(&self.url_for(entry)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_template_uses_unpadded_id() {
        let client = HttpClient::new(None).unwrap();
        let source = HttpImageSource::new(client, "https://host/sprites/{id}.png");

        assert_eq!(
            source.url_for(&ManifestEntry::new(7, "Squirtle")),
            "https://host/sprites/7.png"
        );
        assert_eq!(
            source.url_for(&ManifestEntry::new(150, "Mewtwo")),
            "https://host/sprites/150.png"
        );
    }

    #[test]
    fn test_success_range() {
        assert!(FetchedImage::ok(b"x".to_vec()).is_success());
        assert!(FetchedImage::status(204).is_success());
        assert!(!FetchedImage::status(301).is_success());
        assert!(!FetchedImage::status(404).is_success());
    }
}
