use crate::fetcher::{FetchedImage, FetcherConfig, FetcherError, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// HTTP client wrapper shared by image and cry downloads
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client; `timeout` of `None` waits indefinitely
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        Self::build(&format!("xcasset-fetch/{}", env!("CARGO_PKG_VERSION")), timeout)
    }

    /// Create a client from the fetcher configuration
    pub fn from_config(config: &FetcherConfig) -> Result<Self> {
        Self::build(&config.user_agent, config.request_timeout())
    }

    fn build(user_agent: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(FetcherError::Network)?;

        Ok(Self { client })
    }

    /// GET `url` and return the status with the body of a successful response
    pub async fn get_bytes(&self, url: &str) -> Result<FetchedImage> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetcherError::Network)?;

        Self::handle_response(response).await
    }

    /// Collect the body of a successful response; other statuses keep an empty body
    async fn handle_response(response: reqwest::Response) -> Result<FetchedImage> {
        let status = response.status();

        if !status.is_success() {
            return Ok(FetchedImage::status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(FetcherError::Network)?;
        debug!("Received {} bytes", body.len());

        Ok(FetchedImage {
            status: status.as_u16(),
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response on a local port
    async fn serve_once(status_line: &'static str, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let head = format!(
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(body).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{addr}/sprites/1.png")
    }

    #[tokio::test]
    async fn test_success_returns_body_verbatim() {
        let url = serve_once("200 OK", b"PNGDATA").await;
        let client = HttpClient::new(Some(Duration::from_secs(5))).unwrap();

        let fetched = client.get_bytes(&url).await.unwrap();

        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body, b"PNGDATA");
    }

    #[tokio::test]
    async fn test_not_found_is_not_an_error() {
        let url = serve_once("404 Not Found", b"missing").await;
        let client = HttpClient::new(Some(Duration::from_secs(5))).unwrap();

        let fetched = client.get_bytes(&url).await.unwrap();

        assert_eq!(fetched.status, 404);
        assert!(fetched.body.is_empty());
        assert!(!fetched.is_success());
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpClient::new(Some(Duration::from_secs(5))).unwrap();
        let result = client.get_bytes(&format!("http://{addr}/x.png")).await;

        assert!(matches!(result, Err(FetcherError::Network(_))));
    }
}
