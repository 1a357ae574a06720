//! Downloaders for rate sources

use super::DataDownloader;
use crate::error::{RatesError, Result};
use std::future::Future;
use std::path::Path;

#[cfg(feature = "async")]
use reqwest::{Client, StatusCode};
#[cfg(feature = "async")]
use std::time::Duration;

#[cfg(feature = "async")]
const DEFAULT_TIMEOUT_SECS: u64 = 30;
#[cfg(feature = "async")]
const MAX_RETRIES: u32 = 3;
#[cfg(feature = "async")]
const RETRY_DELAY_MS: u64 = 1000;

/// Reads a source from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDownloader;

impl DataDownloader for FileDownloader {
    fn download(&self, source: &str) -> impl Future<Output = Result<Vec<u8>>> + Send {
        let path = Path::new(source).to_path_buf();
        async move {
            #[cfg(feature = "async")]
            let bytes = tokio::fs::read(&path).await;
            #[cfg(not(feature = "async"))]
            let bytes = std::fs::read(&path);

            bytes.map_err(|e| {
                RatesError::DownloadError(format!("Failed to read {}: {}", path.display(), e))
            })
        }
    }
}

/// Whether a failed response status is worth another attempt
#[cfg(feature = "async")]
fn is_transient(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

/// One failed fetch attempt
#[cfg(feature = "async")]
struct FetchFailure {
    error: RatesError,
    retryable: bool,
}

#[cfg(feature = "async")]
impl FetchFailure {
    fn transient(error: RatesError) -> Self {
        Self {
            error,
            retryable: true,
        }
    }
}

/// Fetches a source over HTTP(S)
///
/// Connection errors, 5xx and 429 responses are retried; any other error
/// status fails immediately.
#[cfg(feature = "async")]
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
}

#[cfg(feature = "async")]
impl HttpDownloader {
    /// Create a downloader with the default timeout and retry policy
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("eurofx/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RatesError::DownloadError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
        })
    }

    /// Override the retry policy; the delay grows linearly with each attempt
    pub fn with_retries(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    async fn fetch_once(&self, url: &str) -> std::result::Result<Vec<u8>, FetchFailure> {
        let response = self.client.get(url).send().await.map_err(|e| {
            FetchFailure::transient(RatesError::DownloadError(format!("HTTP request failed: {}", e)))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure {
                error: RatesError::DownloadError(format!("{} returned {}", url, status)),
                retryable: is_transient(status),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            FetchFailure::transient(RatesError::DownloadError(format!("Failed to read response: {}", e)))
        })?;

        Ok(body.to_vec())
    }
}

#[cfg(feature = "async")]
impl DataDownloader for HttpDownloader {
    fn download(&self, source: &str) -> impl Future<Output = Result<Vec<u8>>> + Send {
        async move {
            let mut retries = 0;
            loop {
                match self.fetch_once(source).await {
                    Ok(bytes) => return Ok(bytes),
                    Err(failure) if failure.retryable && retries < self.max_retries => {
                        retries += 1;
                        log::warn!(
                            "Download of {} failed (attempt {}/{}): {}",
                            source,
                            retries,
                            self.max_retries + 1,
                            failure.error
                        );
                        tokio::time::sleep(self.retry_delay * retries).await;
                    }
                    Err(failure) => return Err(failure.error),
                }
            }
        }
    }
}

/// Picks HTTP or filesystem access from the shape of the source string
#[cfg(feature = "async")]
#[derive(Debug, Clone)]
pub enum SourceDownloader {
    Http(HttpDownloader),
    File(FileDownloader),
}

#[cfg(feature = "async")]
impl SourceDownloader {
    /// `http://` and `https://` sources go over the network, anything else is a path
    pub fn for_source(source: &str, timeout: Duration, max_retries: u32) -> Result<Self> {
        if Self::is_remote(source) {
            let http = HttpDownloader::with_timeout(timeout)?
                .with_retries(max_retries, Duration::from_millis(RETRY_DELAY_MS));
            Ok(SourceDownloader::Http(http))
        } else {
            Ok(SourceDownloader::File(FileDownloader))
        }
    }

    pub fn is_remote(source: &str) -> bool {
        let lower = source.trim().to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    }
}

#[cfg(feature = "async")]
impl DataDownloader for SourceDownloader {
    fn download(&self, source: &str) -> impl Future<Output = Result<Vec<u8>>> + Send {
        async move {
            match self {
                SourceDownloader::Http(http) => http.download(source).await,
                SourceDownloader::File(file) => file.download(source).await,
            }
        }
    }
}
