//! Rate ingestion
//!
//! Turns a remote or local source into a finished [`RateTable`]. Ingestion is
//! split in two narrow capabilities:
//!
//! - [`DataDownloader`]: source location -> raw bytes
//! - [`DataParser`]: raw bytes -> rate table
//!
//! [`ExchangeRateProvider`] composes one of each and runs once at startup.
//! Any failure here is fatal; a process must never serve a partial table.

pub mod archive;
pub mod csv_parser;
pub mod download;

pub use archive::{AutoDetectParser, ZipCsvParser};
pub use csv_parser::CsvRateParser;
pub use download::FileDownloader;
#[cfg(feature = "async")]
pub use download::{HttpDownloader, SourceDownloader};

use crate::error::{RatesError, Result};
use crate::rates::RateTable;
use std::future::Future;

/// Full history of the ECB euro foreign exchange reference rates
pub const ECB_HISTORY_URL: &str = "https://www.ecb.europa.eu/stats/eurofxref/eurofxref-hist.zip";

/// Produces raw bytes from a source location
pub trait DataDownloader: Send + Sync {
    /// Fetch the full payload found at `source`
    fn download(&self, source: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Decodes raw bytes into a rate table
pub trait DataParser: Send + Sync {
    fn parse(&self, bytes: &[u8]) -> Result<RateTable>;
}

/// Downloads and parses a rate source
pub struct ExchangeRateProvider<D, P> {
    downloader: D,
    parser: P,
    source: String,
}

impl<D: DataDownloader, P: DataParser> ExchangeRateProvider<D, P> {
    pub fn new(downloader: D, parser: P, source: impl Into<String>) -> Self {
        Self {
            downloader,
            parser,
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Load the complete rate table
    ///
    /// Fails with [`RatesError::NoDataFromSource`] if the source parses but
    /// holds no dated rows.
    pub async fn load_rates(&self) -> Result<RateTable> {
        log::info!("Loading exchange rates from {}", self.source);

        let bytes = self.downloader.download(&self.source).await?;
        log::debug!("Fetched {} bytes from {}", bytes.len(), self.source);

        let table = self.parser.parse(&bytes)?;
        if table.is_empty() {
            return Err(RatesError::NoDataFromSource(format!(
                "{} contained no rate rows",
                self.source
            )));
        }

        if let (Some(first), Some(last)) = (table.first_date(), table.last_date()) {
            log::info!(
                "Loaded {} days of rates from {} to {} covering {} currencies",
                table.len(),
                first,
                last,
                table.currencies().len()
            );
        }

        Ok(table)
    }
}

#[cfg(all(test, feature = "async"))]
mod tests {
    use super::*;
    use crate::rates::DailyRates;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    struct StaticDownloader(Vec<u8>);

    impl DataDownloader for StaticDownloader {
        fn download(&self, _source: &str) -> impl Future<Output = Result<Vec<u8>>> + Send {
            let bytes = self.0.clone();
            async move { Ok(bytes) }
        }
    }

    struct FailingDownloader;

    impl DataDownloader for FailingDownloader {
        fn download(&self, source: &str) -> impl Future<Output = Result<Vec<u8>>> + Send {
            let message = format!("unreachable: {}", source);
            async move { Err(RatesError::DownloadError(message)) }
        }
    }

    /// Ignores its input and returns a fixed table
    struct FixedParser(RateTable);

    impl DataParser for FixedParser {
        fn parse(&self, _bytes: &[u8]) -> Result<RateTable> {
            Ok(self.0.clone())
        }
    }

    fn one_day_table() -> RateTable {
        RateTable::from_days(vec![DailyRates::from_pairs(
            NaiveDate::from_ymd_opt(2023, 5, 30).unwrap(),
            vec![("USD", Decimal::new(10744, 4))],
        )])
        .unwrap()
    }

    #[tokio::test]
    async fn test_load_rates_composes_downloader_and_parser() {
        let provider = ExchangeRateProvider::new(
            StaticDownloader(b"ignored".to_vec()),
            FixedParser(one_day_table()),
            "memory://rates",
        );

        let table = provider.load_rates().await.unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(provider.source(), "memory://rates");
    }

    #[tokio::test]
    async fn test_empty_table_is_fatal() {
        let provider = ExchangeRateProvider::new(
            StaticDownloader(Vec::new()),
            FixedParser(RateTable::default()),
            "memory://empty",
        );

        let result = provider.load_rates().await;
        assert!(matches!(result, Err(RatesError::NoDataFromSource(_))));
    }

    #[tokio::test]
    async fn test_download_failure_propagates() {
        let provider = ExchangeRateProvider::new(FailingDownloader, FixedParser(one_day_table()), ECB_HISTORY_URL);

        let err = provider.load_rates().await.unwrap_err();
        assert!(matches!(err, RatesError::DownloadError(_)));
        assert!(err.to_string().contains(ECB_HISTORY_URL));
    }
}
