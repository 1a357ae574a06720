//! # eurofx
//!
//! European Central Bank daily reference rates, loaded once into memory and
//! queried by date, by currency pair, or over a date range.
//!
//! All rates are quoted against the euro ("units of currency per 1 EUR"). The
//! rate table is built at startup by the ingestion layer and never changes
//! afterwards, so any number of queries can run against it concurrently.
//!
//! ## Example
//!
//! ```rust,no_run
//! use eurofx::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run() -> eurofx::error::Result<()> {
//! let provider = ExchangeRateProvider::new(
//!     HttpDownloader::new()?,
//!     ZipCsvParser::new(),
//!     ECB_HISTORY_URL,
//! );
//! let engine = QueryEngine::new(Arc::new(provider.load_rates().await?));
//!
//! let date = chrono::NaiveDate::from_ymd_opt(2023, 5, 30).unwrap();
//! if let Some(conversion) = engine.convert_currency(date, "USD", "JPY", 100.into())? {
//!     println!("{}", conversion.converted_amount);
//! }
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "cli")]
pub mod config;
pub mod error;
pub mod ingest;
pub mod rates;
#[cfg(feature = "server")]
pub mod server;
pub mod types;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::error::{RatesError, Result};
    #[cfg(feature = "async")]
    pub use crate::ingest::HttpDownloader;
    pub use crate::ingest::{
        AutoDetectParser, CsvRateParser, DataDownloader, DataParser, ExchangeRateProvider,
        FileDownloader, ZipCsvParser, ECB_HISTORY_URL,
    };
    pub use crate::rates::{DailyRates, QueryEngine, RateTable};
    pub use crate::types::*;
}
