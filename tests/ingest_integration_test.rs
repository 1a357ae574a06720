//! End-to-end ingestion: history file on disk -> provider -> query engine

#![cfg(feature = "async")]

use chrono::NaiveDate;
use eurofx::error::RatesError;
use eurofx::ingest::{
    AutoDetectParser, CsvRateParser, ExchangeRateProvider, FileDownloader, SourceDownloader,
    ZipCsvParser,
};
use eurofx::rates::QueryEngine;
use rust_decimal_macros::dec;
use std::io::{Cursor, Write};
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use zip::write::FileOptions;
use zip::ZipWriter;

/// Layout of the published history: newest first, trailing empty column,
/// `N/A` for currencies not quoted that day
const HISTORY_CSV: &str = "\
Date,USD,JPY,BGN,CYP,GBP,
2023-05-30,1.0744,150.01,1.9558,N/A,0.86365,
2023-05-29,1.0715,150.29,1.9558,N/A,0.86805,
2023-05-26,1.0751,150.24,1.9558,N/A,0.86813,
2023-05-25,1.0735,149.63,1.9558,N/A,N/A,
2023-05-24,1.0785,149.3,1.9558,N/A,0.86993,
";

fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in entries {
        writer.start_file(*name, FileOptions::default()).unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn write_temp(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn path_of(file: &NamedTempFile) -> String {
    file.path().to_string_lossy().into_owned()
}

#[tokio::test]
async fn test_zip_history_loads_and_answers_queries() {
    let file = write_temp(&zip_bytes(&[("eurofxref-hist.csv", HISTORY_CSV)]));
    let provider = ExchangeRateProvider::new(FileDownloader, ZipCsvParser::new(), path_of(&file));

    let table = provider.load_rates().await.unwrap();
    assert_eq!(table.len(), 5);
    assert_eq!(table.first_date(), Some(date(2023, 5, 24)));
    assert_eq!(table.last_date(), Some(date(2023, 5, 30)));

    // CYP is N/A on every row and never appears
    let currencies: Vec<&str> = table.currencies().into_iter().collect();
    assert_eq!(currencies, vec!["BGN", "GBP", "JPY", "USD"]);

    let engine = QueryEngine::new(Arc::new(table));
    let conversion = engine
        .convert_currency(date(2023, 5, 30), "USD", "JPY", dec!(100))
        .unwrap()
        .unwrap();
    assert_eq!(conversion.converted_amount, dec!(13962.21));

    let highest = engine
        .highest_rate(date(2023, 5, 24), date(2023, 5, 30), "GBP")
        .unwrap()
        .unwrap();
    assert_eq!(highest.highest_rate, dec!(0.86993));

    let average = engine
        .average_rate(date(2023, 5, 26), date(2023, 5, 30), "USD")
        .unwrap()
        .unwrap();
    assert_eq!(average.average_rate, dec!(1.07));
}

#[tokio::test]
async fn test_multi_entry_archive_uses_first_entry() {
    let file = write_temp(&zip_bytes(&[
        ("eurofxref-hist.csv", HISTORY_CSV),
        ("README.txt", "not a rate file"),
    ]));
    let provider = ExchangeRateProvider::new(FileDownloader, ZipCsvParser::new(), path_of(&file));

    let table = provider.load_rates().await.unwrap();
    assert_eq!(table.len(), 5);
}

#[tokio::test]
async fn test_auto_detect_plain_csv_source() {
    let file = write_temp(HISTORY_CSV.as_bytes());
    let source = path_of(&file);

    let downloader = SourceDownloader::for_source(&source, Duration::from_secs(5), 0).unwrap();
    assert!(matches!(downloader, SourceDownloader::File(_)));

    let provider = ExchangeRateProvider::new(downloader, AutoDetectParser::new(), source);
    let table = provider.load_rates().await.unwrap();
    assert_eq!(table.len(), 5);
    assert_eq!(table.get(date(2023, 5, 25)).unwrap().rate("GBP"), None);
}

#[tokio::test]
async fn test_empty_archive_is_no_data() {
    let file = write_temp(&zip_bytes(&[]));
    let provider = ExchangeRateProvider::new(FileDownloader, ZipCsvParser::new(), path_of(&file));

    let result = provider.load_rates().await;
    assert!(matches!(result, Err(RatesError::NoDataFromSource(_))));
}

#[tokio::test]
async fn test_header_only_csv_is_no_data() {
    let file = write_temp(b"Date,USD,JPY,\n");
    let provider = ExchangeRateProvider::new(FileDownloader, CsvRateParser::new(), path_of(&file));

    let result = provider.load_rates().await;
    assert!(matches!(result, Err(RatesError::NoDataFromSource(_))));
}

#[tokio::test]
async fn test_missing_file_is_download_error() {
    let provider = ExchangeRateProvider::new(
        FileDownloader,
        AutoDetectParser::new(),
        "/nonexistent/eurofxref-hist.zip",
    );

    let result = provider.load_rates().await;
    assert!(matches!(result, Err(RatesError::DownloadError(_))));
}

#[tokio::test]
async fn test_malformed_rate_is_parse_error() {
    let file = write_temp(b"Date,USD,\n2023-05-30,abc,\n");
    let provider = ExchangeRateProvider::new(FileDownloader, CsvRateParser::new(), path_of(&file));

    let result = provider.load_rates().await;
    assert!(matches!(result, Err(RatesError::ParseError(_))));
}
