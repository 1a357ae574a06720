//! ZIP archive handling
//!
//! The ECB publishes its history as a ZIP holding a single CSV file.

use super::csv_parser::CsvRateParser;
use super::DataParser;
use crate::error::{RatesError, Result};
use crate::rates::RateTable;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Logged when the archive holds more than the expected single file
pub const ARCHIVE_CHANGED_WARNING: &str =
    "The contents of the zip archive has changed. Please check the data source.";

/// Upper bound on the buffer reserved from an entry's declared size
const MAX_PREALLOC: usize = 64 * 1024 * 1024;

/// Local file header and empty-archive signatures
const ZIP_MAGIC: [&[u8]; 2] = [b"PK\x03\x04", b"PK\x05\x06"];

/// Extracts the first archive entry and hands it to an inner parser
///
/// Only one file is expected. Extra entries are skipped with a warning so a
/// change on the publisher's side does not take the service down.
#[derive(Debug, Clone, Default)]
pub struct ZipCsvParser<P = CsvRateParser> {
    inner: P,
}

impl ZipCsvParser<CsvRateParser> {
    pub fn new() -> Self {
        Self {
            inner: CsvRateParser::new(),
        }
    }
}

impl<P: DataParser> ZipCsvParser<P> {
    pub fn with_parser(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: DataParser> DataParser for ZipCsvParser<P> {
    fn parse(&self, bytes: &[u8]) -> Result<RateTable> {
        if bytes.is_empty() {
            return Err(RatesError::NoDataFromSource(
                "downloaded archive is empty".to_string(),
            ));
        }

        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        if archive.len() == 0 {
            return Err(RatesError::NoDataFromSource(
                "No files found from the zip file".to_string(),
            ));
        }
        if archive.len() > 1 {
            log::warn!("{}", ARCHIVE_CHANGED_WARNING);
        }

        let mut entry = archive.by_index(0)?;
        log::debug!("Reading {} ({} bytes) from archive", entry.name(), entry.size());

        let mut contents = Vec::with_capacity(prealloc_hint(entry.size()));
        entry.read_to_end(&mut contents)?;

        self.inner.parse(&contents)
    }
}

/// Capacity to reserve for an entry; the declared size is not trusted
fn prealloc_hint(declared: u64) -> usize {
    usize::try_from(declared).map_or(MAX_PREALLOC, |size| size.min(MAX_PREALLOC))
}

/// Chooses ZIP or plain CSV decoding by looking at the payload
#[derive(Debug, Clone, Default)]
pub struct AutoDetectParser {
    zip: ZipCsvParser,
    csv: CsvRateParser,
}

impl AutoDetectParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_zip(bytes: &[u8]) -> bool {
        ZIP_MAGIC.iter().any(|magic| bytes.starts_with(magic))
    }
}

impl DataParser for AutoDetectParser {
    fn parse(&self, bytes: &[u8]) -> Result<RateTable> {
        if Self::is_zip(bytes) {
            self.zip.parse(bytes)
        } else {
            self.csv.parse(bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    const CSV: &str = "Date,USD,GBP,\n2023-05-30,1.0744,0.86365,\n2023-05-25,1.0735,N/A,\n";

    fn zip_of(files: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, contents) in files {
            writer.start_file(*name, FileOptions::default()).unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_parse_single_entry_archive() {
        let bytes = zip_of(&[("eurofxref-hist.csv", CSV)]);

        let table = ZipCsvParser::new().parse(&bytes).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table
            .get(NaiveDate::from_ymd_opt(2023, 5, 25).unwrap())
            .unwrap()
            .rate("GBP")
            .is_none());
    }

    #[test]
    fn test_extra_entries_are_ignored() {
        let bytes = zip_of(&[("eurofxref-hist.csv", CSV), ("readme.txt", "not a csv")]);

        let table = ZipCsvParser::new().parse(&bytes).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_empty_payload_and_archive() {
        let result = ZipCsvParser::new().parse(&[]);
        assert!(matches!(result, Err(RatesError::NoDataFromSource(_))));

        let empty_archive = zip_of(&[]);
        let result = ZipCsvParser::new().parse(&empty_archive);
        assert!(matches!(result, Err(RatesError::NoDataFromSource(_))));
    }

    #[test]
    fn test_prealloc_hint_is_capped() {
        assert_eq!(prealloc_hint(1024), 1024);
        assert_eq!(prealloc_hint(u64::MAX), MAX_PREALLOC);
        assert_eq!(prealloc_hint(MAX_PREALLOC as u64 + 1), MAX_PREALLOC);
    }

    #[test]
    fn test_garbage_is_a_zip_error() {
        let result = ZipCsvParser::new().parse(b"PK\x03\x04 definitely not a zip");
        assert!(matches!(result, Err(RatesError::ZipError(_))));
    }

    #[test]
    fn test_auto_detect() {
        let zipped = zip_of(&[("eurofxref-hist.csv", CSV)]);
        assert!(AutoDetectParser::is_zip(&zipped));
        assert!(!AutoDetectParser::is_zip(CSV.as_bytes()));

        let parser = AutoDetectParser::new();
        assert_eq!(parser.parse(&zipped).unwrap().len(), 2);
        assert_eq!(parser.parse(CSV.as_bytes()).unwrap().len(), 2);
    }
}
