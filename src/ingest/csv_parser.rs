//! CSV decoding of the ECB reference rate history
//!
//! Expected layout: a header row `Date,USD,JPY,...` followed by one row per
//! business day. The ECB file pads cells with spaces, ends every line with a
//! trailing comma and writes `N/A` where a currency was not quoted.

use super::DataParser;
use crate::error::{RatesError, Result};
use crate::rates::{DailyRates, RateTable};
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use hashbrown::HashMap;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Cell value meaning "no data for this currency on this date"
pub const MISSING_VALUE: &str = "N/A";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses the ECB history CSV into a rate table
#[derive(Debug, Clone)]
pub struct CsvRateParser {
    missing_value: String,
}

impl CsvRateParser {
    pub fn new() -> Self {
        Self {
            missing_value: MISSING_VALUE.to_string(),
        }
    }

    /// Use a different marker for missing cells
    pub fn with_missing_value(missing_value: impl Into<String>) -> Self {
        Self {
            missing_value: missing_value.into(),
        }
    }

    fn is_missing(&self, cell: &str) -> bool {
        cell.is_empty() || cell.eq_ignore_ascii_case(&self.missing_value)
    }
}

impl Default for CsvRateParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DataParser for CsvRateParser {
    fn parse(&self, bytes: &[u8]) -> Result<RateTable> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(RatesError::NoDataFromSource(
                "CSV source is empty".to_string(),
            ));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(bytes);

        // Column 0 is the date; empty header cells come from the trailing comma
        let currencies: Vec<Option<String>> = reader
            .headers()?
            .iter()
            .skip(1)
            .map(|h| (!h.is_empty()).then(|| h.to_uppercase()))
            .collect();

        if currencies.iter().all(Option::is_none) {
            return Err(RatesError::ParseError(
                "header row names no currencies".to_string(),
            ));
        }

        let mut builder = RateTable::builder();
        for (idx, record) in reader.records().enumerate() {
            let record = record?;
            // +2: one-based, header on line 1
            let line = idx + 2;

            let raw_date = record.get(0).unwrap_or_default();
            if raw_date.is_empty() {
                log::debug!("Skipping line {} without a date", line);
                continue;
            }
            let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT).map_err(|e| {
                RatesError::ParseError(format!("line {}: invalid date '{}': {}", line, raw_date, e))
            })?;

            let mut rates = HashMap::new();
            for (cell, currency) in record.iter().skip(1).zip(&currencies) {
                let Some(currency) = currency else { continue };
                if self.is_missing(cell) {
                    continue;
                }
                let rate = Decimal::from_str(cell).map_err(|e| {
                    RatesError::ParseError(format!(
                        "line {}: invalid {} rate '{}': {}",
                        line, currency, cell, e
                    ))
                })?;
                rates.insert(currency.clone(), rate);
            }

            builder.add_day(DailyRates::new(date, rates))?;
        }

        log::debug!("Parsed {} dated rows from CSV", builder.len());
        Ok(builder.build())
    }
}
