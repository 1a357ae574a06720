//! In-memory rate table
//!
//! Date-ordered storage of the daily reference rates. The table is built once
//! by ingestion and read-only afterwards, so it carries no locks and can be
//! shared across threads behind an `Arc`.

use crate::error::{RatesError, Result};
use crate::types::Rate;
use chrono::NaiveDate;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Stored form of a currency code: trimmed and upper-case
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// All rates published for one calendar date
///
/// A currency missing from `rates` means the source had no data for it on
/// that date. Codes are normalized on construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRates {
    date: NaiveDate,
    rates: HashMap<String, Rate>,
}

impl DailyRates {
    /// Create the rates for a date
    pub fn new(date: NaiveDate, rates: HashMap<String, Rate>) -> Self {
        Self::from_pairs(date, rates)
    }

    /// Build from `(code, rate)` pairs
    pub fn from_pairs<I, S>(date: NaiveDate, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Rate)>,
        S: Into<String>,
    {
        Self {
            date,
            rates: pairs
                .into_iter()
                .map(|(code, rate)| {
                    let code: String = code.into();
                    (normalize_code(&code), rate)
                })
                .collect(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Rate for a currency, if published on this date
    pub fn rate(&self, currency: &str) -> Option<Rate> {
        self.rates.get(currency).copied()
    }

    pub fn rates(&self) -> &HashMap<String, Rate> {
        &self.rates
    }

    pub fn currencies(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Date-indexed table of daily rates
///
/// # Example
/// ```
/// use eurofx::rates::{DailyRates, RateTable};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let date = NaiveDate::from_ymd_opt(2023, 5, 30).unwrap();
/// let table = RateTable::from_days(vec![DailyRates::from_pairs(
///     date,
///     vec![("USD", Decimal::new(10744, 4))],
/// )])
/// .unwrap();
///
/// assert_eq!(table.get(date).unwrap().rate("USD"), Some(Decimal::new(10744, 4)));
/// assert!(table.get(date.pred_opt().unwrap()).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    days: BTreeMap<NaiveDate, DailyRates>,
}

impl RateTable {
    /// Start building a table
    pub fn builder() -> RateTableBuilder {
        RateTableBuilder::new()
    }

    /// Build a table from daily entries, validating each one
    pub fn from_days<I>(days: I) -> Result<Self>
    where
        I: IntoIterator<Item = DailyRates>,
    {
        let mut builder = RateTableBuilder::new();
        for day in days {
            builder.add_day(day)?;
        }
        Ok(builder.build())
    }

    /// Exact lookup by date
    pub fn get(&self, date: NaiveDate) -> Option<&DailyRates> {
        self.days.get(&date)
    }

    /// Entries between `start` and `end`, both inclusive, in ascending date order
    ///
    /// Dates without an entry are skipped. An inverted range yields nothing;
    /// callers are expected to reject it before asking.
    pub fn range(&self, start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = &DailyRates> + '_ {
        // BTreeMap::range panics when start > end
        let days = if start <= end {
            Some(self.days.range(start..=end))
        } else {
            None
        };
        days.into_iter().flatten().map(|(_, day)| day)
    }

    /// Number of dates in the table
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.keys().next_back().copied()
    }

    /// Every currency code seen on any date, sorted
    pub fn currencies(&self) -> BTreeSet<&str> {
        self.days.values().flat_map(DailyRates::currencies).collect()
    }

    /// Iterate over all entries in ascending date order
    pub fn iter(&self) -> impl Iterator<Item = &DailyRates> + '_ {
        self.days.values()
    }
}

/// Validating builder for [`RateTable`]
#[derive(Debug, Default)]
pub struct RateTableBuilder {
    days: BTreeMap<NaiveDate, DailyRates>,
}

impl RateTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the rates for one date
    ///
    /// Fails on a date that was already added or on a rate that is zero or
    /// negative.
    pub fn add_day(&mut self, day: DailyRates) -> Result<()> {
        if self.days.contains_key(&day.date) {
            return Err(RatesError::DuplicateDate(day.date));
        }

        if let Some((currency, rate)) = day.rates.iter().find(|(_, rate)| **rate <= Rate::ZERO) {
            return Err(RatesError::InvalidRate {
                date: day.date,
                currency: currency.clone(),
                rate: *rate,
            });
        }

        self.days.insert(day.date, day);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn build(self) -> RateTable {
        RateTable { days: self.days }
    }
}
