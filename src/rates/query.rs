//! Query engine over a rate table
//!
//! Point lookup, conversion, and highest/average over an inclusive date range.
//! Every query returns `Ok(None)` when the table holds no matching data; an
//! inverted date range is the only rejected input.

use super::table::{normalize_code, DailyRates, RateTable};
use crate::error::{RatesError, Result};
use crate::types::{Amount, CurrencyAverageRate, CurrencyConversion, CurrencyHighestRate, Rate};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;

/// Fractional digits kept in converted amounts and averages
pub const RESULT_SCALE: u32 = 2;

/// Round to [`RESULT_SCALE`] places, ties away from zero (0.125 -> 0.13)
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(RESULT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Read-only query engine
///
/// Holds a shared reference to a finished [`RateTable`]. Cloning is cheap and
/// clones share the same table.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    table: Arc<RateTable>,
}

impl QueryEngine {
    pub fn new(table: Arc<RateTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RateTable {
        &self.table
    }

    /// All rates published on `date`
    pub fn rates_for_date(&self, date: NaiveDate) -> Option<&DailyRates> {
        self.table.get(date)
    }

    /// Convert `amount` of `source` into `target` using the rates of `date`
    ///
    /// converted = amount * target_rate / source_rate, rounded half-up to two
    /// places. Returns `Ok(None)` if the date or either currency is missing.
    pub fn convert_currency(
        &self,
        date: NaiveDate,
        source: &str,
        target: &str,
        amount: Amount,
    ) -> Result<Option<CurrencyConversion>> {
        let source = normalize_code(source);
        let target = normalize_code(target);

        let day = match self.table.get(date) {
            Some(day) => day,
            None => return Ok(None),
        };
        let (source_rate, target_rate) = match (day.rate(&source), day.rate(&target)) {
            (Some(s), Some(t)) => (s, t),
            _ => return Ok(None),
        };

        let converted = amount
            .checked_mul(target_rate)
            .and_then(|v| v.checked_div(source_rate))
            .ok_or_else(|| {
                RatesError::Overflow(format!(
                    "converting {} {} to {} on {}",
                    amount, source, target, date
                ))
            })?;

        Ok(Some(CurrencyConversion::new(
            source,
            target,
            amount,
            date,
            round_half_up(converted),
        )))
    }

    /// Highest rate of `currency` between `start` and `end` inclusive
    ///
    /// Dates without a rate for the currency are skipped. The rate is reported
    /// as published, without rounding.
    pub fn highest_rate(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        currency: &str,
    ) -> Result<Option<CurrencyHighestRate>> {
        validate_range(start, end)?;
        let currency = normalize_code(currency);

        let highest = self.rates_in_range(start, end, &currency).max();

        Ok(highest.map(|highest_rate| CurrencyHighestRate {
            currency,
            start_date: start,
            end_date: end,
            highest_rate,
        }))
    }

    /// Mean rate of `currency` between `start` and `end` inclusive, rounded
    /// half-up to two places
    pub fn average_rate(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        currency: &str,
    ) -> Result<Option<CurrencyAverageRate>> {
        validate_range(start, end)?;
        let currency = normalize_code(currency);

        let (sum, count) = self
            .rates_in_range(start, end, &currency)
            .try_fold((Decimal::ZERO, 0u32), |(sum, count), rate| {
                sum.checked_add(rate).map(|sum| (sum, count + 1))
            })
            .ok_or_else(|| RatesError::Overflow(format!("summing {} rates", currency)))?;

        if count == 0 {
            return Ok(None);
        }

        let mean = sum
            .checked_div(Decimal::from(count))
            .ok_or_else(|| RatesError::Overflow(format!("averaging {} rates", currency)))?;

        Ok(Some(CurrencyAverageRate {
            currency,
            start_date: start,
            end_date: end,
            average_rate: round_half_up(mean),
        }))
    }

    /// Published rates of one currency in an inclusive range, gaps skipped
    fn rates_in_range<'a>(
        &'a self,
        start: NaiveDate,
        end: NaiveDate,
        currency: &'a str,
    ) -> impl Iterator<Item = Rate> + 'a {
        self.table
            .range(start, end)
            .filter_map(move |day| day.rate(currency))
    }
}

fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end < start {
        return Err(RatesError::InvalidDateRange { start, end });
    }
    Ok(())
}
