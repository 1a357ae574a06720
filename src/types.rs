//! Core types and query results

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Rate type: units of a currency per one unit of the base currency
pub type Rate = Decimal;

/// Money amount type
pub type Amount = Decimal;

/// Currency code as it appears in the source header (e.g. "USD")
pub type CurrencyCode = String;

/// Base currency of every rate published by the ECB
pub const BASE_CURRENCY: &str = "EUR";

/// Result of converting an amount between two currencies on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyConversion {
    pub source_currency: CurrencyCode,
    pub target_currency: CurrencyCode,
    pub source_amount: Amount,
    pub conversion_date: NaiveDate,
    pub converted_amount: Amount,
}

impl CurrencyConversion {
    /// Create a new conversion result
    pub fn new(
        source_currency: CurrencyCode,
        target_currency: CurrencyCode,
        source_amount: Amount,
        conversion_date: NaiveDate,
        converted_amount: Amount,
    ) -> Self {
        Self {
            source_currency,
            target_currency,
            source_amount,
            conversion_date,
            converted_amount,
        }
    }
}

/// Highest rate of a currency over an inclusive date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyHighestRate {
    pub currency: CurrencyCode,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub highest_rate: Rate,
}

/// Average rate of a currency over an inclusive date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyAverageRate {
    pub currency: CurrencyCode,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub average_rate: Rate,
}
