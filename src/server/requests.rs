//! Query string parameters

use crate::types::{Amount, CurrencyCode};
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RatesParams {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConvertParams {
    pub date: NaiveDate,
    pub source: CurrencyCode,
    pub target: CurrencyCode,
    pub amount: Amount,
}

/// Parameters shared by `/highest_rate` and `/average_rate`
#[derive(Debug, Clone, Deserialize)]
pub struct RangeParams {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub currency: CurrencyCode,
}
