//! Exchange rate store and queries
//!
//! # Components
//!
//! - **table**: Immutable date-ordered rate table and its validating builder
//! - **query**: Point, conversion and range queries over a shared table
//!
//! # Example
//!
//! ```rust
//! use eurofx::rates::{DailyRates, QueryEngine, RateTable};
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//!
//! let date = NaiveDate::from_ymd_opt(2023, 5, 30).unwrap();
//! let table = RateTable::from_days(vec![DailyRates::from_pairs(
//!     date,
//!     vec![("USD", Decimal::new(10744, 4)), ("JPY", Decimal::new(15001, 2))],
//! )])
//! .unwrap();
//!
//! let engine = QueryEngine::new(Arc::new(table));
//! let conversion = engine
//!     .convert_currency(date, "USD", "JPY", Decimal::from(100))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(conversion.converted_amount, Decimal::new(1396221, 2));
//! ```

pub mod query;
pub mod table;

pub use query::{round_half_up, QueryEngine, RESULT_SCALE};
pub use table::{normalize_code, DailyRates, RateTable, RateTableBuilder};
