//! Price data access port trait.

use crate::domain::error::ConfluenceError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily bars for `symbol` within `[start_date, end_date]`, sorted by date.
    /// An unknown symbol or empty range yields an empty vector.
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, ConfluenceError>;

    fn list_symbols(&self) -> Result<Vec<String>, ConfluenceError>;

    /// First date, last date and bar count for `symbol`, if any data exists.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, ConfluenceError>;
}
