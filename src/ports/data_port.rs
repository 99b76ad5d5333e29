//! Data access port trait.

use crate::domain::error::RsiomaError;
use crate::domain::ohlcv::PriceBar;
use chrono::NaiveDate;

/// Source of daily bars for the one instrument under test.
pub trait DataPort {
    /// Bars within the inclusive window, sorted by date. `None` leaves that
    /// side of the window open.
    fn fetch_bars(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PriceBar>, RsiomaError>;

    /// First date, last date and bar count, or `None` when there is no data.
    fn get_data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, RsiomaError>;
}
