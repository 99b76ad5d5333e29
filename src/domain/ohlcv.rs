//! Daily price bars and the validated series the engine consumes.

use crate::domain::error::RsiomaError;
use chrono::NaiveDate;

const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PriceBar {
    fn has_positive_prices(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|p| p.is_finite() && *p > 0.0)
    }
}

/// Chronological, strictly increasing, positive-priced bars for one instrument.
///
/// Construction is the only place the invariants are checked; the engine
/// relies on them afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, RsiomaError> {
        if bars.is_empty() {
            return Err(RsiomaError::invalid_series("series is empty"));
        }

        for (i, bar) in bars.iter().enumerate() {
            if !bar.has_positive_prices() {
                return Err(RsiomaError::invalid_series(format!(
                    "non-positive price on {} (bar {})",
                    bar.date, i
                )));
            }
        }

        if let Some(i) = bars.windows(2).position(|w| w[1].date <= w[0].date) {
            return Err(RsiomaError::invalid_series(format!(
                "dates not strictly increasing: {} follows {} (bar {})",
                bars[i + 1].date,
                bars[i].date,
                i + 1
            )));
        }

        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> &PriceBar {
        &self.bars[0]
    }

    pub fn last(&self) -> &PriceBar {
        &self.bars[self.bars.len() - 1]
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// (last close - first open) / first open
    pub fn buy_hold_return(&self) -> f64 {
        let first_open = self.first().open;
        (self.last().close - first_open) / first_open
    }

    /// Annualized buy-and-hold return over the calendar span of the series.
    /// `None` for a single-day series.
    pub fn buy_hold_cagr(&self) -> Option<f64> {
        let days = (self.last().date - self.first().date).num_days();
        if days <= 0 {
            return None;
        }
        let years = days as f64 / DAYS_PER_YEAR;
        Some((1.0 + self.buy_hold_return()).powf(1.0 / years) - 1.0)
    }
}
