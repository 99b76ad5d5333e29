#![allow(dead_code)]

use chrono::NaiveDate;
use rsioma::domain::error::RsiomaError;
pub use rsioma::domain::ohlcv::{PriceBar, PriceSeries};
use rsioma::domain::strategy::StrategyConfig;
use rsioma::ports::data_port::DataPort;

pub struct MockDataPort {
    pub bars: Vec<PriceBar>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new(bars: Vec<PriceBar>) -> Self {
        Self { bars, error: None }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            bars: Vec::new(),
            error: Some(reason.to_string()),
        }
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PriceBar>, RsiomaError> {
        if let Some(reason) = &self.error {
            return Err(RsiomaError::DataLoad {
                reason: reason.clone(),
            });
        }
        Ok(self
            .bars
            .iter()
            .filter(|b| start_date.is_none_or(|s| b.date >= s))
            .filter(|b| end_date.is_none_or(|e| b.date <= e))
            .copied()
            .collect())
    }

    fn get_data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, RsiomaError> {
        Ok(match (self.bars.first(), self.bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, self.bars.len())),
            _ => None,
        })
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Consecutive daily bars from 2024-01-01, one per `(open, close)` pair.
pub fn bars_from(rows: &[(f64, f64)]) -> Vec<PriceBar> {
    let start = date("2024-01-01");
    rows.iter()
        .enumerate()
        .map(|(i, &(open, close))| PriceBar {
            date: start + chrono::Duration::days(i as i64),
            open,
            high: open.max(close) * 1.01,
            low: open.min(close) * 0.99,
            close,
        })
        .collect()
}

/// Bars that open at the previous close.
pub fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
    let rows: Vec<(f64, f64)> = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| (if i == 0 { c } else { closes[i - 1] }, c))
        .collect();
    bars_from(&rows)
}

pub fn series_from(rows: &[(f64, f64)]) -> PriceSeries {
    PriceSeries::new(bars_from(rows)).unwrap()
}

/// Small periods so short hand-built series reach steady state.
pub fn fast_config() -> StrategyConfig {
    StrategyConfig {
        ma_period: 1,
        rsi_period: 2,
        signal_period: 2,
        trend_window: 3,
        ..StrategyConfig::default()
    }
}

/// Seven falling bars followed by a jump: the bar at index 7 is a long signal.
pub fn decline_then_jump() -> Vec<(f64, f64)> {
    vec![
        (100.0, 100.0),
        (99.0, 99.0),
        (98.0, 98.0),
        (97.0, 97.0),
        (96.0, 96.0),
        (95.0, 95.0),
        (94.0, 94.0),
        (110.0, 120.0),
    ]
}

/// Seven rising bars followed by a drop: the bar at index 7 is a short signal.
pub fn rally_then_drop() -> Vec<(f64, f64)> {
    vec![
        (100.0, 100.0),
        (101.0, 101.0),
        (102.0, 102.0),
        (103.0, 103.0),
        (104.0, 104.0),
        (105.0, 105.0),
        (106.0, 106.0),
        (90.0, 80.0),
    ]
}

pub fn csv_text(bars: &[PriceBar]) -> String {
    let mut out = String::from("Date,Open,High,Low,Close\n");
    for b in bars {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close
        ));
    }
    out
}
