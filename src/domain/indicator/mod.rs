//! Indicator pipeline: EMA of close, RSI of that EMA, and a signal line.
//!
//! - `IndicatorPoint`: one aligned row per price bar
//! - `compute_indicators`: derives the full row sequence from a series
//!
//! Undefined (warmup) values are `None` and never compared.

pub mod ema;
pub mod rsi;
pub mod sma;

use crate::domain::ohlcv::PriceSeries;
use crate::domain::strategy::StrategyConfig;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub close: f64,
    pub ma_slow: Option<f64>,
    pub rsi_of_ma: Option<f64>,
    pub signal_line: Option<f64>,
    pub trend_ma: Option<f64>,
}

impl IndicatorPoint {
    /// Oscillator minus signal line, when both are defined.
    pub fn spread(&self) -> Option<f64> {
        Some(self.rsi_of_ma? - self.signal_line?)
    }

    pub fn is_uptrend(&self) -> Option<bool> {
        self.trend_ma.map(|t| self.close > t)
    }

    pub fn is_downtrend(&self) -> Option<bool> {
        self.trend_ma.map(|t| self.close < t)
    }
}

pub fn compute_indicators(series: &PriceSeries, config: &StrategyConfig) -> Vec<IndicatorPoint> {
    let closes = series.closes();
    let close_input: Vec<Option<f64>> = closes.iter().copied().map(Some).collect();

    let ma = ema::calculate_ema(&close_input, config.ma_period);
    let rsi = rsi::calculate_rsi(&ma, config.rsi_period);
    let signal = ema::calculate_ema(&rsi, config.signal_period);
    let trend = sma::calculate_sma(&closes, config.trend_window);

    series
        .bars()
        .iter()
        .enumerate()
        .map(|(i, bar)| IndicatorPoint {
            date: bar.date,
            close: bar.close,
            ma_slow: ma[i],
            rsi_of_ma: rsi[i],
            signal_line: signal[i],
            trend_ma: trend[i],
        })
        .collect()
}

pub(crate) fn first_defined(input: &[Option<f64>]) -> Option<usize> {
    input.iter().position(Option::is_some)
}
