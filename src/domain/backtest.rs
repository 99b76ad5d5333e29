//! Backtest engine: indicators, signal detection and trade simulation in
//! one pass over a validated price series.

use crate::domain::config_validation::validate_strategy_config;
use crate::domain::error::RsiomaError;
use crate::domain::indicator::{IndicatorPoint, compute_indicators};
use crate::domain::metrics::{MonthlyStats, TradeStats};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::{Detection, Direction, detect_signals};
use crate::domain::strategy::StrategyConfig;
use crate::domain::trade::Trade;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prediction {
    Buy,
    Sell,
    NoSignal,
}

impl From<Direction> for Prediction {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Long => Prediction::Buy,
            Direction::Short => Prediction::Sell,
        }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prediction::Buy => write!(f, "BUY (UP)"),
            Prediction::Sell => write!(f, "SELL (DOWN)"),
            Prediction::NoSignal => write!(f, "NO SIGNAL"),
        }
    }
}

/// Where the oscillator sits against its signal line on the final bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketBias {
    Bullish,
    Bearish,
    Neutral,
    Undefined,
}

impl MarketBias {
    pub fn from_spread(spread: Option<f64>) -> Self {
        match spread {
            Some(s) if s > 0.0 => MarketBias::Bullish,
            Some(s) if s < 0.0 => MarketBias::Bearish,
            Some(_) => MarketBias::Neutral,
            None => MarketBias::Undefined,
        }
    }
}

impl fmt::Display for MarketBias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketBias::Bullish => write!(f, "BULLISH BIAS"),
            MarketBias::Bearish => write!(f, "BEARISH BIAS"),
            MarketBias::Neutral => write!(f, "NEUTRAL"),
            MarketBias::Undefined => write!(f, "UNDEFINED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LatestSnapshot {
    pub date: NaiveDate,
    pub close: f64,
    pub rsi_of_ma: Option<f64>,
    pub signal_line: Option<f64>,
    pub bias: MarketBias,
}

impl LatestSnapshot {
    fn from_point(point: &IndicatorPoint) -> Self {
        LatestSnapshot {
            date: point.date,
            close: point.close,
            rsi_of_ma: point.rsi_of_ma,
            signal_line: point.signal_line,
            bias: MarketBias::from_spread(point.spread()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub trades: Vec<Trade>,
    pub stats: TradeStats,
    pub long_stats: TradeStats,
    pub short_stats: TradeStats,
    pub monthly: Vec<MonthlyStats>,
    /// Fraction from first open to last close.
    pub buy_hold_return: f64,
    pub buy_hold_cagr: Option<f64>,
    pub latest_prediction: Prediction,
    pub last_closed_trade: Option<Trade>,
    pub snapshot: LatestSnapshot,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub bar_count: usize,
}

impl BacktestResult {
    pub fn trade_count(&self) -> usize {
        self.stats.trade_count
    }

    pub fn win_ratio(&self) -> Option<f64> {
        self.stats.win_ratio
    }

    pub fn avg_return(&self) -> Option<f64> {
        self.stats.avg_return
    }

    pub fn cumulative_return(&self) -> f64 {
        self.stats.cumulative_return
    }
}

/// Runs the strategy over `series`.
///
/// Fails with `InvalidSeries` when the series is shorter than the longest
/// configured lookback, and with `ConfigInvalid` for bad parameters.
pub fn run_backtest(
    series: &PriceSeries,
    config: &StrategyConfig,
) -> Result<BacktestResult, RsiomaError> {
    validate_strategy_config(config)?;

    let min_bars = config.min_bars();
    if series.len() < min_bars {
        return Err(RsiomaError::invalid_series(format!(
            "have {} bars, need at least {}",
            series.len(),
            min_bars
        )));
    }

    let points = compute_indicators(series, config);
    let detection = detect_signals(&points, config);
    let trades = simulate_trades(series, &detection);

    let stats = TradeStats::compute(&trades);
    let long_stats = TradeStats::for_direction(&trades, Direction::Long);
    let short_stats = TradeStats::for_direction(&trades, Direction::Short);
    let monthly = MonthlyStats::compute(&trades);
    let latest_prediction = latest_prediction(&detection, series.len());
    let last_closed_trade = trades.last().cloned();
    let snapshot = LatestSnapshot::from_point(&points[points.len() - 1]);

    tracing::info!(
        bars = series.len(),
        trades = stats.trade_count,
        wins = stats.wins,
        cumulative_return = stats.cumulative_return,
        prediction = %latest_prediction,
        "backtest complete"
    );

    Ok(BacktestResult {
        trades,
        stats,
        long_stats,
        short_stats,
        monthly,
        buy_hold_return: series.buy_hold_return(),
        buy_hold_cagr: series.buy_hold_cagr(),
        latest_prediction,
        last_closed_trade,
        snapshot,
        start_date: series.first().date,
        end_date: series.last().date,
        bar_count: series.len(),
    })
}

/// Turns each resolved signal into a trade on its execution bar.
pub fn simulate_trades(series: &PriceSeries, detection: &Detection) -> Vec<Trade> {
    let bars = series.bars();
    detection
        .closed()
        .map(|(event, exit_index)| {
            let trade = Trade::realize(&event.signal, &bars[exit_index]);
            tracing::debug!(
                direction = %trade.direction,
                date = %trade.entry_date,
                entry = trade.entry_price,
                exit = trade.exit_price,
                trade_return = trade.trade_return,
                "trade"
            );
            trade
        })
        .collect()
}

/// Buy/Sell only for an unresolved signal on the final bar.
pub fn latest_prediction(detection: &Detection, bar_count: usize) -> Prediction {
    match detection.pending() {
        Some(event) if event.signal_index + 1 == bar_count => event.signal.direction.into(),
        _ => Prediction::NoSignal,
    }
}
