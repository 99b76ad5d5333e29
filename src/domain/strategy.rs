//! RSI-of-MA strategy parameters.

pub const DEFAULT_MA_PERIOD: usize = 9;
pub const DEFAULT_RSI_PERIOD: usize = 14;
pub const DEFAULT_SIGNAL_PERIOD: usize = 22;
pub const DEFAULT_OVERSOLD: f64 = 20.0;
pub const DEFAULT_OVERBOUGHT: f64 = 80.0;
pub const DEFAULT_TREND_WINDOW: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    /// EMA period applied to close.
    pub ma_period: usize,
    /// RSI period applied to the EMA series.
    pub rsi_period: usize,
    /// EMA period of the signal line over the RSI series.
    pub signal_period: usize,
    pub oversold: f64,
    pub overbought: f64,
    /// SMA window of close used by the trend filter.
    pub trend_window: usize,
    pub use_trend_filter: bool,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            ma_period: DEFAULT_MA_PERIOD,
            rsi_period: DEFAULT_RSI_PERIOD,
            signal_period: DEFAULT_SIGNAL_PERIOD,
            oversold: DEFAULT_OVERSOLD,
            overbought: DEFAULT_OVERBOUGHT,
            trend_window: DEFAULT_TREND_WINDOW,
            use_trend_filter: true,
        }
    }
}

impl StrategyConfig {
    /// Longest single lookback. Shorter series are rejected by the engine.
    pub fn min_bars(&self) -> usize {
        let longest = self
            .ma_period
            .max(self.rsi_period)
            .max(self.signal_period);
        if self.use_trend_filter {
            longest.max(self.trend_window)
        } else {
            longest
        }
    }

    /// Index of the first defined EMA of close.
    pub fn ma_warmup(&self) -> usize {
        self.ma_period.saturating_sub(1)
    }

    /// Index of the first defined RSI. It needs `rsi_period` changes of a
    /// seeded EMA.
    pub fn rsi_warmup(&self) -> usize {
        self.ma_warmup() + self.rsi_period
    }

    /// Index of the first defined signal line.
    pub fn signal_warmup(&self) -> usize {
        self.rsi_warmup() + self.signal_period.saturating_sub(1)
    }

    /// Index of the first defined trend SMA.
    pub fn trend_warmup(&self) -> usize {
        self.trend_window.saturating_sub(1)
    }

    /// Index of the first bar on which a signal can be evaluated.
    pub fn warmup_len(&self) -> usize {
        if self.use_trend_filter {
            self.signal_warmup().max(self.trend_warmup())
        } else {
            self.signal_warmup()
        }
    }

    pub fn label(&self) -> String {
        format!(
            "RSI({}) of EMA({}), signal EMA({}), bands {}/{}",
            self.rsi_period, self.ma_period, self.signal_period, self.oversold, self.overbought
        )
    }
}
