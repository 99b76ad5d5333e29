//! Trade statistics and the monthly breakdown.

use crate::domain::signal::Direction;
use crate::domain::trade::Trade;
use chrono::Datelike;
use std::collections::BTreeMap;

/// Summary of a trade set. Ratios and averages are `None` without trades.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeStats {
    pub trade_count: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_ratio: Option<f64>,
    pub avg_return: Option<f64>,
    pub median_return: Option<f64>,
    /// Product of (1 + r) over the trades in order, minus 1.
    pub cumulative_return: f64,
}

impl TradeStats {
    pub fn compute<'a, I>(trades: I) -> Self
    where
        I: IntoIterator<Item = &'a Trade>,
    {
        let returns: Vec<f64> = trades.into_iter().map(|t| t.trade_return).collect();
        Self::from_returns(&returns)
    }

    pub fn for_direction(trades: &[Trade], direction: Direction) -> Self {
        Self::compute(trades.iter().filter(|t| t.direction == direction))
    }

    pub fn from_returns(returns: &[f64]) -> Self {
        let trade_count = returns.len();
        let wins = returns.iter().filter(|&&r| r > 0.0).count();
        let losses = trade_count - wins;

        let (win_ratio, avg_return, median_return) = if trade_count > 0 {
            (
                Some(wins as f64 / trade_count as f64),
                Some(returns.iter().sum::<f64>() / trade_count as f64),
                Some(median(returns)),
            )
        } else {
            (None, None, None)
        };

        let cumulative_return = returns.iter().fold(1.0, |equity, r| equity * (1.0 + r)) - 1.0;

        TradeStats {
            trade_count,
            wins,
            losses,
            win_ratio,
            avg_return,
            median_return,
            cumulative_return,
        }
    }

    pub fn has_trades(&self) -> bool {
        self.trade_count > 0
    }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Per exit month: counts and summed returns by direction.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyStats {
    /// `YYYY-MM`
    pub month: String,
    pub long_count: usize,
    pub long_return: f64,
    pub short_count: usize,
    pub short_return: f64,
}

impl MonthlyStats {
    pub fn net_return(&self) -> f64 {
        self.long_return + self.short_return
    }

    /// Groups trades by exit month, oldest first.
    pub fn compute(trades: &[Trade]) -> Vec<Self> {
        let mut months: BTreeMap<(i32, u32), MonthlyStats> = BTreeMap::new();

        for trade in trades {
            let key = (trade.exit_date.year(), trade.exit_date.month());
            let entry = months.entry(key).or_insert_with(|| MonthlyStats {
                month: format!("{:04}-{:02}", key.0, key.1),
                long_count: 0,
                long_return: 0.0,
                short_count: 0,
                short_return: 0.0,
            });
            match trade.direction {
                Direction::Long => {
                    entry.long_count += 1;
                    entry.long_return += trade.trade_return;
                }
                Direction::Short => {
                    entry.short_count += 1;
                    entry.short_return += trade.trade_return;
                }
            }
        }

        months.into_values().collect()
    }
}
