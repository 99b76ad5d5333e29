//! Realized trades.

use crate::domain::ohlcv::PriceBar;
use crate::domain::signal::{Direction, Signal};
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win => write!(f, "WIN"),
            Outcome::Loss => write!(f, "LOSS"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub direction: Direction,
    pub signal_date: NaiveDate,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    /// Fractional return, 0.01 = 1%.
    pub trade_return: f64,
    pub outcome: Outcome,
}

impl Trade {
    /// Realizes a signal on its execution bar: in at the open, out at the close.
    pub fn realize(signal: &Signal, execution: &PriceBar) -> Self {
        let entry_price = execution.open;
        let exit_price = execution.close;
        let trade_return = match signal.direction {
            Direction::Long => (exit_price - entry_price) / entry_price,
            Direction::Short => (entry_price - exit_price) / entry_price,
        };

        Trade {
            direction: signal.direction,
            signal_date: signal.date,
            entry_date: execution.date,
            entry_price,
            exit_date: execution.date,
            exit_price,
            trade_return,
            outcome: classify(trade_return),
        }
    }

    pub fn is_win(&self) -> bool {
        self.outcome == Outcome::Win
    }
}

/// A flat trade counts as a loss.
pub fn classify(trade_return: f64) -> Outcome {
    if trade_return > 0.0 {
        Outcome::Win
    } else {
        Outcome::Loss
    }
}
