//! Signal detection over the indicator rows.
//!
//! A single forward pass drives a three-state machine (Flat, LongOpen,
//! ShortOpen). An entry on bar i is executed on bar i + 1 (open to close), so
//! the machine stays open through bar i + 1 and evaluates again from i + 2.

use crate::domain::indicator::IndicatorPoint;
use crate::domain::strategy::StrategyConfig;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signal {
    pub date: NaiveDate,
    pub direction: Direction,
    pub trigger_close: f64,
}

/// A signal together with the bar that realizes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalEvent {
    pub signal: Signal,
    pub signal_index: usize,
    /// `None` when the series ends before the execution bar.
    pub exit_index: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionState {
    #[default]
    Flat,
    LongOpen { entry_index: usize },
    ShortOpen { entry_index: usize },
}

impl PositionState {
    fn open(direction: Direction, entry_index: usize) -> Self {
        match direction {
            Direction::Long => PositionState::LongOpen { entry_index },
            Direction::Short => PositionState::ShortOpen { entry_index },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    pub events: Vec<SignalEvent>,
}

impl Detection {
    /// Events that resolved to an execution bar, in order.
    pub fn closed(&self) -> impl Iterator<Item = (&SignalEvent, usize)> {
        self.events
            .iter()
            .filter_map(|e| e.exit_index.map(|exit| (e, exit)))
    }

    /// The last signal if the series ended before it could be executed.
    pub fn pending(&self) -> Option<&SignalEvent> {
        self.events.last().filter(|e| e.exit_index.is_none())
    }
}

pub fn detect_signals(points: &[IndicatorPoint], config: &StrategyConfig) -> Detection {
    let mut detection = Detection::default();
    let mut state = PositionState::Flat;

    for i in 0..points.len() {
        let (next, event) = step(state, i, points, config);
        state = next;
        if let Some(event) = event {
            tracing::debug!(
                date = %event.signal.date,
                direction = %event.signal.direction,
                close = event.signal.trigger_close,
                "signal"
            );
            detection.events.push(event);
        }
    }

    detection
}

/// Advances the state machine by one bar.
pub fn step(
    state: PositionState,
    i: usize,
    points: &[IndicatorPoint],
    config: &StrategyConfig,
) -> (PositionState, Option<SignalEvent>) {
    match state {
        PositionState::LongOpen { entry_index } | PositionState::ShortOpen { entry_index } => {
            if i >= entry_index {
                (PositionState::Flat, None)
            } else {
                (state, None)
            }
        }
        PositionState::Flat => match evaluate_entry(i, points, config) {
            Some(direction) => {
                let entry_index = i + 1;
                let event = SignalEvent {
                    signal: Signal {
                        date: points[i].date,
                        direction,
                        trigger_close: points[i].close,
                    },
                    signal_index: i,
                    exit_index: (entry_index < points.len()).then_some(entry_index),
                };
                (PositionState::open(direction, entry_index), Some(event))
            }
            None => (PositionState::Flat, None),
        },
    }
}

/// Entry rule for bar i. Long takes precedence when both sides qualify.
pub fn evaluate_entry(
    i: usize,
    points: &[IndicatorPoint],
    config: &StrategyConfig,
) -> Option<Direction> {
    if i == 0 {
        return None;
    }
    let prev = &points[i - 1];
    let curr = &points[i];

    let prev_spread = prev.spread()?;
    let spread = curr.spread()?;
    let prev_rsi = prev.rsi_of_ma?;

    let (uptrend, downtrend) = if config.use_trend_filter {
        (curr.is_uptrend()?, curr.is_downtrend()?)
    } else {
        (true, true)
    };

    let crossed_up = prev_spread <= 0.0 && spread > 0.0;
    let crossed_down = prev_spread >= 0.0 && spread < 0.0;

    if crossed_up && prev_rsi < config.oversold && uptrend {
        Some(Direction::Long)
    } else if crossed_down && prev_rsi > config.overbought && downtrend {
        Some(Direction::Short)
    } else {
        None
    }
}
