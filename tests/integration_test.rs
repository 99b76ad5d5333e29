//! End-to-end engine tests over hand-built and generated price series.

mod common;

use approx::assert_relative_eq;
use common::*;
use proptest::prelude::*;
use rsioma::domain::backtest::{MarketBias, Prediction, run_backtest};
use rsioma::domain::error::RsiomaError;
use rsioma::domain::indicator::compute_indicators;
use rsioma::domain::metrics::TradeStats;
use rsioma::domain::signal::Direction;
use rsioma::domain::strategy::StrategyConfig;
use rsioma::domain::trade::Outcome;

mod scenarios {
    use super::*;

    #[test]
    fn steady_rise_produces_no_trades() {
        let closes: Vec<f64> = (0..80).map(|i| 100.0 + i as f64).collect();
        let series = PriceSeries::new(bars_from_closes(&closes)).unwrap();

        let result = run_backtest(&series, &StrategyConfig::default()).unwrap();

        assert_eq!(result.trade_count(), 0);
        assert!(result.win_ratio().is_none());
        assert_eq!(result.cumulative_return(), 0.0);
        assert_eq!(result.latest_prediction, Prediction::NoSignal);
        assert!(result.last_closed_trade.is_none());
        assert!(result.monthly.is_empty());
    }

    #[test]
    fn long_entry_executes_on_next_bar() {
        let mut rows = decline_then_jump();
        rows.push((121.0, 123.0));
        let series = series_from(&rows);

        let result = run_backtest(&series, &fast_config()).unwrap();

        assert_eq!(result.trade_count(), 1);
        let trade = &result.trades[0];
        assert_eq!(trade.direction, Direction::Long);
        assert_eq!(trade.signal_date, date("2024-01-08"));
        assert_eq!(trade.entry_date, date("2024-01-09"));
        assert_eq!(trade.exit_date, trade.entry_date);
        assert_eq!(trade.entry_price, 121.0);
        assert_eq!(trade.exit_price, 123.0);
        assert_relative_eq!(trade.trade_return, 2.0 / 121.0, epsilon = 1e-12);
        assert_eq!(trade.outcome, Outcome::Win);
        assert_eq!(result.win_ratio(), Some(1.0));
    }

    #[test]
    fn short_entry_mirrors_long() {
        let mut rows = rally_then_drop();
        rows.push((79.0, 78.0));
        let series = series_from(&rows);

        let result = run_backtest(&series, &fast_config()).unwrap();

        assert_eq!(result.trade_count(), 1);
        let trade = &result.trades[0];
        assert_eq!(trade.direction, Direction::Short);
        assert_eq!(trade.entry_price, 79.0);
        assert_eq!(trade.exit_price, 78.0);
        assert_relative_eq!(trade.trade_return, 1.0 / 79.0, epsilon = 1e-12);
        assert_eq!(result.short_stats.trade_count, 1);
        assert_eq!(result.long_stats.trade_count, 0);
    }

    #[test]
    fn losing_short_when_execution_bar_rallies() {
        let mut rows = rally_then_drop();
        rows.push((79.0, 82.0));
        let result = run_backtest(&series_from(&rows), &fast_config()).unwrap();

        assert_eq!(result.trade_count(), 1);
        assert_eq!(result.trades[0].outcome, Outcome::Loss);
        assert_eq!(result.win_ratio(), Some(0.0));
        assert!(result.cumulative_return() < 0.0);
    }

    #[test]
    fn signal_on_final_bar_is_a_buy_prediction() {
        let series = series_from(&decline_then_jump());

        let result = run_backtest(&series, &fast_config()).unwrap();

        assert_eq!(result.trade_count(), 0);
        assert_eq!(result.latest_prediction, Prediction::Buy);
        assert_eq!(result.snapshot.bias, MarketBias::Bullish);
        assert_eq!(result.snapshot.date, date("2024-01-08"));
    }

    #[test]
    fn signal_on_final_bar_is_a_sell_prediction() {
        let series = series_from(&rally_then_drop());

        let result = run_backtest(&series, &fast_config()).unwrap();

        assert_eq!(result.latest_prediction, Prediction::Sell);
        assert_eq!(result.snapshot.bias, MarketBias::Bearish);
    }

    #[test]
    fn trend_filter_blocks_counter_trend_long() {
        // Same oscillator cross, but the jump bar stays below the trend SMA.
        let mut rows = decline_then_jump();
        rows[7] = (93.5, 94.2);
        rows.push((95.0, 96.0));
        let filtered = run_backtest(&series_from(&rows), &fast_config()).unwrap();

        let unfiltered = StrategyConfig {
            use_trend_filter: false,
            ..fast_config()
        };
        let open = run_backtest(&series_from(&rows), &unfiltered).unwrap();

        assert_eq!(filtered.trade_count(), 0);
        assert_eq!(open.trade_count(), 1);
        assert_eq!(open.trades[0].direction, Direction::Long);
    }

    #[test]
    fn buy_and_hold_uses_first_open_and_last_close() {
        let mut rows = decline_then_jump();
        rows.push((121.0, 125.0));
        let result = run_backtest(&series_from(&rows), &fast_config()).unwrap();

        assert_relative_eq!(result.buy_hold_return, 0.25, epsilon = 1e-12);
        assert_eq!(result.bar_count, 9);
        assert_eq!(result.start_date, date("2024-01-01"));
        assert_eq!(result.end_date, date("2024-01-09"));
    }
}

mod invalid_input {
    use super::*;

    #[test]
    fn empty_series_rejected() {
        let err = PriceSeries::new(Vec::new()).unwrap_err();
        assert!(matches!(err, RsiomaError::InvalidSeries { .. }));
    }

    #[test]
    fn zero_price_rejected() {
        let mut bars = bars_from(&[(100.0, 100.0), (101.0, 101.0)]);
        bars[1].close = 0.0;
        let err = PriceSeries::new(bars).unwrap_err();
        assert!(matches!(err, RsiomaError::InvalidSeries { .. }));
    }

    #[test]
    fn unordered_dates_rejected() {
        let mut bars = bars_from(&[(100.0, 100.0), (101.0, 101.0), (102.0, 102.0)]);
        bars.swap(0, 2);
        let err = PriceSeries::new(bars).unwrap_err();
        assert!(matches!(err, RsiomaError::InvalidSeries { .. }));
    }

    #[test]
    fn series_shorter_than_lookback_rejected() {
        let closes: Vec<f64> = (0..49).map(|i| 100.0 + i as f64).collect();
        let series = PriceSeries::new(bars_from_closes(&closes)).unwrap();
        let err = run_backtest(&series, &StrategyConfig::default()).unwrap_err();
        assert!(matches!(err, RsiomaError::InvalidSeries { .. }));
    }
}

mod statistics {
    use super::*;

    #[test]
    fn three_wins_of_five() {
        let stats = TradeStats::from_returns(&[0.01, 0.02, -0.01, 0.03, 0.0]);
        assert_eq!(stats.trade_count, 5);
        assert_eq!(stats.wins, 3);
        assert_eq!(stats.losses, 2);
        assert_eq!(stats.win_ratio, Some(0.6));
    }

    #[test]
    fn cumulative_return_compounds() {
        let stats = TradeStats::from_returns(&[0.02, -0.01, 0.03]);
        assert_relative_eq!(stats.cumulative_return, 1.02 * 0.99 * 1.03 - 1.0, epsilon = 1e-12);
        assert_relative_eq!(stats.cumulative_return, 0.0401, epsilon = 1e-4);
        assert_relative_eq!(stats.avg_return.unwrap(), 0.04 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn no_trades_has_no_ratios() {
        let stats = TradeStats::from_returns(&[]);
        assert_eq!(stats.trade_count, 0);
        assert!(stats.win_ratio.is_none());
        assert!(stats.avg_return.is_none());
        assert_eq!(stats.cumulative_return, 0.0);
    }
}

fn random_walk() -> impl Strategy<Value = Vec<PriceBar>> {
    prop::collection::vec((-0.05f64..0.05, -0.01f64..0.01), 80..200).prop_map(|steps| {
        let mut rows = Vec::with_capacity(steps.len());
        let mut prev_close = 100.0;
        for (ret, gap) in steps {
            let open = prev_close * (1.0 + gap);
            let close = open * (1.0 + ret);
            rows.push((open, close));
            prev_close = close;
        }
        bars_from(&rows)
    })
}

fn any_config() -> impl Strategy<Value = StrategyConfig> {
    (1usize..10, 2usize..15, 1usize..10, 2usize..20, any::<bool>()).prop_map(
        |(ma_period, rsi_period, signal_period, trend_window, use_trend_filter)| StrategyConfig {
            ma_period,
            rsi_period,
            signal_period,
            trend_window,
            use_trend_filter,
            ..StrategyConfig::default()
        },
    )
}

proptest! {
    #[test]
    fn trades_never_overlap(bars in random_walk(), config in any_config()) {
        let series = PriceSeries::new(bars).unwrap();
        let result = run_backtest(&series, &config).unwrap();

        for trade in &result.trades {
            prop_assert!(trade.entry_date > trade.signal_date);
            prop_assert!(trade.exit_date >= trade.entry_date);
        }
        for pair in result.trades.windows(2) {
            prop_assert!(pair[1].signal_date > pair[0].exit_date);
            prop_assert!(pair[1].entry_date > pair[0].exit_date);
        }
    }

    #[test]
    fn backtest_is_deterministic(bars in random_walk(), config in any_config()) {
        let series = PriceSeries::new(bars).unwrap();
        let first = run_backtest(&series, &config).unwrap();
        let second = run_backtest(&series, &config).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn oscillator_stays_in_range(bars in random_walk(), config in any_config()) {
        let series = PriceSeries::new(bars).unwrap();
        for point in compute_indicators(&series, &config) {
            if let Some(rsi) = point.rsi_of_ma {
                prop_assert!((0.0..=100.0).contains(&rsi));
            }
            if let Some(signal) = point.signal_line {
                prop_assert!(signal >= -1e-9 && signal <= 100.0 + 1e-9);
            }
        }
    }

    #[test]
    fn indicators_defined_after_warmup(bars in random_walk(), config in any_config()) {
        let series = PriceSeries::new(bars).unwrap();
        let points = compute_indicators(&series, &config);
        let warmup = config.warmup_len();

        for point in points.iter().skip(warmup) {
            prop_assert!(point.ma_slow.is_some());
            prop_assert!(point.rsi_of_ma.is_some());
            prop_assert!(point.signal_line.is_some());
        }
        let first = |f: fn(&rsioma::domain::indicator::IndicatorPoint) -> bool| {
            points.iter().position(f)
        };
        prop_assert_eq!(first(|p| p.ma_slow.is_some()), Some(config.ma_warmup()));
        prop_assert_eq!(first(|p| p.rsi_of_ma.is_some()), Some(config.rsi_warmup()));
        prop_assert_eq!(first(|p| p.signal_line.is_some()), Some(config.signal_warmup()));
        prop_assert_eq!(first(|p| p.trend_ma.is_some()), Some(config.trend_warmup()));
    }

    #[test]
    fn stats_are_consistent(bars in random_walk(), config in any_config()) {
        let series = PriceSeries::new(bars).unwrap();
        let result = run_backtest(&series, &config).unwrap();

        prop_assert_eq!(result.stats.wins + result.stats.losses, result.trade_count());
        prop_assert_eq!(
            result.long_stats.trade_count + result.short_stats.trade_count,
            result.trade_count()
        );
        let monthly_count: usize = result
            .monthly
            .iter()
            .map(|m| m.long_count + m.short_count)
            .sum();
        prop_assert_eq!(monthly_count, result.trade_count());
        if let Some(ratio) = result.win_ratio() {
            prop_assert!((0.0..=1.0).contains(&ratio));
        }
    }
}
