//! Plain-text backtest summary.

use crate::domain::backtest::BacktestResult;
use crate::domain::metrics::{MonthlyStats, TradeStats};
use crate::domain::strategy::StrategyConfig;
use crate::domain::trade::Trade;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Default)]
pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn opt_pct(value: Option<f64>) -> String {
    value.map(pct).unwrap_or_else(|| "n/a".to_string())
}

fn opt_num(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "n/a".to_string())
}

fn render_header(result: &BacktestResult, config: &StrategyConfig) -> String {
    let trend = if config.use_trend_filter {
        format!("close vs SMA({})", config.trend_window)
    } else {
        "off".to_string()
    };
    let mut output = format!("RSI-of-MA backtest: {}\n", config.label());
    output.push_str(&format!("Trend filter: {}\n", trend));
    output.push_str(&format!(
        "Data: {} to {} ({} bars)\n",
        result.start_date, result.end_date, result.bar_count
    ));
    output
}

fn render_stats(label: &str, stats: &TradeStats) -> String {
    let mut output = format!("\n=== {} ===\n", label);
    if !stats.has_trades() {
        output.push_str("No trades generated.\n");
        return output;
    }
    output.push_str(&format!("Number of trades:      {}\n", stats.trade_count));
    output.push_str(&format!("Wins:                  {}\n", stats.wins));
    output.push_str(&format!("Win ratio:             {}\n", opt_pct(stats.win_ratio)));
    output.push_str(&format!("Average trade return:  {}\n", opt_pct(stats.avg_return)));
    output.push_str(&format!("Median trade return:   {}\n", opt_pct(stats.median_return)));
    output.push_str(&format!("Total compounded P&L:  {}\n", pct(stats.cumulative_return)));
    output
}

fn render_buy_hold(result: &BacktestResult) -> String {
    let mut output = String::from("\n=== Buy & Hold ===\n");
    output.push_str(&format!("Total return:          {}\n", pct(result.buy_hold_return)));
    if let Some(cagr) = result.buy_hold_cagr {
        output.push_str(&format!("Approx. CAGR:          {}\n", pct(cagr)));
    }
    output
}

fn render_prediction(result: &BacktestResult) -> String {
    let snap = &result.snapshot;
    let mut output = String::from("\n=== Latest Prediction ===\n");
    output.push_str(&format!("As of:                 {}\n", snap.date));
    output.push_str(&format!("Close:                 {:.2}\n", snap.close));
    output.push_str(&format!("RSI(MA):               {}\n", opt_num(snap.rsi_of_ma)));
    output.push_str(&format!("Signal line:           {}\n", opt_num(snap.signal_line)));
    output.push_str(&format!("Prediction:            {}\n", result.latest_prediction));
    output.push_str(&format!("Bias:                  {}\n", snap.bias));
    output
}

fn render_last_trade(trade: Option<&Trade>) -> String {
    let mut output = String::from("\n=== Last Closed Trade ===\n");
    match trade {
        Some(t) => output.push_str(&format!(
            "{} {}  open {:.2} -> close {:.2}  {}  {}\n",
            t.entry_date,
            t.direction,
            t.entry_price,
            t.exit_price,
            pct(t.trade_return),
            t.outcome
        )),
        None => output.push_str("None\n"),
    }
    output
}

fn render_monthly(monthly: &[MonthlyStats]) -> String {
    if monthly.is_empty() {
        return String::new();
    }
    let mut output = String::from("\n=== Monthly (by exit month) ===\n");
    output.push_str(&format!(
        "{:<8} {:>6} {:>9} {:>6} {:>9} {:>9}\n",
        "month", "longs", "long %", "shorts", "short %", "net %"
    ));
    for m in monthly {
        output.push_str(&format!(
            "{:<8} {:>6} {:>9} {:>6} {:>9} {:>9}\n",
            m.month,
            m.long_count,
            pct(m.long_return),
            m.short_count,
            pct(m.short_return),
            pct(m.net_return())
        ));
    }
    output
}

impl ReportPort for TextReportAdapter {
    fn render(&self, result: &BacktestResult, config: &StrategyConfig) -> String {
        let mut output = render_header(result, config);
        output.push_str(&render_stats("All trades", &result.stats));
        output.push_str(&render_stats("Longs", &result.long_stats));
        output.push_str(&render_stats("Shorts", &result.short_stats));
        output.push_str(&render_buy_hold(result));
        output.push_str(&render_prediction(result));
        output.push_str(&render_last_trade(result.last_closed_trade.as_ref()));
        output.push_str(&render_monthly(&result.monthly));
        output
    }
}
