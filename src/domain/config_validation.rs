//! Configuration validation.
//!
//! Checks strategy parameters and the optional data window before a run.

use crate::domain::error::RsiomaError;
use crate::domain::strategy::StrategyConfig;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_strategy_config(config: &StrategyConfig) -> Result<(), RsiomaError> {
    validate_period("ma_period", config.ma_period)?;
    validate_period("rsi_period", config.rsi_period)?;
    validate_period("signal_period", config.signal_period)?;
    validate_period("trend_window", config.trend_window)?;
    validate_thresholds(config.oversold, config.overbought)?;
    Ok(())
}

/// Validates the `[data]` section: optional dates must parse and be ordered.
pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), RsiomaError> {
    let start = parse_optional_date(config, "start_date")?;
    let end = parse_optional_date(config, "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(invalid("data", "start_date", "start_date must not be after end_date"));
        }
    }
    Ok(())
}

/// Raw `[strategy]` value, with blank treated as absent.
fn strategy_value(config: &dyn ConfigPort, key: &str) -> Option<String> {
    config.get_non_empty("strategy", key)
}

/// Reads a `[strategy]` period. Absent means `default`; anything that is not
/// a non-negative integer is rejected.
pub fn read_period(
    config: &dyn ConfigPort,
    key: &str,
    default: usize,
) -> Result<usize, RsiomaError> {
    match strategy_value(config, key) {
        None => Ok(default),
        Some(raw) => {
            let value = raw
                .parse::<i64>()
                .map_err(|_| not_a("an integer", key, &raw))?;
            usize::try_from(value).map_err(|_| invalid("strategy", key, "must be non-negative"))
        }
    }
}

/// Reads a `[strategy]` threshold.
pub fn read_threshold(
    config: &dyn ConfigPort,
    key: &str,
    default: f64,
) -> Result<f64, RsiomaError> {
    match strategy_value(config, key) {
        None => Ok(default),
        Some(raw) => raw.parse::<f64>().map_err(|_| not_a("a number", key, &raw)),
    }
}

/// Reads a `[strategy]` flag: true/yes/1 or false/no/0, any case.
pub fn read_flag(config: &dyn ConfigPort, key: &str, default: bool) -> Result<bool, RsiomaError> {
    match strategy_value(config, key) {
        None => Ok(default),
        Some(raw) => match raw.to_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" => Ok(false),
            _ => Err(not_a("a boolean", key, &raw)),
        },
    }
}

fn not_a(kind: &str, key: &str, raw: &str) -> RsiomaError {
    invalid("strategy", key, &format!("expected {}, got '{}'", kind, raw))
}

pub fn parse_optional_date(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, RsiomaError> {
    match config.get_string("data", key) {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                invalid(
                    "data",
                    key,
                    &format!("invalid {} format, expected YYYY-MM-DD", key),
                )
            }),
    }
}

fn validate_period(key: &str, value: usize) -> Result<(), RsiomaError> {
    if value < 1 {
        return Err(invalid("strategy", key, &format!("{} must be at least 1", key)));
    }
    Ok(())
}

fn validate_thresholds(oversold: f64, overbought: f64) -> Result<(), RsiomaError> {
    if !(0.0..=100.0).contains(&oversold) {
        return Err(invalid("strategy", "oversold", "oversold must be between 0 and 100"));
    }
    if !(0.0..=100.0).contains(&overbought) {
        return Err(invalid(
            "strategy",
            "overbought",
            "overbought must be between 0 and 100",
        ));
    }
    if oversold >= overbought {
        return Err(invalid(
            "strategy",
            "oversold",
            "oversold must be below overbought",
        ));
    }
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> RsiomaError {
    RsiomaError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
