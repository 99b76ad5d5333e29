//! CSV file data adapter and trade ledger writer.

use crate::domain::error::RsiomaError;
use crate::domain::ohlcv::PriceBar;
use crate::domain::trade::Trade;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];

/// Reads daily bars from one CSV file with a header row.
///
/// Columns are found by name (`date`, `open`, `high`, `low`, `close`, any
/// case); extra columns such as volume are ignored.
pub struct CsvAdapter {
    path: PathBuf,
}

struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_all(&self) -> Result<Vec<PriceBar>, RsiomaError> {
        let content = fs::read_to_string(&self.path).map_err(|e| RsiomaError::DataLoad {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers = rdr.headers().map_err(|e| RsiomaError::DataLoad {
            reason: format!("CSV header error: {}", e),
        })?;
        let columns = locate_columns(headers)?;

        let mut bars = Vec::new();
        let mut dropped = 0usize;

        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| RsiomaError::DataLoad {
                reason: format!("CSV parse error: {}", e),
            })?;
            // header is line 1
            let line = line + 2;

            let close = match record.get(columns.close).and_then(|s| s.parse::<f64>().ok()) {
                Some(c) if c.is_finite() => c,
                _ => {
                    dropped += 1;
                    continue;
                }
            };

            let date_str = record.get(columns.date).unwrap_or_default();
            let date = parse_date(date_str).ok_or_else(|| RsiomaError::DataLoad {
                reason: format!("invalid date {:?} on line {}", date_str, line),
            })?;

            bars.push(PriceBar {
                date,
                open: parse_price(&record, columns.open, "open", line)?,
                high: parse_price(&record, columns.high, "high", line)?,
                low: parse_price(&record, columns.low, "low", line)?,
                close,
            });
        }

        if dropped > 0 {
            tracing::warn!(
                dropped,
                path = %self.path.display(),
                "dropped rows with non-numeric close"
            );
        }

        bars.sort_by_key(|b| b.date);
        // Stable sort keeps file order among equal dates; the first one wins.
        bars.dedup_by_key(|b| b.date);
        Ok(bars)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PriceBar>, RsiomaError> {
        let bars = self
            .load_all()?
            .into_iter()
            .filter(|b| start_date.is_none_or(|s| b.date >= s))
            .filter(|b| end_date.is_none_or(|e| b.date <= e))
            .collect();
        Ok(bars)
    }

    fn get_data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, RsiomaError> {
        let bars = self.load_all()?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, bars.len())),
            _ => None,
        })
    }
}

fn locate_columns(headers: &csv::StringRecord) -> Result<Columns, RsiomaError> {
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| RsiomaError::DataLoad {
                reason: format!("missing {} column", name),
            })
    };

    Ok(Columns {
        date: find("date")?,
        open: find("open")?,
        high: find("high")?,
        low: find("low")?,
        close: find("close")?,
    })
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

fn parse_price(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    line: usize,
) -> Result<f64, RsiomaError> {
    record
        .get(index)
        .ok_or_else(|| RsiomaError::DataLoad {
            reason: format!("missing {} value on line {}", name, line),
        })?
        .parse()
        .map_err(|e| RsiomaError::DataLoad {
            reason: format!("invalid {} value on line {}: {}", name, line, e),
        })
}

/// Writes the trade ledger; returns are written in percent.
pub fn write_trades_csv(path: &Path, trades: &[Trade]) -> Result<(), RsiomaError> {
    let report_err = |e: csv::Error| RsiomaError::Report {
        reason: format!("failed to write {}: {}", path.display(), e),
    };

    let mut wtr = csv::Writer::from_path(path).map_err(report_err)?;
    wtr.write_record([
        "signal_date",
        "entry_date",
        "exit_date",
        "direction",
        "entry_open",
        "exit_close",
        "return_pct",
        "result",
    ])
    .map_err(report_err)?;

    for trade in trades {
        wtr.write_record([
            trade.signal_date.to_string(),
            trade.entry_date.to_string(),
            trade.exit_date.to_string(),
            trade.direction.to_string(),
            format!("{:.2}", trade.entry_price),
            format!("{:.2}", trade.exit_price),
            format!("{:.4}", trade.trade_return * 100.0),
            trade.outcome.to_string(),
        ])
        .map_err(report_err)?;
    }

    wtr.flush().map_err(|e| report_err(e.into()))?;
    Ok(())
}
