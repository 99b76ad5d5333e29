//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::{CsvAdapter, write_trades_csv};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report::TextReportAdapter;
use crate::domain::backtest::{self as backtest_engine, BacktestResult};
use crate::domain::config_validation::{
    parse_optional_date, read_flag, read_period, read_threshold, validate_data_config,
    validate_strategy_config,
};
use crate::domain::error::RsiomaError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::strategy::{
    DEFAULT_MA_PERIOD, DEFAULT_OVERBOUGHT, DEFAULT_OVERSOLD, DEFAULT_RSI_PERIOD,
    DEFAULT_SIGNAL_PERIOD, DEFAULT_TREND_WINDOW, StrategyConfig,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "rsioma", about = "RSI-of-moving-average signal backtester")]
pub struct Cli {
    /// Log per-signal and per-trade detail
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest over a CSV price file
    Backtest {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        trades_csv: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the date range of a price file
    Info {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
}

/// Where the run's inputs come from and where its outputs go.
#[derive(Debug, Clone, PartialEq)]
pub struct RunPlan {
    pub data_path: PathBuf,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub output: Option<PathBuf>,
    pub trades_csv: Option<PathBuf>,
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging(cli.verbose);

    let outcome = match cli.command {
        Command::Backtest {
            config,
            data,
            output,
            trades_csv,
        } => run_backtest(config.as_deref(), data, output, trades_csv),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, data } => run_info(config.as_deref(), data),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            (&e).into()
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    // A subscriber may already be installed when embedded.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn load_config(path: Option<&Path>) -> Result<Option<FileConfigAdapter>, RsiomaError> {
    match path {
        Some(path) => {
            tracing::info!("Loading config from {}", path.display());
            FileConfigAdapter::from_file(path).map(Some)
        }
        None => Ok(None),
    }
}

/// Reads `[strategy]`, falling back to defaults for absent keys. Values
/// that do not parse are `ConfigInvalid`.
pub fn build_strategy_config(adapter: &dyn ConfigPort) -> Result<StrategyConfig, RsiomaError> {
    let config = StrategyConfig {
        ma_period: read_period(adapter, "ma_period", DEFAULT_MA_PERIOD)?,
        rsi_period: read_period(adapter, "rsi_period", DEFAULT_RSI_PERIOD)?,
        signal_period: read_period(adapter, "signal_period", DEFAULT_SIGNAL_PERIOD)?,
        oversold: read_threshold(adapter, "oversold", DEFAULT_OVERSOLD)?,
        overbought: read_threshold(adapter, "overbought", DEFAULT_OVERBOUGHT)?,
        trend_window: read_period(adapter, "trend_window", DEFAULT_TREND_WINDOW)?,
        use_trend_filter: read_flag(adapter, "use_trend_filter", true)?,
    };
    validate_strategy_config(&config)?;
    Ok(config)
}

/// Merges CLI overrides with the `[data]` and `[report]` sections.
pub fn build_run_plan(
    adapter: Option<&dyn ConfigPort>,
    data_override: Option<PathBuf>,
    output_override: Option<PathBuf>,
    trades_override: Option<PathBuf>,
) -> Result<RunPlan, RsiomaError> {
    let from_config = |section: &str, key: &str| {
        adapter
            .and_then(|a| a.get_non_empty(section, key))
            .map(PathBuf::from)
    };

    let data_path = data_override
        .or_else(|| from_config("data", "path"))
        .ok_or_else(|| RsiomaError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })?;

    let (start_date, end_date) = match adapter {
        Some(a) => {
            validate_data_config(a)?;
            (
                parse_optional_date(a, "start_date")?,
                parse_optional_date(a, "end_date")?,
            )
        }
        None => (None, None),
    };

    Ok(RunPlan {
        data_path,
        start_date,
        end_date,
        output: output_override.or_else(|| from_config("report", "output")),
        trades_csv: trades_override.or_else(|| from_config("report", "trades_csv")),
    })
}

/// Loads bars through `data_port`, validates them and runs the engine.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    strategy: &StrategyConfig,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<BacktestResult, RsiomaError> {
    let bars = data_port.fetch_bars(start_date, end_date)?;
    tracing::info!("Loaded {} bars", bars.len());

    let series = PriceSeries::new(bars)?;
    tracing::info!(
        "Running {} from {} to {}",
        strategy.label(),
        series.first().date,
        series.last().date
    );
    backtest_engine::run_backtest(&series, strategy)
}

fn run_backtest(
    config_path: Option<&Path>,
    data: Option<PathBuf>,
    output: Option<PathBuf>,
    trades_csv: Option<PathBuf>,
) -> Result<(), RsiomaError> {
    let adapter = load_config(config_path)?;
    let strategy = match &adapter {
        Some(a) => build_strategy_config(a)?,
        None => StrategyConfig::default(),
    };
    let plan = build_run_plan(
        adapter.as_ref().map(|a| a as &dyn ConfigPort),
        data,
        output,
        trades_csv,
    )?;

    let data_port = CsvAdapter::new(plan.data_path.clone());
    let result = run_backtest_pipeline(&data_port, &strategy, plan.start_date, plan.end_date)?;

    let report = TextReportAdapter::new();
    match &plan.output {
        Some(path) => {
            report.write(&result, &strategy, path)?;
            tracing::info!("Report written to: {}", path.display());
        }
        None => print!("{}", report.render(&result, &strategy)),
    }

    if let Some(path) = &plan.trades_csv {
        write_trades_csv(path, &result.trades)?;
        tracing::info!("Trades written to: {}", path.display());
    }

    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), RsiomaError> {
    let adapter = FileConfigAdapter::from_file(config_path)?;
    let strategy = build_strategy_config(&adapter)?;
    validate_data_config(&adapter)?;
    println!("Configuration is valid: {}", strategy.label());
    println!("Minimum bars required: {}", strategy.min_bars());
    Ok(())
}

fn run_info(config_path: Option<&Path>, data: Option<PathBuf>) -> Result<(), RsiomaError> {
    let adapter = load_config(config_path)?;
    let plan = build_run_plan(
        adapter.as_ref().map(|a| a as &dyn ConfigPort),
        data,
        None,
        None,
    )?;

    let data_port = CsvAdapter::new(plan.data_path.clone());
    match data_port.get_data_range()? {
        Some((first, last, count)) => {
            println!("{}: {} to {} ({} bars)", plan.data_path.display(), first, last, count);
        }
        None => println!("{}: no data", plan.data_path.display()),
    }
    Ok(())
}
