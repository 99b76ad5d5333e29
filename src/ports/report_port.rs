//! Report generation port trait.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::RsiomaError;
use crate::domain::strategy::StrategyConfig;
use std::fs;
use std::path::Path;

/// Port for presenting backtest results.
pub trait ReportPort {
    fn render(&self, result: &BacktestResult, config: &StrategyConfig) -> String;

    /// Default implementation: writes `render` output to `output_path`.
    fn write(
        &self,
        result: &BacktestResult,
        config: &StrategyConfig,
        output_path: &Path,
    ) -> Result<(), RsiomaError> {
        fs::write(output_path, self.render(result, config)).map_err(|e| RsiomaError::Report {
            reason: format!("failed to write {}: {}", output_path.display(), e),
        })
    }
}
