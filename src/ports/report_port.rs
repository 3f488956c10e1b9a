//! Report generation port trait.

use std::path::{Path, PathBuf};

use crate::domain::backtest::{BacktestConfig, BacktestResult};
use crate::domain::error::ConfluenceError;

/// Port for rendering a finished backtest. Rendering is terminal: nothing
/// it produces flows back into the simulation.
pub trait ReportPort {
    /// Write the report artifacts under `output_dir` and return their paths.
    fn write(
        &self,
        result: &BacktestResult,
        config: &BacktestConfig,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, ConfluenceError>;
}
