//! Backtest pipeline.
//!
//! prices → indicators → signals → simulation → metrics, with the
//! buy-and-hold baseline computed from prices alone. Everything is
//! recomputed on each run; there is no state between runs.

use chrono::NaiveDate;

use super::baseline::buy_and_hold;
use super::error::ConfluenceError;
use super::indicator::{IndicatorParams, IndicatorSet};
use super::metrics::PerformanceReport;
use super::ohlcv::PriceSeries;
use super::portfolio::EquityPoint;
use super::signal::{generate_signals, Signal, SignalRules};
use super::simulation::{simulate, SimulationResult};
use crate::ports::data_port::DataPort;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: f64,
    pub indicators: IndicatorParams,
    pub rules: SignalRules,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub prices: PriceSeries,
    pub indicators: IndicatorSet,
    pub signals: Vec<Signal>,
    pub simulation: SimulationResult,
    pub baseline: Vec<EquityPoint>,
    pub strategy_report: PerformanceReport,
    pub baseline_report: PerformanceReport,
}

/// Fetch the configured range and validate it into a `PriceSeries`.
///
/// An empty fetch is `DataUnavailable`; nothing downstream runs.
pub fn load_prices(
    data_port: &dyn DataPort,
    config: &BacktestConfig,
) -> Result<PriceSeries, ConfluenceError> {
    let bars = data_port.fetch_ohlcv(&config.symbol, config.start_date, config.end_date)?;
    if bars.is_empty() {
        return Err(ConfluenceError::DataUnavailable {
            symbol: config.symbol.clone(),
            start: config.start_date,
            end: config.end_date,
        });
    }
    PriceSeries::new(bars)
}

pub fn run_backtest(prices: &PriceSeries, config: &BacktestConfig) -> BacktestResult {
    let closes = prices.closes();
    let required = config.indicators.longest_window();
    if prices.len() < required {
        tracing::warn!(
            symbol = %config.symbol,
            bars = prices.len(),
            required,
            "insufficient history: indicators stay undefined and no trades will occur"
        );
    }

    let indicators = IndicatorSet::compute(&closes, &config.indicators);
    let signals = generate_signals(&closes, &indicators, &config.rules);
    tracing::info!(
        bars = prices.len(),
        buy_signals = signals.iter().filter(|s| s.buy).count(),
        sell_signals = signals.iter().filter(|s| s.sell).count(),
        "signals generated"
    );

    let simulation = simulate(prices.bars(), &signals, config.initial_capital);
    let baseline = buy_and_hold(prices.bars(), config.initial_capital);

    let strategy_report = PerformanceReport::compute(&simulation.equity_curve);
    let baseline_report = PerformanceReport::compute(&baseline);
    tracing::info!(trades = simulation.trade_count(), "simulation finished");

    BacktestResult {
        prices: prices.clone(),
        indicators,
        signals,
        simulation,
        baseline,
        strategy_report,
        baseline_report,
    }
}
