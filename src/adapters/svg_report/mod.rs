//! SVG chart report adapter.
//!
//! Writes three standalone charts for a finished backtest:
//! price with moving averages, bands and signal markers; strategy versus
//! buy-and-hold portfolio value; and RSI with its threshold lines.

pub mod chart_svg;

use std::fs;
use std::path::{Path, PathBuf};

use chart_svg::{Chart, LineSeries, MarkerShape, Markers, ReferenceLine};

use crate::domain::backtest::{BacktestConfig, BacktestResult};
use crate::domain::error::ConfluenceError;
use crate::domain::portfolio::EquityPoint;
use crate::domain::signal::Signal;
use crate::ports::report_port::ReportPort;

pub const PRICE_CHART_FILE: &str = "price_with_signals.svg";
pub const VALUE_CHART_FILE: &str = "strategy_vs_buy_and_hold.svg";
pub const RSI_CHART_FILE: &str = "rsi_with_signals.svg";

#[derive(Debug, Default, Clone, Copy)]
pub struct SvgReportAdapter;

impl SvgReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportPort for SvgReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        config: &BacktestConfig,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, ConfluenceError> {
        fs::create_dir_all(output_dir)?;

        let charts = [
            (PRICE_CHART_FILE, price_chart(result, config)),
            (VALUE_CHART_FILE, value_chart(result, config)),
            (RSI_CHART_FILE, rsi_chart(result, config)),
        ];

        let mut written = Vec::with_capacity(charts.len());
        for (file_name, chart) in charts {
            let path = output_dir.join(file_name);
            fs::write(&path, chart.to_svg())?;
            tracing::info!(path = %path.display(), "chart written");
            written.push(path);
        }
        Ok(written)
    }
}

/// Points where a signal fired, placed at `values[i]` when it is defined.
fn signal_points(
    result: &BacktestResult,
    values: &[Option<f64>],
    pick: impl Fn(&Signal) -> bool,
) -> Vec<(usize, f64)> {
    result
        .signals
        .iter()
        .enumerate()
        .filter(|(_, s)| pick(s))
        .filter_map(|(i, _)| values.get(i).copied().flatten().map(|v| (i, v)))
        .collect()
}

pub fn price_chart(result: &BacktestResult, config: &BacktestConfig) -> Chart {
    let closes: Vec<Option<f64>> = result.prices.closes().into_iter().map(Some).collect();
    let params = &config.indicators;
    let bands = &result.indicators.bollinger;

    Chart {
        title: format!(
            "{} Price with Bollinger Bands and Buy/Sell Signals",
            config.symbol
        ),
        y_label: "Price".into(),
        dates: result.prices.dates(),
        lines: vec![
            LineSeries {
                label: format!("{} Price", config.symbol),
                color: "#1f77b4",
                dashed: false,
                values: closes.clone(),
            },
            LineSeries {
                label: format!("{}-Day Moving Average", params.fast_window),
                color: "#ff7f0e",
                dashed: false,
                values: result.indicators.fast_ma.values.clone(),
            },
            LineSeries {
                label: format!("{}-Day Moving Average", params.slow_window),
                color: "#2ca02c",
                dashed: false,
                values: result.indicators.slow_ma.values.clone(),
            },
            LineSeries {
                label: "Upper Bollinger Band".into(),
                color: "#7f7f7f",
                dashed: true,
                values: bands.upper.values.clone(),
            },
            LineSeries {
                label: "Lower Bollinger Band".into(),
                color: "#7f7f7f",
                dashed: true,
                values: bands.lower.values.clone(),
            },
        ],
        markers: vec![
            Markers {
                label: "Buy Signal".into(),
                color: "green",
                shape: MarkerShape::TriangleUp,
                points: signal_points(result, &closes, |s| s.buy),
            },
            Markers {
                label: "Sell Signal".into(),
                color: "red",
                shape: MarkerShape::TriangleDown,
                points: signal_points(result, &closes, |s| s.sell),
            },
        ],
        ..Chart::default()
    }
}

pub fn value_chart(result: &BacktestResult, config: &BacktestConfig) -> Chart {
    let as_line = |curve: &[EquityPoint]| {
        curve.iter().map(|p| Some(p.equity)).collect::<Vec<_>>()
    };

    Chart {
        title: format!("{} - Strategy vs. Buy-and-Hold", config.symbol),
        y_label: "Portfolio Value ($)".into(),
        dates: result.prices.dates(),
        lines: vec![
            LineSeries {
                label: "Strategy".into(),
                color: "red",
                dashed: true,
                values: as_line(&result.simulation.equity_curve),
            },
            LineSeries {
                label: "Buy-and-Hold".into(),
                color: "green",
                dashed: false,
                values: as_line(&result.baseline),
            },
        ],
        ..Chart::default()
    }
}

pub fn rsi_chart(result: &BacktestResult, config: &BacktestConfig) -> Chart {
    let rsi = &result.indicators.rsi.values;
    let rules = &config.rules;

    Chart {
        title: format!("{} RSI with Buy/Sell Signals", config.symbol),
        y_label: "RSI".into(),
        dates: result.prices.dates(),
        lines: vec![LineSeries {
            label: "RSI".into(),
            color: "purple",
            dashed: false,
            values: rsi.clone(),
        }],
        markers: vec![
            Markers {
                label: "Buy Signal".into(),
                color: "green",
                shape: MarkerShape::TriangleUp,
                points: signal_points(result, rsi, |s| s.buy),
            },
            Markers {
                label: "Sell Signal".into(),
                color: "red",
                shape: MarkerShape::TriangleDown,
                points: signal_points(result, rsi, |s| s.sell),
            },
        ],
        reference_lines: vec![
            ReferenceLine {
                label: format!("Overbought ({})", rules.rsi_overbought),
                color: "red",
                y: rules.rsi_overbought,
            },
            ReferenceLine {
                label: format!("Oversold ({})", rules.rsi_oversold),
                color: "green",
                y: rules.rsi_oversold,
            },
        ],
        y_range: Some((0.0, 100.0)),
    }
}
