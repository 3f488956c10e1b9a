#![allow(dead_code)]

use chrono::NaiveDate;
use confluence::domain::backtest::{BacktestConfig, BacktestResult};
use confluence::domain::error::ConfluenceError;
use confluence::domain::indicator::IndicatorParams;
pub use confluence::domain::ohlcv::OhlcvBar;
use confluence::domain::signal::SignalRules;
use confluence::ports::data_port::DataPort;
use confluence::ports::report_port::ReportPort;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, ConfluenceError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(ConfluenceError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, ConfluenceError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, ConfluenceError> {
        match self.data.get(symbol) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

/// Records every call instead of touching the filesystem.
#[derive(Default)]
pub struct RecordingReportPort {
    pub calls: RefCell<Vec<(String, PathBuf)>>,
}

impl ReportPort for RecordingReportPort {
    fn write(
        &self,
        _result: &BacktestResult,
        config: &BacktestConfig,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, ConfluenceError> {
        self.calls
            .borrow_mut()
            .push((config.symbol.clone(), output_dir.to_path_buf()));
        Ok(vec![])
    }
}

pub fn make_bar(date: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

pub fn sample_config() -> BacktestConfig {
    BacktestConfig {
        symbol: "SPY".into(),
        start_date: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        initial_capital: 10_000.0,
        indicators: IndicatorParams::default(),
        rules: SignalRules::default(),
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One bar per calendar day from `start_date`, with the given closes.
pub fn bars_from_closes(start_date: &str, closes: &[f64]) -> Vec<OhlcvBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        })
        .collect()
}

pub fn generate_bars(start_date: &str, count: usize, start_price: f64) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..count).map(|i| start_price + i as f64).collect();
    bars_from_closes(start_date, &closes)
}

/// 260 bars rising by 0.5 from 100, then `drops` bars falling by 5.
///
/// With default parameters the first close that is both below the lower band
/// and below RSI 30 while the fast MA is above the slow MA is the third drop
/// (index 262, close 214.5).
pub fn rally_then_selloff(drops: usize) -> Vec<f64> {
    let mut closes: Vec<f64> = (0..260).map(|i| 100.0 + 0.5 * i as f64).collect();
    let peak = closes[259];
    closes.extend((1..=drops).map(|k| peak - 5.0 * k as f64));
    closes
}

pub fn csv_content(bars: &[OhlcvBar]) -> String {
    let mut out = String::from("Date,Open,High,Low,Close,Adj Close,Volume\n");
    for b in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.close, b.volume
        ));
    }
    out
}
