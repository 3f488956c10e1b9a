//! Technical indicator implementations.
//!
//! Every indicator is a pure function over an ordered slice of closing prices
//! and returns a series aligned index-for-index with its input. A value is
//! `None` until the indicator's trailing window is fully populated.
//!
//! - `IndicatorType`: indicator identity + parameters (used for labels)
//! - `IndicatorSeries`: one indicator's values over time
//! - `IndicatorSet`: every series the signal rules need, computed together

pub mod bollinger;
pub mod rsi;
pub mod sma;
pub mod stddev;

use std::fmt;

use bollinger::{calculate_bollinger, BollingerBands};
use rsi::calculate_rsi;
use sma::calculate_sma;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Stddev(usize),
    Rsi(usize),
    BollingerUpper {
        period: usize,
        stddev_mult_x100: u32,
    },
    BollingerLower {
        period: usize,
        stddev_mult_x100: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    /// Value at `index`, `None` when undefined or out of range.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of leading undefined values.
    pub fn warmup(&self) -> usize {
        self.values.iter().take_while(|v| v.is_none()).count()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Stddev(period) => write!(f, "STDDEV({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::BollingerUpper {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BB_UPPER({},{})", period, mult)
            }
            IndicatorType::BollingerLower {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BB_LOWER({},{})", period, mult)
            }
        }
    }
}

/// Indicator windows. Defaults: 50/200 moving averages, 20-period Bollinger
/// at 2 standard deviations, 14-period RSI.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub fast_window: usize,
    pub slow_window: usize,
    pub bollinger_window: usize,
    pub bollinger_mult: f64,
    pub rsi_window: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        IndicatorParams {
            fast_window: 50,
            slow_window: 200,
            bollinger_window: 20,
            bollinger_mult: 2.0,
            rsi_window: 14,
        }
    }
}

impl IndicatorParams {
    /// Bars needed before every indicator is defined.
    pub fn longest_window(&self) -> usize {
        self.fast_window
            .max(self.slow_window)
            .max(self.bollinger_window)
            .max(self.rsi_window + 1)
    }
}

/// Indicator values at a single timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndicatorSnapshot {
    pub fast_ma: Option<f64>,
    pub slow_ma: Option<f64>,
    pub rsi: Option<f64>,
    pub upper_band: Option<f64>,
    pub lower_band: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    pub fast_ma: IndicatorSeries,
    pub slow_ma: IndicatorSeries,
    pub bollinger: BollingerBands,
    pub rsi: IndicatorSeries,
}

impl IndicatorSet {
    /// Recompute every indicator from scratch over `closes`.
    pub fn compute(closes: &[f64], params: &IndicatorParams) -> Self {
        let set = IndicatorSet {
            fast_ma: calculate_sma(closes, params.fast_window),
            slow_ma: calculate_sma(closes, params.slow_window),
            bollinger: calculate_bollinger(closes, params.bollinger_window, params.bollinger_mult),
            rsi: calculate_rsi(closes, params.rsi_window),
        };
        for series in [
            &set.fast_ma,
            &set.slow_ma,
            &set.bollinger.upper,
            &set.bollinger.lower,
            &set.rsi,
        ] {
            tracing::debug!(
                indicator = %series.indicator_type,
                warmup = series.warmup(),
                "indicator computed"
            );
        }
        set
    }

    pub fn len(&self) -> usize {
        self.fast_ma.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fast_ma.is_empty()
    }

    pub fn at(&self, index: usize) -> IndicatorSnapshot {
        IndicatorSnapshot {
            fast_ma: self.fast_ma.get(index),
            slow_ma: self.slow_ma.get(index),
            rsi: self.rsi.get(index),
            upper_band: self.bollinger.upper.get(index),
            lower_band: self.bollinger.lower.get(index),
        }
    }
}
