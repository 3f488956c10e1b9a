//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is the sample standard deviation from [`super::stddev`].
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) values are undefined.

use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::stddev::calculate_stddev;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub middle: IndicatorSeries,
    pub stddev: IndicatorSeries,
    pub upper: IndicatorSeries,
    pub lower: IndicatorSeries,
}

pub fn calculate_bollinger(closes: &[f64], period: usize, mult: f64) -> BollingerBands {
    let middle = calculate_sma(closes, period);
    let stddev = calculate_stddev(closes, period);
    let stddev_mult_x100 = (mult * 100.0).round() as u32;

    let band = |sign: f64| -> Vec<Option<f64>> {
        middle
            .values
            .iter()
            .zip(&stddev.values)
            .map(|(m, s)| Some((*m)? + sign * mult * (*s)?))
            .collect()
    };

    let upper = IndicatorSeries {
        indicator_type: IndicatorType::BollingerUpper {
            period,
            stddev_mult_x100,
        },
        values: band(1.0),
    };
    let lower = IndicatorSeries {
        indicator_type: IndicatorType::BollingerLower {
            period,
            stddev_mult_x100,
        },
        values: band(-1.0),
    };

    BollingerBands {
        middle,
        stddev,
        upper,
        lower,
    }
}
