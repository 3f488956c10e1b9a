//! Standard Deviation indicator.
//!
//! Sample standard deviation over n closing prices (divides by n-1).
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n) / (n - 1))
//! Warmup: first (n-1) values are undefined. Periods below 2 have no sample
//! deviation and are undefined everywhere.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_stddev(closes: &[f64], period: usize) -> IndicatorSeries {
    let values = (0..closes.len())
        .map(|i| {
            if period < 2 || i + 1 < period {
                return None;
            }
            Some(sample_stddev(&closes[i + 1 - period..=i]))
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Stddev(period),
        values,
    }
}

/// Sample standard deviation of `values`. Callers guarantee `values.len() >= 2`.
pub(crate) fn sample_stddev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1.0);
    variance.sqrt()
}
