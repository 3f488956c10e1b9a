//! Simple Moving Average.
//!
//! SMA(n)[i] = sum(C[i-n+1..=i]) / n
//! Warmup: first (n-1) values are undefined. A zero period is undefined everywhere.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_sma(closes: &[f64], period: usize) -> IndicatorSeries {
    let values = (0..closes.len())
        .map(|i| {
            if period == 0 || i + 1 < period {
                return None;
            }
            let window = &closes[i + 1 - period..=i];
            Some(window.iter().sum::<f64>() / period as f64)
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}
