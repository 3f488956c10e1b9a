//! RSI (Relative Strength Index) indicator implementation.
//!
//! Uses simple trailing means of gains and losses (not Wilder's smoothing):
//! - change[i] = C[i] - C[i-1]; undefined at i = 0
//! - gain = max(change, 0), loss = max(-change, 0)
//! - avg_gain / avg_loss = mean of the last n gains / losses
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0 and avg_gain > 0: RSI = 100 (rs is infinite)
//! If both are 0 (flat window): RSI = 50
//!
//! Warmup: first n values are undefined (need n price changes).

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_rsi(closes: &[f64], period: usize) -> IndicatorSeries {
    if period == 0 || closes.len() < 2 {
        return IndicatorSeries {
            indicator_type: IndicatorType::Rsi(period),
            values: vec![None; closes.len()],
        };
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = closes
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();

    let mut values = Vec::with_capacity(closes.len());
    values.push(None);

    for change_idx in 0..gains.len() {
        if change_idx + 1 < period {
            values.push(None);
            continue;
        }
        let start = change_idx + 1 - period;
        let avg_gain = gains[start..=change_idx].iter().sum::<f64>() / period as f64;
        let avg_loss = losses[start..=change_idx].iter().sum::<f64>() / period as f64;
        values.push(Some(rsi_from_averages(avg_gain, avg_loss)));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 { 50.0 } else { 100.0 }
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
